use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub const BOARD_WIDTH: u8 = 8;
pub const BOARD_LEN: usize = (BOARD_WIDTH as usize) * (BOARD_WIDTH as usize);

const COLUMN_LABELS: &str = "ABCDEFGH";

/// One of the two sides. Dark always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Player {
    #[default]
    #[serde(rename = "B")]
    Dark,
    #[serde(rename = "W")]
    Light,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Dark => Player::Light,
            Player::Light => Player::Dark,
        }
    }

    /// Single-character marker used on the bridge wire.
    pub fn marker(self) -> char {
        match self {
            Player::Dark => 'B',
            Player::Light => 'W',
        }
    }
}

impl std::ops::Not for Player {
    type Output = Self;

    fn not(self) -> Self {
        self.opponent()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Dark => f.write_str("dark"),
            Player::Light => f.write_str("light"),
        }
    }
}

/// State of a single square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    #[serde(rename = ".")]
    Empty,
    #[serde(rename = "B")]
    Dark,
    #[serde(rename = "W")]
    Light,
}

impl Cell {
    pub fn marker(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Dark => 'B',
            Cell::Light => 'W',
        }
    }

    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Dark => Some(Player::Dark),
            Cell::Light => Some(Player::Light),
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::Dark => Cell::Dark,
            Player::Light => Cell::Light,
        }
    }
}

/// A board coordinate, always inside the 8x8 grid.
///
/// Notation is column letter then 1-based row: `"D3"` is row 2, col 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawMove")]
pub struct Move {
    row: u8,
    col: u8,
}

#[derive(Deserialize)]
struct RawMove {
    row: u8,
    col: u8,
}

impl TryFrom<RawMove> for Move {
    type Error = EngineError;

    fn try_from(raw: RawMove) -> Result<Self, Self::Error> {
        Move::new(raw.row, raw.col)
    }
}

impl Move {
    pub fn new(row: u8, col: u8) -> Result<Self, EngineError> {
        if row >= BOARD_WIDTH || col >= BOARD_WIDTH {
            return Err(EngineError::OutOfBounds { row, col });
        }
        Ok(Self { row, col })
    }

    /// Row-major square index, `0..64`.
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index < BOARD_LEN);
        Self {
            row: (index / BOARD_WIDTH as usize) as u8,
            col: (index % BOARD_WIDTH as usize) as u8,
        }
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    pub fn index(self) -> usize {
        self.row as usize * BOARD_WIDTH as usize + self.col as usize
    }

    pub fn is_corner(self) -> bool {
        let last = BOARD_WIDTH - 1;
        (self.row == 0 || self.row == last) && (self.col == 0 || self.col == last)
    }

    pub fn is_edge(self) -> bool {
        let last = BOARD_WIDTH - 1;
        self.row == 0 || self.row == last || self.col == 0 || self.col == last
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let col = COLUMN_LABELS
            .chars()
            .nth(self.col as usize)
            .ok_or(fmt::Error)?;
        write!(f, "{}{}", col, self.row + 1)
    }
}

impl FromStr for Move {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidNotation(s.to_string());
        let mut chars = s.trim().chars();
        let col_char = chars.next().ok_or_else(invalid)?.to_ascii_uppercase();
        let col = COLUMN_LABELS.find(col_char).ok_or_else(invalid)?;
        let row = chars.next().and_then(|c| c.to_digit(10)).ok_or_else(invalid)?;
        if chars.next().is_some() || !(1..=BOARD_WIDTH as u32).contains(&row) {
            return Err(invalid());
        }
        Move::new(row as u8 - 1, col as u8)
    }
}

/// Final result of a decided game. On the wire: `"B"`, `"W"` or `"draw"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

impl From<GameOutcome> for String {
    fn from(outcome: GameOutcome) -> Self {
        match outcome {
            GameOutcome::Winner(player) => player.marker().to_string(),
            GameOutcome::Draw => "draw".to_string(),
        }
    }
}

impl TryFrom<String> for GameOutcome {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "B" => Ok(GameOutcome::Winner(Player::Dark)),
            "W" => Ok(GameOutcome::Winner(Player::Light)),
            "draw" | "DRAW" => Ok(GameOutcome::Draw),
            _ => Err(EngineError::InvalidNotation(value)),
        }
    }
}

impl GameOutcome {
    pub fn winner(self) -> Option<Player> {
        match self {
            GameOutcome::Winner(player) => Some(player),
            GameOutcome::Draw => None,
        }
    }
}

/// Disc counts per colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub dark: u8,
    pub light: u8,
}

impl Score {
    pub fn total(self) -> u8 {
        self.dark + self.light
    }

    pub fn of(self, player: Player) -> u8 {
        match player {
            Player::Dark => self.dark,
            Player::Light => self.light,
        }
    }

    /// Disc margin from `player`'s side.
    pub fn margin(self, player: Player) -> i32 {
        self.of(player) as i32 - self.of(!player) as i32
    }
}

/// Public game state handed to UIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub board: [[Cell; 8]; 8],
    pub current_player: Player,
    pub valid_moves: Vec<Move>,
    pub score: Score,
    pub is_game_over: bool,
    pub winner: Option<GameOutcome>,
    /// Contract:
    /// - `Some(player)` when `player` was skipped after the last move.
    /// - `None` when the turn alternated normally.
    pub passed: Option<Player>,
    /// Cells recoloured by the last move; empty before the first move.
    pub flipped: Vec<Move>,
    pub history: Vec<Ply>,
}

/// A move together with the side that played it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ply {
    #[serde(rename = "move")]
    pub mv: Move,
    pub player: Player,
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub outcome: GameOutcome,
    pub score: Score,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_notation_uses_column_letter_then_row_number() {
        let mv = Move::new(2, 3).unwrap();
        assert_eq!(mv.to_string(), "D3");
        assert_eq!("D3".parse::<Move>().unwrap(), mv);
        assert_eq!("h8".parse::<Move>().unwrap(), Move::new(7, 7).unwrap());
        assert_eq!("A1".parse::<Move>().unwrap().index(), 0);
    }

    #[test]
    fn move_notation_rejects_garbage() {
        for bad in ["", "A", "A0", "A9", "I1", "AA", "A12", "3D"] {
            assert!(
                matches!(bad.parse::<Move>(), Err(EngineError::InvalidNotation(_))),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn move_new_rejects_out_of_range_coordinates() {
        assert!(matches!(
            Move::new(8, 0),
            Err(EngineError::OutOfBounds { row: 8, col: 0 })
        ));
        assert!(Move::new(0, 8).is_err());
        assert!(Move::new(7, 7).is_ok());
    }

    #[test]
    fn move_deserialization_checks_bounds() {
        let ok: Move = serde_json::from_str(r#"{"row":4,"col":5}"#).unwrap();
        assert_eq!(ok, Move::new(4, 5).unwrap());
        assert!(serde_json::from_str::<Move>(r#"{"row":9,"col":1}"#).is_err());
    }

    #[test]
    fn players_and_cells_use_bridge_markers() {
        assert_eq!(serde_json::to_string(&Player::Dark).unwrap(), r#""B""#);
        assert_eq!(serde_json::to_string(&Cell::Empty).unwrap(), r#"".""#);
        assert_eq!(serde_json::from_str::<Cell>(r#""W""#).unwrap(), Cell::Light);
        assert_eq!(!Player::Dark, Player::Light);
    }

    #[test]
    fn outcomes_use_bridge_strings() {
        let win = GameOutcome::Winner(Player::Light);
        assert_eq!(serde_json::to_string(&win).unwrap(), r#""W""#);
        assert_eq!(
            serde_json::from_str::<GameOutcome>(r#""draw""#).unwrap(),
            GameOutcome::Draw
        );
        assert!(serde_json::from_str::<GameOutcome>(r#""X""#).is_err());
    }

    #[test]
    fn corner_and_edge_classification() {
        assert!(Move::new(0, 7).unwrap().is_corner());
        assert!(Move::new(0, 3).unwrap().is_edge());
        assert!(!Move::new(0, 3).unwrap().is_corner());
        assert!(!Move::new(3, 3).unwrap().is_edge());
    }
}
