use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::types::{BOARD_LEN, BOARD_WIDTH, Cell, Move, Player, Score};

const BOARD_SIZE: usize = BOARD_WIDTH as usize;
const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Grid form of a board, row-major. This is also the wire shape.
pub type Grid = [[Cell; BOARD_SIZE]; BOARD_SIZE];

/// Othello board state represented by two disjoint bitboards.
///
/// Bit `row * 8 + col` is set in exactly one of the masks for every occupied
/// square. Boards are values: applying a move returns a new board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Grid", into = "Grid")]
pub struct Board {
    dark: u64,
    light: u64,
}

impl Board {
    /// Creates the initial board:
    /// d4=light, e4=dark, d5=dark, e5=light.
    pub fn new() -> Self {
        Self {
            dark: bit(28) | bit(35),
            light: bit(27) | bit(36),
        }
    }

    /// Builds a board from an explicit grid.
    pub fn from_cells(cells: Grid) -> Self {
        let mut dark = 0u64;
        let mut light = 0u64;
        for (row, line) in cells.iter().enumerate() {
            for (col, cell) in line.iter().enumerate() {
                let square = bit(row * BOARD_SIZE + col);
                match cell {
                    Cell::Dark => dark |= square,
                    Cell::Light => light |= square,
                    Cell::Empty => {}
                }
            }
        }
        Self { dark, light }
    }

    pub(crate) fn from_bitboards(dark: u64, light: u64) -> Self {
        debug_assert_eq!(dark & light, 0, "a square cannot hold both colours");
        Self { dark, light }
    }

    pub fn cells(&self) -> Grid {
        let mut grid = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        for (pos, cell) in grid.iter_mut().flatten().enumerate() {
            *cell = self.cell_at_index(pos);
        }
        grid
    }

    pub fn cell_at(&self, mv: Move) -> Cell {
        self.cell_at_index(mv.index())
    }

    fn cell_at_index(&self, pos: usize) -> Cell {
        let square = bit(pos);
        if (self.dark & square) != 0 {
            Cell::Dark
        } else if (self.light & square) != 0 {
            Cell::Light
        } else {
            Cell::Empty
        }
    }

    pub fn disc_counts(&self) -> Score {
        Score {
            dark: self.dark.count_ones() as u8,
            light: self.light.count_ones() as u8,
        }
    }

    pub fn empty_count(&self) -> u8 {
        BOARD_LEN as u8 - self.disc_counts().total()
    }

    pub fn is_full(&self) -> bool {
        (self.dark | self.light) == u64::MAX
    }

    /// Returns every legal move for `player`.
    pub fn valid_moves(&self, player: Player) -> ValidMoveSet {
        let (me, opp) = self.sides(player);
        let occupied = me | opp;
        let mut legal = 0u64;

        for pos in 0..BOARD_LEN {
            let move_bit = bit(pos);
            if (occupied & move_bit) != 0 {
                continue;
            }
            if Self::collect_flips(pos, me, opp) != 0 {
                legal |= move_bit;
            }
        }

        ValidMoveSet(legal)
    }

    pub fn has_valid_move(&self, player: Player) -> bool {
        !self.valid_moves(player).is_empty()
    }

    /// Returns the discs `player` would flip by playing `mv`.
    /// Empty when the move is illegal.
    pub fn flips(&self, mv: Move, player: Player) -> Vec<Move> {
        let (me, opp) = self.sides(player);
        mask_to_moves(Self::collect_flips(mv.index(), me, opp))
    }

    /// Places one disc and flips captured discs, returning the new board.
    pub fn apply(&self, mv: Move, player: Player) -> Result<Board, EngineError> {
        self.apply_with_flips(mv, player).map(|(board, _)| board)
    }

    /// Like [`Board::apply`], also returning the flipped squares.
    pub(crate) fn apply_with_flips(
        &self,
        mv: Move,
        player: Player,
    ) -> Result<(Board, Vec<Move>), EngineError> {
        let pos = mv.index();
        let (me, opp) = self.sides(player);

        let flips = Self::collect_flips(pos, me, opp);
        if flips == 0 {
            return Err(EngineError::IllegalMove { mv, player });
        }

        let next_me = me | bit(pos) | flips;
        let next_opp = opp & !flips;

        let next = match player {
            Player::Dark => Self::from_bitboards(next_me, next_opp),
            Player::Light => Self::from_bitboards(next_opp, next_me),
        };
        Ok((next, mask_to_moves(flips)))
    }

    fn sides(&self, player: Player) -> (u64, u64) {
        match player {
            Player::Dark => (self.dark, self.light),
            Player::Light => (self.light, self.dark),
        }
    }

    fn collect_flips(pos: usize, me: u64, opp: u64) -> u64 {
        if pos >= BOARD_LEN {
            return 0;
        }

        let move_bit = bit(pos);
        if ((me | opp) & move_bit) != 0 {
            return 0;
        }

        let (row, col) = pos_to_row_col(pos);
        let mut flips = 0u64;

        for (dr, dc) in DIRECTIONS {
            let mut r = row + dr;
            let mut c = col + dc;
            let mut line = 0u64;

            while in_bounds(r, c) {
                let square = bit((r as usize) * BOARD_SIZE + c as usize);
                if (opp & square) != 0 {
                    line |= square;
                } else {
                    // Only a run closed by our own disc captures.
                    if (me & square) != 0 {
                        flips |= line;
                    }
                    break;
                }

                r += dr;
                c += dc;
            }
        }

        flips
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Grid> for Board {
    fn from(cells: Grid) -> Self {
        Self::from_cells(cells)
    }
}

impl From<Board> for Grid {
    fn from(board: Board) -> Self {
        board.cells()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  A B C D E F G H")?;
        for (row, line) in self.cells().iter().enumerate() {
            write!(f, "\n{}", row + 1)?;
            for cell in line {
                write!(f, " {}", cell.marker())?;
            }
        }
        Ok(())
    }
}

/// Legal moves for one side of one board, kept as a bit mask.
///
/// Iterates in row-major order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ValidMoveSet(u64);

impl ValidMoveSet {
    pub fn contains(&self, mv: Move) -> bool {
        (self.0 & bit(mv.index())) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Move> {
        mask_to_moves(self.0).into_iter()
    }

    pub fn to_vec(&self) -> Vec<Move> {
        mask_to_moves(self.0)
    }

    /// Lowest row-major move, if any.
    pub fn first(&self) -> Option<Move> {
        (!self.is_empty()).then(|| Move::from_index(self.0.trailing_zeros() as usize))
    }
}

impl Serialize for ValidMoveSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

fn bit(pos: usize) -> u64 {
    if pos < BOARD_LEN { 1u64 << pos } else { 0 }
}

fn mask_to_moves(mask: u64) -> Vec<Move> {
    let mut bits = mask;
    let mut out = Vec::with_capacity(bits.count_ones() as usize);

    while bits != 0 {
        out.push(Move::from_index(bits.trailing_zeros() as usize));
        bits &= bits - 1;
    }

    out
}

fn pos_to_row_col(pos: usize) -> (i32, i32) {
    ((pos / BOARD_SIZE) as i32, (pos % BOARD_SIZE) as i32)
}

fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}
