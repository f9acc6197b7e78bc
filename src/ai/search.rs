use std::time::Duration;

use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::ai::MoveSelector;
use crate::board::Board;
use crate::types::{Move, Player};

const DEFAULT_TIMEOUT_SECS: u64 = 5;
const MIN_SCORE: i32 = i32::MIN + 1;
const MAX_SCORE: i32 = i32::MAX;
const CORNER_WEIGHT: i32 = 25;
const MOBILITY_WEIGHT: i32 = 2;
// Finished games outrank any heuristic score.
const WIN_WEIGHT: i32 = 1000;
const CORNERS: [usize; 4] = [0, 7, 56, 63];

/// Depth and wall-clock budget for one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    pub max_depth: u8,
    pub timeout: Duration,
}

impl SearchLimits {
    pub fn depth(max_depth: u8) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_depth: 3,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SearchResult {
    Complete(Option<Move>, i32),
    TimedOut,
}

impl SearchResult {
    fn negate(self) -> Self {
        match self {
            Self::Complete(mv, score) => Self::Complete(mv, -score),
            Self::TimedOut => Self::TimedOut,
        }
    }
}

/// Iterative-deepening alpha-beta negamax.
pub struct Searcher {
    start_time: Instant,
    limits: SearchLimits,
    timed_out: bool,
}

impl Searcher {
    pub fn new(limits: SearchLimits) -> Self {
        Self {
            start_time: Instant::now(),
            limits,
            timed_out: false,
        }
    }

    /// Searches the best move for `player`, or `None` if it has no legal move.
    pub fn search(&mut self, board: &Board, player: Player) -> Option<Move> {
        self.start_time = Instant::now();
        self.timed_out = false;

        let moves = board.valid_moves(player).to_vec();
        if moves.len() <= 1 {
            return moves.first().copied();
        }

        let mut best_move = moves[0];

        for depth in 1..=self.limits.max_depth.max(1) {
            match self.negamax(board, player, depth, depth, MIN_SCORE, MAX_SCORE) {
                SearchResult::Complete(Some(mv), _score) => {
                    best_move = mv;
                }
                SearchResult::Complete(None, _) => {}
                SearchResult::TimedOut => break,
            }
        }

        Some(best_move)
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    fn negamax(
        &mut self,
        board: &Board,
        player: Player,
        depth: u8,
        root_depth: u8,
        alpha: i32,
        beta: i32,
    ) -> SearchResult {
        // Keep depth-1 search guaranteed by suppressing timeout checks at root depth 1.
        if root_depth > 1 && self.start_time.elapsed() >= self.limits.timeout {
            self.timed_out = true;
            return SearchResult::TimedOut;
        }

        let legal = board.valid_moves(player);
        if legal.is_empty() {
            if !board.has_valid_move(!player) {
                return SearchResult::Complete(None, final_score(board, player));
            }
            if depth == 0 {
                return SearchResult::Complete(None, evaluate(board, player));
            }
            return self
                .negamax(board, !player, depth - 1, root_depth, -beta, -alpha)
                .negate();
        }

        if depth == 0 {
            return SearchResult::Complete(None, evaluate(board, player));
        }

        let mut best_move = None;
        let mut best_score = MIN_SCORE;
        let mut alpha = alpha;

        for (mv, next) in sorted_moves(board, player) {
            match self.negamax(&next, !player, depth - 1, root_depth, -beta, -alpha) {
                SearchResult::TimedOut => return SearchResult::TimedOut,
                SearchResult::Complete(_, score) => {
                    let score = -score;
                    if is_better_move(score, mv, best_score, best_move) {
                        best_score = score;
                        best_move = Some(mv);
                    }
                    if score > alpha {
                        alpha = score;
                    }
                    if alpha >= beta {
                        break;
                    }
                }
            }
        }

        SearchResult::Complete(best_move, best_score)
    }
}

/// Fixed-depth minimax player.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimaxSelector {
    limits: SearchLimits,
}

impl MinimaxSelector {
    pub fn new(limits: SearchLimits) -> Self {
        Self { limits }
    }
}

impl MoveSelector for MinimaxSelector {
    fn select_move(&mut self, board: &Board, player: Player) -> Option<Move> {
        Searcher::new(self.limits).search(board, player)
    }
}

/// Static evaluation from `player`'s side: disc margin, corners, mobility.
pub fn evaluate(board: &Board, player: Player) -> i32 {
    let mut score = board.disc_counts().margin(player);

    let cells = board.cells();
    for corner in CORNERS {
        let owner = cells[corner / 8][corner % 8].owner();
        if owner == Some(player) {
            score += CORNER_WEIGHT;
        } else if owner == Some(!player) {
            score -= CORNER_WEIGHT;
        }
    }

    let mobility = board.valid_moves(player).len() as i32 - board.valid_moves(!player).len() as i32;
    score + mobility * MOBILITY_WEIGHT
}

fn final_score(board: &Board, player: Player) -> i32 {
    board.disc_counts().margin(player) * WIN_WEIGHT
}

fn is_better_move(score: i32, mv: Move, best_score: i32, best_move: Option<Move>) -> bool {
    match best_move {
        None => true,
        Some(best) => score > best_score || (score == best_score && mv < best),
    }
}

fn sorted_moves(board: &Board, player: Player) -> Vec<(Move, Board)> {
    let mut scored_moves: Vec<(Move, Board, i32)> = board
        .valid_moves(player)
        .iter()
        .filter_map(|mv| {
            let next = board.apply(mv, player).ok()?;
            // Move ordering heuristic from the mover's perspective.
            let score = -evaluate(&next, !player);
            Some((mv, next, score))
        })
        .collect();

    scored_moves.sort_by(|(left_mv, _, left_score), (right_mv, _, right_score)| {
        right_score
            .cmp(left_score)
            .then_with(|| left_mv.cmp(right_mv))
    });

    scored_moves
        .into_iter()
        .map(|(mv, next, _)| (mv, next))
        .collect()
}
