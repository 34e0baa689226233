//! Computer player.
//!
//! The heuristic plays one step at a time: a jump when one is available
//! (promoting jumps first), otherwise the simple move that hands the
//! opponent the fewest jumps.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::board::Board;
use crate::rules;
use crate::types::{Move, Player, Position};

pub trait MoveSelector: Send {
    /// Picks the next step for `player`, or `None` if it has nothing to play.
    /// `continuing` is the piece in the middle of a multi-jump; only its
    /// jumps are eligible then.
    fn select_move(
        &mut self,
        board: &Board,
        player: Player,
        continuing: Option<Position>,
    ) -> Option<Move>;
}

/// Randomized greedy selector. Ties are broken uniformly at random over
/// candidate lists built in board order, so a seeded RNG replays exactly.
#[derive(Debug, Clone)]
pub struct HeuristicSelector<R = StdRng> {
    rng: R,
}

impl HeuristicSelector<StdRng> {
    pub fn from_seed(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        debug!(seed, "computer player RNG seeded");
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> HeuristicSelector<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn select_jump(&mut self, board: &Board, jumps: &[Move]) -> Option<Move> {
        let king_me: Vec<Move> = jumps
            .iter()
            .copied()
            .filter(|&mv| rules::promotes(board, mv))
            .collect();
        debug!(jumps = jumps.len(), king_me = king_me.len(), "choosing jump");

        if king_me.is_empty() {
            jumps.choose(&mut self.rng).copied()
        } else {
            king_me.choose(&mut self.rng).copied()
        }
    }

    fn select_simple_move(&mut self, board: &Board, player: Player) -> Option<Move> {
        let mut king_me = Vec::new();
        let mut scored = Vec::new();
        for mv in rules::player_moves(board, player) {
            if rules::promotes(board, mv) {
                king_me.push(mv);
            } else {
                scored.push((mv, rules::opponent_jump_count_after(board, mv)));
            }
        }

        if !king_me.is_empty() {
            debug!(king_me = king_me.len(), "choosing promoting move");
            return king_me.choose(&mut self.rng).copied();
        }

        let best_score = scored.iter().map(|&(_, score)| score).min()?;
        let best: Vec<Move> = scored
            .into_iter()
            .filter(|&(_, score)| score == best_score)
            .map(|(mv, _)| mv)
            .collect();
        let guarded: Vec<Move> = best
            .iter()
            .copied()
            .filter(|&mv| !leaves_home_row(board, mv))
            .collect();
        debug!(
            best_score,
            best = best.len(),
            guarded = guarded.len(),
            "choosing simple move"
        );

        if guarded.is_empty() {
            best.choose(&mut self.rng).copied()
        } else {
            guarded.choose(&mut self.rng).copied()
        }
    }
}

impl<R: Rng + Send> MoveSelector for HeuristicSelector<R> {
    fn select_move(
        &mut self,
        board: &Board,
        player: Player,
        continuing: Option<Position>,
    ) -> Option<Move> {
        let jumps: Vec<Move> = match continuing {
            Some(from) => rules::piece_jumps(board, from)
                .into_iter()
                .map(|to| Move::new(from, to))
                .collect(),
            None => rules::player_jumps(board, player),
        };

        if !jumps.is_empty() {
            return self.select_jump(board, &jumps);
        }
        if continuing.is_some() {
            return None;
        }
        self.select_simple_move(board, player)
    }
}

/// A man stepping off its own back row, which otherwise guards against
/// opposing promotions.
fn leaves_home_row(board: &Board, mv: Move) -> bool {
    board
        .get(mv.from)
        .is_some_and(|piece| !piece.is_king && mv.from.row == piece.owner.opponent().promotion_row())
}
