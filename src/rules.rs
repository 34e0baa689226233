//! Rule queries over a [`Board`]: move and jump enumeration, promotion,
//! and the speculative "what would the opponent be able to jump" count.

use crate::board::{Board, playable_positions};
use crate::types::{Move, Piece, Player, Position};

/// Diagonal steps in enumeration order: forward-right, forward-left, then
/// backward-right and backward-left for kings.
fn step_directions(piece: Piece) -> impl Iterator<Item = (i8, i8)> {
    let d = piece.owner.direction();
    let backward = if piece.is_king { 2 } else { 0 };
    [(d, 1), (d, -1), (-d, 1), (-d, -1)]
        .into_iter()
        .take(2 + backward)
}

/// Landing squares of the jumps available to the piece on `pos`.
pub fn piece_jumps(board: &Board, pos: Position) -> Vec<Position> {
    let Some(piece) = board.get(pos) else {
        return Vec::new();
    };
    let opponent = piece.owner.opponent();

    step_directions(piece)
        .filter_map(|(dr, dc)| {
            let over = pos.offset(dr, dc)?;
            let landing = pos.offset(2 * dr, 2 * dc)?;
            let captures = board.get(over).is_some_and(|p| p.owner == opponent);
            (captures && board.is_empty(landing)).then_some(landing)
        })
        .collect()
}

/// Landing squares of the simple (non-capturing) moves of the piece on `pos`.
pub fn piece_moves(board: &Board, pos: Position) -> Vec<Position> {
    let Some(piece) = board.get(pos) else {
        return Vec::new();
    };

    step_directions(piece)
        .filter_map(|(dr, dc)| pos.offset(dr, dc))
        .filter(|&landing| board.is_empty(landing))
        .collect()
}

pub fn any_player_jump(board: &Board, player: Player) -> bool {
    board
        .pieces(player)
        .any(|(pos, _)| !piece_jumps(board, pos).is_empty())
}

pub fn any_player_move(board: &Board, player: Player) -> bool {
    board
        .pieces(player)
        .any(|(pos, _)| !piece_moves(board, pos).is_empty())
}

/// All jumps for `player`, ordered by square then by direction.
pub fn player_jumps(board: &Board, player: Player) -> Vec<Move> {
    board
        .pieces(player)
        .flat_map(|(from, _)| {
            piece_jumps(board, from)
                .into_iter()
                .map(move |to| Move::new(from, to))
        })
        .collect()
}

/// All simple moves for `player`, ordered by square then by direction.
pub fn player_moves(board: &Board, player: Player) -> Vec<Move> {
    board
        .pieces(player)
        .flat_map(|(from, _)| {
            piece_moves(board, from)
                .into_iter()
                .map(move |to| Move::new(from, to))
        })
        .collect()
}

/// Interprets a gesture from `from` to `to` as a move or a jump for the piece
/// on `from`. Geometry and capture are checked; forced-jump policy is not.
pub fn classify_step(board: &Board, from: Position, to: Position) -> Option<Move> {
    let piece = board.get(from)?;
    if !to.is_playable() || !board.is_empty(to) {
        return None;
    }

    let d = piece.owner.direction();
    let dr = to.row as i8 - from.row as i8;
    let dc = to.col as i8 - from.col as i8;
    let row_ok = |distance: i8| dr == distance * d || (piece.is_king && dr == -distance * d);

    let mv = Move::new(from, to);
    match dc.abs() {
        1 if row_ok(1) => Some(mv),
        2 if row_ok(2) => {
            let over = mv.jumped()?;
            board
                .get(over)
                .is_some_and(|p| p.owner == piece.owner.opponent())
                .then_some(mv)
        }
        _ => None,
    }
}

/// True if `mv` would turn a man into a king.
pub fn promotes(board: &Board, mv: Move) -> bool {
    board
        .get(mv.from)
        .is_some_and(|piece| !piece.is_king && mv.to.row == piece.owner.promotion_row())
}

/// Executes `mv`: relocates the piece, crowns it on its promotion row and
/// removes a jumped piece. Returns `true` when the piece was promoted.
pub fn apply(board: &mut Board, mv: Move) -> bool {
    let Some(piece) = board.get(mv.from) else {
        debug_assert!(false, "apply() on an empty square: {mv:?}");
        return false;
    };
    let promoted = !piece.is_king && mv.to.row == piece.owner.promotion_row();

    board.clear(mv.from);
    board.place(mv.to, piece.owner, piece.is_king || promoted);
    if let Some(over) = mv.jumped() {
        board.clear(over);
    }

    promoted
}

/// Number of opponent pieces that could jump once `mv` is played.
///
/// Works on a copy: `board` is never touched.
pub fn opponent_jump_count_after(board: &Board, mv: Move) -> usize {
    let Some(piece) = board.get(mv.from) else {
        return 0;
    };

    let mut next = *board;
    apply(&mut next, mv);

    playable_positions()
        .iter()
        .filter(|&&pos| {
            next.get(pos)
                .is_some_and(|p| p.owner == piece.owner.opponent())
                && !piece_jumps(&next, pos).is_empty()
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col).unwrap()
    }

    fn board_with(pieces: &[(u8, u8, Player, bool)]) -> Board {
        let mut board = Board::empty();
        for &(row, col, owner, is_king) in pieces {
            board.place(pos(row, col), owner, is_king);
        }
        board
    }

    fn arb_board() -> impl Strategy<Value = Board> {
        proptest::collection::vec(0u8..5, 32).prop_map(|codes| {
            let mut board = Board::empty();
            for (&square, code) in playable_positions().iter().zip(codes) {
                match code {
                    1 => board.place(square, Player::Red, false),
                    2 => board.place(square, Player::White, false),
                    3 => board.place(square, Player::Red, true),
                    4 => board.place(square, Player::White, true),
                    _ => {}
                }
            }
            board
        })
    }

    #[test]
    fn man_moves_forward_only_in_right_left_order() {
        let board = board_with(&[(5, 2, Player::Red, false), (2, 3, Player::White, false)]);

        assert_eq!(piece_moves(&board, pos(5, 2)), vec![pos(4, 3), pos(4, 1)]);
        assert_eq!(piece_moves(&board, pos(2, 3)), vec![pos(3, 4), pos(3, 2)]);
    }

    #[test]
    fn king_moves_in_all_four_directions() {
        let board = board_with(&[(4, 3, Player::White, true)]);

        assert_eq!(
            piece_moves(&board, pos(4, 3)),
            vec![pos(5, 4), pos(5, 2), pos(3, 4), pos(3, 2)]
        );
    }

    #[test]
    fn moves_stop_at_board_edge_and_occupied_squares() {
        let board = board_with(&[(5, 0, Player::Red, false), (4, 1, Player::Red, false)]);

        assert!(piece_moves(&board, pos(5, 0)).is_empty());
        assert_eq!(piece_moves(&board, pos(4, 1)), vec![pos(3, 2), pos(3, 0)]);
        assert!(piece_moves(&board, pos(3, 2)).is_empty());
    }

    #[test]
    fn jumps_require_opponent_in_between_and_empty_landing() {
        let mut board = board_with(&[
            (5, 2, Player::Red, false),
            (4, 3, Player::White, false),
            (4, 1, Player::White, false),
        ]);

        assert_eq!(piece_jumps(&board, pos(5, 2)), vec![pos(3, 4), pos(3, 0)]);
        assert_eq!(piece_jumps(&board, pos(4, 3)), vec![pos(6, 1)]);

        board.place(pos(3, 4), Player::Red, false);
        assert_eq!(piece_jumps(&board, pos(5, 2)), vec![pos(3, 0)]);

        let own = board_with(&[(5, 2, Player::Red, false), (4, 3, Player::Red, false)]);
        assert!(piece_jumps(&own, pos(5, 2)).is_empty());
        assert!(!any_player_jump(&own, Player::Red));
    }

    #[test]
    fn king_jumps_backward_after_forward_ones() {
        let board = board_with(&[
            (4, 3, Player::Red, true),
            (3, 4, Player::White, false),
            (5, 4, Player::White, false),
            (5, 2, Player::White, false),
        ]);

        assert_eq!(piece_jumps(&board, pos(4, 3)), vec![pos(2, 5), pos(6, 5), pos(6, 1)]);

        let man = board_with(&[
            (4, 3, Player::Red, false),
            (5, 4, Player::White, false),
        ]);
        assert!(piece_jumps(&man, pos(4, 3)).is_empty());
    }

    #[test]
    fn initial_position_has_moves_and_no_jumps() {
        let board = Board::new();

        assert!(any_player_move(&board, Player::Red));
        assert!(!any_player_jump(&board, Player::Red));
        assert_eq!(player_moves(&board, Player::Red).len(), 7);
        assert!(player_jumps(&board, Player::Red).is_empty());
    }

    #[test]
    fn classify_step_recognizes_moves_and_captures() {
        let board = board_with(&[
            (5, 2, Player::Red, false),
            (4, 3, Player::White, false),
            (2, 1, Player::White, true),
        ]);

        assert_eq!(classify_step(&board, pos(5, 2), pos(4, 1)), Some(Move::new(pos(5, 2), pos(4, 1))));
        assert_eq!(classify_step(&board, pos(5, 2), pos(3, 4)), Some(Move::new(pos(5, 2), pos(3, 4))));
        // Backward for a man, a capture of nothing, a long hop.
        assert_eq!(classify_step(&board, pos(5, 2), pos(6, 1)), None);
        assert_eq!(classify_step(&board, pos(5, 2), pos(3, 0)), None);
        assert_eq!(classify_step(&board, pos(5, 2), pos(2, 5)), None);
        // Kings step backward.
        assert_eq!(classify_step(&board, pos(2, 1), pos(1, 0)), Some(Move::new(pos(2, 1), pos(1, 0))));
    }

    #[test]
    fn apply_promotes_on_farthest_row_and_removes_captured() {
        let mut board = board_with(&[(2, 3, Player::Red, false), (1, 2, Player::White, false)]);
        let mv = Move::new(pos(2, 3), pos(0, 1));

        assert!(promotes(&board, mv));
        assert!(apply(&mut board, mv));
        assert_eq!(board.get(pos(0, 1)), Some(Piece::king(Player::Red)));
        assert!(board.is_empty(pos(1, 2)));
        assert!(board.is_empty(pos(2, 3)));

        // A king never demotes and never counts as promoted again.
        let back = Move::new(pos(0, 1), pos(1, 2));
        assert!(!apply(&mut board, back));
        assert_eq!(board.get(pos(1, 2)), Some(Piece::king(Player::Red)));
    }

    #[test]
    fn opponent_jump_count_after_counts_newly_exposed_pieces() {
        let board = board_with(&[
            (5, 2, Player::Red, false),
            (2, 5, Player::White, false),
            (2, 1, Player::White, false),
        ]);

        // (5,2)->(4,3) stays out of reach; (5,2)->(4,1) does too.
        assert_eq!(opponent_jump_count_after(&board, Move::new(pos(5, 2), pos(4, 3))), 0);

        let exposed = board_with(&[
            (4, 3, Player::Red, false),
            (2, 5, Player::White, false),
            (2, 1, Player::White, false),
        ]);
        // Stepping to (3,4) lets (2,5) jump to (4,3); stepping to (3,2) lets (2,1) jump.
        assert_eq!(opponent_jump_count_after(&exposed, Move::new(pos(4, 3), pos(3, 4))), 1);
        assert_eq!(opponent_jump_count_after(&exposed, Move::new(pos(4, 3), pos(3, 2))), 1);
    }

    proptest! {
        #[test]
        fn moves_land_on_empty_playable_squares(board in arb_board()) {
            for &square in playable_positions() {
                for landing in piece_moves(&board, square) {
                    prop_assert!(landing.is_playable());
                    prop_assert!(board.is_empty(landing));
                }
            }
        }

        #[test]
        fn jumps_capture_an_opponent_piece(board in arb_board()) {
            for &square in playable_positions() {
                let Some(piece) = board.get(square) else { continue };
                for landing in piece_jumps(&board, square) {
                    let over = Move::new(square, landing).jumped().unwrap();
                    let captured = board.get(over);
                    prop_assert!(captured.is_some());
                    prop_assert_eq!(captured.unwrap().owner, piece.owner.opponent());
                    prop_assert!(board.is_empty(landing));
                }
            }
        }

        #[test]
        fn speculative_count_leaves_board_untouched(board in arb_board()) {
            let snapshot = board;
            for player in [Player::Red, Player::White] {
                for mv in player_moves(&board, player) {
                    let _ = opponent_jump_count_after(&board, mv);
                    prop_assert_eq!(board, snapshot);
                }
            }
        }

        #[test]
        fn enumerated_steps_classify_as_themselves(board in arb_board()) {
            for player in [Player::Red, Player::White] {
                for mv in player_moves(&board, player).into_iter().chain(player_jumps(&board, player)) {
                    prop_assert_eq!(classify_step(&board, mv.from, mv.to), Some(mv));
                }
            }
        }
    }
}
