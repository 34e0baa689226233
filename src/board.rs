use once_cell::sync::Lazy;

use crate::types::{BOARD_SIZE, CellChange, Piece, Player, Position};

const NUM_SQUARES: usize = BOARD_SIZE as usize * BOARD_SIZE as usize;
const START_ROWS: u8 = 3;

static PLAYABLE: Lazy<Vec<Position>> = Lazy::new(|| {
    (0..BOARD_SIZE)
        .flat_map(|row| (0..BOARD_SIZE).map(move |col| Position { row, col }))
        .filter(|pos| pos.is_playable())
        .collect()
});

static STARTING: Lazy<Board> = Lazy::new(|| {
    let mut board = Board::empty();
    for &pos in PLAYABLE.iter() {
        if pos.row < START_ROWS {
            board.place(pos, Player::White, false);
        } else if pos.row >= BOARD_SIZE - START_ROWS {
            board.place(pos, Player::Red, false);
        }
    }
    board
});

/// The 32 playable squares in row-major order.
pub fn playable_positions() -> &'static [Position] {
    &PLAYABLE
}

/// Checkers board: one optional piece per square.
///
/// Knows nothing about the rules. Callers are responsible for legality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Piece>; NUM_SQUARES],
}

impl Board {
    /// Creates the standard opening position:
    /// White on the dark squares of rows 0-2, Red on rows 5-7.
    pub fn new() -> Self {
        *STARTING
    }

    pub fn empty() -> Self {
        Self {
            cells: [None; NUM_SQUARES],
        }
    }

    pub fn get(&self, pos: Position) -> Option<Piece> {
        self.cells[pos.index()]
    }

    /// Puts a piece on `pos`, discarding whatever was there.
    pub fn place(&mut self, pos: Position, owner: Player, is_king: bool) {
        debug_assert!(pos.is_playable(), "piece placed on a light square: {pos:?}");
        self.cells[pos.index()] = Some(Piece { owner, is_king });
    }

    pub fn clear(&mut self, pos: Position) {
        self.cells[pos.index()] = None;
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.cells[pos.index()].is_none()
    }

    /// Iterates over `player`'s pieces in row-major order.
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = (Position, Piece)> + '_ {
        playable_positions().iter().filter_map(move |&pos| {
            self.get(pos)
                .filter(|piece| piece.owner == player)
                .map(|piece| (pos, piece))
        })
    }

    pub fn count(&self, player: Player) -> u8 {
        self.pieces(player).count() as u8
    }

    /// Converts board to `[u8; 64]`:
    /// 0=empty, 1=red, 2=white, 3=red king, 4=white king.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut out = [0u8; NUM_SQUARES];
        for (code, cell) in out.iter_mut().zip(self.cells.iter()) {
            *code = match cell {
                None => 0,
                Some(piece) => {
                    let base = piece.owner.index() + 1;
                    if piece.is_king { base + 2 } else { base }
                }
            };
        }
        out
    }

    /// Lists the squares whose contents differ between `self` and `after`.
    pub fn diff(&self, after: &Board) -> Vec<CellChange> {
        playable_positions()
            .iter()
            .filter(|pos| self.get(**pos) != after.get(**pos))
            .map(|&position| CellChange {
                position,
                before: self.get(position),
                after: after.get(position),
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
