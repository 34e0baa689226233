use serde::Serialize;

use crate::error::EngineError;

pub const BOARD_SIZE: u8 = 8;

/// One of the two sides. Player 0 (Red) starts on rows 5-7 and moves up
/// the board; player 1 (White) starts on rows 0-2 and moves down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Player {
    Red,
    White,
}

impl Player {
    pub fn index(self) -> u8 {
        match self {
            Player::Red => 0,
            Player::White => 1,
        }
    }

    pub fn opponent(self) -> Player {
        match self {
            Player::Red => Player::White,
            Player::White => Player::Red,
        }
    }

    /// Row step of a forward move.
    pub fn direction(self) -> i8 {
        match self {
            Player::Red => -1,
            Player::White => 1,
        }
    }

    /// The farthest row in this player's direction of travel.
    pub fn promotion_row(self) -> u8 {
        match self {
            Player::Red => 0,
            Player::White => BOARD_SIZE - 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Player::Red => "Red",
            Player::White => "White",
        }
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> u8 {
        player.index()
    }
}

impl TryFrom<u8> for Player {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Player::Red),
            1 => Ok(Player::White),
            other => Err(EngineError::InvalidPlayer(other)),
        }
    }
}

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Result<Self, EngineError> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(EngineError::InvalidCoordinate { row, col });
        }
        Ok(Self { row, col })
    }

    /// Only the dark squares, where `row + col` is odd, are ever used.
    pub fn is_playable(self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    pub fn index(self) -> usize {
        self.row as usize * BOARD_SIZE as usize + self.col as usize
    }

    /// Returns the coordinate `(dr, dc)` away, or `None` if it falls off the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Position> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if !(0..BOARD_SIZE as i8).contains(&row) || !(0..BOARD_SIZE as i8).contains(&col) {
            return None;
        }
        Some(Position {
            row: row as u8,
            col: col as u8,
        })
    }
}

/// A checker: a man or a king.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Piece {
    pub owner: Player,
    pub is_king: bool,
}

impl Piece {
    pub fn man(owner: Player) -> Self {
        Self {
            owner,
            is_king: false,
        }
    }

    pub fn king(owner: Player) -> Self {
        Self {
            owner,
            is_king: true,
        }
    }
}

/// A single step: a one-square move or a two-square jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }

    pub fn is_jump(&self) -> bool {
        self.from.row.abs_diff(self.to.row) == 2
    }

    /// The square jumped over, if this is a jump.
    pub fn jumped(&self) -> Option<Position> {
        self.is_jump().then(|| Position {
            row: (self.from.row + self.to.row) / 2,
            col: (self.from.col + self.to.col) / 2,
        })
    }
}

/// Public game state handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    /// Cell codes, row-major: 0=empty, 1=red, 2=white, 3=red king, 4=white king.
    pub board: Vec<u8>,
    pub turn: u8,
    pub selection: Option<Position>,
    pub forced_jump: bool,
    pub computer_player: Option<u8>,
    pub winner: Option<u8>,
    pub status_message: String,
    pub is_game_over: bool,
    pub red_count: u8,
    pub white_count: u8,
}

/// A cell whose contents differ from before the last action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellChange {
    pub position: Position,
    pub before: Option<Piece>,
    pub after: Option<Piece>,
}

/// Result of a gesture or a computer ply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Update {
    pub state: GameState,
    pub changes: Vec<CellChange>,
}
