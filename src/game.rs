use std::time::Duration;

use tracing::{debug, info, warn};
use web_time::Instant;

use crate::ai::{HeuristicSelector, MoveSelector};
use crate::board::Board;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::rules;
use crate::scheduler::Scheduler;
use crate::types::{GameState, Move, Piece, Player, Position, Update};

pub const MUST_JUMP: &str = "Must jump!";
pub const MUST_CONTINUE_JUMP: &str = "Must continue jump!";

/// A game of checkers: the board plus turn, selection and the rules that
/// drive them.
pub struct GameEngine {
    board: Board,
    turn: Player,
    selection: Option<Position>,
    forced_jump: bool,
    computer_player: Option<Player>,
    winner: Option<Player>,
    status_message: String,
    config: EngineConfig,
    selector: Box<dyn MoveSelector>,
    scheduler: Scheduler,
}

impl GameEngine {
    /// Starts a game from the standard position. Red moves first.
    pub fn new_game(computer_player: Option<Player>) -> Self {
        let config = EngineConfig::default();
        let selector = Box::new(HeuristicSelector::from_seed(config.seed));
        Self::start(Board::new(), Player::Red, computer_player, config, selector)
    }

    pub fn with_config(
        computer_player: Option<Player>,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let selector = Box::new(HeuristicSelector::from_seed(config.seed));
        Ok(Self::start(Board::new(), Player::Red, computer_player, config, selector))
    }

    /// Starts a game from an arbitrary position with `to_move` on turn.
    /// If `to_move` is already stuck the game is decided immediately.
    pub fn from_position(
        board: Board,
        to_move: Player,
        computer_player: Option<Player>,
        config: EngineConfig,
        selector: Box<dyn MoveSelector>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::start(board, to_move, computer_player, config, selector))
    }

    fn start(
        board: Board,
        to_move: Player,
        computer_player: Option<Player>,
        config: EngineConfig,
        selector: Box<dyn MoveSelector>,
    ) -> Self {
        let mut game = Self {
            board,
            turn: to_move.opponent(),
            selection: None,
            forced_jump: false,
            computer_player,
            winner: None,
            status_message: String::new(),
            config,
            selector,
            scheduler: Scheduler::default(),
        };
        info!(
            computer = computer_player.map(Player::name),
            "new game"
        );
        // Entering the first turn runs the same checks as every later one.
        game.advance_turn();
        game
    }

    /// Handles a click on `pos`: selects a piece, moves the selected piece,
    /// or drops the selection.
    pub fn handle_selection(&mut self, pos: Position) -> Update {
        let before = self.board;

        if self.is_game_over() {
            debug!(?pos, "game is over; gesture ignored");
            return self.update_from(&before);
        }
        if self.computer_player == Some(self.turn) {
            debug!(?pos, "computer's turn; gesture ignored");
            return self.update_from(&before);
        }

        let owns_piece = pos.is_playable()
            && self
                .board
                .get(pos)
                .is_some_and(|piece| piece.owner == self.turn);

        if owns_piece && !self.forced_jump {
            self.selection = Some(pos);
        } else if let Some(from) = self.selection
            && pos.is_playable()
            && self.board.is_empty(pos)
        {
            self.attempt_move(from, pos);
        } else if !self.forced_jump {
            self.selection = None;
        }

        if self.forced_jump {
            self.status_message = MUST_CONTINUE_JUMP.to_string();
        }
        self.debug_check_selection();

        self.update_from(&before)
    }

    fn attempt_move(&mut self, from: Position, to: Position) {
        let Some(mv) = rules::classify_step(&self.board, from, to) else {
            debug!(?from, ?to, "not a legal step");
            return;
        };

        if mv.is_jump() {
            self.execute_jump(mv);
        } else if rules::any_player_jump(&self.board, self.turn) {
            debug!(?from, ?to, "simple move rejected; a jump is available");
            self.status_message = MUST_JUMP.to_string();
        } else {
            rules::apply(&mut self.board, mv);
            self.advance_turn();
        }
    }

    /// Plays a jump. Returns `true` if the same piece has to keep jumping.
    ///
    /// A man crowned by this jump stops here even if it could capture again.
    fn execute_jump(&mut self, mv: Move) -> bool {
        let promoted = rules::apply(&mut self.board, mv);

        if !promoted && !rules::piece_jumps(&self.board, mv.to).is_empty() {
            self.forced_jump = true;
            self.selection = Some(mv.to);
            true
        } else {
            self.advance_turn();
            false
        }
    }

    fn advance_turn(&mut self) {
        self.turn = self.turn.opponent();
        self.selection = None;
        self.forced_jump = false;
        self.status_message.clear();
        self.scheduler.cancel();

        if !rules::any_player_move(&self.board, self.turn)
            && !rules::any_player_jump(&self.board, self.turn)
        {
            self.turn = self.turn.opponent();
            self.winner = Some(self.turn);
            self.status_message = format!("{} wins!", self.turn.name());
            info!(winner = self.turn.name(), "game over");
        } else if self.computer_player == Some(self.turn) {
            self.scheduler.schedule(self.config.computer_delay());
        }
    }

    /// Plays one computer step: a simple move or one hop of a multi-jump.
    ///
    /// Returns the step played, or `None` when it is not the computer's turn
    /// (including after the game ended) or the selector came up empty.
    pub fn take_computer_turn(&mut self) -> Option<Move> {
        if self.is_game_over() || self.computer_player != Some(self.turn) {
            debug!("no computer step to play");
            return None;
        }

        let player = self.turn;
        let continuing = if self.forced_jump { self.selection } else { None };
        let Some(mv) = self.selector.select_move(&self.board, player, continuing) else {
            warn!(player = player.name(), "computer found no step to play");
            return None;
        };
        if !self.is_legal_step(mv) {
            warn!(?mv, "computer selected an illegal step");
            return None;
        }

        debug!(player = player.name(), ?mv, "computer plays");
        if mv.is_jump() {
            if self.execute_jump(mv) {
                self.scheduler.schedule(self.config.chain_delay());
            }
        } else {
            rules::apply(&mut self.board, mv);
            self.advance_turn();
        }
        Some(mv)
    }

    fn is_legal_step(&self, mv: Move) -> bool {
        let owned = self
            .board
            .get(mv.from)
            .is_some_and(|piece| piece.owner == self.turn);
        if !owned || rules::classify_step(&self.board, mv.from, mv.to) != Some(mv) {
            return false;
        }
        if self.forced_jump {
            return mv.is_jump() && self.selection == Some(mv.from);
        }
        mv.is_jump() || !rules::any_player_jump(&self.board, self.turn)
    }

    /// Runs the pending computer step if it is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<Update> {
        if !self.scheduler.take_due(now) {
            return None;
        }
        self.run_computer_step()
    }

    /// Runs the pending computer step without waiting for its deadline.
    pub fn run_pending(&mut self) -> Option<Update> {
        if !self.scheduler.take() {
            return None;
        }
        self.run_computer_step()
    }

    fn run_computer_step(&mut self) -> Option<Update> {
        let before = self.board;
        self.take_computer_turn()?;
        Some(self.update_from(&before))
    }

    pub fn pending_until(&self) -> Option<Instant> {
        self.scheduler.pending_until()
    }

    pub fn pending_delay(&self, now: Instant) -> Option<Duration> {
        self.scheduler.remaining(now)
    }

    pub fn piece_jumps(&self, pos: Position) -> Vec<Position> {
        rules::piece_jumps(&self.board, pos)
    }

    pub fn piece_moves(&self, pos: Position) -> Vec<Position> {
        rules::piece_moves(&self.board, pos)
    }

    pub fn any_player_jump(&self, player: Player) -> bool {
        rules::any_player_jump(&self.board, player)
    }

    pub fn any_player_move(&self, player: Player) -> bool {
        rules::any_player_move(&self.board, player)
    }

    /// How many opponent pieces could jump if `mv` were played now.
    pub fn opponent_jump_count_after(&self, mv: Move) -> usize {
        let snapshot = self.board;
        let count = rules::opponent_jump_count_after(&self.board, mv);
        debug_assert_eq!(snapshot, self.board, "speculative move leaked into the board");
        count
    }

    pub fn get_cell(&self, pos: Position) -> Option<Piece> {
        self.board.get(pos)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn message(&self) -> &str {
        &self.status_message
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn selection(&self) -> Option<Position> {
        self.selection
    }

    pub fn forced_jump(&self) -> bool {
        self.forced_jump
    }

    pub fn computer_player(&self) -> Option<Player> {
        self.computer_player
    }

    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn state(&self) -> GameState {
        GameState {
            board: self.board.to_array().to_vec(),
            turn: self.turn.index(),
            selection: self.selection,
            forced_jump: self.forced_jump,
            computer_player: self.computer_player.map(Player::index),
            winner: self.winner.map(Player::index),
            status_message: self.status_message.clone(),
            is_game_over: self.is_game_over(),
            red_count: self.board.count(Player::Red),
            white_count: self.board.count(Player::White),
        }
    }

    fn update_from(&self, before: &Board) -> Update {
        Update {
            state: self.state(),
            changes: before.diff(&self.board),
        }
    }

    fn debug_check_selection(&self) {
        debug_assert!(
            self.selection.is_none_or(|pos| self
                .board
                .get(pos)
                .is_some_and(|piece| piece.owner == self.turn)),
            "selection must point at a piece of the player to move"
        );
        debug_assert!(!self.forced_jump || self.selection.is_some());
    }
}
