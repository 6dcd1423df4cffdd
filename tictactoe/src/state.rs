/// The authoritative record of one match and the rules that mutate it
use std::collections::HashMap;

use match_arena::types::{Presence, UserId};

use crate::board::{Board, Mark, Outcome, CELLS};

/// Seats in a match
pub const MAX_PLAYERS: usize = 2;

/// Time a player has for one turn, in milliseconds
///
/// The deadline derived from this is advisory metadata for clients;
/// nothing on the server forfeits when it elapses.
pub const TURN_WINDOW_MS: u64 = 30_000;

/// Lifecycle phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fewer than two players joined; no play yet
    Forming,
    /// Both seats filled, game in progress
    Active,
    /// Won or drawn; moves are ignored
    Finished,
}

/// Why a move was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// The game already ended
    Finished,
    /// The sender does not own the current turn
    OutOfTurn,
    /// The cell index is not on the board
    OutOfRange,
    /// The target cell is already occupied
    Occupied,
}

/// Full mutable state of one match instance
///
/// Mutated exclusively through the methods below, which the lifecycle
/// handler invokes in response to host callbacks.
#[derive(Debug, Clone, Default)]
pub struct MatchState {
    board: Board,
    marks: HashMap<UserId, Mark>,
    usernames: HashMap<UserId, String>,
    players: Vec<UserId>,
    active_index: usize,
    deadline_ms: u64,
    outcome: Outcome,
}

impl MatchState {
    /// Fresh record: empty board, empty roster, game in progress
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Join-ordered roster
    pub fn players(&self) -> &[UserId] {
        &self.players
    }

    pub fn usernames(&self) -> &HashMap<UserId, String> {
        &self.usernames
    }

    pub fn marks(&self) -> &HashMap<UserId, Mark> {
        &self.marks
    }

    /// Absolute expiry timestamp for the current turn (epoch ms)
    pub fn deadline_ms(&self) -> u64 {
        self.deadline_ms
    }

    /// Current lifecycle phase, derived from roster and outcome
    pub fn phase(&self) -> Phase {
        if self.outcome.is_terminal() {
            Phase::Finished
        } else if self.players.len() == MAX_PLAYERS {
            Phase::Active
        } else {
            Phase::Forming
        }
    }

    /// Whether a seat is still open
    pub fn has_capacity(&self) -> bool {
        self.players.len() < MAX_PLAYERS
    }

    /// Symbol assigned to a player, if any
    pub fn mark_of(&self, user: &UserId) -> Option<Mark> {
        self.marks.get(user).copied()
    }

    /// Owner of the current turn; `None` before play starts or after
    /// the game ends
    pub fn current_player(&self) -> Option<&UserId> {
        if self.phase() != Phase::Active {
            return None;
        }
        self.players.get(self.active_index)
    }

    /// Whether the given player owns the current turn
    pub fn is_turn(&self, user: &UserId) -> bool {
        self.current_player() == Some(user)
    }

    /// Materialize an admitted joiner into the roster
    ///
    /// Idempotent: a presence already on the roster is a no-op.
    /// Returns true if the presence was newly added. The first joiner
    /// gets X, the second O; assignment never changes afterwards.
    pub fn apply_join(&mut self, presence: &Presence) -> bool {
        if self.players.contains(&presence.user_id) {
            return false;
        }
        debug_assert!(self.has_capacity(), "join applied to a full roster");

        let mark = if self.players.is_empty() {
            Mark::X
        } else {
            Mark::O
        };
        self.players.push(presence.user_id.clone());
        self.marks.insert(presence.user_id.clone(), mark);
        self.usernames
            .insert(presence.user_id.clone(), presence.username.clone());
        true
    }

    /// Start play: first joiner takes the first turn, clock starts
    ///
    /// Called exactly once, when the roster reaches two players.
    pub fn begin_play(&mut self, now_ms: u64) {
        self.active_index = 0;
        self.deadline_ms = now_ms + TURN_WINDOW_MS;
    }

    /// Validate and apply one move
    ///
    /// Checks run in order: game over, turn ownership, cell range,
    /// occupancy. On success the board is updated and the outcome
    /// re-evaluated; while the game stays open the turn passes to the
    /// other player and the deadline resets.
    pub fn apply_move(&mut self, sender: &UserId, index: i64, now_ms: u64) -> Result<(), MoveError> {
        if self.outcome.is_terminal() {
            return Err(MoveError::Finished);
        }
        if !self.is_turn(sender) {
            return Err(MoveError::OutOfTurn);
        }
        let index = match usize::try_from(index) {
            Ok(i) if i < CELLS => i,
            _ => return Err(MoveError::OutOfRange),
        };
        if !self.board.is_vacant(index) {
            return Err(MoveError::Occupied);
        }

        // is_turn passed, so the sender holds a mark
        let mark = self.marks[sender];
        self.board.apply(index, mark);
        self.outcome = self.board.evaluate();

        if self.outcome == Outcome::InProgress {
            self.active_index = 1 - self.active_index;
            self.deadline_ms = now_ms + TURN_WINDOW_MS;
        }
        Ok(())
    }

    /// Forfeit on disconnect: the remaining symbol wins immediately
    ///
    /// Applies to any leaver holding a mark, with no terminality check -
    /// a leave after the game ended re-declares the winner. Returns the
    /// awarded symbol, or `None` for a leaver who never held a mark.
    pub fn forfeit(&mut self, leaver: &UserId) -> Option<Mark> {
        let mark = self.mark_of(leaver)?;
        let winner = mark.opponent();
        self.outcome = Outcome::Won(winner);
        Some(winner)
    }
}
