//! # tictactoe
//!
//! Authoritative tic-tac-toe match logic for the match-arena harness.
//!
//! The crate is split the way the harness expects:
//! - [`board`] - pure board data and the win/draw predicate
//! - [`state`] - the per-match record and the rules that mutate it
//! - [`wire`] - opcodes and payload schemas for the client contract
//! - [`handler`] - the lifecycle implementation the harness drives

pub mod board;
pub mod handler;
pub mod state;
pub mod wire;

pub use board::{Board, Mark, Outcome};
pub use handler::{TicTacToe, LABEL};
pub use state::{MatchState, MoveError, Phase};
pub use wire::{MovePayload, StateSnapshot, OP_MOVE, OP_STATE};
