//! # match-arena
//!
//! An authoritative match hosting harness for simple turn-based games.
//!
//! ## Overview
//!
//! The `match-arena` library separates game rules from hosting: a game
//! crate implements the [`MatchHandler`] lifecycle contract, and this
//! library owns everything around it - admission routing, per-match
//! actors driven at a fixed tick cadence, broadcast fan-out, and the
//! matchmaker hand-off that turns a pairing into a fresh match
//! instance.
//!
//! ## Key Features
//!
//! - One actor per match; lifecycle callbacks never overlap
//! - Handler-declared tick rate; inbound messages batched per tick
//! - Fire-and-forget broadcast dispatch over channels
//! - Registry with matchmaker hand-off for match instantiation
//! - Validated identity types and guest-name generation
//!
//! ## Example
//!
//! ```rust,no_run
//! use match_arena::{MatchRegistry, Presence};
//!
//! let mut registry = MatchRegistry::new();
//! let guest = Presence::guest();
//! println!("{} is looking for a match", guest.username);
//! ```

// Module declarations
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod message;
pub mod name_generator;
pub mod registry;
pub mod runner;
pub mod types;

// Re-exports for convenience
pub use config::RunnerConfig;
pub use dispatcher::{Broadcast, ChannelDispatcher, Dispatcher};
pub use error::{ArenaError, Result};
pub use handler::{JoinDecision, MatchHandler, MatchSetup};
pub use message::MatchMessage;
pub use registry::MatchRegistry;
pub use runner::{MatchCommand, MatchHandle, MatchRunner};
pub use types::{MatchId, Presence, UserId};
