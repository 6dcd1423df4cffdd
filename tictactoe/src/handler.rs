/// Lifecycle implementation: admission, joins, the move loop, forfeiture
use std::time::{SystemTime, UNIX_EPOCH};

use match_arena::dispatcher::Dispatcher;
use match_arena::error::Result;
use match_arena::handler::{JoinDecision, MatchHandler, MatchSetup};
use match_arena::message::MatchMessage;
use match_arena::types::Presence;

use crate::state::MatchState;
use crate::wire::{decode_move, StateSnapshot, OP_MOVE, OP_STATE};

/// Listing label for match instances of this game
pub const LABEL: &str = "tictactoe";

/// Loop invocations per second; one is plenty for a turn-based game
const TICK_RATE: u32 = 1;

/// Fixed rejection reason for a full match
const REASON_FULL: &str = "Match full";

/// Current wall clock as epoch milliseconds
fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// The authoritative tic-tac-toe rule set
///
/// Stateless: every match's record is owned by the hosting runtime and
/// threaded through the lifecycle calls below.
#[derive(Debug, Default)]
pub struct TicTacToe;

impl TicTacToe {
    /// Push a full authoritative snapshot to all participants
    fn broadcast_state(dispatcher: &dyn Dispatcher, state: &MatchState) {
        dispatcher.broadcast(OP_STATE, StateSnapshot::capture(state).encode());
    }
}

impl MatchHandler for TicTacToe {
    type State = MatchState;

    fn init(&self, _params: &serde_json::Value) -> Result<MatchSetup<MatchState>> {
        tracing::info!("Match initialized");
        Ok(MatchSetup {
            state: MatchState::new(),
            tick_rate: TICK_RATE,
            label: LABEL.to_string(),
        })
    }

    fn join_attempt(&self, state: &MatchState, candidate: &Presence) -> JoinDecision {
        if state.has_capacity() {
            JoinDecision::Accept
        } else {
            tracing::info!(
                "Rejected join attempt from '{}': {}",
                candidate.user_id,
                REASON_FULL
            );
            JoinDecision::Reject(REASON_FULL.to_string())
        }
    }

    fn join(&self, state: &mut MatchState, dispatcher: &dyn Dispatcher, joiners: &[Presence]) {
        let was_forming = state.has_capacity();

        for presence in joiners {
            if state.apply_join(presence) {
                if let Some(mark) = state.mark_of(&presence.user_id) {
                    tracing::info!(
                        "Player joined: {} ({}) -> {:?}",
                        presence.username,
                        presence.user_id,
                        mark
                    );
                }
            }
        }

        // Start-of-play edge: fires only when this batch filled the
        // second seat, never again on a rejoin
        if was_forming && !state.has_capacity() {
            state.begin_play(epoch_ms());
            tracing::info!(
                "Match started: '{}' vs '{}'",
                state.players()[0],
                state.players()[1]
            );
            Self::broadcast_state(dispatcher, state);
        }
    }

    fn tick(
        &self,
        state: &mut MatchState,
        dispatcher: &dyn Dispatcher,
        _tick: u64,
        messages: &[MatchMessage],
    ) -> bool {
        // Bail out entirely once finished; late moves have zero effect
        if state.outcome().is_terminal() {
            return true;
        }

        for message in messages {
            if message.op_code != OP_MOVE {
                continue;
            }
            if state.outcome().is_terminal() {
                break;
            }

            // Identity comes from message provenance, never the payload
            let sender = &message.sender.user_id;

            if !state.is_turn(sender) {
                tracing::warn!("Rejected move from '{}': not the active player", sender);
                // Force the sender back into sync with the authoritative state
                Self::broadcast_state(dispatcher, state);
                continue;
            }

            let Some(payload) = decode_move(&message.data) else {
                continue;
            };

            match state.apply_move(sender, payload.index, epoch_ms()) {
                Ok(()) => {
                    tracing::info!("Accepted move by '{}' at {}", sender, payload.index);
                    Self::broadcast_state(dispatcher, state);
                }
                Err(reason) => {
                    tracing::debug!(
                        "Dropped move by '{}' at {}: {:?}",
                        sender,
                        payload.index,
                        reason
                    );
                }
            }
        }
        true
    }

    fn leave(
        &self,
        state: &mut MatchState,
        dispatcher: &dyn Dispatcher,
        leavers: &[Presence],
    ) -> bool {
        for presence in leavers {
            if let Some(winner) = state.forfeit(&presence.user_id) {
                tracing::info!(
                    "Player '{}' left; {:?} wins by forfeit",
                    presence.user_id,
                    winner
                );
                Self::broadcast_state(dispatcher, state);
                return false;
            }
        }
        true
    }

    fn terminate(&self, _state: &mut MatchState, _dispatcher: &dyn Dispatcher, grace_seconds: u64) {
        tracing::info!("Match terminating ({}s grace)", grace_seconds);
    }

    fn signal(&self, _state: &mut MatchState, data: String) -> Option<String> {
        tracing::debug!("Match signal: {}", data);
        Some(data)
    }
}
