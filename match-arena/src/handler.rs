/// Trait for authoritative match logic integration
use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::message::MatchMessage;
use crate::types::Presence;

/// Initial setup returned by a handler when a match is created
#[derive(Debug)]
pub struct MatchSetup<S> {
    /// Fresh authoritative state for the new match
    pub state: S,
    /// Desired loop invocations per second
    pub tick_rate: u32,
    /// Listing label for the match instance
    pub label: String,
}

/// Admission decision for a prospective joiner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinDecision {
    /// Let the candidate into the match
    Accept,
    /// Turn the candidate away with a human-readable reason
    Reject(String),
}

impl JoinDecision {
    /// Whether the decision admits the candidate
    pub fn is_accept(&self) -> bool {
        matches!(self, JoinDecision::Accept)
    }
}

/// Lifecycle contract implemented by one game's authoritative match logic
///
/// The hosting runtime owns one `State` value per match instance and
/// threads it through every callback; callbacks for a given match never
/// overlap. The handler itself holds no per-match state - it is a rule
/// set shared across all matches of its game type.
pub trait MatchHandler: Send + Sync + 'static {
    /// Authoritative per-match state owned by the runtime
    type State: Send + 'static;

    /// Create the state for a fresh match instance
    fn init(&self, params: &serde_json::Value) -> Result<MatchSetup<Self::State>>;

    /// Decide whether a candidate may join
    ///
    /// Evaluated once per prospective joiner, before the joiner is
    /// materialized into the match. Must not mutate state.
    fn join_attempt(&self, state: &Self::State, candidate: &Presence) -> JoinDecision;

    /// Apply a batch of admitted joiners
    fn join(&self, state: &mut Self::State, dispatcher: &dyn Dispatcher, joiners: &[Presence]);

    /// Process one tick's worth of inbound messages, in arrival order
    ///
    /// Returning `false` asks the runtime to tear the match down.
    fn tick(
        &self,
        state: &mut Self::State,
        dispatcher: &dyn Dispatcher,
        tick: u64,
        messages: &[MatchMessage],
    ) -> bool;

    /// Apply a batch of leavers
    ///
    /// Returning `false` asks the runtime to tear the match down.
    fn leave(&self, state: &mut Self::State, dispatcher: &dyn Dispatcher, leavers: &[Presence])
        -> bool;

    /// Host-initiated shutdown notice with a grace period in seconds
    fn terminate(&self, state: &mut Self::State, dispatcher: &dyn Dispatcher, grace_seconds: u64);

    /// Out-of-band host-to-match signal; returns an optional reply payload
    fn signal(&self, state: &mut Self::State, data: String) -> Option<String>;
}
