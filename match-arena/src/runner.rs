/// Per-match actor: owns one match's state and drives its lifecycle
use std::sync::Arc;
use std::time::Duration;

use crate::config::RunnerConfig;
use crate::dispatcher::{Broadcast, ChannelDispatcher};
use crate::error::{ArenaError, Result};
use crate::handler::{JoinDecision, MatchHandler};
use crate::message::MatchMessage;
use crate::types::{MatchId, Presence};

/// Commands that can be sent to a running match
#[derive(Debug)]
pub enum MatchCommand {
    /// Ask to admit a presence; the decision is sent back on the reply channel
    Join(Presence, flume::Sender<JoinDecision>),
    /// Notify the match that a presence has left
    Leave(Presence),
    /// Deliver a player message; queued until the next tick
    Message(MatchMessage),
    /// Out-of-band signal with a reply channel for the optional response
    Signal(String, flume::Sender<Option<String>>),
    /// Stop the match's run loop after notifying the handler
    Stop,
}

/// Host-side face of a running match
///
/// Cloneable; all clones feed the same match actor. The broadcast
/// receiver carries every snapshot the match pushes to its players.
#[derive(Clone)]
pub struct MatchHandle {
    id: MatchId,
    label: String,
    command_tx: flume::Sender<MatchCommand>,
    broadcast_rx: flume::Receiver<Broadcast>,
}

impl MatchHandle {
    /// Match instance identifier
    pub fn id(&self) -> &MatchId {
        &self.id
    }

    /// Listing label reported by the handler at init
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Receiver for outbound broadcasts from this match
    pub fn broadcasts(&self) -> flume::Receiver<Broadcast> {
        self.broadcast_rx.clone()
    }

    /// Raw command sender for this match
    pub fn sender(&self) -> flume::Sender<MatchCommand> {
        self.command_tx.clone()
    }

    /// Request admission for a presence and apply the join if accepted
    pub async fn join(&self, presence: Presence) -> Result<()> {
        let (reply_tx, reply_rx) = flume::bounded(1);
        self.command_tx
            .send(MatchCommand::Join(presence, reply_tx))
            .map_err(|_| ArenaError::ChannelClosed(self.id.to_string()))?;
        match reply_rx
            .recv_async()
            .await
            .map_err(|_| ArenaError::ChannelClosed(self.id.to_string()))?
        {
            JoinDecision::Accept => Ok(()),
            JoinDecision::Reject(reason) => Err(ArenaError::JoinRejected(reason)),
        }
    }

    /// Notify the match that a presence has left
    pub fn leave(&self, presence: Presence) -> Result<()> {
        self.command_tx
            .send(MatchCommand::Leave(presence))
            .map_err(|_| ArenaError::ChannelClosed(self.id.to_string()))
    }

    /// Deliver a player message to the match
    pub fn send(&self, message: MatchMessage) -> Result<()> {
        self.command_tx
            .send(MatchCommand::Message(message))
            .map_err(|_| ArenaError::ChannelClosed(self.id.to_string()))
    }

    /// Send an out-of-band signal and wait for the optional reply
    pub async fn signal(&self, data: String) -> Result<Option<String>> {
        let (reply_tx, reply_rx) = flume::bounded(1);
        self.command_tx
            .send(MatchCommand::Signal(data, reply_tx))
            .map_err(|_| ArenaError::ChannelClosed(self.id.to_string()))?;
        reply_rx
            .recv_async()
            .await
            .map_err(|_| ArenaError::ChannelClosed(self.id.to_string()))
    }

    /// Stop the match, giving the handler its terminate notice
    pub fn stop(&self) -> Result<()> {
        self.command_tx
            .send(MatchCommand::Stop)
            .map_err(|_| ArenaError::ChannelClosed(self.id.to_string()))
    }
}

/// The actor that owns one match's authoritative state
///
/// Lifecycle callbacks execute strictly sequentially on this actor's
/// task; nothing else can reach the state. Inbound messages queue
/// between ticks and are handed to the handler once per tick, in
/// arrival order.
pub struct MatchRunner<H: MatchHandler> {
    id: MatchId,
    config: RunnerConfig,
    handler: Arc<H>,
    state: H::State,
    dispatcher: ChannelDispatcher,
    command_rx: flume::Receiver<MatchCommand>,
    tick: u64,
    queued: Vec<MatchMessage>,
}

impl<H: MatchHandler> MatchRunner<H> {
    /// Create a match from the handler's init and spawn its actor task
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn(
        handler: Arc<H>,
        params: &serde_json::Value,
        config: RunnerConfig,
    ) -> Result<MatchHandle> {
        let setup = handler.init(params)?;
        let id = MatchId::generate();

        let tick_rate = if setup.tick_rate == 0 {
            config.default_tick_rate.max(1)
        } else {
            setup.tick_rate
        };

        let (dispatcher, broadcast_rx) = ChannelDispatcher::new(id.clone());
        let (command_tx, command_rx) = flume::unbounded();

        tracing::info!(
            "Match '{}' created (label '{}', {} tick/s)",
            id,
            setup.label,
            tick_rate
        );

        let runner = MatchRunner {
            id: id.clone(),
            config,
            handler,
            state: setup.state,
            dispatcher,
            command_rx,
            tick: 0,
            queued: Vec::new(),
        };
        tokio::spawn(runner.run(tick_rate));

        Ok(MatchHandle {
            id,
            label: setup.label,
            command_tx,
            broadcast_rx,
        })
    }

    /// Run the match loop until stopped or torn down
    async fn run(mut self, tick_rate: u32) {
        let period = Duration::from_secs_f64(1.0 / tick_rate as f64);
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first interval fire is immediate; swallow it so tick 0
        // happens one period after creation
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let messages = std::mem::take(&mut self.queued);
                    let alive = self.handler.tick(
                        &mut self.state,
                        &self.dispatcher,
                        self.tick,
                        &messages,
                    );
                    self.tick += 1;
                    if !alive {
                        tracing::info!("Match '{}' ended by its handler", self.id);
                        break;
                    }
                }
                command = self.command_rx.recv_async() => {
                    match command {
                        Err(_) => {
                            tracing::info!("Match '{}' command channel closed", self.id);
                            break;
                        }
                        Ok(command) => {
                            if !self.handle_command(command) {
                                break;
                            }
                        }
                    }
                }
            }
        }
    }

    /// Process one command; returns false when the match should end
    fn handle_command(&mut self, command: MatchCommand) -> bool {
        match command {
            MatchCommand::Join(presence, reply) => {
                let decision = self.handler.join_attempt(&self.state, &presence);
                match &decision {
                    JoinDecision::Accept => {
                        self.handler.join(
                            &mut self.state,
                            &self.dispatcher,
                            std::slice::from_ref(&presence),
                        );
                    }
                    JoinDecision::Reject(reason) => {
                        tracing::info!(
                            "Match '{}' rejected join from '{}': {}",
                            self.id,
                            presence.user_id,
                            reason
                        );
                    }
                }
                let _ = reply.send(decision);
                true
            }
            MatchCommand::Leave(presence) => {
                let alive = self.handler.leave(
                    &mut self.state,
                    &self.dispatcher,
                    std::slice::from_ref(&presence),
                );
                if !alive {
                    tracing::info!(
                        "Match '{}' ended after '{}' left",
                        self.id,
                        presence.user_id
                    );
                }
                alive
            }
            MatchCommand::Message(message) => {
                if self.queued.len() >= self.config.max_queued_messages {
                    tracing::warn!(
                        "Match '{}' dropped message from '{}': queue full",
                        self.id,
                        message.sender.user_id
                    );
                } else {
                    self.queued.push(message);
                }
                true
            }
            MatchCommand::Signal(data, reply) => {
                let response = self.handler.signal(&mut self.state, data);
                let _ = reply.send(response);
                true
            }
            MatchCommand::Stop => {
                self.handler.terminate(
                    &mut self.state,
                    &self.dispatcher,
                    self.config.stop_grace_seconds,
                );
                tracing::info!("Match '{}' stopped", self.id);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Dispatcher;
    use crate::handler::MatchSetup;
    use crate::types::UserId;

    // Minimal two-seat handler: echoes every message back as a broadcast
    struct EchoHandler;

    struct EchoState {
        roster: Vec<UserId>,
    }

    const OP_ECHO: i64 = 7;
    const OP_BYE: i64 = 99;

    impl MatchHandler for EchoHandler {
        type State = EchoState;

        fn init(&self, _params: &serde_json::Value) -> Result<MatchSetup<EchoState>> {
            Ok(MatchSetup {
                state: EchoState { roster: Vec::new() },
                tick_rate: 20,
                label: "echo".to_string(),
            })
        }

        fn join_attempt(&self, state: &EchoState, _candidate: &Presence) -> JoinDecision {
            if state.roster.len() >= 2 {
                JoinDecision::Reject("Match full".to_string())
            } else {
                JoinDecision::Accept
            }
        }

        fn join(
            &self,
            state: &mut EchoState,
            _dispatcher: &dyn Dispatcher,
            joiners: &[Presence],
        ) {
            for presence in joiners {
                state.roster.push(presence.user_id.clone());
            }
        }

        fn tick(
            &self,
            _state: &mut EchoState,
            dispatcher: &dyn Dispatcher,
            _tick: u64,
            messages: &[MatchMessage],
        ) -> bool {
            for message in messages {
                dispatcher.broadcast(OP_ECHO, message.data.clone());
            }
            true
        }

        fn leave(
            &self,
            state: &mut EchoState,
            _dispatcher: &dyn Dispatcher,
            leavers: &[Presence],
        ) -> bool {
            for presence in leavers {
                state.roster.retain(|id| id != &presence.user_id);
            }
            !state.roster.is_empty()
        }

        fn terminate(
            &self,
            _state: &mut EchoState,
            dispatcher: &dyn Dispatcher,
            _grace_seconds: u64,
        ) {
            dispatcher.broadcast(OP_BYE, Vec::new());
        }

        fn signal(&self, state: &mut EchoState, _data: String) -> Option<String> {
            Some(state.roster.len().to_string())
        }
    }

    fn spawn_echo() -> MatchHandle {
        MatchRunner::spawn(
            Arc::new(EchoHandler),
            &serde_json::Value::Null,
            RunnerConfig::default(),
        )
        .unwrap()
    }

    async fn recv_broadcast(rx: &flume::Receiver<Broadcast>) -> Broadcast {
        tokio::time::timeout(Duration::from_secs(5), rx.recv_async())
            .await
            .expect("timed out waiting for broadcast")
            .expect("broadcast channel closed")
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_third_join_rejected() {
        let handle = spawn_echo();

        handle.join(Presence::guest()).await.unwrap();
        handle.join(Presence::guest()).await.unwrap();

        let result = handle.join(Presence::guest()).await;
        match result {
            Err(ArenaError::JoinRejected(reason)) => assert_eq!(reason, "Match full"),
            other => panic!("Expected JoinRejected, got {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_messages_echoed_in_order() {
        let handle = spawn_echo();
        let rx = handle.broadcasts();

        let player = Presence::guest();
        handle.join(player.clone()).await.unwrap();

        handle
            .send(MatchMessage::new(player.clone(), OP_ECHO, b"first".to_vec()))
            .unwrap();
        handle
            .send(MatchMessage::new(player.clone(), OP_ECHO, b"second".to_vec()))
            .unwrap();

        let first = recv_broadcast(&rx).await;
        let second = recv_broadcast(&rx).await;
        assert_eq!(first.payload, b"first");
        assert_eq!(second.payload, b"second");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_signal_round_trip() {
        let handle = spawn_echo();

        let player = Presence::guest();
        handle.join(player).await.unwrap();

        let reply = handle.signal("count".to_string()).await.unwrap();
        assert_eq!(reply.as_deref(), Some("1"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_stop_notifies_handler_and_ends_match() {
        let handle = spawn_echo();
        let rx = handle.broadcasts();

        handle.stop().unwrap();

        let bye = recv_broadcast(&rx).await;
        assert_eq!(bye.op_code, OP_BYE);

        // Actor is gone; the broadcast channel drains and disconnects
        assert!(rx.recv_async().await.is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_handler_teardown_on_last_leave() {
        let handle = spawn_echo();
        let rx = handle.broadcasts();

        let player = Presence::guest();
        handle.join(player.clone()).await.unwrap();
        handle.leave(player).unwrap();

        // Leave returned false, the actor exits without terminate
        assert!(rx.recv_async().await.is_err());
    }
}
