/// Outbound broadcast delivery for match handlers
use crate::types::MatchId;

/// A single outbound broadcast produced by a match handler
#[derive(Debug, Clone)]
pub struct Broadcast {
    /// Application-level opcode distinguishing payload kinds
    pub op_code: i64,
    /// Encoded payload bytes
    pub payload: Vec<u8>,
}

/// Capability handed to match handlers for pushing state to players
///
/// Broadcasts are fire-and-forget: delivery is not acknowledged and
/// failures are logged, never surfaced to the handler.
pub trait Dispatcher {
    /// Queue a payload for delivery to every joined presence
    fn broadcast(&self, op_code: i64, payload: Vec<u8>);
}

/// Dispatcher that fans broadcasts out over an in-process channel
///
/// The hosting side holds the receiving end and forwards payloads to
/// its transport. Dropping the receiver silences the match; sends to a
/// disconnected channel are logged and discarded.
pub struct ChannelDispatcher {
    match_id: MatchId,
    tx: flume::Sender<Broadcast>,
}

impl ChannelDispatcher {
    /// Create a dispatcher and the receiver for its broadcasts
    pub fn new(match_id: MatchId) -> (Self, flume::Receiver<Broadcast>) {
        let (tx, rx) = flume::unbounded();
        (Self { match_id, tx }, rx)
    }
}

impl Dispatcher for ChannelDispatcher {
    fn broadcast(&self, op_code: i64, payload: Vec<u8>) {
        if self
            .tx
            .send(Broadcast { op_code, payload })
            .is_err()
        {
            tracing::warn!(
                "Match '{}' dropped broadcast (op {}): no receiver",
                self.match_id,
                op_code
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_dispatcher_delivers() {
        let (dispatcher, rx) = ChannelDispatcher::new(MatchId::generate());
        dispatcher.broadcast(2, b"{}".to_vec());

        let broadcast = rx.try_recv().unwrap();
        assert_eq!(broadcast.op_code, 2);
        assert_eq!(broadcast.payload, b"{}");
    }

    #[test]
    fn test_channel_dispatcher_survives_dropped_receiver() {
        let (dispatcher, rx) = ChannelDispatcher::new(MatchId::generate());
        drop(rx);
        // Must not panic or error out
        dispatcher.broadcast(2, b"{}".to_vec());
    }
}
