/// Inbound message envelope delivered to match handlers
use crate::types::Presence;

/// A single application-level message received from a player
///
/// `sender` is provenance supplied by the hosting runtime's transport
/// layer. Handlers must resolve identity from it, never from `data`.
#[derive(Debug, Clone)]
pub struct MatchMessage {
    /// Presence of the player that sent the message
    pub sender: Presence,
    /// Application-level opcode distinguishing message kinds
    pub op_code: i64,
    /// Opaque payload bytes; shape is a per-opcode contract
    pub data: Vec<u8>,
}

impl MatchMessage {
    /// Build a message from a sender presence
    pub fn new(sender: Presence, op_code: i64, data: Vec<u8>) -> Self {
        Self {
            sender,
            op_code,
            data,
        }
    }
}
