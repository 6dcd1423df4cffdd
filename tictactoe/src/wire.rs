/// Wire contract: opcodes and payload schemas
///
/// Payload shapes are explicit schemas with decode operations that
/// yield either a valid value or `None`; malformed input is absorbed
/// by the caller, never raised.
use std::collections::BTreeMap;

use match_arena::types::UserId;
use serde::{Deserialize, Serialize};

use crate::board::{Outcome, CELLS};
use crate::state::MatchState;

/// Inbound: a player places a symbol
pub const OP_MOVE: i64 = 1;
/// Outbound: full authoritative state snapshot
pub const OP_STATE: i64 = 2;

/// Payload of an [`OP_MOVE`] message
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MovePayload {
    /// Target cell, row-major 0..9
    pub index: i64,
}

/// Decode a move payload; `None` for anything that does not parse
pub fn decode_move(data: &[u8]) -> Option<MovePayload> {
    match serde_json::from_slice(data) {
        Ok(payload) => Some(payload),
        Err(error) => {
            tracing::warn!("Undecodable move payload: {}", error);
            None
        }
    }
}

/// Payload of an [`OP_STATE`] broadcast
///
/// `activePlayerId` is restated in every snapshot so clients never
/// infer the turn owner from local state; it is absent once the game
/// ends. `winner` and `draw` are absent while the game is open.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    /// 9 cells, row-major: 0 empty, 1 X, 2 O
    pub board: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub active_player_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub winner: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub draw: Option<bool>,
    /// Display labels keyed by player id
    pub usernames: BTreeMap<String, String>,
    /// Symbol codes keyed by player id
    pub marks: BTreeMap<String, u8>,
    /// Advisory expiry of the current turn (epoch ms)
    pub deadline: u64,
}

impl StateSnapshot {
    /// Capture the authoritative state into a broadcast payload
    pub fn capture(state: &MatchState) -> Self {
        let board = (0..CELLS)
            .map(|index| state.board().cell(index).map_or(0, |mark| mark.code()))
            .collect();

        let (winner, draw) = match state.outcome() {
            Outcome::InProgress => (None, None),
            Outcome::Won(mark) => (Some(mark.code()), Some(false)),
            Outcome::Draw => (None, Some(true)),
        };

        Self {
            board,
            active_player_id: state.current_player().cloned(),
            winner,
            draw,
            usernames: state
                .usernames()
                .iter()
                .map(|(id, name)| (id.to_string(), name.clone()))
                .collect(),
            marks: state
                .marks()
                .iter()
                .map(|(id, mark)| (id.to_string(), mark.code()))
                .collect(),
            deadline: state.deadline_ms(),
        }
    }

    /// Encode for broadcast
    pub fn encode(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_else(|error| {
            tracing::error!("Snapshot encoding failed: {}", error);
            Vec::new()
        })
    }
}

/// Decode a snapshot payload; `None` for anything that does not parse
pub fn decode_snapshot(data: &[u8]) -> Option<StateSnapshot> {
    match serde_json::from_slice(data) {
        Ok(snapshot) => Some(snapshot),
        Err(error) => {
            tracing::warn!("Undecodable snapshot payload: {}", error);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use match_arena::types::Presence;

    fn presence(id: &str, name: &str) -> Presence {
        Presence::new(UserId::new(id).unwrap(), name)
    }

    fn active_state() -> MatchState {
        let mut state = MatchState::new();
        state.apply_join(&presence("alice", "Alice"));
        state.apply_join(&presence("bob", "Bob"));
        state.begin_play(10_000);
        state
    }

    #[test]
    fn test_decode_move_valid() {
        let payload = decode_move(br#"{"index":4}"#).unwrap();
        assert_eq!(payload.index, 4);
    }

    #[test]
    fn test_decode_move_malformed_json() {
        assert!(decode_move(b"not json").is_none());
        assert!(decode_move(b"").is_none());
    }

    #[test]
    fn test_decode_move_non_numeric_index() {
        assert!(decode_move(br#"{"index":"4"}"#).is_none());
        assert!(decode_move(br#"{"index":null}"#).is_none());
        assert!(decode_move(br#"{}"#).is_none());
    }

    #[test]
    fn test_snapshot_in_progress_omits_outcome() {
        let snapshot = StateSnapshot::capture(&active_state());
        let json = String::from_utf8(snapshot.encode()).unwrap();

        assert!(json.contains(r#""activePlayerId":"alice""#));
        assert!(json.contains(r#""deadline":40000"#));
        assert!(!json.contains("winner"));
        assert!(!json.contains("draw"));
    }

    #[test]
    fn test_snapshot_camel_case_keys() {
        let snapshot = StateSnapshot::capture(&active_state());
        let json = String::from_utf8(snapshot.encode()).unwrap();

        assert!(json.contains(r#""activePlayerId""#));
        assert!(json.contains(r#""usernames""#));
        assert!(json.contains(r#""marks""#));
        assert!(json.contains(r#""board""#));
    }

    #[test]
    fn test_snapshot_after_win() {
        let mut state = active_state();
        let alice = UserId::new("alice").unwrap();
        let bob = UserId::new("bob").unwrap();
        state.apply_move(&alice, 0, 0).unwrap();
        state.apply_move(&bob, 3, 0).unwrap();
        state.apply_move(&alice, 1, 0).unwrap();
        state.apply_move(&bob, 4, 0).unwrap();
        state.apply_move(&alice, 2, 0).unwrap();

        let snapshot = StateSnapshot::capture(&state);
        assert_eq!(snapshot.winner, Some(1));
        assert_eq!(snapshot.draw, Some(false));
        assert!(snapshot.active_player_id.is_none());
        assert_eq!(snapshot.board[0], 1);
        assert_eq!(snapshot.board[3], 2);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let snapshot = StateSnapshot::capture(&active_state());
        let decoded = decode_snapshot(&snapshot.encode()).unwrap();

        assert_eq!(decoded.board, snapshot.board);
        assert_eq!(decoded.active_player_id, snapshot.active_player_id);
        assert_eq!(decoded.marks, snapshot.marks);
        assert_eq!(decoded.deadline, snapshot.deadline);
    }

    #[test]
    fn test_decode_snapshot_malformed() {
        assert!(decode_snapshot(b"{]").is_none());
    }
}
