/// Match registry and matchmaker hand-off
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::RunnerConfig;
use crate::error::{ArenaError, Result};
use crate::handler::MatchHandler;
use crate::runner::{MatchHandle, MatchRunner};
use crate::types::{MatchId, Presence};

/// Registry of running match instances on this host
///
/// Creating a match spawns its actor; the registry only indexes the
/// resulting handles so the host can route presences and messages to
/// the right instance.
#[derive(Default)]
pub struct MatchRegistry {
    config: RunnerConfig,
    matches: HashMap<MatchId, MatchHandle>,
}

impl MatchRegistry {
    /// Create a registry with default runner configuration
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    /// Create a registry with explicit runner configuration
    pub fn with_config(config: RunnerConfig) -> Self {
        Self {
            config,
            matches: HashMap::new(),
        }
    }

    /// Create a fresh match instance of the given game type
    ///
    /// Must be called within a tokio runtime.
    pub fn create_match<H: MatchHandler>(
        &mut self,
        handler: Arc<H>,
        params: &serde_json::Value,
    ) -> Result<MatchId> {
        let handle = MatchRunner::spawn(handler, params, self.config.clone())?;
        let id = handle.id().clone();
        self.matches.insert(id.clone(), handle);
        Ok(id)
    }

    /// Look up a running match by id
    pub fn get(&self, id: &MatchId) -> Result<&MatchHandle> {
        self.matches
            .get(id)
            .ok_or_else(|| ArenaError::MatchNotFound(id.to_string()))
    }

    /// Forget a match handle (the actor ends once all handles drop)
    pub fn remove(&mut self, id: &MatchId) -> Option<MatchHandle> {
        self.matches.remove(id)
    }

    /// Number of matches currently registered
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Whether any matches are registered
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Matchmaker hand-off: a formed pairing requests one fresh match
    ///
    /// The pairing itself is opaque to this host - party-count
    /// validation is the matchmaker's contract. The entries are not
    /// joined here; each presence still goes through the new match's
    /// own admission.
    pub fn matchmaker_matched<H: MatchHandler>(
        &mut self,
        handler: Arc<H>,
        entries: &[Presence],
    ) -> Result<MatchId> {
        let id = self.create_match(handler, &serde_json::Value::Null)?;
        tracing::info!(
            "Matchmaker pairing of {} player(s) -> match '{}'",
            entries.len(),
            id
        );
        Ok(id)
    }
}
