// src/ats/providers/mod.rs
use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

use super::types::RawJob;
use super::AtsProvider;
use crate::config::AuditConfig;

pub mod ashby;
pub mod greenhouse;
pub mod lever;

pub use ashby::AshbyClient;
pub use greenhouse::GreenhouseClient;
pub use lever::LeverClient;

/// One client per ATS: turns a board identifier into normalized postings
/// via that provider's public job-board endpoint.
///
/// Ordinary failure is not an error. A broken, unreachable, or reshaped
/// board yields an empty list plus a logged warning, so one ATS outage never
/// aborts an audit.
#[async_trait]
pub trait JobBoardClient: Send + Sync {
    fn provider(&self) -> AtsProvider;
    async fn fetch_jobs(&self, board_token: &str) -> Vec<RawJob>;
}

/// Lookup table of implemented provider clients.
///
/// Adding an ATS means implementing [`JobBoardClient`] and registering it in
/// [`ClientRegistry::new`]. Each client owns its own fetch gate, so sharing
/// one registry across audits shares per-provider throttling, while separate
/// registries throttle independently.
pub struct ClientRegistry {
    clients: HashMap<AtsProvider, Box<dyn JobBoardClient>>,
}

impl ClientRegistry {
    pub fn new(config: &AuditConfig) -> Result<Self> {
        let mut clients: HashMap<AtsProvider, Box<dyn JobBoardClient>> = HashMap::new();

        let greenhouse = GreenhouseClient::new(config)?;
        clients.insert(greenhouse.provider(), Box::new(greenhouse));
        let lever = LeverClient::new(config)?;
        clients.insert(lever.provider(), Box::new(lever));
        let ashby = AshbyClient::new(config)?;
        clients.insert(ashby.provider(), Box::new(ashby));

        Ok(Self { clients })
    }

    pub fn is_implemented(&self, provider: AtsProvider) -> bool {
        self.clients.contains_key(&provider)
    }

    /// Fetch postings from any recognized provider. A provider without a
    /// client is a visible gap, distinguishable in logs from a board that is
    /// down.
    pub async fn fetch_jobs(&self, provider: AtsProvider, board_token: &str) -> Vec<RawJob> {
        match self.clients.get(&provider) {
            Some(client) => client.fetch_jobs(board_token).await,
            None => {
                warn!(
                    "Provider {} is not implemented yet; returning no postings",
                    provider
                );
                Vec::new()
            }
        }
    }
}
