use std::time::Duration;

use awc::Client;
use log::debug;

use super::consensus::{ChainFetcher, PeerChain};
use crate::error::LedgerError;

/// Where a peer serves its chain.
pub const CHAIN_PATH: &str = "/api/v1/chain/";

/// Peer chains grow without bound; allow far more than awc's 2 MiB default.
const PEER_CHAIN_LIMIT: usize = 64 * 1024 * 1024;

/// Fetches peer chains over plain HTTP with a per-request timeout.
pub struct HttpChainFetcher {
    client: Client,
}

impl HttpChainFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder().timeout(timeout).finish(),
        }
    }
}

impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, address: &str) -> Result<PeerChain, LedgerError> {
        let unreachable = |reason: String| LedgerError::PeerUnreachable {
            address: address.to_string(),
            reason,
        };

        let url = format!("http://{address}{CHAIN_PATH}");
        debug!("PEER - GET {url}");

        let mut resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| unreachable(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(unreachable(format!("HTTP {}", resp.status())));
        }

        resp.json::<PeerChain>()
            .limit(PEER_CHAIN_LIMIT)
            .await
            .map_err(|e| unreachable(format!("bad chain payload: {e}")))
    }
}
