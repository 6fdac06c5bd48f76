use std::collections::HashSet;

use actix_web::http::Uri;
use log::debug;

use crate::error::LedgerError;

/// Known peer addresses, kept as canonical `host:port` strings.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: HashSet<String>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self {
            nodes: HashSet::new(),
        }
    }

    /// Register a peer given as a URI (`http://127.0.0.1:5001/`) or a bare
    /// `host:port`. Returns `false` when the peer was already known.
    pub fn add_node(&mut self, address: &str) -> Result<bool, LedgerError> {
        let location = network_location(address)?;
        let inserted = self.nodes.insert(location.clone());
        debug!(
            "REGISTRY - {} {} ({} known)",
            if inserted { "added" } else { "already had" },
            location,
            self.nodes.len()
        );
        Ok(inserted)
    }

    /// Snapshot of the peer set, sorted for stable output.
    pub fn list_nodes(&self) -> Vec<String> {
        let mut nodes: Vec<String> = self.nodes.iter().cloned().collect();
        nodes.sort();
        nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Extract the `host[:port]` part of an address, host lowercased.
fn network_location(address: &str) -> Result<String, LedgerError> {
    let invalid = || LedgerError::InvalidPeerAddress(address.to_string());

    let uri: Uri = address.trim().parse().map_err(|_| invalid())?;
    let authority = uri.authority().ok_or_else(invalid)?;
    let host = authority.host().to_ascii_lowercase();
    if host.is_empty() {
        return Err(invalid());
    }
    Ok(match authority.port_u16() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    })
}
