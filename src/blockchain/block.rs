use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::transaction::Transaction;

/// Proof carried by the genesis block. Fixed seed, never searched for.
pub const GENESIS_PROOF: i64 = 1;

/// `previous_hash` of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// A sealed batch of transactions linked to its predecessor.
///
/// Fields are declared in lexicographic order so the JSON preimage fed to
/// [`Block::hash`] has sorted keys. Peers exchange blocks in this exact shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub previous_hash: String,
    pub proof: i64,
    pub timestamp: String, // creation instant (UTC)
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Build a block stamped with the current instant.
    pub fn new(
        index: u64,
        proof: i64,
        previous_hash: String,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            index,
            previous_hash,
            proof,
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            transactions,
        }
    }

    /// SHA-256 over the canonical JSON serialization of every field,
    /// rendered as 64 lowercase hex characters.
    pub fn hash(&self) -> String {
        let encoded = serde_json::to_vec(self).expect("serialize block");
        sha256_hex(&encoded)
    }
}

/// Hex-encoded SHA-256 of arbitrary bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
