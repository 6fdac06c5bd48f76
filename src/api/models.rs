use crate::blockchain::{Block, Ledger, ProofOfWork};
use crate::config::Config;
use crate::network::NodeRegistry;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Shared application state: the ledger and the peer registry, each behind
/// its own lock, plus the immutable node settings.
pub struct AppState {
    pub ledger: Mutex<Ledger>,
    pub nodes: Mutex<NodeRegistry>,
    pub pow: ProofOfWork,
    /// Random identity, sender of every mining reward.
    pub node_id: String,
    pub reward_receiver: String,
    pub reward_amount: f64,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            ledger: Mutex::new(Ledger::new()),
            nodes: Mutex::new(NodeRegistry::new()),
            pow: ProofOfWork::new(config.difficulty),
            node_id: uuid::Uuid::new_v4().simple().to_string(),
            reward_receiver: config.reward_receiver.clone(),
            reward_amount: config.reward_amount,
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub chain: &'a [Block],
    pub length: usize,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: &'static str,
    pub index: u64,
    pub timestamp: String,
    pub proof: i64,
    pub previous_hash: String,
    pub transactions: Vec<Transaction>,
}

impl From<Block> for MineResponse {
    fn from(block: Block) -> Self {
        Self {
            message: "Congratulations, you just mined a block!",
            index: block.index,
            timestamp: block.timestamp,
            proof: block.proof,
            previous_hash: block.previous_hash,
            transactions: block.transactions,
        }
    }
}

/* ---------- TX API Models ---------- */

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Serialize)]
pub struct MempoolResponse<'a> {
    pub size: usize,
    pub transactions: &'a [Transaction],
}

#[derive(Serialize)]
pub struct BalanceResponse {
    pub address: String,
    pub balance: f64,
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct ConnectRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct NodesResponse {
    pub message: &'static str,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse<'a> {
    pub replaced: bool,
    pub message: &'static str,
    pub chain: &'a [Block],
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub node_id: String,
    pub height: usize,
    pub difficulty: usize,
    pub last_proof: Option<i64>,
    pub mempool_size: usize,
    pub peers: usize,
}
