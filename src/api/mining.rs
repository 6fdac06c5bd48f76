use std::time::Instant;

use actix_web::{HttpResponse, post, web};
use log::{debug, info, warn};

use super::models::{AppState, MineResponse};
use crate::blockchain::Block;
use crate::error::LedgerError;
use crate::transaction::Transaction;

/// How many times a search may be thrown away because the tip moved under it.
pub const MAX_MINE_ATTEMPTS: usize = 3;

/// Mine one block on top of the current tip:
/// - Snapshot the tip's proof and hash under the ledger lock
/// - Search for the next proof on the blocking pool, lock released
/// - Re-lock; if the tip is unchanged, add the reward and seal the pool
///
/// A proof found for a tip that was replaced meanwhile is discarded and the
/// search restarts from the new tip.
pub async fn mine_next_block(state: &AppState) -> Result<Block, LedgerError> {
    for attempt in 1..=MAX_MINE_ATTEMPTS {
        let (previous_proof, previous_hash) = {
            let ledger = state.ledger.lock().expect("mutex poisoned");
            let tip = ledger.previous_block()?;
            (tip.proof, tip.hash())
        };

        let pow = state.pow;
        let t0 = Instant::now();
        let proof = web::block(move || pow.find_proof(previous_proof))
            .await
            .map_err(|e| LedgerError::MiningAborted(e.to_string()))?;
        debug!(
            "MINER - found proof {} over {} (difficulty {}, {} ms)",
            proof,
            previous_proof,
            pow.difficulty(),
            t0.elapsed().as_millis()
        );

        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        let stale = {
            let tip = ledger.previous_block()?;
            tip.proof != previous_proof || tip.hash() != previous_hash
        };
        if stale {
            warn!("MINER - tip moved during search (attempt {attempt}/{MAX_MINE_ATTEMPTS})");
            continue;
        }

        ledger.add_transaction(Transaction::new(
            state.node_id.as_str(),
            state.reward_receiver.as_str(),
            state.reward_amount,
        ))?;
        let block = ledger.create_block(proof, previous_hash).clone();
        info!(
            "MINER - sealed block #{} (proof={}, txs={})",
            block.index,
            block.proof,
            block.transactions.len()
        );
        return Ok(block);
    }

    Err(LedgerError::MiningAborted(format!(
        "chain tip moved during {MAX_MINE_ATTEMPTS} consecutive searches"
    )))
}

/// Mine a new block from the pending pool, rewarding this node.
#[post("/mine/")]
pub async fn mine_block(state: web::Data<AppState>) -> Result<HttpResponse, LedgerError> {
    let block = mine_next_block(&state).await?;
    Ok(HttpResponse::Ok().json(MineResponse::from(block)))
}
