use std::mem;

use log::debug;

use super::{Block, GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::error::LedgerError;
use crate::transaction::Transaction;

/// In-memory ledger: the chain plus the pool of transactions waiting for the
/// next block. Both live behind one lock in the application state.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
}

impl Ledger {
    /// Initialize a new ledger holding only the genesis block.
    pub fn new() -> Self {
        let mut ledger = Self {
            chain: Vec::new(),
            pending: Vec::new(),
        };
        ledger.create_block(GENESIS_PROOF, GENESIS_PREVIOUS_HASH.to_string());
        ledger
    }

    /// Seal the whole pending pool into a new block and append it.
    ///
    /// `proof` and `previous_hash` are taken as given; producing valid ones
    /// is the caller's job.
    pub fn create_block(&mut self, proof: i64, previous_hash: String) -> &Block {
        let index = self.chain.len() as u64 + 1;
        let transactions = mem::take(&mut self.pending);
        debug!(
            "LEDGER - sealing block #{} with {} transaction(s)",
            index,
            transactions.len()
        );
        self.chain
            .push(Block::new(index, proof, previous_hash, transactions));
        &self.chain[self.chain.len() - 1]
    }

    /// Return the last block in the chain.
    pub fn previous_block(&self) -> Result<&Block, LedgerError> {
        self.chain.last().ok_or(LedgerError::EmptyChain)
    }

    /// Queue a transaction for the next block. Returns the index of the block
    /// it will be sealed into.
    pub fn add_transaction(&mut self, tx: Transaction) -> Result<u64, LedgerError> {
        let next_index = self.previous_block()?.index + 1;
        self.pending.push(tx);
        Ok(next_index)
    }

    /// Swap the whole chain for one adopted from a peer.
    /// The pending pool is left alone.
    pub fn replace_chain(&mut self, chain: Vec<Block>) {
        self.chain = chain;
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Net amount received by `address`, replayed from every sealed transaction.
    pub fn balance_of(&self, address: &str) -> f64 {
        self.chain
            .iter()
            .flat_map(|b| b.transactions.iter())
            .map(|tx| {
                let mut delta = 0.0;
                if tx.receiver == address {
                    delta += tx.amount;
                }
                if tx.sender == address {
                    delta -= tx.amount;
                }
                delta
            })
            .sum()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
