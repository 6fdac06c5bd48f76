pub mod block;
pub mod model;
pub mod pow;
pub mod validate;

pub use block::{Block, GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
pub use model::Ledger;
pub use pow::ProofOfWork;
pub use validate::is_valid_chain;

/// Default Proof-of-Work difficulty (number of leading zero hex characters).
pub const DEFAULT_DIFFICULTY: usize = 5;

/// A SHA-256 hex digest has 64 characters; more zeros can never match.
pub const DIFF_MAX: usize = 64;
