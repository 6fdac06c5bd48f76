use super::{Block, ProofOfWork};

/// Check linkage and Proof-of-Work of every block against its predecessor.
///
/// The genesis block itself and transaction contents are not inspected.
/// Stops at the first broken link.
pub fn is_valid_chain(chain: &[Block], pow: &ProofOfWork) -> bool {
    chain.windows(2).all(|pair| {
        let (prev, block) = (&pair[0], &pair[1]);
        block.previous_hash == prev.hash() && pow.is_valid_proof(block.proof, prev.proof)
    })
}
