use super::block::sha256_hex;

/// Proof-of-Work puzzle shared by mining and validation.
///
/// A proof `n` is accepted against a predecessor proof `p` when the hex
/// SHA-256 of the decimal string of `n² - p²` starts with `difficulty` zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOfWork {
    difficulty: usize,
}

impl ProofOfWork {
    pub fn new(difficulty: usize) -> Self {
        Self {
            difficulty: difficulty.clamp(1, super::DIFF_MAX),
        }
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Search nonces 1, 2, 3, ... and return the first one that satisfies the
    /// puzzle. Unbounded and CPU-bound: never call this while holding a lock.
    pub fn find_proof(&self, previous_proof: i64) -> i64 {
        let mut candidate: i64 = 1;
        while !self.is_valid_proof(candidate, previous_proof) {
            candidate += 1;
        }
        candidate
    }

    /// Cheap check of a single (proof, previous_proof) pair.
    pub fn is_valid_proof(&self, proof: i64, previous_proof: i64) -> bool {
        puzzle_digest(proof, previous_proof)
            .bytes()
            .take(self.difficulty)
            .all(|b| b == b'0')
    }
}

impl Default for ProofOfWork {
    fn default() -> Self {
        Self::new(super::DEFAULT_DIFFICULTY)
    }
}

/// Digest of the puzzle function for a candidate pair.
/// Squares are taken in i128 so no i64 input can overflow.
pub fn puzzle_digest(proof: i64, previous_proof: i64) -> String {
    let delta = i128::from(proof).pow(2) - i128::from(previous_proof).pow(2);
    sha256_hex(delta.to_string().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::{ProofOfWork, puzzle_digest};
    use crate::blockchain::{DEFAULT_DIFFICULTY, GENESIS_PROOF};

    #[test]
    fn found_proofs_satisfy_predicate() {
        let pow = ProofOfWork::new(3);
        for previous in [1_i64, 2, 7, 42, 533, 10_000, -5, 123_456_789] {
            let proof = pow.find_proof(previous);
            assert!(proof >= 1);
            assert!(puzzle_digest(proof, previous).starts_with("000"));
            assert!(pow.is_valid_proof(proof, previous));
        }
    }

    #[test]
    fn search_returns_first_match() {
        let pow = ProofOfWork::new(2);
        let proof = pow.find_proof(100);
        assert!((1..proof).all(|n| !pow.is_valid_proof(n, 100)));
    }

    #[test]
    fn search_is_deterministic() {
        let pow = ProofOfWork::new(3);
        assert_eq!(pow.find_proof(17), pow.find_proof(17));
    }

    #[test]
    fn default_difficulty_from_genesis() {
        let pow = ProofOfWork::default();
        assert_eq!(pow.difficulty(), DEFAULT_DIFFICULTY);
        let proof = pow.find_proof(GENESIS_PROOF);
        assert!(puzzle_digest(proof, GENESIS_PROOF).starts_with("00000"));
    }

    #[test]
    fn puzzle_uses_signed_difference() {
        // 2² - 3² = -5
        assert_eq!(
            puzzle_digest(2, 3),
            crate::blockchain::block::sha256_hex(b"-5")
        );
    }

    #[test]
    fn extreme_proofs_do_not_overflow() {
        let pow = ProofOfWork::new(1);
        let _ = pow.is_valid_proof(i64::MAX, i64::MIN);
        let _ = puzzle_digest(i64::MIN, i64::MAX);
    }

    #[test]
    fn difficulty_is_capped() {
        assert_eq!(ProofOfWork::new(1_000).difficulty(), crate::blockchain::DIFF_MAX);
    }

    #[test]
    fn zero_difficulty_still_demands_work() {
        let pow = ProofOfWork::new(0);
        assert_eq!(pow.difficulty(), 1);
        let bogus = (1..).find(|n| !puzzle_digest(*n, 1).starts_with('0')).unwrap();
        assert!(!pow.is_valid_proof(bogus, 1));
    }
}
