use std::future::Future;
use std::sync::Mutex;

use futures::future::join_all;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::blockchain::{Block, Ledger, ProofOfWork, is_valid_chain};
use crate::error::LedgerError;

/// What a peer returns when asked for its ledger. Also the body of our own
/// `GET /chain/`, so nodes of this crate can talk to each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Transport used to pull a peer's chain. Any failure is reported as
/// `LedgerError::PeerUnreachable` and only ever skips that peer.
pub trait ChainFetcher {
    fn fetch_chain(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<PeerChain, LedgerError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReplacementOutcome {
    Replaced,
    Unchanged,
}

/// Longest-valid-chain rule. Pull every peer's chain, keep the longest one
/// that is strictly longer than ours and passes validation, and adopt it.
///
/// Peers are fetched concurrently and validated without holding the ledger
/// lock; only the final comparison and swap run under it.
pub async fn resolve<F: ChainFetcher>(
    ledger: &Mutex<Ledger>,
    peers: &[String],
    fetcher: &F,
    pow: &ProofOfWork,
) -> ReplacementOutcome {
    let responses = join_all(peers.iter().map(|address| async move {
        (address.as_str(), fetcher.fetch_chain(address).await)
    }))
    .await;

    let local_len = ledger.lock().expect("mutex poisoned").len();
    let Some(candidate) = choose_chain(local_len, responses, pow) else {
        info!("CONSENSUS - local chain kept (length {local_len})");
        return ReplacementOutcome::Unchanged;
    };

    adopt(ledger, candidate)
}

/// Commit step of [`resolve`]: swap in `candidate` if it is still strictly
/// longer than the local chain. The local chain can only have grown since the
/// candidate was chosen when another thread mined or resolved in between.
fn adopt(ledger: &Mutex<Ledger>, candidate: Vec<Block>) -> ReplacementOutcome {
    let mut ledger = ledger.lock().expect("mutex poisoned");
    if candidate.len() <= ledger.len() {
        info!(
            "CONSENSUS - candidate of length {} overtaken by local chain ({})",
            candidate.len(),
            ledger.len()
        );
        return ReplacementOutcome::Unchanged;
    }
    info!(
        "CONSENSUS - replacing local chain ({} -> {} blocks)",
        ledger.len(),
        candidate.len()
    );
    ledger.replace_chain(candidate);
    ReplacementOutcome::Replaced
}

/// Pick the winning chain out of the peers' responses, if any beats
/// `local_len`. Equal lengths never win; the first peer to reach a length keeps it.
pub fn choose_chain<'a>(
    local_len: usize,
    responses: impl IntoIterator<Item = (&'a str, Result<PeerChain, LedgerError>)>,
    pow: &ProofOfWork,
) -> Option<Vec<Block>> {
    let mut best_len = local_len;
    let mut best = None;

    for (address, response) in responses {
        let peer = match response {
            Ok(peer) => peer,
            Err(e) => {
                warn!("CONSENSUS - skipping peer: {e}");
                continue;
            }
        };
        if peer.length <= best_len {
            debug!(
                "CONSENSUS - peer {address} reports length {} (best {best_len})",
                peer.length
            );
            continue;
        }
        match check_candidate(address, peer, pow) {
            Ok(chain) => {
                debug!("CONSENSUS - peer {address} offers valid chain of {}", chain.len());
                best_len = chain.len();
                best = Some(chain);
            }
            Err(e) => warn!("CONSENSUS - rejecting candidate: {e}"),
        }
    }

    best
}

/// Accept a peer chain only if its reported length matches what was actually
/// sent and every link checks out.
fn check_candidate(
    address: &str,
    peer: PeerChain,
    pow: &ProofOfWork,
) -> Result<Vec<Block>, LedgerError> {
    let invalid = |reason: String| LedgerError::InvalidPeerChain {
        address: address.to_string(),
        reason,
    };

    if peer.chain.is_empty() {
        return Err(invalid("empty chain".into()));
    }
    if peer.chain.len() != peer.length {
        return Err(invalid(format!(
            "reported length {} but sent {} blocks",
            peer.length,
            peer.chain.len()
        )));
    }
    if !is_valid_chain(&peer.chain, pow) {
        return Err(invalid("linkage or proof-of-work check failed".into()));
    }
    Ok(peer.chain)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::{ChainFetcher, PeerChain, ReplacementOutcome, adopt, choose_chain, resolve};
    use crate::blockchain::validate::tests::{TEST_DIFFICULTY, mined_chain};
    use crate::blockchain::{Block, Ledger, ProofOfWork};
    use crate::error::LedgerError;

    /// Canned peer responses; unknown addresses are unreachable.
    #[derive(Default)]
    struct StubFetcher {
        peers: HashMap<String, PeerChain>,
    }

    impl StubFetcher {
        fn with(mut self, address: &str, chain: Vec<Block>) -> Self {
            let length = chain.len();
            self.peers
                .insert(address.to_string(), PeerChain { chain, length });
            self
        }
    }

    impl ChainFetcher for StubFetcher {
        async fn fetch_chain(&self, address: &str) -> Result<PeerChain, LedgerError> {
            self.peers
                .get(address)
                .cloned()
                .ok_or_else(|| LedgerError::PeerUnreachable {
                    address: address.to_string(),
                    reason: "connection refused".into(),
                })
        }
    }

    fn pow() -> ProofOfWork {
        ProofOfWork::new(TEST_DIFFICULTY)
    }

    fn ledger_of(len: usize) -> Mutex<Ledger> {
        let mut ledger = Ledger::new();
        ledger.replace_chain(mined_chain(len, &pow()));
        Mutex::new(ledger)
    }

    fn peers(addrs: &[&str]) -> Vec<String> {
        addrs.iter().map(|a| a.to_string()).collect()
    }

    fn tampered(mut chain: Vec<Block>) -> Vec<Block> {
        chain[2].previous_hash = "0".repeat(64);
        chain
    }

    #[actix_web::test]
    async fn longer_valid_chain_replaces_local() {
        let ledger = ledger_of(3);
        let remote = mined_chain(5, &pow());
        let fetcher = StubFetcher::default().with("a:1", remote.clone());

        let outcome = resolve(&ledger, &peers(&["a:1"]), &fetcher, &pow()).await;

        assert_eq!(outcome, ReplacementOutcome::Replaced);
        assert_eq!(ledger.lock().unwrap().chain(), remote.as_slice());
    }

    #[actix_web::test]
    async fn invalid_longer_chain_is_ignored() {
        let ledger = ledger_of(3);
        let local = ledger.lock().unwrap().chain().to_vec();
        let fetcher = StubFetcher::default().with("a:1", tampered(mined_chain(5, &pow())));

        let outcome = resolve(&ledger, &peers(&["a:1"]), &fetcher, &pow()).await;

        assert_eq!(outcome, ReplacementOutcome::Unchanged);
        assert_eq!(ledger.lock().unwrap().len(), 3);
        assert_eq!(ledger.lock().unwrap().chain(), local.as_slice());
    }

    #[actix_web::test]
    async fn equal_length_peers_never_win() {
        let ledger = ledger_of(5);
        let local = ledger.lock().unwrap().chain().to_vec();
        let fetcher = StubFetcher::default()
            .with("a:1", mined_chain(5, &pow()))
            .with("b:2", mined_chain(5, &pow()));

        let outcome = resolve(&ledger, &peers(&["a:1", "b:2"]), &fetcher, &pow()).await;

        assert_eq!(outcome, ReplacementOutcome::Unchanged);
        assert_eq!(ledger.lock().unwrap().chain(), local.as_slice());
    }

    #[actix_web::test]
    async fn unreachable_peers_are_skipped() {
        let ledger = ledger_of(2);
        let remote = mined_chain(4, &pow());
        let fetcher = StubFetcher::default().with("up:1", remote.clone());

        let outcome = resolve(
            &ledger,
            &peers(&["down:1", "up:1", "down:2"]),
            &fetcher,
            &pow(),
        )
        .await;

        assert_eq!(outcome, ReplacementOutcome::Replaced);
        assert_eq!(ledger.lock().unwrap().len(), 4);
    }

    #[actix_web::test]
    async fn no_peers_leaves_chain_alone() {
        let ledger = ledger_of(2);
        let outcome = resolve(&ledger, &[], &StubFetcher::default(), &pow()).await;
        assert_eq!(outcome, ReplacementOutcome::Unchanged);
        assert_eq!(ledger.lock().unwrap().len(), 2);
    }

    #[test]
    fn candidate_overtaken_by_local_growth_is_dropped() {
        // candidate chosen against length 3, but the ledger reached 5 before commit
        let ledger = ledger_of(5);
        let local = ledger.lock().unwrap().chain().to_vec();
        let candidate = mined_chain(4, &pow());

        assert_eq!(adopt(&ledger, candidate), ReplacementOutcome::Unchanged);
        assert_eq!(ledger.lock().unwrap().chain(), local.as_slice());

        let longer = mined_chain(6, &pow());
        assert_eq!(adopt(&ledger, longer.clone()), ReplacementOutcome::Replaced);
        assert_eq!(ledger.lock().unwrap().chain(), longer.as_slice());
    }

    fn reply(address: &str, chain: Vec<Block>, length: usize) -> (&str, Result<PeerChain, LedgerError>) {
        (address, Ok(PeerChain { chain, length }))
    }

    #[test]
    fn longest_of_several_wins() {
        let six = mined_chain(6, &pow());
        let responses = vec![
            reply("a", mined_chain(4, &pow()), 4),
            reply("b", six.clone(), 6),
            reply("c", mined_chain(6, &pow()), 6),
        ];
        assert_eq!(choose_chain(3, responses, &pow()), Some(six));
    }

    #[test]
    fn invalid_longest_falls_back_to_next_valid() {
        let five = mined_chain(5, &pow());
        let responses = vec![
            reply("a", five.clone(), 5),
            reply("b", tampered(mined_chain(7, &pow())), 7),
        ];
        assert_eq!(choose_chain(3, responses, &pow()), Some(five));
    }

    #[test]
    fn inflated_reported_length_is_rejected() {
        let three = mined_chain(3, &pow());
        let lying = vec![reply("liar:1", three.clone(), 50)];
        assert_eq!(choose_chain(2, lying, &pow()), None);

        let honest = vec![reply("ok:1", three.clone(), 3)];
        assert_eq!(choose_chain(2, honest, &pow()), Some(three));
    }

    #[test]
    fn empty_peer_chain_is_rejected() {
        let responses = vec![reply("a", Vec::new(), 0), reply("b", Vec::new(), 2)];
        assert_eq!(choose_chain(0, responses, &pow()), None);
    }

    #[test]
    fn unreachable_responses_are_skipped() {
        let four = mined_chain(4, &pow());
        let down = LedgerError::PeerUnreachable {
            address: "down:1".into(),
            reason: "timed out".into(),
        };
        let responses = vec![("down:1", Err(down)), reply("up:1", four.clone(), 4)];
        assert_eq!(choose_chain(1, responses, &pow()), Some(four));
    }

    #[test]
    fn peer_chain_wire_shape() {
        let peer = PeerChain { chain: mined_chain(1, &pow()), length: 1 };
        let json = serde_json::to_value(&peer).unwrap();
        assert_eq!(json["length"], 1);
        let block = &json["chain"][0];
        for field in ["index", "timestamp", "proof", "previous_hash", "transactions"] {
            assert!(block.get(field).is_some(), "{field}");
        }
        assert_eq!(block["previous_hash"], "0");
        assert_eq!(block["proof"], 1);
    }
}
