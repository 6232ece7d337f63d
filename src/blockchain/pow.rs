use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};

/// How many candidate proofs are tried between cancellation polls.
const CANCEL_POLL_INTERVAL: u64 = 4096;

/// Hash of a serialized block concatenated with a candidate proof's decimal
/// form. This is both the validation preimage and the sealed block hash.
pub fn guess_hash(block_bytes: &[u8], proof: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(block_bytes);
    hasher.update(proof.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Does `sha256(block || proof)` start with `difficulty` hex zeros?
/// Pure; difficulty is always threaded in, never read from shared state.
pub fn valid_proof(block_bytes: &[u8], proof: u64, difficulty: u32) -> bool {
    guess_hash(block_bytes, proof)
        .bytes()
        .take(difficulty as usize)
        .all(|b| b == b'0')
}

/// Outcome of a completed proof search.
#[derive(Debug, Clone, PartialEq)]
pub struct ProofSearch {
    pub proof: u64,
    pub attempts: u64,
    pub elapsed: Duration,
}

/// Cooperative cancellation handle shared between a searching worker and
/// whoever learns the search's base block went stale.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Scan proofs from 0 upward until one satisfies the difficulty. Exhaustive
/// and reproducible; the same block and difficulty always land on the same
/// proof. Returns `None` only if the flag is raised mid-search.
pub fn find_proof(block_json: &str, difficulty: u32, cancel: &CancelFlag) -> Option<ProofSearch> {
    let started = Instant::now();
    let block_bytes = block_json.as_bytes();
    let mut proof: u64 = 0;

    loop {
        if proof % CANCEL_POLL_INTERVAL == 0 && cancel.is_cancelled() {
            return None;
        }
        if valid_proof(block_bytes, proof, difficulty) {
            return Some(ProofSearch {
                proof,
                attempts: proof + 1,
                elapsed: started.elapsed(),
            });
        }
        proof += 1;
    }
}
