use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::GENESIS_PROOF;
use crate::transaction::Transaction;

/// A single block in the chain. `index` is 1-based and equals the block's
/// position; `hash` is the proof-of-work guess hash sealed over the previous
/// block, so genesis (which has no predecessor) carries an empty string and a
/// `None` previous hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: f64, // Unix seconds, fractional
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: Option<String>,
    pub hash: String,
}

impl Block {
    /// Create the genesis block (first block in the chain).
    pub fn genesis() -> Self {
        Self {
            index: 1,
            timestamp: unix_time(),
            transactions: Vec::new(),
            proof: GENESIS_PROOF,
            previous_hash: None,
            hash: String::new(),
        }
    }

    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
        hash: String,
    ) -> Self {
        Self::new_with_timestamp(index, transactions, proof, previous_hash, hash, unix_time())
    }

    pub fn new_with_timestamp(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
        hash: String,
        timestamp: f64,
    ) -> Self {
        Self {
            index,
            timestamp,
            transactions,
            proof,
            previous_hash: Some(previous_hash),
            hash,
        }
    }

    /// Canonical serialization of every field. Round-tripping through
    /// `serde_json::Value` sorts object keys, so two logically identical
    /// blocks always yield the same bytes regardless of construction order.
    pub fn canonical_json(&self) -> String {
        let value = serde_json::to_value(self).expect("serialize block");
        serde_json::to_string(&value).expect("render block json")
    }

    /// SHA-256 over the canonical serialization, lowercase hex.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_json().as_bytes());
        hex::encode(hasher.finalize())
    }
}

fn unix_time() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
