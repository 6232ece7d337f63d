use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::blockchain::{Block, Blockchain, CancelFlag, RetargetParams};
use crate::transaction::Transaction;

/// Shared application state: the node's identity, the chain behind its
/// single-writer mutex, and the cancel handle of whatever proof search is
/// currently running on the blocking pool.
pub struct AppState {
    pub node_id: String,
    pub blockchain: Mutex<Blockchain>,
    pub active_search: Mutex<Option<CancelFlag>>,
}

impl AppState {
    pub fn new(node_id: String, difficulty: u32, reward: f64) -> Self {
        Self {
            node_id,
            blockchain: Mutex::new(Blockchain::new(
                difficulty,
                reward,
                RetargetParams::default(),
            )),
            active_search: Mutex::new(None),
        }
    }

    /// Stop the in-flight proof search, if any; called whenever an append
    /// makes its base block stale.
    pub fn cancel_active_search(&self) {
        let mut slot = self.active_search.lock().expect("mutex poisoned");
        if let Some(flag) = slot.take() {
            flag.cancel();
        }
    }

    /// Track a newly started proof search, displacing (and cancelling) any
    /// previous one.
    pub fn register_search(&self, flag: CancelFlag) {
        let mut slot = self.active_search.lock().expect("mutex poisoned");
        if let Some(prev) = slot.replace(flag) {
            prev.cancel();
        }
    }
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub amount: Option<f64>,
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub block_index: u64,
}

#[derive(Serialize)]
pub struct PendingResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}

/* ---------- Mining API Models ---------- */

#[derive(Serialize)]
pub struct MineTargetResponse {
    pub index: u64,
    /// Canonical serialization of the head block; hash this together with
    /// candidate proofs.
    pub block: String,
    pub difficulty: u32,
}

#[derive(Deserialize)]
pub struct SubmitProofRequest {
    pub proof: u64,
    /// Identity the block reward is paid to.
    pub miner_id: Option<String>,
    /// Head index the proof was mined against, echoed from /mine-target/.
    pub base_index: Option<u64>,
}

#[derive(Serialize)]
pub struct ForgedResponse {
    pub success: bool,
    pub message: String,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: Option<String>,
    pub hash: String,
    pub difficulty: u32,
}

impl ForgedResponse {
    pub fn new(block: &Block, difficulty: u32) -> Self {
        Self {
            success: true,
            message: "New block forged!".to_string(),
            index: block.index,
            transactions: block.transactions.clone(),
            proof: block.proof,
            previous_hash: block.previous_hash.clone(),
            hash: block.hash.clone(),
            difficulty,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct MineLocalRequest {
    /// Defaults to the node's own identity.
    pub miner_id: Option<String>,
}

#[derive(Serialize)]
pub struct MineLocalResponse {
    pub success: bool,
    pub message: String,
    pub index: u64,
    pub proof: u64,
    pub hash: String,
    pub attempts: u64,
    pub elapsed_secs: f64,
    pub difficulty: u32,
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse {
    pub length: usize,
    pub difficulty: u32,
    pub chain: Vec<Block>,
}

#[derive(Serialize)]
pub struct LastBlockResponse {
    pub block: Block,
    pub difficulty: u32,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty: u32,
}

#[derive(Serialize)]
pub struct DifficultyResponse {
    pub difficulty: u32,
}

/* ---------- Stats API Models ---------- */

#[derive(Serialize)]
pub struct StatsResponse {
    pub height: usize,
    pub difficulty: u32,
    pub target_block_time_secs: f64,
    pub retarget_window: usize,
    pub retarget_margin: f64,
    pub difficulty_floor: u32,
    pub last_interval_secs: Option<f64>,
    pub avg_interval_secs: Option<f64>,
    pub pending_transactions: usize,
}
