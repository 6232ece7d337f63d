pub mod block;
pub mod difficulty;
pub mod model;
pub mod pow;

pub use block::Block;
pub use difficulty::RetargetParams;
pub use model::Blockchain;
pub use pow::CancelFlag;

/// Leading-zero count the chain starts out with.
pub const INITIAL_DIFFICULTY: u32 = 4;

/// Hard minimum the retarget controller never goes below.
pub const DIFFICULTY_FLOOR: u32 = 4;

/// Amount credited to a miner per forged block (dev value).
pub const MINING_REWARD: f64 = 1.0;

/// Reserved sender id for reward transactions.
pub const REWARD_SENDER: &str = "0";

/// Fixed proof carried by the genesis block; never mined.
pub const GENESIS_PROOF: u64 = 100;

/// Target seconds per block for the retarget controller.
pub const TARGET_BLOCK_TIME_SECS: f64 = 60.0;

/// How many trailing blocks feed the retarget average.
pub const RETARGET_WINDOW: usize = 10;

/// Tolerance band around the target before difficulty moves (+/- 35%).
pub const RETARGET_MARGIN: f64 = 0.35;
