use serde::{Deserialize, Serialize};

use crate::blockchain::REWARD_SENDER;

/// A value transfer between two opaque identifiers. The core does not check
/// identifier formats, signs or bounds; whoever submits it owns that problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: f64) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }

    /// Mining reward paid out of the reserved sender `"0"`.
    pub fn reward(recipient: impl Into<String>, amount: f64) -> Self {
        Self::new(REWARD_SENDER, recipient, amount)
    }

    pub fn is_reward(&self) -> bool {
        self.sender == REWARD_SENDER
    }
}
