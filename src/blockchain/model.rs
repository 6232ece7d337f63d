use log::info;

use super::difficulty::{self, RetargetParams};
use super::{Block, DIFFICULTY_FLOOR, pow};
use crate::error::{ChainError, Result};
use crate::transaction::{Transaction, TransactionLedger};

/// In-memory blockchain with Proof-of-Work and difficulty retargeting.
/// Owns the block sequence (append-only) and the pending-transaction ledger;
/// both only change through the submit/forge path, so a caller holding `&mut`
/// always observes a consistent snapshot.
#[derive(Debug)]
pub struct Blockchain {
    chain: Vec<Block>,
    pending: TransactionLedger,
    difficulty: u32,
    reward: f64,
    retarget: RetargetParams,
}

impl Blockchain {
    /// Initialize a new blockchain with a genesis block.
    pub fn new(difficulty: u32, reward: f64, retarget: RetargetParams) -> Self {
        let mut bc = Self {
            chain: Vec::new(),
            pending: TransactionLedger::new(),
            difficulty: difficulty.max(retarget.floor),
            reward,
            retarget,
        };
        bc.chain.push(Block::genesis());
        bc
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("blockchain always holds at least the genesis block")
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn retarget_params(&self) -> &RetargetParams {
        &self.retarget
    }

    pub fn pending(&self) -> &TransactionLedger {
        &self.pending
    }

    /// Snapshot for miners: the head's index, its canonical serialization and
    /// the difficulty a winning proof must meet.
    pub fn mine_target(&self) -> (u64, String, u32) {
        let last = self.last_block();
        (last.index, last.canonical_json(), self.difficulty)
    }

    /// Buffer a transaction for the next block and return the 1-based index
    /// of the block it will be included in.
    pub fn new_transaction(
        &mut self,
        sender: &str,
        recipient: &str,
        amount: Option<f64>,
    ) -> Result<u64> {
        if sender.trim().is_empty() {
            return Err(ChainError::InvalidTransaction("sender"));
        }
        if recipient.trim().is_empty() {
            return Err(ChainError::InvalidTransaction("recipient"));
        }
        let amount = amount.ok_or(ChainError::InvalidTransaction("amount"))?;

        self.pending.push(Transaction::new(sender, recipient, amount));
        Ok(self.chain.len() as u64 + 1)
    }

    /// Run the submit half of the mining protocol: reject stale, duplicate or
    /// insufficient proofs against *live* state, then forge and append the new
    /// block, paying `miner_id` the block reward. Difficulty is retargeted
    /// after every accepted block.
    pub fn submit_proof(
        &mut self,
        proof: u64,
        base_index: Option<u64>,
        miner_id: &str,
    ) -> Result<&Block> {
        let (head_index, head_json) = {
            let last = self.last_block();
            (last.index, last.canonical_json())
        };

        if let Some(submitted) = base_index {
            if submitted != head_index {
                return Err(ChainError::StaleProof {
                    submitted,
                    current: head_index,
                });
            }
        }
        if self.chain.iter().any(|b| b.proof == proof) {
            return Err(ChainError::DuplicateProof(proof));
        }
        if !pow::valid_proof(head_json.as_bytes(), proof, self.difficulty) {
            return Err(ChainError::InvalidProof(self.difficulty));
        }

        self.pending.push(Transaction::reward(miner_id, self.reward));
        let block = self.forge_block(proof, None);
        info!(
            "forged block #{} (proof={}, txs={}, hash={})",
            block.index,
            block.proof,
            block.transactions.len(),
            block.hash
        );

        self.difficulty = difficulty::retarget(&self.chain, self.difficulty, &self.retarget);
        Ok(self.last_block())
    }

    /// Seal a new block over the current head and append it, draining the
    /// pending ledger. A `None` previous hash means "not supplied" and is
    /// derived by digesting the head; any supplied value is used as-is.
    pub fn forge_block(&mut self, proof: u64, previous_hash: Option<String>) -> &Block {
        let (head_json, head_digest) = {
            let last = self.last_block();
            (last.canonical_json(), last.digest())
        };
        let hash = pow::guess_hash(head_json.as_bytes(), proof);
        let previous_hash = previous_hash.unwrap_or(head_digest);

        let block = Block::new(
            self.chain.len() as u64 + 1,
            self.pending.drain(),
            proof,
            previous_hash,
            hash,
        );
        self.chain.push(block);
        self.last_block()
    }

    /// Validate the entire chain: genesis shape, linkage digests, sealed
    /// hashes and proof-of-work. Blocks do not record the difficulty they
    /// were mined at, so proofs are replayed against the floor every accepted
    /// block satisfied.
    pub fn is_valid_chain(&self) -> bool {
        let Some(genesis) = self.chain.first() else {
            return false;
        };
        if genesis.index != 1 || genesis.previous_hash.is_some() || !genesis.hash.is_empty() {
            return false;
        }

        for i in 1..self.chain.len() {
            let current = &self.chain[i];
            let prev = &self.chain[i - 1];

            if current.index != prev.index + 1 {
                return false;
            }
            if current.previous_hash.as_deref() != Some(prev.digest().as_str()) {
                return false;
            }

            let prev_json = prev.canonical_json();
            if current.hash != pow::guess_hash(prev_json.as_bytes(), current.proof) {
                return false;
            }
            if !pow::valid_proof(prev_json.as_bytes(), current.proof, DIFFICULTY_FLOOR) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::Blockchain;
    use crate::blockchain::pow::{self, CancelFlag};
    use crate::blockchain::{GENESIS_PROOF, RetargetParams};
    use crate::error::ChainError;

    fn test_params() -> RetargetParams {
        RetargetParams {
            target_secs: 60.0,
            margin: 0.35,
            window: 10,
            floor: 0,
        }
    }

    /// Difficulty 0 so every proof is acceptable and tests stay instant.
    fn easy_chain() -> Blockchain {
        Blockchain::new(0, 1.0, test_params())
    }

    fn mine_once(bc: &mut Blockchain, miner: &str) -> u64 {
        let (index, block_json, difficulty) = bc.mine_target();
        let found = pow::find_proof(&block_json, difficulty, &CancelFlag::new())
            .expect("search not cancelled");
        bc.submit_proof(found.proof, Some(index), miner)
            .expect("proof accepted")
            .index
    }

    #[test]
    fn starts_with_genesis_only() {
        let bc = easy_chain();
        assert_eq!(bc.len(), 1);
        assert_eq!(bc.last_block().proof, GENESIS_PROOF);
        assert!(bc.is_valid_chain());
    }

    #[test]
    fn new_transaction_targets_next_block() {
        let mut bc = easy_chain();
        let index = bc.new_transaction("A", "B", Some(10.0)).unwrap();
        assert_eq!(index, 2);
        assert_eq!(bc.pending().len(), 1);
    }

    #[test]
    fn new_transaction_rejects_missing_fields() {
        let mut bc = easy_chain();
        assert_eq!(
            bc.new_transaction("A", "B", None),
            Err(ChainError::InvalidTransaction("amount"))
        );
        assert_eq!(
            bc.new_transaction("", "B", Some(1.0)),
            Err(ChainError::InvalidTransaction("sender"))
        );
        assert_eq!(
            bc.new_transaction("A", "  ", Some(1.0)),
            Err(ChainError::InvalidTransaction("recipient"))
        );
        assert!(bc.pending().is_empty());
    }

    #[test]
    fn accepted_proof_appends_and_drains_pending() {
        let mut bc = easy_chain();
        bc.new_transaction("A", "B", Some(10.0)).unwrap();

        let index = mine_once(&mut bc, "miner-1");
        assert_eq!(index, 2);
        assert_eq!(bc.len(), 2);
        assert!(bc.pending().is_empty());

        let block = bc.last_block();
        assert_eq!(block.transactions.len(), 2); // submitted tx + reward
        assert_eq!(block.transactions[0].sender, "A");
        assert_eq!(block.transactions[0].recipient, "B");
        assert_eq!(block.transactions[0].amount, 10.0);
        assert!(block.transactions[1].is_reward());
        assert_eq!(block.transactions[1].recipient, "miner-1");
    }

    #[test]
    fn chain_links_by_digest() {
        let mut bc = easy_chain();
        mine_once(&mut bc, "m");
        mine_once(&mut bc, "n");

        let blocks = bc.blocks();
        for i in 1..blocks.len() {
            assert_eq!(
                blocks[i].previous_hash.as_deref(),
                Some(blocks[i - 1].digest().as_str())
            );
        }
        assert!(bc.is_valid_chain());
    }

    #[test]
    fn duplicate_proof_is_rejected_even_if_valid() {
        let mut bc = easy_chain();
        let (index, _, _) = bc.mine_target();
        bc.submit_proof(7, Some(index), "m").unwrap();

        // At difficulty 0 the proof itself would validate again; the chain
        // must still refuse the reused value.
        let err = bc.submit_proof(7, None, "m").unwrap_err();
        assert_eq!(err, ChainError::DuplicateProof(7));
        assert_eq!(bc.len(), 2);
    }

    #[test]
    fn stale_base_index_is_rejected() {
        let mut bc = easy_chain();
        let (stale_index, _, _) = bc.mine_target();
        mine_once(&mut bc, "m"); // head moves

        let err = bc.submit_proof(999, Some(stale_index), "n").unwrap_err();
        assert_eq!(
            err,
            ChainError::StaleProof {
                submitted: stale_index,
                current: stale_index + 1,
            }
        );
    }

    #[test]
    fn insufficient_proof_is_rejected() {
        let retarget = RetargetParams {
            floor: 4,
            ..test_params()
        };
        let mut bc = Blockchain::new(4, 1.0, retarget);
        let (_, block_json, _) = bc.mine_target();

        // First candidate whose digest misses the 4-zero target.
        let weak = (0u64..)
            .find(|p| !pow::valid_proof(block_json.as_bytes(), *p, 4))
            .unwrap();
        let err = bc.submit_proof(weak, None, "m").unwrap_err();
        assert_eq!(err, ChainError::InvalidProof(4));
        assert_eq!(bc.len(), 1);
        assert!(bc.pending().is_empty()); // no reward leaked into the ledger
    }

    #[test]
    fn forge_block_derives_previous_hash_when_not_supplied() {
        let mut bc = easy_chain();
        let head_digest = bc.last_block().digest();
        let block = bc.forge_block(11, None);
        assert_eq!(block.previous_hash.as_deref(), Some(head_digest.as_str()));
    }

    #[test]
    fn forge_block_keeps_supplied_previous_hash_even_if_zeroed() {
        // An explicitly supplied all-zero hash is a value, not "missing".
        let zeros = "0".repeat(64);
        let mut bc = easy_chain();
        let block = bc.forge_block(11, Some(zeros.clone()));
        assert_eq!(block.previous_hash.as_deref(), Some(zeros.as_str()));
    }

    #[test]
    fn tampered_block_fails_validation() {
        let mut bc = easy_chain();
        mine_once(&mut bc, "m");
        mine_once(&mut bc, "n");
        assert!(bc.is_valid_chain());

        // Rewriting history behind the head breaks the successor's linkage
        // digest and sealed hash.
        bc.chain[1].transactions.push(crate::transaction::Transaction::new(
            "evil", "evil", 1_000_000.0,
        ));
        assert!(!bc.is_valid_chain());
    }
}
