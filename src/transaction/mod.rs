pub mod ledger;
pub mod model;

pub use ledger::TransactionLedger;
pub use model::Transaction;
