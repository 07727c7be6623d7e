pub mod entity;
pub use entity::*;

mod store;
pub use store::{
    CommitOutcome,
    CommitRejection,
    NewDepositRequest,
    NewWithdrawal,
    PayoutDetails,
    WalletStore,
    MAIN_CONFIG_ID,
    WITHDRAWAL_TX_KIND,
};

mod ledger_repository;
pub use ledger_repository::LedgerRepository;

#[cfg(test)]
pub(crate) mod memory;
