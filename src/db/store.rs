use async_trait::async_trait;
use chrono::{ DateTime, Utc };
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::entity::{
    app_config,
    deposit_network,
    deposit_request,
    user_profile,
    wallet,
    wallet_transaction,
    withdrawal_config,
    withdrawal_request,
};
use crate::enums::{ DepositKind, PayoutRail, RequestStatus };
use crate::error::Result;

/// Key of the admin-managed singleton config rows.
pub const MAIN_CONFIG_ID: &str = "main";

/// Tag written on the ledger entry paired with a withdrawal request.
pub const WITHDRAWAL_TX_KIND: &str = "withdrawal-request";

/// Fields a payout-address form may change. `None` clears the field.
#[derive(Debug, Clone, PartialEq)]
pub enum PayoutDetails {
    Nequi {
        phone: Option<String>,
        owner_name: Option<String>,
    },
    UsdtBep20 {
        address: Option<String>,
    },
}

/// Everything written by one withdrawal commit.
#[derive(Debug, Clone)]
pub struct NewWithdrawal {
    pub request_id: Uuid,
    pub transaction_id: Uuid,
    pub idempotency_key: Uuid,
    pub user_id: String,
    pub user_email: String,
    pub wallet_id: Uuid,
    pub rail: PayoutRail,
    pub wallet_address: String,
    pub nequi_owner_name: Option<String>,
    pub total_amount: Decimal,
    pub fee_amount: Decimal,
    pub net_amount: Decimal,
    pub request_day: String,
    /// Re-checked inside the commit.
    pub daily_limit: u64,
    pub created_at: DateTime<Utc>,
}

impl NewWithdrawal {
    pub fn transaction_model(&self) -> wallet_transaction::Model {
        wallet_transaction::Model {
            id: self.transaction_id,
            wallet_id: self.wallet_id,
            amount: -self.total_amount,
            description: format!("Withdrawal request to {}", self.wallet_address),
            kind: WITHDRAWAL_TX_KIND.to_string(),
            status: RequestStatus::Pending.as_str().to_string(),
            created_at: self.created_at,
        }
    }

    pub fn request_model(&self) -> withdrawal_request::Model {
        withdrawal_request::Model {
            id: self.request_id,
            user_id: self.user_id.clone(),
            user_email: self.user_email.clone(),
            wallet_id: self.wallet_id,
            transaction_id: self.transaction_id,
            total_amount: self.total_amount,
            fee_amount: self.fee_amount,
            net_amount: self.net_amount,
            method: self.rail.as_str().to_string(),
            wallet_address: self.wallet_address.clone(),
            nequi_owner_name: self.nequi_owner_name.clone(),
            status: RequestStatus::Pending.as_str().to_string(),
            request_day: self.request_day.clone(),
            idempotency_key: self.idempotency_key,
            created_at: self.created_at,
        }
    }
}

/// Why a commit wrote nothing even though the store itself was healthy.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitRejection {
    WalletMissing,
    InsufficientFunds {
        balance: Decimal,
    },
    DailyLimitReached {
        count: u64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    Created {
        request: withdrawal_request::Model,
        transaction: wallet_transaction::Model,
    },
    /// A request with the same idempotency key already exists.
    Replayed(withdrawal_request::Model),
    Rejected(CommitRejection),
}

#[derive(Debug, Clone)]
pub struct NewDepositRequest {
    pub user_id: String,
    pub wallet_id: Uuid,
    pub network_name: String,
    pub amount: Decimal,
    pub currency: String,
    pub amount_usd: Decimal,
    pub reference_number: String,
    pub created_at: DateTime<Utc>,
}

impl NewDepositRequest {
    pub fn into_model(self, id: Uuid) -> deposit_request::Model {
        deposit_request::Model {
            id,
            user_id: self.user_id,
            wallet_id: self.wallet_id,
            network_name: self.network_name,
            amount: self.amount,
            currency: self.currency,
            amount_usd: self.amount_usd,
            reference_number: self.reference_number,
            status: RequestStatus::Pending.as_str().to_string(),
            created_at: self.created_at,
        }
    }
}

/// Persistence operations the wallet workflows depend on.
#[async_trait]
pub trait WalletStore: Send + Sync {
    async fn find_profile(&self, user_id: &str) -> Result<Option<user_profile::Model>>;

    /// Creates the profile and its main wallet, both with a zero balance.
    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        now: DateTime<Utc>
    ) -> Result<(user_profile::Model, wallet::Model)>;

    async fn update_payout_details(
        &self,
        user_id: &str,
        details: PayoutDetails,
        now: DateTime<Utc>
    ) -> Result<user_profile::Model>;

    /// The user's oldest wallet.
    async fn main_wallet(&self, user_id: &str) -> Result<Option<wallet::Model>>;

    /// Newest first.
    async fn wallet_transactions(
        &self,
        wallet_id: Uuid,
        limit: Option<u64>
    ) -> Result<Vec<wallet_transaction::Model>>;

    async fn withdrawal_config(&self) -> Result<Option<withdrawal_config::Model>>;

    async fn app_config(&self) -> Result<Option<app_config::Model>>;

    async fn count_withdrawals_on_day(&self, user_id: &str, day: &str) -> Result<u64>;

    async fn find_withdrawal_by_key(
        &self,
        user_id: &str,
        idempotency_key: Uuid
    ) -> Result<Option<withdrawal_request::Model>>;

    /// Atomically writes the transaction and request and debits the wallet
    /// and profile balances. Either everything is written or nothing is.
    async fn commit_withdrawal(&self, withdrawal: NewWithdrawal) -> Result<CommitOutcome>;

    /// Newest first.
    async fn withdrawal_requests(&self, user_id: &str) -> Result<Vec<withdrawal_request::Model>>;

    async fn deposit_networks(&self, kind: Option<DepositKind>) -> Result<Vec<deposit_network::Model>>;

    async fn find_deposit_network(&self, id: Uuid) -> Result<Option<deposit_network::Model>>;

    async fn insert_deposit_request(&self, deposit: NewDepositRequest) -> Result<deposit_request::Model>;

    /// Newest first.
    async fn deposit_requests(&self, user_id: &str) -> Result<Vec<deposit_request::Model>>;
}
