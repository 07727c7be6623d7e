use async_trait::async_trait;
use chrono::{ DateTime, Utc };
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    DatabaseConnection,
    EntityTrait,
    IntoActiveModel,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    Set,
    TransactionTrait,
};
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
    AppConfig,
    DepositNetwork,
    DepositRequest,
    UserProfile,
    Wallet,
    WalletTransaction,
    WithdrawalConfig,
    WithdrawalRequest,
};
use crate::db::store::{
    CommitOutcome,
    CommitRejection,
    NewDepositRequest,
    NewWithdrawal,
    PayoutDetails,
    WalletStore,
    MAIN_CONFIG_ID,
};
use crate::enums::DepositKind;
use crate::error::{ AppError, Result };

const MAIN_WALLET_NAME: &str = "Main";

/// PostgreSQL-backed store.
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WalletStore for LedgerRepository {
    async fn find_profile(&self, user_id: &str) -> Result<Option<user_profile::Model>> {
        let profile = UserProfile::find_by_id(user_id.to_string()).one(&self.db).await?;
        Ok(profile)
    }

    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        now: DateTime<Utc>
    ) -> Result<(user_profile::Model, wallet::Model)> {
        let txn = self.db.begin().await?;

        let profile = user_profile::ActiveModel {
            id: Set(user_id.to_string()),
            email: Set(email.to_string()),
            balance: Set(Default::default()),
            withdrawal_nequi: Set(None),
            nequi_owner_name: Set(None),
            withdrawal_usdt_bep20: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let profile = profile.insert(&txn).await?;

        let wallet = wallet::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id.to_string()),
            name: Set(MAIN_WALLET_NAME.to_string()),
            balance: Set(Default::default()),
            created_at: Set(now),
        };
        let wallet = wallet.insert(&txn).await?;

        txn.commit().await?;
        Ok((profile, wallet))
    }

    async fn update_payout_details(
        &self,
        user_id: &str,
        details: PayoutDetails,
        now: DateTime<Utc>
    ) -> Result<user_profile::Model> {
        let profile = UserProfile::find_by_id(user_id.to_string())
            .one(&self.db).await?
            .ok_or(AppError::UserNotFound)?;

        let mut active: user_profile::ActiveModel = profile.into();
        match details {
            PayoutDetails::Nequi { phone, owner_name } => {
                active.withdrawal_nequi = Set(phone);
                active.nequi_owner_name = Set(owner_name);
            }
            PayoutDetails::UsdtBep20 { address } => {
                active.withdrawal_usdt_bep20 = Set(address);
            }
        }
        active.updated_at = Set(now);

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    async fn main_wallet(&self, user_id: &str) -> Result<Option<wallet::Model>> {
        let wallet = Wallet::find()
            .filter(wallet::Column::UserId.eq(user_id))
            .order_by_asc(wallet::Column::CreatedAt)
            .one(&self.db).await?;

        Ok(wallet)
    }

    async fn wallet_transactions(
        &self,
        wallet_id: Uuid,
        limit: Option<u64>
    ) -> Result<Vec<wallet_transaction::Model>> {
        let mut query = WalletTransaction::find()
            .filter(wallet_transaction::Column::WalletId.eq(wallet_id))
            .order_by_desc(wallet_transaction::Column::CreatedAt);

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        Ok(query.all(&self.db).await?)
    }

    async fn withdrawal_config(&self) -> Result<Option<withdrawal_config::Model>> {
        let config = WithdrawalConfig::find_by_id(MAIN_CONFIG_ID.to_string()).one(&self.db).await?;
        Ok(config)
    }

    async fn app_config(&self) -> Result<Option<app_config::Model>> {
        let config = AppConfig::find_by_id(MAIN_CONFIG_ID.to_string()).one(&self.db).await?;
        Ok(config)
    }

    async fn count_withdrawals_on_day(&self, user_id: &str, day: &str) -> Result<u64> {
        let count = WithdrawalRequest::find()
            .filter(withdrawal_request::Column::UserId.eq(user_id))
            .filter(withdrawal_request::Column::RequestDay.eq(day))
            .count(&self.db).await?;

        Ok(count)
    }

    async fn find_withdrawal_by_key(
        &self,
        user_id: &str,
        idempotency_key: Uuid
    ) -> Result<Option<withdrawal_request::Model>> {
        let request = WithdrawalRequest::find()
            .filter(withdrawal_request::Column::UserId.eq(user_id))
            .filter(withdrawal_request::Column::IdempotencyKey.eq(idempotency_key))
            .one(&self.db).await?;

        Ok(request)
    }

    async fn commit_withdrawal(&self, withdrawal: NewWithdrawal) -> Result<CommitOutcome> {
        let txn = self.db.begin().await?;

        // Row lock serialises concurrent submissions against the same wallet
        let locked = Wallet::find_by_id(withdrawal.wallet_id)
            .filter(wallet::Column::UserId.eq(withdrawal.user_id.as_str()))
            .lock_exclusive()
            .one(&txn).await?;

        let Some(locked) = locked else {
            txn.rollback().await?;
            return Ok(CommitOutcome::Rejected(CommitRejection::WalletMissing));
        };

        let existing = WithdrawalRequest::find()
            .filter(withdrawal_request::Column::UserId.eq(withdrawal.user_id.as_str()))
            .filter(withdrawal_request::Column::IdempotencyKey.eq(withdrawal.idempotency_key))
            .one(&txn).await?;

        if let Some(existing) = existing {
            txn.rollback().await?;
            return Ok(CommitOutcome::Replayed(existing));
        }

        let same_day = WithdrawalRequest::find()
            .filter(withdrawal_request::Column::UserId.eq(withdrawal.user_id.as_str()))
            .filter(withdrawal_request::Column::RequestDay.eq(withdrawal.request_day.as_str()))
            .count(&txn).await?;

        if same_day >= withdrawal.daily_limit {
            txn.rollback().await?;
            return Ok(CommitOutcome::Rejected(CommitRejection::DailyLimitReached { count: same_day }));
        }

        // Decrement only if the balance still covers the amount
        let debited = Wallet::update_many()
            .col_expr(
                wallet::Column::Balance,
                Expr::col(wallet::Column::Balance).sub(withdrawal.total_amount)
            )
            .filter(wallet::Column::Id.eq(withdrawal.wallet_id))
            .filter(wallet::Column::Balance.gte(withdrawal.total_amount))
            .exec(&txn).await?;

        if debited.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(
                CommitOutcome::Rejected(CommitRejection::InsufficientFunds {
                    balance: locked.balance,
                })
            );
        }

        UserProfile::update_many()
            .col_expr(
                user_profile::Column::Balance,
                Expr::col(user_profile::Column::Balance).sub(withdrawal.total_amount)
            )
            .col_expr(user_profile::Column::UpdatedAt, Expr::value(withdrawal.created_at))
            .filter(user_profile::Column::Id.eq(withdrawal.user_id.as_str()))
            .exec(&txn).await?;

        let transaction = WalletTransaction::insert(
            withdrawal.transaction_model().into_active_model()
        ).exec_with_returning(&txn).await?;

        let request = WithdrawalRequest::insert(
            withdrawal.request_model().into_active_model()
        ).exec_with_returning(&txn).await?;

        txn.commit().await?;

        Ok(CommitOutcome::Created { request, transaction })
    }

    async fn withdrawal_requests(&self, user_id: &str) -> Result<Vec<withdrawal_request::Model>> {
        let requests = WithdrawalRequest::find()
            .filter(withdrawal_request::Column::UserId.eq(user_id))
            .order_by_desc(withdrawal_request::Column::CreatedAt)
            .all(&self.db).await?;

        Ok(requests)
    }

    async fn deposit_networks(&self, kind: Option<DepositKind>) -> Result<Vec<deposit_network::Model>> {
        let mut query = DepositNetwork::find();

        if let Some(kind) = kind {
            query = query.filter(deposit_network::Column::Kind.eq(kind.as_str()));
        }

        let networks = query.order_by_asc(deposit_network::Column::Name).all(&self.db).await?;
        Ok(networks)
    }

    async fn find_deposit_network(&self, id: Uuid) -> Result<Option<deposit_network::Model>> {
        let network = DepositNetwork::find_by_id(id).one(&self.db).await?;
        Ok(network)
    }

    async fn insert_deposit_request(&self, deposit: NewDepositRequest) -> Result<deposit_request::Model> {
        let model = deposit.into_model(Uuid::new_v4()).into_active_model();
        let deposit = DepositRequest::insert(model).exec_with_returning(&self.db).await?;

        Ok(deposit)
    }

    async fn deposit_requests(&self, user_id: &str) -> Result<Vec<deposit_request::Model>> {
        let deposits = DepositRequest::find()
            .filter(deposit_request::Column::UserId.eq(user_id))
            .order_by_desc(deposit_request::Column::CreatedAt)
            .all(&self.db).await?;

        Ok(deposits)
    }
}
