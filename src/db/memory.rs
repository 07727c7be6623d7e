//! In-process `WalletStore` for service tests.

use std::collections::HashMap;
use std::sync::atomic::{ AtomicBool, Ordering };

use async_trait::async_trait;
use chrono::{ DateTime, Utc };
use rust_decimal::Decimal;
use sea_orm::DbErr;
use tokio::sync::Mutex;
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

#[derive(Default, Clone)]
struct State {
    profiles: HashMap<String, user_profile::Model>,
    wallets: Vec<wallet::Model>,
    transactions: Vec<wallet_transaction::Model>,
    withdrawals: Vec<withdrawal_request::Model>,
    deposits: Vec<deposit_request::Model>,
    networks: Vec<deposit_network::Model>,
    withdrawal_config: Option<withdrawal_config::Model>,
    app_config: Option<app_config::Model>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    fail_commits: AtomicBool,
    /// Snapshot served to `main_wallet` and `count_withdrawals_on_day`,
    /// standing in for reads taken before a concurrent writer committed.
    stale_reads: Mutex<Option<State>>,
    miss_next_profile_read: AtomicBool,
}

fn newest_first<T: Clone>(items: impl DoubleEndedIterator<Item = T>, key: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut out: Vec<T> = items.rev().collect();
    out.sort_by(|a, b| key(b).cmp(&key(a)));
    out
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent withdrawal commit fail after validation.
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Pins pre-commit wallet and day-count reads to the current state.
    /// Later writes only show up inside `commit_withdrawal`.
    pub async fn freeze_precheck_reads(&self) {
        let snapshot = self.state.lock().await.clone();
        *self.stale_reads.lock().await = Some(snapshot);
    }

    /// The next `find_profile` reports no profile, as if another request
    /// created it right after the read.
    pub fn miss_next_profile_read(&self) {
        self.miss_next_profile_read.store(true, Ordering::SeqCst);
    }

    pub async fn set_wallet_balance(&self, wallet_id: Uuid, balance: Decimal) {
        let mut state = self.state.lock().await;
        if let Some(wallet) = state.wallets.iter_mut().find(|w| w.id == wallet_id) {
            wallet.balance = balance;
        }
    }

    pub async fn remove_wallet(&self, wallet_id: Uuid) {
        self.state.lock().await.wallets.retain(|w| w.id != wallet_id);
    }

    async fn precheck_view(&self) -> State {
        if let Some(snapshot) = self.stale_reads.lock().await.as_ref() {
            return snapshot.clone();
        }
        self.state.lock().await.clone()
    }

    pub async fn seed_account(
        &self,
        user_id: &str,
        balance: Decimal
    ) -> (user_profile::Model, wallet::Model) {
        let (mut profile, mut wallet) = self
            .create_account(user_id, &format!("{}@example.com", user_id), Utc::now()).await
            .unwrap();

        let mut state = self.state.lock().await;
        profile.balance = balance;
        wallet.balance = balance;
        state.profiles.insert(user_id.to_string(), profile.clone());
        if let Some(stored) = state.wallets.iter_mut().find(|w| w.id == wallet.id) {
            stored.balance = balance;
        }

        (profile, wallet)
    }

    pub async fn set_withdrawal_config(&self, config: withdrawal_config::Model) {
        self.state.lock().await.withdrawal_config = Some(config);
    }

    pub async fn set_exchange_rate(&self, rate: Decimal) {
        self.state.lock().await.app_config = Some(app_config::Model {
            id: MAIN_CONFIG_ID.to_string(),
            cop_exchange_rate: rate,
            updated_at: Utc::now(),
        });
    }

    pub async fn add_network(&self, name: &str, address: &str, kind: DepositKind) -> deposit_network::Model {
        let network = deposit_network::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            address: address.to_string(),
            qr_code_url: None,
            kind: kind.as_str().to_string(),
            created_at: Utc::now(),
        };
        self.state.lock().await.networks.push(network.clone());
        network
    }

    pub async fn push_withdrawal(&self, request: withdrawal_request::Model) {
        self.state.lock().await.withdrawals.push(request);
    }

    pub async fn wallet(&self, id: Uuid) -> wallet::Model {
        let state = self.state.lock().await;
        state.wallets
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .unwrap()
    }

    pub async fn profile(&self, user_id: &str) -> user_profile::Model {
        self.state.lock().await.profiles.get(user_id).cloned().unwrap()
    }

    pub async fn withdrawal_count(&self) -> usize {
        self.state.lock().await.withdrawals.len()
    }

    pub async fn transaction_count(&self) -> usize {
        self.state.lock().await.transactions.len()
    }
}

#[async_trait]
impl WalletStore for MemoryStore {
    async fn find_profile(&self, user_id: &str) -> Result<Option<user_profile::Model>> {
        if self.miss_next_profile_read.swap(false, Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self.state.lock().await.profiles.get(user_id).cloned())
    }

    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        now: DateTime<Utc>
    ) -> Result<(user_profile::Model, wallet::Model)> {
        let mut state = self.state.lock().await;

        if state.profiles.contains_key(user_id) {
            return Err(AppError::Database(DbErr::Custom(format!("duplicate profile {}", user_id))));
        }

        let profile = user_profile::Model {
            id: user_id.to_string(),
            email: email.to_string(),
            balance: Decimal::ZERO,
            withdrawal_nequi: None,
            nequi_owner_name: None,
            withdrawal_usdt_bep20: None,
            created_at: now,
            updated_at: now,
        };
        let wallet = wallet::Model {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: "Main".to_string(),
            balance: Decimal::ZERO,
            created_at: now,
        };

        state.profiles.insert(user_id.to_string(), profile.clone());
        state.wallets.push(wallet.clone());

        Ok((profile, wallet))
    }

    async fn update_payout_details(
        &self,
        user_id: &str,
        details: PayoutDetails,
        now: DateTime<Utc>
    ) -> Result<user_profile::Model> {
        let mut state = self.state.lock().await;
        let profile = state.profiles.get_mut(user_id).ok_or(AppError::UserNotFound)?;

        match details {
            PayoutDetails::Nequi { phone, owner_name } => {
                profile.withdrawal_nequi = phone;
                profile.nequi_owner_name = owner_name;
            }
            PayoutDetails::UsdtBep20 { address } => {
                profile.withdrawal_usdt_bep20 = address;
            }
        }
        profile.updated_at = now;

        Ok(profile.clone())
    }

    async fn main_wallet(&self, user_id: &str) -> Result<Option<wallet::Model>> {
        let state = self.precheck_view().await;
        Ok(
            state.wallets
                .iter()
                .filter(|w| w.user_id == user_id)
                .min_by_key(|w| w.created_at)
                .cloned()
        )
    }

    async fn wallet_transactions(
        &self,
        wallet_id: Uuid,
        limit: Option<u64>
    ) -> Result<Vec<wallet_transaction::Model>> {
        let state = self.state.lock().await;
        let mut items = newest_first(
            state.transactions.iter().filter(|t| t.wallet_id == wallet_id).cloned(),
            |t| t.created_at
        );
        if let Some(limit) = limit {
            items.truncate(limit as usize);
        }
        Ok(items)
    }

    async fn withdrawal_config(&self) -> Result<Option<withdrawal_config::Model>> {
        Ok(self.state.lock().await.withdrawal_config.clone())
    }

    async fn app_config(&self) -> Result<Option<app_config::Model>> {
        Ok(self.state.lock().await.app_config.clone())
    }

    async fn count_withdrawals_on_day(&self, user_id: &str, day: &str) -> Result<u64> {
        let state = self.precheck_view().await;
        Ok(
            state.withdrawals
                .iter()
                .filter(|w| w.user_id == user_id && w.request_day == day)
                .count() as u64
        )
    }

    async fn find_withdrawal_by_key(
        &self,
        user_id: &str,
        idempotency_key: Uuid
    ) -> Result<Option<withdrawal_request::Model>> {
        let state = self.state.lock().await;
        Ok(
            state.withdrawals
                .iter()
                .find(|w| w.user_id == user_id && w.idempotency_key == idempotency_key)
                .cloned()
        )
    }

    async fn commit_withdrawal(&self, withdrawal: NewWithdrawal) -> Result<CommitOutcome> {
        let mut state = self.state.lock().await;

        // Work on a copy; it only replaces the real state on success
        let mut next = state.clone();

        let Some(wallet) = next.wallets
            .iter_mut()
            .find(|w| w.id == withdrawal.wallet_id && w.user_id == withdrawal.user_id) else {
            return Ok(CommitOutcome::Rejected(CommitRejection::WalletMissing));
        };

        if
            let Some(existing) = state.withdrawals
                .iter()
                .find(|w| w.user_id == withdrawal.user_id && w.idempotency_key == withdrawal.idempotency_key)
        {
            return Ok(CommitOutcome::Replayed(existing.clone()));
        }

        let same_day = state.withdrawals
            .iter()
            .filter(|w| w.user_id == withdrawal.user_id && w.request_day == withdrawal.request_day)
            .count() as u64;
        if same_day >= withdrawal.daily_limit {
            return Ok(CommitOutcome::Rejected(CommitRejection::DailyLimitReached { count: same_day }));
        }

        if wallet.balance < withdrawal.total_amount {
            return Ok(
                CommitOutcome::Rejected(CommitRejection::InsufficientFunds {
                    balance: wallet.balance,
                })
            );
        }
        wallet.balance -= withdrawal.total_amount;

        if let Some(profile) = next.profiles.get_mut(&withdrawal.user_id) {
            profile.balance -= withdrawal.total_amount;
            profile.updated_at = withdrawal.created_at;
        }

        let transaction = withdrawal.transaction_model();
        let request = withdrawal.request_model();
        next.transactions.push(transaction.clone());
        next.withdrawals.push(request.clone());

        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(AppError::Database(DbErr::Custom("connection reset during commit".to_string())));
        }

        *state = next;
        Ok(CommitOutcome::Created { request, transaction })
    }

    async fn withdrawal_requests(&self, user_id: &str) -> Result<Vec<withdrawal_request::Model>> {
        let state = self.state.lock().await;
        Ok(
            newest_first(
                state.withdrawals.iter().filter(|w| w.user_id == user_id).cloned(),
                |w| w.created_at
            )
        )
    }

    async fn deposit_networks(&self, kind: Option<DepositKind>) -> Result<Vec<deposit_network::Model>> {
        let state = self.state.lock().await;
        let mut networks: Vec<_> = state.networks
            .iter()
            .filter(|n| kind.map_or(true, |k| n.kind == k.as_str()))
            .cloned()
            .collect();
        networks.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(networks)
    }

    async fn find_deposit_network(&self, id: Uuid) -> Result<Option<deposit_network::Model>> {
        let state = self.state.lock().await;
        Ok(state.networks.iter().find(|n| n.id == id).cloned())
    }

    async fn insert_deposit_request(&self, deposit: NewDepositRequest) -> Result<deposit_request::Model> {
        let model = deposit.into_model(Uuid::new_v4());
        self.state.lock().await.deposits.push(model.clone());
        Ok(model)
    }

    async fn deposit_requests(&self, user_id: &str) -> Result<Vec<deposit_request::Model>> {
        let state = self.state.lock().await;
        Ok(
            newest_first(
                state.deposits.iter().filter(|d| d.user_id == user_id).cloned(),
                |d| d.created_at
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::PayoutRail;
    use rust_decimal_macros::dec;

    fn withdrawal(wallet: &wallet::Model, amount: Decimal, daily_limit: u64) -> NewWithdrawal {
        NewWithdrawal {
            request_id: Uuid::new_v4(),
            transaction_id: Uuid::new_v4(),
            idempotency_key: Uuid::new_v4(),
            user_id: wallet.user_id.clone(),
            user_email: format!("{}@example.com", wallet.user_id),
            wallet_id: wallet.id,
            rail: PayoutRail::UsdtBep20,
            wallet_address: "0xabc".to_string(),
            nequi_owner_name: None,
            total_amount: amount,
            fee_amount: amount * dec!(0.05),
            net_amount: amount * dec!(0.95),
            request_day: "2024-01-01".to_string(),
            daily_limit,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_second_commit_cannot_overdraw() {
        let store = MemoryStore::new();
        let (_, wallet) = store.seed_account("user-1", dec!(100)).await;

        let first = store.commit_withdrawal(withdrawal(&wallet, dec!(60), 3)).await.unwrap();
        assert!(matches!(first, CommitOutcome::Created { .. }));

        let second = store.commit_withdrawal(withdrawal(&wallet, dec!(60), 3)).await.unwrap();
        assert_eq!(
            second,
            CommitOutcome::Rejected(CommitRejection::InsufficientFunds { balance: dec!(40) })
        );

        assert_eq!(store.wallet(wallet.id).await.balance, dec!(40));
        assert_eq!(store.profile("user-1").await.balance, dec!(40));
        assert_eq!(store.withdrawal_count().await, 1);
        assert_eq!(store.transaction_count().await, 1);
    }

    #[tokio::test]
    async fn test_commit_recounts_same_day_requests() {
        let store = MemoryStore::new();
        let (_, wallet) = store.seed_account("user-1", dec!(100)).await;

        let first = store.commit_withdrawal(withdrawal(&wallet, dec!(10), 1)).await.unwrap();
        assert!(matches!(first, CommitOutcome::Created { .. }));

        let second = store.commit_withdrawal(withdrawal(&wallet, dec!(10), 1)).await.unwrap();
        assert_eq!(second, CommitOutcome::Rejected(CommitRejection::DailyLimitReached { count: 1 }));

        assert_eq!(store.wallet(wallet.id).await.balance, dec!(90));
        assert_eq!(store.withdrawal_count().await, 1);
        assert_eq!(store.transaction_count().await, 1);
    }

    #[tokio::test]
    async fn test_commit_against_missing_wallet_writes_nothing() {
        let store = MemoryStore::new();
        let (_, wallet) = store.seed_account("user-1", dec!(100)).await;
        store.remove_wallet(wallet.id).await;

        let outcome = store.commit_withdrawal(withdrawal(&wallet, dec!(10), 3)).await.unwrap();

        assert_eq!(outcome, CommitOutcome::Rejected(CommitRejection::WalletMissing));
        assert_eq!(store.withdrawal_count().await, 0);
        assert_eq!(store.profile("user-1").await.balance, dec!(100));
    }
}
