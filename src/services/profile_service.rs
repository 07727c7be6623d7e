use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::clock::BusinessCalendar;
use crate::db::entity::{ user_profile, wallet, wallet_transaction };
use crate::db::{ PayoutDetails, WalletStore };
use crate::enums::Currency;
use crate::error::{ AppError, Result };
use crate::services::RateService;

#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub profile: user_profile::Model,
    pub wallet: wallet::Model,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceView {
    pub wallet_id: Uuid,
    pub balance_usd: Decimal,
    pub currency: Currency,
    pub exchange_rate: Decimal,
    pub formatted: String,
}

pub struct ProfileService {
    store: Arc<dyn WalletStore>,
    calendar: BusinessCalendar,
    rates: Arc<RateService>,
}

/// Trims input and maps blank strings to "not set".
fn normalize(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl ProfileService {
    pub fn new(store: Arc<dyn WalletStore>, calendar: BusinessCalendar, rates: Arc<RateService>) -> Self {
        Self { store, calendar, rates }
    }

    /// Get or create the profile and its main wallet.
    pub async fn ensure_account(&self, user_id: &str, email: &str) -> Result<Account> {
        if user_id.trim().is_empty() {
            return Err(AppError::InvalidInput("user_id is required".to_string()));
        }

        if let Some(profile) = self.store.find_profile(user_id).await? {
            let wallet = self.store.main_wallet(user_id).await?.ok_or(AppError::WalletNotFound)?;
            return Ok(Account { profile, wallet });
        }

        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::InvalidInput("email is required to create an account".to_string()));
        }

        let (profile, wallet) = match self.store.create_account(user_id, email, self.calendar.now_utc()).await {
            Ok(created) => created,
            Err(e) => {
                // A concurrent first call may have inserted the profile in between
                let Some(profile) = self.store.find_profile(user_id).await? else {
                    return Err(e);
                };
                tracing::debug!(user_id, "Account created concurrently, returning it");
                let wallet = self.store.main_wallet(user_id).await?.ok_or(AppError::WalletNotFound)?;
                return Ok(Account { profile, wallet });
            }
        };
        tracing::info!(user_id, wallet_id = %wallet.id, "Created account");

        Ok(Account { profile, wallet })
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<user_profile::Model> {
        self.store.find_profile(user_id).await?.ok_or(AppError::UserNotFound)
    }

    pub async fn update_nequi(
        &self,
        user_id: &str,
        phone: Option<String>,
        owner_name: Option<String>
    ) -> Result<user_profile::Model> {
        let phone = normalize(phone);

        if let Some(phone) = &phone {
            if !phone.chars().all(|c| c.is_ascii_digit()) {
                return Err(AppError::InvalidInput("Nequi number must contain digits only".to_string()));
            }
        }

        let details = PayoutDetails::Nequi {
            phone,
            owner_name: normalize(owner_name),
        };

        let profile = self.store.update_payout_details(user_id, details, self.calendar.now_utc()).await?;
        tracing::info!(user_id, "Updated Nequi payout details");

        Ok(profile)
    }

    pub async fn update_usdt(&self, user_id: &str, address: Option<String>) -> Result<user_profile::Model> {
        let details = PayoutDetails::UsdtBep20 {
            address: normalize(address),
        };

        let profile = self.store.update_payout_details(user_id, details, self.calendar.now_utc()).await?;
        tracing::info!(user_id, "Updated USDT payout address");

        Ok(profile)
    }

    pub async fn balance(&self, user_id: &str, currency: Currency) -> Result<BalanceView> {
        let wallet = self.store.main_wallet(user_id).await?.ok_or(AppError::WalletNotFound)?;
        let converter = self.rates.converter().await?;

        Ok(BalanceView {
            wallet_id: wallet.id,
            balance_usd: wallet.balance,
            currency,
            exchange_rate: converter.exchange_rate(),
            formatted: converter.format_usd_in(wallet.balance, currency),
        })
    }

    pub async fn transactions(
        &self,
        user_id: &str,
        limit: Option<u64>
    ) -> Result<Vec<wallet_transaction::Model>> {
        let wallet = self.store.main_wallet(user_id).await?.ok_or(AppError::WalletNotFound)?;
        self.store.wallet_transactions(wallet.id, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::testing::FixedClock;
    use crate::db::memory::MemoryStore;
    use chrono::{ FixedOffset, TimeZone, Utc };
    use rust_decimal_macros::dec;

    fn service(store: Arc<MemoryStore>) -> ProfileService {
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 15, 0, 0).unwrap()));
        let calendar = BusinessCalendar::new(clock, FixedOffset::west_opt(5 * 3600).unwrap());
        let rates = Arc::new(RateService::new(store.clone(), dec!(4000)));
        ProfileService::new(store, calendar, rates)
    }

    #[tokio::test]
    async fn test_ensure_account_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let service = service(store.clone());

        let first = service.ensure_account("user-1", "ana@example.com").await.unwrap();
        let second = service.ensure_account("user-1", "").await.unwrap();

        assert_eq!(first.wallet.id, second.wallet.id);
        assert_eq!(second.profile.email, "ana@example.com");
        assert_eq!(second.wallet.balance, dec!(0));
    }

    #[tokio::test]
    async fn test_concurrent_first_call_returns_existing_account() {
        let store = Arc::new(MemoryStore::new());
        let (_, wallet) = store.seed_account("user-1", dec!(5)).await;
        store.miss_next_profile_read();
        let service = service(store.clone());

        let account = service.ensure_account("user-1", "user-1@example.com").await.unwrap();

        assert_eq!(account.wallet.id, wallet.id);
        assert_eq!(account.profile.balance, dec!(5));
    }

    #[tokio::test]
    async fn test_new_account_requires_email() {
        let service = service(Arc::new(MemoryStore::new()));
        assert!(matches!(service.ensure_account("user-1", "  ").await, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_payout_updates_trim_and_clear() {
        let store = Arc::new(MemoryStore::new());
        store.seed_account("user-1", dec!(0)).await;
        let service = service(store.clone());

        let profile = service
            .update_nequi("user-1", Some(" 3001234567 ".to_string()), Some("Ana Gómez".to_string())).await
            .unwrap();
        assert_eq!(profile.withdrawal_nequi.as_deref(), Some("3001234567"));
        assert_eq!(profile.nequi_owner_name.as_deref(), Some("Ana Gómez"));

        let profile = service.update_usdt("user-1", Some("0xAbC".to_string())).await.unwrap();
        assert_eq!(profile.withdrawal_usdt_bep20.as_deref(), Some("0xAbC"));
        assert_eq!(profile.withdrawal_nequi.as_deref(), Some("3001234567"));

        let profile = service.update_usdt("user-1", Some("   ".to_string())).await.unwrap();
        assert_eq!(profile.withdrawal_usdt_bep20, None);

        assert!(service.update_nequi("user-1", Some("300-123".to_string()), None).await.is_err());
        assert!(matches!(service.update_usdt("ghost", None).await, Err(AppError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_balance_in_display_currency() {
        let store = Arc::new(MemoryStore::new());
        store.seed_account("user-1", dec!(25.5)).await;
        store.set_exchange_rate(dec!(4000)).await;
        let service = service(store);

        let usd = service.balance("user-1", Currency::Usd).await.unwrap();
        assert_eq!(usd.formatted, "$25.50");

        let cop = service.balance("user-1", Currency::Cop).await.unwrap();
        assert_eq!(cop.balance_usd, dec!(25.5));
        assert_eq!(cop.formatted, "$\u{a0}102.000");
    }
}
