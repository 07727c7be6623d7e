use std::sync::Arc;

use rust_decimal::Decimal;

use crate::currency::CurrencyConverter;
use crate::db::WalletStore;
use crate::error::Result;

/// Builds converters from the live exchange rate.
pub struct RateService {
    store: Arc<dyn WalletStore>,
    fallback_rate: Decimal,
}

impl RateService {
    pub fn new(store: Arc<dyn WalletStore>, fallback_rate: Decimal) -> Self {
        Self { store, fallback_rate }
    }

    /// Reads the rate on every call so admin changes apply immediately.
    pub async fn converter(&self) -> Result<CurrencyConverter> {
        let config = self.store.app_config().await?;

        if config.is_none() {
            tracing::debug!("No app config row, using fallback rate {}", self.fallback_rate);
        }

        Ok(CurrencyConverter::from_app_config(config.as_ref(), self.fallback_rate))
    }
}
