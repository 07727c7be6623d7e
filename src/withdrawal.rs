//! Withdrawal fee math and the pre-submission guards.
//!
//! Everything here is pure: the service feeds in the profile, wallet and
//! admin settings it loaded and decides what to do with the result.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::currency::CurrencyConverter;
use crate::db::entity::withdrawal_config;
use crate::enums::PayoutRail;
use crate::error::{ AppError, Result };

/// Admin-managed amounts that drive the fee and the guards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WithdrawalSettings {
    /// Fraction in `[0, 1)`.
    pub fee_percentage: Decimal,
    /// USD.
    pub min_withdrawal: Decimal,
    pub daily_limit: u64,
}

impl WithdrawalSettings {
    pub fn from_config(config: &withdrawal_config::Model) -> Result<Self> {
        if config.fee_percentage < Decimal::ZERO || config.fee_percentage >= Decimal::ONE {
            return Err(AppError::Config(format!("Fee percentage {} is outside [0, 1)", config.fee_percentage)));
        }

        Ok(Self {
            fee_percentage: config.fee_percentage,
            min_withdrawal: config.min_withdrawal,
            daily_limit: u64::try_from(config.daily_limit).unwrap_or(0),
        })
    }
}

/// Gross, fee and net of one withdrawal, all in USD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WithdrawalBreakdown {
    pub rail: PayoutRail,
    /// As typed, in the rail's display currency.
    pub entered: Decimal,
    pub amount_usd: Decimal,
    pub fee_usd: Decimal,
    pub net_usd: Decimal,
}

impl WithdrawalBreakdown {
    pub fn compute(
        rail: PayoutRail,
        entered: Decimal,
        fee_percentage: Decimal,
        exchange_rate: Decimal
    ) -> Self {
        let amount_usd = rail.to_usd(entered, exchange_rate);
        let fee_usd = amount_usd * fee_percentage;

        Self {
            rail,
            entered,
            amount_usd,
            fee_usd,
            net_usd: amount_usd - fee_usd,
        }
    }

    /// Checks run before anything is read from or written to the store,
    /// in order: positive amount, minimum, balance, payout address.
    pub fn validate(
        &self,
        settings: &WithdrawalSettings,
        wallet_balance: Decimal,
        payout_address: Option<&str>,
        converter: &CurrencyConverter
    ) -> Result<()> {
        let currency = self.rail.display_currency();

        if self.entered <= Decimal::ZERO {
            return Err(AppError::AmountNotPositive);
        }

        if self.amount_usd < settings.min_withdrawal {
            return Err(AppError::BelowMinimum {
                minimum: converter.format_usd_in(settings.min_withdrawal, currency),
            });
        }

        if self.amount_usd > wallet_balance {
            return Err(AppError::InsufficientFunds {
                balance: converter.format_usd_in(wallet_balance, currency),
            });
        }

        if payout_address.is_none() {
            return Err(AppError::MissingPayoutAddress(self.rail));
        }

        Ok(())
    }
}
