use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{ Deserialize, Serialize };
use uuid::Uuid;

use crate::clock::BusinessCalendar;
use crate::currency::{ format_money, FormatOptions };
use crate::db::entity::{ withdrawal_config, withdrawal_request };
use crate::db::{ CommitOutcome, CommitRejection, NewWithdrawal, WalletStore };
use crate::enums::{ Currency, PayoutRail };
use crate::error::{ AppError, Result };
use crate::schedule::{ WindowStatus, WithdrawalWindow };
use crate::services::RateService;
use crate::withdrawal::{ WithdrawalBreakdown, WithdrawalSettings };

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitWithdrawal {
    pub rail: PayoutRail,
    /// In the rail's display currency.
    pub amount: Decimal,
    pub idempotency_key: Uuid,
}

/// Fee preview shown while the user types an amount.
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalQuote {
    pub rail: PayoutRail,
    pub currency: Currency,
    pub entered: Decimal,
    pub amount_usd: Decimal,
    pub fee_usd: Decimal,
    pub net_usd: Decimal,
    pub fee_percentage: Decimal,
    pub exchange_rate: Decimal,
    pub entered_display: String,
    pub fee_display: String,
    pub net_display: String,
    pub amount_usd_display: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalReceipt {
    pub request: withdrawal_request::Model,
    /// True when the idempotency key matched an earlier submission.
    pub replayed: bool,
}

pub struct WithdrawalService {
    store: Arc<dyn WalletStore>,
    calendar: BusinessCalendar,
    rates: Arc<RateService>,
}

impl WithdrawalService {
    pub fn new(store: Arc<dyn WalletStore>, calendar: BusinessCalendar, rates: Arc<RateService>) -> Self {
        Self { store, calendar, rates }
    }

    async fn config(&self) -> Result<withdrawal_config::Model> {
        self.store.withdrawal_config().await?.ok_or(AppError::WithdrawalsNotConfigured)
    }

    fn evaluate_window(&self, config: &withdrawal_config::Model) -> Result<WindowStatus> {
        let window = WithdrawalWindow::from_config(config)?;
        Ok(window.evaluate(self.calendar.now_local().naive_local()))
    }

    /// Current state of the schedule gate.
    pub async fn window_status(&self) -> Result<WindowStatus> {
        let (_, status) = self.window().await?;
        Ok(status)
    }

    /// Configured window together with its current state.
    pub async fn window(&self) -> Result<(WithdrawalWindow, WindowStatus)> {
        let config = self.config().await?;
        let window = WithdrawalWindow::from_config(&config)?;
        let status = window.evaluate(self.calendar.now_local().naive_local());

        Ok((window, status))
    }

    pub async fn quote(&self, rail: PayoutRail, amount: Decimal) -> Result<WithdrawalQuote> {
        if amount <= Decimal::ZERO {
            return Err(AppError::AmountNotPositive);
        }

        let settings = WithdrawalSettings::from_config(&self.config().await?)?;
        let converter = self.rates.converter().await?;
        let breakdown = WithdrawalBreakdown::compute(
            rail,
            amount,
            settings.fee_percentage,
            converter.exchange_rate()
        );
        let currency = rail.display_currency();

        Ok(WithdrawalQuote {
            rail,
            currency,
            entered: amount,
            amount_usd: breakdown.amount_usd,
            fee_usd: breakdown.fee_usd,
            net_usd: breakdown.net_usd,
            fee_percentage: settings.fee_percentage,
            exchange_rate: converter.exchange_rate(),
            entered_display: converter.format(amount, FormatOptions::currency(currency).in_source_currency()),
            fee_display: converter.format_usd_in(breakdown.fee_usd, currency),
            net_display: converter.format_usd_in(breakdown.net_usd, currency),
            amount_usd_display: format_money(breakdown.amount_usd, Currency::Usd, 2),
        })
    }

    pub async fn submit(&self, user_id: &str, input: SubmitWithdrawal) -> Result<WithdrawalReceipt> {
        let profile = self.store.find_profile(user_id).await?.ok_or(AppError::UserNotFound)?;
        let wallet = self.store.main_wallet(user_id).await?.ok_or(AppError::WalletNotFound)?;

        if let Some(existing) = self.store.find_withdrawal_by_key(user_id, input.idempotency_key).await? {
            tracing::info!(user_id, request_id = %existing.id, "Replayed withdrawal submission");
            return Ok(WithdrawalReceipt { request: existing, replayed: true });
        }

        let config = self.config().await?;
        let status = self.evaluate_window(&config)?;
        if !status.is_open() {
            return Err(AppError::WithdrawalsClosed(status.describe()));
        }

        let settings = WithdrawalSettings::from_config(&config)?;
        let converter = self.rates.converter().await?;
        let breakdown = WithdrawalBreakdown::compute(
            input.rail,
            input.amount,
            settings.fee_percentage,
            converter.exchange_rate()
        );
        let address = input.rail.payout_address(&profile);
        breakdown.validate(&settings, wallet.balance, address, &converter)?;
        let address = address.ok_or(AppError::MissingPayoutAddress(input.rail))?.to_string();

        let today = self.calendar.today();
        let count = self.store.count_withdrawals_on_day(user_id, &today).await?;
        if count >= settings.daily_limit {
            return Err(AppError::DailyLimitReached { limit: settings.daily_limit });
        }

        let withdrawal = NewWithdrawal {
            request_id: Uuid::new_v4(),
            transaction_id: Uuid::new_v4(),
            idempotency_key: input.idempotency_key,
            user_id: user_id.to_string(),
            user_email: profile.email.clone(),
            wallet_id: wallet.id,
            rail: input.rail,
            wallet_address: address,
            nequi_owner_name: input.rail.owner_name(&profile),
            total_amount: breakdown.amount_usd,
            fee_amount: breakdown.fee_usd,
            net_amount: breakdown.net_usd,
            request_day: today,
            daily_limit: settings.daily_limit,
            created_at: self.calendar.now_utc(),
        };

        let outcome = match self.store.commit_withdrawal(withdrawal).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(user_id, "Withdrawal commit failed: {}", e);
                return Err(
                    AppError::SubmissionFailed("The withdrawal request could not be saved".to_string())
                );
            }
        };

        match outcome {
            CommitOutcome::Created { request, .. } => {
                tracing::info!(
                    user_id,
                    request_id = %request.id,
                    rail = %input.rail,
                    amount_usd = %request.total_amount,
                    "Withdrawal request created"
                );
                Ok(WithdrawalReceipt { request, replayed: false })
            }
            CommitOutcome::Replayed(request) => Ok(WithdrawalReceipt { request, replayed: true }),
            CommitOutcome::Rejected(CommitRejection::WalletMissing) => Err(AppError::WalletNotFound),
            CommitOutcome::Rejected(CommitRejection::InsufficientFunds { balance }) => {
                tracing::warn!(user_id, "Balance changed before commit");
                Err(AppError::InsufficientFunds {
                    balance: converter.format_usd_in(balance, input.rail.display_currency()),
                })
            }
            CommitOutcome::Rejected(CommitRejection::DailyLimitReached { count }) => {
                tracing::warn!(user_id, count, "Daily limit reached before commit");
                Err(AppError::DailyLimitReached { limit: settings.daily_limit })
            }
        }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<withdrawal_request::Model>> {
        self.store.withdrawal_requests(user_id).await
    }
}
