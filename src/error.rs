use thiserror::Error;

use crate::enums::PayoutRail;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")] Database(#[from] sea_orm::DbErr),

    #[error("Invalid input: {0}")] InvalidInput(String),

    #[error("Not found: {0}")] NotFound(String),

    #[error("User profile not found")]
    UserNotFound,

    #[error("Wallet not found")]
    WalletNotFound,

    #[error("Withdrawal amount must be greater than zero")]
    AmountNotPositive,

    #[error("Amount is below the minimum withdrawal of {minimum}")] BelowMinimum {
        minimum: String,
    },

    #[error("Insufficient funds, balance is {balance}")] InsufficientFunds {
        balance: String,
    },

    #[error("No payout address configured for {0}")] MissingPayoutAddress(PayoutRail),

    #[error("Daily withdrawal limit of {limit} requests reached")] DailyLimitReached {
        limit: u64,
    },

    #[error("Withdrawals closed: {0}")] WithdrawalsClosed(String),

    #[error("Withdrawals are not configured")]
    WithdrawalsNotConfigured,

    #[error("Submission failed: {0}")] SubmissionFailed(String),

    #[error("Configuration error: {0}")] Config(String),

    #[error("Internal error: {0}")] Internal(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Shape a client turns into a notification: severity comes from the
/// HTTP status, `title` and `message` from here.
#[derive(serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::WalletNotFound => "WALLET_NOT_FOUND",
            AppError::AmountNotPositive => "AMOUNT_NOT_POSITIVE",
            AppError::BelowMinimum { .. } => "BELOW_MINIMUM",
            AppError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            AppError::MissingPayoutAddress(_) => "MISSING_PAYOUT_ADDRESS",
            AppError::DailyLimitReached { .. } => "DAILY_LIMIT_REACHED",
            AppError::WithdrawalsClosed(_) => "WITHDRAWALS_CLOSED",
            AppError::WithdrawalsNotConfigured => "WITHDRAWALS_NOT_CONFIGURED",
            AppError::SubmissionFailed(_) => "SUBMISSION_FAILED",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        let (title, message, field) = match self {
            // Store and submission details stay in the logs
            AppError::Database(_) =>
                ("Error", "The request could not be processed.".to_string(), None),
            AppError::SubmissionFailed(_) =>
                ("Error", "The request could not be submitted. Please try again.".to_string(), None),
            AppError::InvalidInput(msg) => ("Error", msg.clone(), None),
            AppError::NotFound(msg) => ("Not found", msg.clone(), None),
            AppError::UserNotFound => ("Not found", "User profile not found".to_string(), None),
            AppError::WalletNotFound => ("Not found", "Wallet not found".to_string(), None),
            AppError::AmountNotPositive =>
                (
                    "Invalid amount",
                    "Enter an amount greater than zero.".to_string(),
                    Some("amount".to_string()),
                ),
            AppError::BelowMinimum { minimum } =>
                (
                    "Amount too low",
                    format!("The minimum withdrawal is {}.", minimum),
                    Some("amount".to_string()),
                ),
            AppError::InsufficientFunds { balance } =>
                (
                    "Insufficient funds",
                    format!("Your balance is {}.", balance),
                    Some("amount".to_string()),
                ),
            AppError::MissingPayoutAddress(rail) =>
                (
                    "Error",
                    format!("No withdrawal address is configured for {}.", rail.display_name()),
                    Some(rail.profile_field().to_string()),
                ),
            AppError::DailyLimitReached { .. } =>
                ("Limit reached", "You have reached your withdrawal limit for today.".to_string(), None),
            AppError::WithdrawalsClosed(msg) => ("Withdrawals closed", msg.clone(), None),
            AppError::WithdrawalsNotConfigured =>
                (
                    "Unavailable",
                    "Withdrawals are not configured by the administrator at this time.".to_string(),
                    None,
                ),
            AppError::Config(msg) => ("Error", msg.clone(), None),
            AppError::Internal(msg) => ("Error", msg.clone(), None),
        };

        ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                title: title.to_string(),
                message,
                field,
            },
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::NotFound(_) | AppError::UserNotFound | AppError::WalletNotFound => {
                axum::http::StatusCode::NOT_FOUND
            }
            | AppError::InvalidInput(_)
            | AppError::AmountNotPositive
            | AppError::BelowMinimum { .. }
            | AppError::MissingPayoutAddress(_) => {
                axum::http::StatusCode::BAD_REQUEST
            }
            AppError::InsufficientFunds { .. } | AppError::DailyLimitReached { .. } => {
                axum::http::StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::WithdrawalsClosed(_) => axum::http::StatusCode::FORBIDDEN,
            AppError::WithdrawalsNotConfigured => axum::http::StatusCode::SERVICE_UNAVAILABLE,
            _ => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        }

        let response = self.to_error_response();
        (status, axum::Json(response)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_validation_errors_have_distinct_codes() {
        let errors = [
            AppError::AmountNotPositive,
            AppError::BelowMinimum { minimum: "$10.00".to_string() },
            AppError::InsufficientFunds { balance: "$100.00".to_string() },
            AppError::MissingPayoutAddress(PayoutRail::Nequi),
            AppError::DailyLimitReached { limit: 3 },
        ];

        let mut codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_submission_failure_is_generic() {
        let err = AppError::SubmissionFailed("connection reset by peer".to_string());
        let response = err.to_error_response();

        assert_eq!(response.error.code, "SUBMISSION_FAILED");
        assert!(!response.error.message.contains("connection reset"));
    }

    #[test]
    fn test_status_mapping() {
        let status = |e: AppError| e.into_response().status();

        assert_eq!(status(AppError::WalletNotFound), axum::http::StatusCode::NOT_FOUND);
        assert_eq!(status(AppError::AmountNotPositive), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(
            status(AppError::DailyLimitReached { limit: 3 }),
            axum::http::StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status(AppError::WithdrawalsClosed("closed".to_string())),
            axum::http::StatusCode::FORBIDDEN
        );
        assert_eq!(
            status(AppError::Internal("boom".to_string())),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_missing_address_points_at_profile_field() {
        let response = AppError::MissingPayoutAddress(PayoutRail::UsdtBep20).to_error_response();
        assert_eq!(response.error.field.as_deref(), Some("withdrawal_usdt_bep20"));
    }
}
