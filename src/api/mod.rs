use std::sync::Arc;

pub mod account;
pub mod balance;
pub mod transaction;
pub mod withdrawal;
pub mod deposit;

use crate::services::{ DepositService, ProfileService, WithdrawalService };

#[derive(Clone)]
pub struct AppState {
    pub profile_service: Arc<ProfileService>,
    pub withdrawal_service: Arc<WithdrawalService>,
    pub deposit_service: Arc<DepositService>,
}

impl AppState {
    pub fn new(
        profile_service: Arc<ProfileService>,
        withdrawal_service: Arc<WithdrawalService>,
        deposit_service: Arc<DepositService>
    ) -> Self {
        Self {
            profile_service,
            withdrawal_service,
            deposit_service,
        }
    }
}
