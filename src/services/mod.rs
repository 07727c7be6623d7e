pub mod rate_service;
pub mod profile_service;
pub mod withdrawal_service;
pub mod deposit_service;

pub use rate_service::RateService;
pub use profile_service::ProfileService;
pub use withdrawal_service::WithdrawalService;
pub use deposit_service::DepositService;
