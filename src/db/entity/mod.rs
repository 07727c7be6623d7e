pub mod user_profile;
pub mod wallet;
pub mod wallet_transaction;
pub mod withdrawal_request;
pub mod deposit_request;
pub mod deposit_network;
pub mod withdrawal_config;
pub mod app_config;

pub use user_profile::Entity as UserProfile;
pub use wallet::Entity as Wallet;
pub use wallet_transaction::Entity as WalletTransaction;
pub use withdrawal_request::Entity as WithdrawalRequest;
pub use deposit_request::Entity as DepositRequest;
pub use deposit_network::Entity as DepositNetwork;
pub use withdrawal_config::Entity as WithdrawalConfig;
pub use app_config::Entity as AppConfig;
