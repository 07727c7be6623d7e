pub mod config;
pub mod enums;
pub mod error;
pub mod clock;
pub mod currency;
pub mod schedule;
pub mod withdrawal;
pub mod db;
pub mod services;
pub mod api;
pub mod scheduler;

pub use config::Config;
pub use enums::{ Currency, DepositKind, PayoutRail, RequestStatus };
pub use error::{ AppError, Result };
