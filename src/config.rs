use std::env;
use std::time::Duration;

use chrono::FixedOffset;
use rust_decimal::Decimal;

/// Colombia has no daylight saving, so a fixed offset is exact.
const DEFAULT_BUSINESS_UTC_OFFSET: &str = "-05:00";
const DEFAULT_EXCHANGE_RATE: &str = "4000";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Timezone used for request-day strings and the withdrawal window.
    pub business_utc_offset: FixedOffset,
    /// COP per USD used when the app config row has no usable rate.
    pub default_exchange_rate: Decimal,
    pub window_check_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenv::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()?;

        let offset_str = env::var("BUSINESS_UTC_OFFSET")
            .unwrap_or_else(|_| DEFAULT_BUSINESS_UTC_OFFSET.to_string());
        let business_utc_offset = Self::parse_utc_offset(&offset_str)?;

        let default_exchange_rate: Decimal = env::var("DEFAULT_EXCHANGE_RATE")
            .unwrap_or_else(|_| DEFAULT_EXCHANGE_RATE.to_string())
            .parse()?;

        if default_exchange_rate <= Decimal::ZERO {
            return Err("DEFAULT_EXCHANGE_RATE must be greater than zero".into());
        }

        let interval_secs: u64 = env::var("WINDOW_CHECK_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()?;

        if interval_secs == 0 {
            return Err("WINDOW_CHECK_INTERVAL_SECS must be at least 1".into());
        }

        Ok(Config {
            database_url,
            server_host,
            server_port,
            business_utc_offset,
            default_exchange_rate,
            window_check_interval: Duration::from_secs(interval_secs),
        })
    }

    /// Parses `+HH:MM` / `-HH:MM`.
    pub fn parse_utc_offset(value: &str) -> Result<FixedOffset, Box<dyn std::error::Error>> {
        let value = value.trim();
        let (sign, rest) = match value.chars().next() {
            Some('+') => (1, &value[1..]),
            Some('-') => (-1, &value[1..]),
            _ => {
                return Err("BUSINESS_UTC_OFFSET must look like +HH:MM or -HH:MM".into());
            }
        };

        let (hours, minutes) = rest
            .split_once(':')
            .ok_or("BUSINESS_UTC_OFFSET must look like +HH:MM or -HH:MM")?;
        // The leading character is the only sign allowed
        let all_digits = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());
        if !all_digits(hours) || !all_digits(minutes) {
            return Err("BUSINESS_UTC_OFFSET must look like +HH:MM or -HH:MM".into());
        }

        let hours: u32 = hours.parse()?;
        let minutes: u32 = minutes.parse()?;

        if hours > 23 || minutes > 59 {
            return Err("BUSINESS_UTC_OFFSET is out of range".into());
        }

        let seconds = (hours * 3600 + minutes * 60) as i32;
        FixedOffset::east_opt(sign * seconds).ok_or_else(||
            "BUSINESS_UTC_OFFSET is out of range".into()
        )
    }
}
