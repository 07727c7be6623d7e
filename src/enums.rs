use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{ Deserialize, Serialize };

use crate::db::entity::user_profile;
use crate::error::AppError;

// ─── Currency ────────────────────────────────────────────────────────

/// Display currencies. Balances are always stored in USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "COP")]
    Cop,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Cop => "COP",
        }
    }

    /// Fraction digits shown when no explicit precision is requested.
    pub fn default_fraction_digits(&self) -> u32 {
        match self {
            Currency::Usd => 2,
            Currency::Cop => 0,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "COP" => Ok(Currency::Cop),
            _ => Err(AppError::InvalidInput(format!("Unsupported currency: {}. Supported: USD, COP", s))),
        }
    }
}

// ─── PayoutRail ──────────────────────────────────────────────────────

/// Withdrawal destinations. Everything that differs between rails is
/// answered here so call sites never branch on the rail name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayoutRail {
    #[serde(rename = "Nequi")]
    Nequi,
    #[serde(rename = "USDT_BEP20")]
    UsdtBep20,
}

impl PayoutRail {
    /// Canonical string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutRail::Nequi => "Nequi",
            PayoutRail::UsdtBep20 => "USDT_BEP20",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PayoutRail::Nequi => "Nequi (COP)",
            PayoutRail::UsdtBep20 => "USDT BEP-20 (USD)",
        }
    }

    /// Currency the user types amounts in for this rail.
    pub fn display_currency(&self) -> Currency {
        match self {
            PayoutRail::Nequi => Currency::Cop,
            PayoutRail::UsdtBep20 => Currency::Usd,
        }
    }

    /// Name of the profile field holding the payout address.
    pub fn profile_field(&self) -> &'static str {
        match self {
            PayoutRail::Nequi => "withdrawal_nequi",
            PayoutRail::UsdtBep20 => "withdrawal_usdt_bep20",
        }
    }

    /// Configured payout address, if any. Blank values count as missing.
    pub fn payout_address<'a>(&self, profile: &'a user_profile::Model) -> Option<&'a str> {
        let value = match self {
            PayoutRail::Nequi => profile.withdrawal_nequi.as_deref(),
            PayoutRail::UsdtBep20 => profile.withdrawal_usdt_bep20.as_deref(),
        };

        value.map(str::trim).filter(|v| !v.is_empty())
    }

    /// Account holder name sent along with the request. Only Nequi has one.
    pub fn owner_name(&self, profile: &user_profile::Model) -> Option<String> {
        match self {
            PayoutRail::Nequi => profile.nequi_owner_name.clone(),
            PayoutRail::UsdtBep20 => None,
        }
    }

    /// Converts an amount entered in this rail's currency to USD.
    pub fn to_usd(&self, entered: Decimal, exchange_rate: Decimal) -> Decimal {
        match self.display_currency() {
            Currency::Cop => entered / exchange_rate,
            Currency::Usd => entered,
        }
    }
}

impl fmt::Display for PayoutRail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── DepositKind ─────────────────────────────────────────────────────

/// Deposit network category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositKind {
    Crypto,
    Fiat,
}

impl DepositKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepositKind::Crypto => "crypto",
            DepositKind::Fiat => "fiat",
        }
    }

    /// Currency deposited amounts are declared in.
    pub fn currency(&self) -> Currency {
        match self {
            DepositKind::Crypto => Currency::Usd,
            DepositKind::Fiat => Currency::Cop,
        }
    }
}

impl fmt::Display for DepositKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DepositKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "crypto" => Ok(DepositKind::Crypto),
            "fiat" => Ok(DepositKind::Fiat),
            _ => Err(AppError::InvalidInput(format!("Invalid deposit network kind: {}. Supported: crypto, fiat", s))),
        }
    }
}

// ─── RequestStatus ───────────────────────────────────────────────────

/// Lifecycle of withdrawal/deposit requests and their transactions.
/// Only `Pending` is written here; the rest belong to the admin process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn profile() -> user_profile::Model {
        user_profile::Model {
            id: "user-1".to_string(),
            email: "user@example.com".to_string(),
            balance: dec!(0),
            withdrawal_nequi: Some("3001234567".to_string()),
            nequi_owner_name: Some("Ana Gómez".to_string()),
            withdrawal_usdt_bep20: Some("   ".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_rail_conversion_direction() {
        let rate = dec!(4000);
        assert_eq!(PayoutRail::Nequi.to_usd(dec!(80000), rate), dec!(20));
        assert_eq!(PayoutRail::UsdtBep20.to_usd(dec!(80000), rate), dec!(80000));
    }

    #[test]
    fn test_rail_payout_address_treats_blank_as_missing() {
        let profile = profile();
        assert_eq!(PayoutRail::Nequi.payout_address(&profile), Some("3001234567"));
        assert_eq!(PayoutRail::UsdtBep20.payout_address(&profile), None);
        assert_eq!(PayoutRail::Nequi.owner_name(&profile).as_deref(), Some("Ana Gómez"));
        assert_eq!(PayoutRail::UsdtBep20.owner_name(&profile), None);
    }

    #[test]
    fn test_parse_wire_names() {
        assert!("EUR".parse::<Currency>().is_err());
        assert_eq!("cop".parse::<Currency>().unwrap(), Currency::Cop);
        assert_eq!("FIAT".parse::<DepositKind>().unwrap(), DepositKind::Fiat);
    }

    #[test]
    fn test_serde_uses_wire_names() {
        assert_eq!(serde_json::to_string(&PayoutRail::UsdtBep20).unwrap(), "\"USDT_BEP20\"");
        assert_eq!(serde_json::to_string(&Currency::Cop).unwrap(), "\"COP\"");
        assert_eq!(serde_json::to_string(&DepositKind::Crypto).unwrap(), "\"crypto\"");
    }
}
