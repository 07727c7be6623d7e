//! USD/COP conversion and locale-style money formatting.
//!
//! Stored amounts are USD. COP only exists at the edges: user input on the
//! Nequi rail and display strings.

use rust_decimal::{ Decimal, RoundingStrategy };

use crate::db::entity::app_config;
use crate::enums::Currency;
use crate::error::{ AppError, Result };

/// Options for [`CurrencyConverter::format`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Target currency; the converter's display currency when `None`.
    pub currency: Option<Currency>,
    /// The value is already COP and must not be multiplied by the rate.
    pub value_in_source_currency: bool,
    /// Overrides the currency's default fraction digits.
    pub fraction_digits: Option<u32>,
}

impl FormatOptions {
    pub fn currency(currency: Currency) -> Self {
        Self {
            currency: Some(currency),
            ..Self::default()
        }
    }

    pub fn in_source_currency(mut self) -> Self {
        self.value_in_source_currency = true;
        self
    }

    pub fn fraction_digits(mut self, digits: u32) -> Self {
        self.fraction_digits = Some(digits);
        self
    }
}

/// Number layout for a currency, mirroring en-US and es-CO conventions.
struct Layout {
    prefix: &'static str,
    group: char,
    decimal: char,
}

impl Layout {
    fn for_currency(currency: Currency) -> Self {
        match currency {
            Currency::Usd => Layout { prefix: "$", group: ',', decimal: '.' },
            // es-CO puts a no-break space between symbol and digits
            Currency::Cop => Layout { prefix: "$\u{a0}", group: '.', decimal: ',' },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrencyConverter {
    exchange_rate: Decimal,
    display_currency: Currency,
}

impl CurrencyConverter {
    /// `exchange_rate` is COP per USD and must be positive.
    pub fn new(exchange_rate: Decimal) -> Result<Self> {
        if exchange_rate <= Decimal::ZERO {
            return Err(AppError::InvalidInput("Exchange rate must be greater than zero".to_string()));
        }

        Ok(Self {
            exchange_rate,
            display_currency: Currency::Usd,
        })
    }

    /// Uses the admin-managed rate, falling back when the row is missing or
    /// holds a non-positive value.
    pub fn from_app_config(config: Option<&app_config::Model>, fallback_rate: Decimal) -> Self {
        let exchange_rate = config
            .map(|c| c.cop_exchange_rate)
            .filter(|rate| *rate > Decimal::ZERO)
            .unwrap_or(fallback_rate);

        Self {
            exchange_rate,
            display_currency: Currency::Usd,
        }
    }

    pub fn with_display_currency(mut self, currency: Currency) -> Self {
        self.display_currency = currency;
        self
    }

    pub fn exchange_rate(&self) -> Decimal {
        self.exchange_rate
    }

    pub fn display_currency(&self) -> Currency {
        self.display_currency
    }

    /// Converts an amount expressed in `from` to USD.
    pub fn to_usd(&self, amount: Decimal, from: Currency) -> Decimal {
        match from {
            Currency::Usd => amount,
            Currency::Cop => amount / self.exchange_rate,
        }
    }

    /// Converts a USD amount to `to`.
    pub fn from_usd(&self, amount_usd: Decimal, to: Currency) -> Decimal {
        match to {
            Currency::Usd => amount_usd,
            Currency::Cop => amount_usd * self.exchange_rate,
        }
    }

    /// Formats `value` for display. `value` is USD unless the options say
    /// it is already in the (COP) target currency.
    pub fn format(&self, value: Decimal, options: FormatOptions) -> String {
        let currency = options.currency.unwrap_or(self.display_currency);

        let value = if options.value_in_source_currency && currency == Currency::Cop {
            value
        } else {
            self.from_usd(value, currency)
        };

        let digits = options.fraction_digits.unwrap_or_else(|| currency.default_fraction_digits());
        format_money(value, currency, digits)
    }

    /// Shorthand for a USD value shown in `currency`.
    pub fn format_usd_in(&self, value_usd: Decimal, currency: Currency) -> String {
        self.format(value_usd, FormatOptions::currency(currency))
    }
}

/// Renders `value` (already in `currency`) with grouping and symbol.
pub fn format_money(value: Decimal, currency: Currency, fraction_digits: u32) -> String {
    let layout = Layout::for_currency(currency);
    let rounded = value.round_dp_with_strategy(fraction_digits, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let plain = format!("{:.*}", fraction_digits as usize, rounded.abs());
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (plain.as_str(), None),
    };

    let mut out = String::with_capacity(plain.len() + 8);
    if negative {
        out.push('-');
    }
    out.push_str(layout.prefix);
    out.push_str(&group_digits(int_part, layout.group));

    if let Some(frac) = frac_part.filter(|f| !f.is_empty()) {
        out.push(layout.decimal);
        out.push_str(frac);
    }

    out
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn converter() -> CurrencyConverter {
        CurrencyConverter::new(dec!(4000)).unwrap()
    }

    #[test]
    fn test_usd_value_is_converted_for_cop() {
        let formatted = converter().format(dec!(1), FormatOptions::currency(Currency::Cop));
        assert_eq!(formatted, "$\u{a0}4.000");
    }

    #[test]
    fn test_source_currency_value_is_not_reconverted() {
        let formatted = converter().format(
            dec!(4000),
            FormatOptions::currency(Currency::Cop).in_source_currency()
        );
        assert_eq!(formatted, "$\u{a0}4.000");
    }

    #[test]
    fn test_source_flag_is_ignored_for_usd() {
        let formatted = converter().format(
            dec!(12.5),
            FormatOptions::currency(Currency::Usd).in_source_currency()
        );
        assert_eq!(formatted, "$12.50");
    }

    #[test]
    fn test_usd_layout() {
        let c = converter();
        assert_eq!(c.format(dec!(1234.5), FormatOptions::default()), "$1,234.50");
        assert_eq!(c.format(dec!(1234567.891), FormatOptions::default()), "$1,234,567.89");
        assert_eq!(c.format(dec!(0), FormatOptions::default()), "$0.00");
        assert_eq!(c.format(dec!(-20), FormatOptions::default()), "-$20.00");
        assert_eq!(c.format(dec!(-0.001), FormatOptions::default()), "$0.00");
    }

    #[test]
    fn test_cop_rounds_half_away_from_zero() {
        let c = converter();
        let opts = FormatOptions::currency(Currency::Cop).in_source_currency();
        assert_eq!(c.format(dec!(1500.5), opts), "$\u{a0}1.501");
        assert_eq!(c.format(dec!(999.4), opts), "$\u{a0}999");
        assert_eq!(c.format(dec!(1234567), opts), "$\u{a0}1.234.567");
    }

    #[test]
    fn test_fraction_digit_override() {
        let c = converter();
        assert_eq!(c.format(dec!(19.5), FormatOptions::currency(Currency::Usd).fraction_digits(0)), "$20");
        assert_eq!(
            c.format(dec!(1), FormatOptions::currency(Currency::Cop).fraction_digits(2)),
            "$\u{a0}4.000,00"
        );
    }

    #[test]
    fn test_display_currency_is_the_default_target() {
        let c = converter().with_display_currency(Currency::Cop);
        assert_eq!(c.format(dec!(2), FormatOptions::default()), "$\u{a0}8.000");
        assert_eq!(c.format_usd_in(dec!(2), Currency::Usd), "$2.00");
    }

    #[test]
    fn test_conversion_helpers() {
        let c = converter();
        assert_eq!(c.to_usd(dec!(80000), Currency::Cop), dec!(20));
        assert_eq!(c.to_usd(dec!(20), Currency::Usd), dec!(20));
        assert_eq!(c.from_usd(dec!(19), Currency::Cop), dec!(76000));
    }

    #[test]
    fn test_rate_falls_back_when_config_is_unusable() {
        let row = app_config::Model {
            id: "main".to_string(),
            cop_exchange_rate: dec!(0),
            updated_at: chrono::Utc::now(),
        };
        assert_eq!(CurrencyConverter::from_app_config(Some(&row), dec!(4000)).exchange_rate(), dec!(4000));
        assert_eq!(CurrencyConverter::from_app_config(None, dec!(3900)).exchange_rate(), dec!(3900));

        let row = app_config::Model { cop_exchange_rate: dec!(4150.25), ..row };
        assert_eq!(CurrencyConverter::from_app_config(Some(&row), dec!(4000)).exchange_rate(), dec!(4150.25));
        assert!(CurrencyConverter::new(dec!(-1)).is_err());
    }
}
