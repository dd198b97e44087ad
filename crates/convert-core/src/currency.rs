//! Currency conversion against a USD-relative rate table
//!
//! Rates are "units of currency per 1 USD". Converting A → B multiplies by
//! `rate[B] / rate[A]`. The built-in table is a fixed reference snapshot;
//! callers can override individual rates (e.g. from a config file).

use crate::engine::parse_value;
use crate::error::ConversionError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Currency {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

const fn currency(code: &'static str, name: &'static str, symbol: &'static str) -> Currency {
    Currency { code, name, symbol }
}

/// Currencies offered by the converter, in display order
pub static CURRENCIES: [Currency; 15] = [
    currency("USD", "US Dollar", "$"),
    currency("EUR", "Euro", "€"),
    currency("GBP", "British Pound", "£"),
    currency("JPY", "Japanese Yen", "¥"),
    currency("CAD", "Canadian Dollar", "C$"),
    currency("AUD", "Australian Dollar", "A$"),
    currency("CHF", "Swiss Franc", "CHF"),
    currency("CNY", "Chinese Yuan", "¥"),
    currency("INR", "Indian Rupee", "₹"),
    currency("KRW", "South Korean Won", "₩"),
    currency("MXN", "Mexican Peso", "$"),
    currency("BRL", "Brazilian Real", "R$"),
    currency("RUB", "Russian Ruble", "₽"),
    currency("SGD", "Singapore Dollar", "S$"),
    currency("NZD", "New Zealand Dollar", "NZ$"),
];

const REFERENCE_RATES: [(&str, f64); 15] = [
    ("USD", 1.0),
    ("EUR", 0.85),
    ("GBP", 0.73),
    ("JPY", 110.12),
    ("CAD", 1.25),
    ("AUD", 1.35),
    ("CHF", 0.92),
    ("CNY", 6.45),
    ("INR", 74.83),
    ("KRW", 1180.50),
    ("MXN", 20.15),
    ("BRL", 5.20),
    ("RUB", 73.25),
    ("SGD", 1.35),
    ("NZD", 1.42),
];

pub fn find_currency(code: &str) -> Option<&'static Currency> {
    CURRENCIES
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRates {
    rates: BTreeMap<String, f64>,
    updated_at: DateTime<Utc>,
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self::reference()
    }
}

impl ExchangeRates {
    /// The built-in reference table, stamped with the current time
    pub fn reference() -> Self {
        Self {
            rates: REFERENCE_RATES
                .iter()
                .map(|&(code, rate)| (code.to_string(), rate))
                .collect(),
            updated_at: Utc::now(),
        }
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn rate(&self, code: &str) -> Result<f64, ConversionError> {
        self.rates
            .get(&code.trim().to_ascii_uppercase())
            .copied()
            .ok_or_else(|| ConversionError::UnknownCurrency(code.to_string()))
    }

    /// Set the per-USD rate of `code`. Rates must be finite and positive.
    pub fn set_rate(&mut self, code: &str, rate: f64) -> Result<(), ConversionError> {
        let code = code.trim().to_ascii_uppercase();
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ConversionError::InvalidRate { code, rate });
        }
        tracing::debug!(code = %code, rate, "exchange rate set");
        self.rates.insert(code, rate);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Apply a batch of overrides; stops at the first invalid rate
    pub fn with_overrides<'a>(
        mut self,
        overrides: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Result<Self, ConversionError> {
        for (code, rate) in overrides {
            self.set_rate(code, rate)?;
        }
        Ok(self)
    }

    /// Units of `to` per one unit of `from`
    pub fn cross_rate(&self, from: &str, to: &str) -> Result<f64, ConversionError> {
        Ok(self.rate(to)? / self.rate(from)?)
    }

    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
        if !amount.is_finite() {
            return Err(ConversionError::InvalidInput(amount.to_string()));
        }
        let result = amount * self.cross_rate(from, to)?;
        if !result.is_finite() {
            return Err(ConversionError::InvalidInput(format!(
                "{} {} does not convert to a finite {}",
                amount, from, to
            )));
        }
        Ok(result)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }
}

/// Six decimal places with trailing zeros (and a bare dot) removed
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.6}", amount);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Two-field currency form, mirroring [`crate::ConverterState`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyState {
    from_currency: String,
    to_currency: String,
    from_amount: String,
    to_amount: String,
}

impl CurrencyState {
    /// USD → EUR starting at 1
    pub fn new(rates: &ExchangeRates) -> Self {
        let mut state = Self {
            from_currency: "USD".to_string(),
            to_currency: "EUR".to_string(),
            from_amount: "1".to_string(),
            to_amount: String::new(),
        };
        state.recompute_to(rates);
        state
    }

    pub fn from_currency(&self) -> &str {
        &self.from_currency
    }

    pub fn to_currency(&self) -> &str {
        &self.to_currency
    }

    pub fn from_amount(&self) -> &str {
        &self.from_amount
    }

    pub fn to_amount(&self) -> &str {
        &self.to_amount
    }

    pub fn set_from_amount(&mut self, rates: &ExchangeRates, text: &str) {
        self.from_amount = text.to_string();
        self.recompute_to(rates);
    }

    pub fn set_to_amount(&mut self, rates: &ExchangeRates, text: &str) {
        self.to_amount = text.to_string();
        self.from_amount = convert_amount_text(rates, text, &self.to_currency, &self.from_currency);
    }

    pub fn set_from_currency(
        &mut self,
        rates: &ExchangeRates,
        code: &str,
    ) -> Result<(), ConversionError> {
        rates.rate(code)?;
        self.from_currency = code.trim().to_ascii_uppercase();
        self.recompute_to(rates);
        Ok(())
    }

    pub fn set_to_currency(
        &mut self,
        rates: &ExchangeRates,
        code: &str,
    ) -> Result<(), ConversionError> {
        rates.rate(code)?;
        self.to_currency = code.trim().to_ascii_uppercase();
        self.recompute_to(rates);
        Ok(())
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from_currency, &mut self.to_currency);
        std::mem::swap(&mut self.from_amount, &mut self.to_amount);
    }

    fn recompute_to(&mut self, rates: &ExchangeRates) {
        self.to_amount =
            convert_amount_text(rates, &self.from_amount, &self.from_currency, &self.to_currency);
    }
}

fn convert_amount_text(rates: &ExchangeRates, text: &str, from: &str, to: &str) -> String {
    parse_value(text)
        .and_then(|amount| rates.convert(amount, from, to))
        .map(format_amount)
        .unwrap_or_default()
}
