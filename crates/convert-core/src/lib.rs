//! Unit and currency conversion
//!
//! - [`units`]: the static category/unit table
//! - [`engine`]: `convert`, rounding and number formatting
//! - [`state`]: the two-field unit converter form
//! - [`currency`]: USD-relative exchange rates and the currency form

pub mod currency;
pub mod engine;
pub mod error;
pub mod state;
pub mod units;

pub use currency::{find_currency, format_amount, Currency, CurrencyState, ExchangeRates, CURRENCIES};
pub use engine::{convert, convert_text, format_value, parse_value, round_significant};
pub use error::ConversionError;
pub use state::ConverterState;
pub use units::{categories, Category, MeasurementCategory, UnitDefinition};
