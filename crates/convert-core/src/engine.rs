//! Unit conversion
//!
//! Conversions go source unit → base unit → target unit and the result is
//! rounded to [`SIGNIFICANT_DIGITS`] significant digits, which hides the
//! floating-point noise of the round trip (`1 m → ft` is `3.2808399`, not
//! `3.280839895013123`).

use crate::error::ConversionError;
use crate::units::Category;

pub const SIGNIFICANT_DIGITS: usize = 8;

/// Convert `value` between two units of `category`.
///
/// Converting a unit to itself returns `value` unchanged.
///
/// ```
/// use convert_core::{convert, Category};
///
/// assert_eq!(convert(Category::Temperature, 100.0, "C", "F").unwrap(), 212.0);
/// assert_eq!(convert(Category::Length, 1.0, "m", "ft").unwrap(), 3.2808399);
/// ```
pub fn convert(category: Category, value: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
    let definition = category.definition();
    let from_unit = definition.unit(from)?;
    let to_unit = definition.unit(to)?;

    if !value.is_finite() {
        return Err(ConversionError::InvalidInput(value.to_string()));
    }

    if from_unit.id == to_unit.id {
        return Ok(value);
    }

    let result = to_unit.from_base(from_unit.to_base(value));
    if !result.is_finite() {
        return Err(ConversionError::InvalidInput(format!(
            "{} {} does not convert to a finite {}",
            value, from, to
        )));
    }

    Ok(round_significant(result, SIGNIFICANT_DIGITS))
}

/// Round to `digits` significant decimal digits.
///
/// Zero, non-finite values and `digits == 0` are returned as is.
pub fn round_significant(value: f64, digits: usize) -> f64 {
    if value == 0.0 || !value.is_finite() || digits == 0 {
        return value;
    }
    // Scientific notation with digits-1 fraction digits keeps exactly
    // `digits` significant digits; parsing back yields the nearest f64.
    format!("{:.*e}", digits - 1, value)
        .parse()
        .unwrap_or(value)
}

/// Parse a user-typed number. Blank, malformed and non-finite input is
/// rejected.
pub fn parse_value(text: &str) -> Result<f64, ConversionError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ConversionError::InvalidInput("empty value".to_string()));
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ConversionError::InvalidInput(trimmed.to_string())),
    }
}

/// Shortest decimal text that reads back as `value`. Negative zero prints
/// as `0`.
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

/// Text-in, text-out conversion as used by an input field pair.
///
/// Unparseable input yields an empty string so the opposite field is
/// blanked rather than showing an error.
pub fn convert_text(category: Category, text: &str, from: &str, to: &str) -> String {
    match parse_value(text).and_then(|value| convert(category, value, from, to)) {
        Ok(result) => format_value(result),
        Err(e) => {
            tracing::debug!(category = category.id(), input = text, error = %e, "blank conversion");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_points() {
        assert_eq!(convert(Category::Temperature, 0.0, "C", "F").unwrap(), 32.0);
        assert_eq!(convert(Category::Temperature, 100.0, "C", "F").unwrap(), 212.0);
        assert_eq!(convert(Category::Temperature, -40.0, "F", "C").unwrap(), -40.0);
        assert_eq!(convert(Category::Temperature, 0.0, "K", "C").unwrap(), -273.15);
        assert_eq!(convert(Category::Length, 1.0, "m", "ft").unwrap(), 3.2808399);
        assert_eq!(convert(Category::Weight, 1.0, "kg", "lb").unwrap(), 2.2046244);
        assert_eq!(convert(Category::Length, 1.0, "mi", "km").unwrap(), 1.609344);
        assert_eq!(convert(Category::Speed, 36.0, "kmh", "ms").unwrap(), 10.0);
        assert_eq!(convert(Category::Area, 1.0, "ha", "m2").unwrap(), 10000.0);
        assert_eq!(convert(Category::Volume, 1000.0, "ml", "l").unwrap(), 1.0);
    }

    #[test]
    fn test_base_identity_is_exact() {
        for category in Category::ALL {
            let base = category.definition().base_unit;
            for x in [1.0, 0.1, 123.456789012345, -40.0, 1e-12] {
                assert_eq!(convert(category, x, base, base).unwrap(), x);
            }
        }
    }

    #[test]
    fn test_unknown_unit() {
        assert!(matches!(
            convert(Category::Length, 1.0, "m", "parsec"),
            Err(ConversionError::UnknownUnit { .. })
        ));
        assert!(matches!(
            convert(Category::Length, 1.0, "kg", "m"),
            Err(ConversionError::UnknownUnit { .. })
        ));
    }

    #[test]
    fn test_non_finite_input_rejected() {
        assert!(matches!(
            convert(Category::Length, f64::NAN, "m", "ft"),
            Err(ConversionError::InvalidInput(_))
        ));
        assert!(matches!(
            convert(Category::Length, f64::INFINITY, "m", "m"),
            Err(ConversionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_overflowing_result_rejected() {
        assert!(convert(Category::Area, f64::MAX, "km2", "mm2").is_err());
    }

    #[test]
    fn test_round_significant() {
        assert_eq!(round_significant(3.280839895013123, 8), 3.2808399);
        assert_eq!(round_significant(0.000123456789, 3), 0.000123);
        assert_eq!(round_significant(-98765.4321, 4), -98770.0);
        assert_eq!(round_significant(0.0, 8), 0.0);
        assert!(round_significant(f64::NAN, 8).is_nan());
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(" 12.5 ").unwrap(), 12.5);
        assert_eq!(parse_value("-3").unwrap(), -3.0);
        assert_eq!(parse_value("1e3").unwrap(), 1000.0);
        assert!(parse_value("").is_err());
        assert!(parse_value("abc").is_err());
        assert!(parse_value("inf").is_err());
        assert!(parse_value("NaN").is_err());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(3.2808399), "3.2808399");
        assert_eq!(format_value(212.0), "212");
        assert_eq!(format_value(-0.0), "0");
        assert_eq!(format_value(0.5), "0.5");
    }

    #[test]
    fn test_convert_text_blanks_invalid_input() {
        assert_eq!(convert_text(Category::Length, "1", "m", "ft"), "3.2808399");
        assert_eq!(convert_text(Category::Length, "", "m", "ft"), "");
        assert_eq!(convert_text(Category::Length, "x", "m", "ft"), "");
        assert_eq!(convert_text(Category::Length, "1", "m", "nope"), "");
    }
}
