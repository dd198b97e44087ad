//! Unit, currency and image conversion

use super::{file_name, read_input, write_output};
use anyhow::{bail, Context};
use convert_core::{
    categories, convert, find_currency, format_amount, format_value, parse_value, Category,
    ExchangeRates,
};
use image_convert::{convert_batch, ConvertOptions, ImageRsCodec, InputImage};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
pub struct UnitResult {
    pub category: Category,
    pub value: f64,
    pub from: &'static str,
    pub to: &'static str,
    pub result: f64,
    pub formatted: String,
}

impl fmt::Display for UnitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} = {} {}",
            format_value(self.value),
            self.from,
            self.formatted,
            self.to
        )
    }
}

/// The first category that has both units
fn category_of(from: &str, to: &str) -> anyhow::Result<Category> {
    categories()
        .find(|c| c.unit(from).is_ok() && c.unit(to).is_ok())
        .map(|c| c.category)
        .with_context(|| format!("No category has both '{}' and '{}'", from, to))
}

pub fn convert_unit(
    value: &str,
    from: &str,
    to: &str,
    category: Option<Category>,
) -> anyhow::Result<UnitResult> {
    let category = match category {
        Some(category) => category,
        None => category_of(from, to)?,
    };
    let definition = category.definition();
    let from = definition.unit(from)?.id;
    let to = definition.unit(to)?.id;

    let value = parse_value(value)?;
    let result = convert(category, value, from, to)?;

    Ok(UnitResult {
        category,
        value,
        from,
        to,
        result,
        formatted: format_value(result),
    })
}

#[derive(Debug, Serialize)]
pub struct CurrencyResult {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub result: f64,
    pub formatted: String,
    pub rates_updated_at: String,
}

impl fmt::Display for CurrencyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = find_currency(&self.to).map_or("", |c| c.symbol);
        write!(
            f,
            "{} {} = {}{} {} (1 {} = {} {})",
            format_amount(self.amount),
            self.from,
            symbol,
            self.formatted,
            self.to,
            self.from,
            format_amount(self.rate),
            self.to
        )
    }
}

pub fn convert_currency(
    rates: &ExchangeRates,
    amount: &str,
    from: &str,
    to: &str,
) -> anyhow::Result<CurrencyResult> {
    let amount = parse_value(amount)?;
    let rate = rates.cross_rate(from, to)?;
    let result = rates.convert(amount, from, to)?;

    Ok(CurrencyResult {
        amount,
        from: from.trim().to_ascii_uppercase(),
        to: to.trim().to_ascii_uppercase(),
        rate,
        result,
        formatted: format_amount(result),
        rates_updated_at: rates.updated_at().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct ImageResult {
    pub converted: Vec<ConvertedRow>,
    pub failed: Vec<FailedRow>,
}

#[derive(Debug, Serialize)]
pub struct ConvertedRow {
    pub source: String,
    pub output: PathBuf,
    pub original_size: usize,
    pub converted_size: usize,
}

#[derive(Debug, Serialize)]
pub struct FailedRow {
    pub source: String,
    pub error: String,
}

impl fmt::Display for ImageResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::new();
        for row in &self.converted {
            lines.push(format!(
                "{} -> {} ({} bytes)",
                row.source,
                row.output.display(),
                row.converted_size
            ));
        }
        for row in &self.failed {
            lines.push(format!("{} failed: {}", row.source, row.error));
        }
        f.write_str(&lines.join("\n"))
    }
}

/// Convert every input; one failure never stops the others.
pub fn convert_images(
    inputs: &[PathBuf],
    options: ConvertOptions,
    output_dir: &Path,
) -> anyhow::Result<ImageResult> {
    let files = inputs
        .iter()
        .map(|path| Ok(InputImage::new(file_name(path), None, read_input(path)?)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let report = convert_batch(&ImageRsCodec, &files, options, |done, total| {
        tracing::info!("converted {}/{}", done, total);
    })?;

    let mut result = ImageResult {
        converted: Vec::with_capacity(report.converted.len()),
        failed: report
            .failed
            .into_iter()
            .map(|f| FailedRow {
                source: f.name,
                error: f.error,
            })
            .collect(),
    };

    for image in report.converted {
        let output = output_dir.join(&image.output_name);
        write_output(&output, &image.bytes)?;
        result.converted.push(ConvertedRow {
            source: image.source_name,
            output,
            original_size: image.original_size,
            converted_size: image.converted_size,
        });
    }

    Ok(result)
}

/// Fail the command when any image failed, after the successes were written
pub fn check_images(result: &ImageResult) -> anyhow::Result<()> {
    if !result.failed.is_empty() {
        bail!(
            "{} of {} images failed to convert",
            result.failed.len(),
            result.failed.len() + result.converted.len()
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct UnitListing {
    pub categories: Vec<CategoryListing>,
}

#[derive(Debug, Serialize)]
pub struct CategoryListing {
    pub id: &'static str,
    pub name: &'static str,
    pub base_unit: &'static str,
    pub units: Vec<UnitEntry>,
}

#[derive(Debug, Serialize)]
pub struct UnitEntry {
    pub id: &'static str,
    pub name: &'static str,
}

impl fmt::Display for UnitListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, category) in self.categories.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{} ({})", category.name, category.id)?;
            for unit in &category.units {
                let marker = if unit.id == category.base_unit { " *" } else { "" };
                writeln!(f, "  {:<6} {}{}", unit.id, unit.name, marker)?;
            }
        }
        Ok(())
    }
}

/// Units of one category, or of all of them
pub fn list_units(category: Option<Category>) -> UnitListing {
    UnitListing {
        categories: categories()
            .filter(|c| category.map_or(true, |wanted| wanted == c.category))
            .map(|c| CategoryListing {
                id: c.category.id(),
                name: c.name,
                base_unit: c.base_unit,
                units: c
                    .units
                    .iter()
                    .map(|u| UnitEntry {
                        id: u.id,
                        name: u.name,
                    })
                    .collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_convert::{OutputFormat, Quality};
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_convert_unit_infers_category() {
        let result = convert_unit("100", "C", "F", None).unwrap();
        assert_eq!(result.category, Category::Temperature);
        assert_eq!(result.formatted, "212");
        assert_eq!(result.to_string(), "100 C = 212 F");
    }

    #[test]
    fn test_convert_unit_errors() {
        assert!(convert_unit("1", "m", "kg", None).is_err());
        assert!(convert_unit("abc", "m", "ft", None).is_err());
        assert!(convert_unit("1", "m", "ft", Some(Category::Weight)).is_err());
    }

    #[test]
    fn test_convert_currency() {
        let rates = ExchangeRates::reference();
        let result = convert_currency(&rates, "100", "usd", "eur").unwrap();
        assert_eq!(result.formatted, "85");
        assert_eq!(result.to, "EUR");
        assert!(result.to_string().starts_with("100 USD = €85 EUR"));
        assert!(convert_currency(&rates, "1", "USD", "XYZ").is_err());
    }

    #[test]
    fn test_list_units() {
        assert_eq!(list_units(None).categories.len(), 6);
        let length = list_units(Some(Category::Length));
        assert_eq!(length.categories.len(), 1);
        assert!(length.to_string().contains("m "));
    }

    #[test]
    fn test_convert_images_keeps_going() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("dot.png");
        let bad = dir.path().join("broken.png");
        image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 128, 255, 255]))
            .save(&good)
            .unwrap();
        fs::write(&bad, "nope").unwrap();

        let options = ConvertOptions {
            format: OutputFormat::Bmp,
            quality: Quality::DEFAULT,
        };
        let result = convert_images(&[bad, good], options, dir.path()).unwrap();

        assert_eq!(result.converted.len(), 1);
        assert_eq!(result.converted[0].output, dir.path().join("dot.bmp"));
        assert!(dir.path().join("dot.bmp").exists());
        assert_eq!(result.failed[0].source, "broken.png");
        assert!(check_images(&result).is_err());
    }
}
