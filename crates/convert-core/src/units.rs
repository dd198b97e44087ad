//! Measurement categories and their units
//!
//! Every category converts through a single base unit: a value is first
//! mapped into the base with [`UnitDefinition::to_base`] and then out of it
//! with [`UnitDefinition::from_base`]. The table is static and never
//! changes at runtime.

use crate::error::ConversionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use Transform::{Divide, Identity, Multiply};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Length,
    Weight,
    Temperature,
    Area,
    Volume,
    Speed,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Length,
        Category::Weight,
        Category::Temperature,
        Category::Area,
        Category::Volume,
        Category::Speed,
    ];

    /// Lowercase identifier used on the command line and in JS
    pub fn id(&self) -> &'static str {
        match self {
            Category::Length => "length",
            Category::Weight => "weight",
            Category::Temperature => "temperature",
            Category::Area => "area",
            Category::Volume => "volume",
            Category::Speed => "speed",
        }
    }

    pub fn definition(&self) -> &'static MeasurementCategory {
        match self {
            Category::Length => &LENGTH,
            Category::Weight => &WEIGHT,
            Category::Temperature => &TEMPERATURE,
            Category::Area => &AREA,
            Category::Volume => &VOLUME,
            Category::Speed => &SPEED,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.definition().name)
    }
}

impl FromStr for Category {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConversionError::UnknownCategory(s.to_string()))
    }
}

/// How a unit maps onto its category's base unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Identity,
    /// base = value × factor
    Multiply(f64),
    /// base = value ÷ divisor
    Divide(f64),
    /// base is Celsius: (value − 32) × 5/9
    Fahrenheit,
    /// base is Celsius: value − 273.15
    Kelvin,
}

const KELVIN_OFFSET: f64 = 273.15;

impl Transform {
    pub fn to_base(&self, value: f64) -> f64 {
        match *self {
            Transform::Identity => value,
            Transform::Multiply(factor) => value * factor,
            Transform::Divide(divisor) => value / divisor,
            Transform::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            Transform::Kelvin => value - KELVIN_OFFSET,
        }
    }

    pub fn from_base(&self, base: f64) -> f64 {
        match *self {
            Transform::Identity => base,
            Transform::Multiply(factor) => base / factor,
            Transform::Divide(divisor) => base * divisor,
            Transform::Fahrenheit => base * 9.0 / 5.0 + 32.0,
            Transform::Kelvin => base + KELVIN_OFFSET,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub transform: Transform,
}

impl UnitDefinition {
    const fn new(id: &'static str, name: &'static str, transform: Transform) -> Self {
        Self {
            id,
            name,
            transform,
        }
    }

    pub fn to_base(&self, value: f64) -> f64 {
        self.transform.to_base(value)
    }

    pub fn from_base(&self, value: f64) -> f64 {
        self.transform.from_base(value)
    }
}

#[derive(Debug)]
pub struct MeasurementCategory {
    pub category: Category,
    pub name: &'static str,
    pub base_unit: &'static str,
    /// In display order; ids are unique within the category
    pub units: &'static [UnitDefinition],
}

impl MeasurementCategory {
    pub fn unit(&self, id: &str) -> Result<&'static UnitDefinition, ConversionError> {
        self.units
            .iter()
            .find(|unit| unit.id == id)
            .ok_or_else(|| ConversionError::UnknownUnit {
                category: self.name.to_string(),
                unit: id.to_string(),
            })
    }

    pub fn base(&self) -> &'static UnitDefinition {
        // base_unit always names an entry of units (checked in tests)
        self.units
            .iter()
            .find(|unit| unit.id == self.base_unit)
            .unwrap_or(&self.units[0])
    }

    pub fn unit_ids(&self) -> impl Iterator<Item = &'static str> {
        self.units.iter().map(|unit| unit.id)
    }
}

static LENGTH: MeasurementCategory = MeasurementCategory {
    category: Category::Length,
    name: "Length",
    base_unit: "m",
    units: &[
        UnitDefinition::new("mm", "Millimeters", Divide(1000.0)),
        UnitDefinition::new("cm", "Centimeters", Divide(100.0)),
        UnitDefinition::new("m", "Meters", Identity),
        UnitDefinition::new("km", "Kilometers", Multiply(1000.0)),
        UnitDefinition::new("in", "Inches", Multiply(0.0254)),
        UnitDefinition::new("ft", "Feet", Multiply(0.3048)),
        UnitDefinition::new("yd", "Yards", Multiply(0.9144)),
        UnitDefinition::new("mi", "Miles", Multiply(1609.344)),
    ],
};

static WEIGHT: MeasurementCategory = MeasurementCategory {
    category: Category::Weight,
    name: "Weight",
    base_unit: "kg",
    units: &[
        UnitDefinition::new("mg", "Milligrams", Divide(1_000_000.0)),
        UnitDefinition::new("g", "Grams", Divide(1000.0)),
        UnitDefinition::new("kg", "Kilograms", Identity),
        UnitDefinition::new("oz", "Ounces", Multiply(0.0283495)),
        UnitDefinition::new("lb", "Pounds", Multiply(0.453592)),
        UnitDefinition::new("ton", "Tons", Multiply(1000.0)),
    ],
};

static TEMPERATURE: MeasurementCategory = MeasurementCategory {
    category: Category::Temperature,
    name: "Temperature",
    base_unit: "C",
    units: &[
        UnitDefinition::new("C", "Celsius", Identity),
        UnitDefinition::new("F", "Fahrenheit", Transform::Fahrenheit),
        UnitDefinition::new("K", "Kelvin", Transform::Kelvin),
    ],
};

static AREA: MeasurementCategory = MeasurementCategory {
    category: Category::Area,
    name: "Area",
    base_unit: "m2",
    units: &[
        UnitDefinition::new("mm2", "Square Millimeters", Divide(1_000_000.0)),
        UnitDefinition::new("cm2", "Square Centimeters", Divide(10_000.0)),
        UnitDefinition::new("m2", "Square Meters", Identity),
        UnitDefinition::new("ha", "Hectares", Multiply(10_000.0)),
        UnitDefinition::new("km2", "Square Kilometers", Multiply(1_000_000.0)),
        UnitDefinition::new("in2", "Square Inches", Multiply(0.00064516)),
        UnitDefinition::new("ft2", "Square Feet", Multiply(0.092903)),
        UnitDefinition::new("acre", "Acres", Multiply(4046.86)),
    ],
};

static VOLUME: MeasurementCategory = MeasurementCategory {
    category: Category::Volume,
    name: "Volume",
    base_unit: "l",
    units: &[
        UnitDefinition::new("ml", "Milliliters", Divide(1000.0)),
        UnitDefinition::new("l", "Liters", Identity),
        UnitDefinition::new("gal", "Gallons (US)", Multiply(3.78541)),
        UnitDefinition::new("qt", "Quarts", Multiply(0.946353)),
        UnitDefinition::new("pt", "Pints", Multiply(0.473176)),
        UnitDefinition::new("cup", "Cups", Multiply(0.236588)),
        UnitDefinition::new("floz", "Fluid Ounces", Multiply(0.0295735)),
    ],
};

static SPEED: MeasurementCategory = MeasurementCategory {
    category: Category::Speed,
    name: "Speed",
    base_unit: "ms",
    units: &[
        UnitDefinition::new("ms", "Meters per Second", Identity),
        UnitDefinition::new("kmh", "Kilometers per Hour", Divide(3.6)),
        UnitDefinition::new("mph", "Miles per Hour", Multiply(0.44704)),
        UnitDefinition::new("kn", "Knots", Multiply(0.514444)),
        UnitDefinition::new("fps", "Feet per Second", Multiply(0.3048)),
    ],
};

/// All categories in display order
pub fn categories() -> impl Iterator<Item = &'static MeasurementCategory> {
    Category::ALL.into_iter().map(|c| c.definition())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_category_has_identity_base() {
        for category in categories() {
            let base = category.unit(category.base_unit).unwrap();
            assert_eq!(base.transform, Identity, "{}", category.name);
            assert_eq!(category.base().id, category.base_unit);
        }
    }

    #[test]
    fn test_unit_ids_unique_per_category() {
        for category in categories() {
            let ids: HashSet<_> = category.unit_ids().collect();
            assert_eq!(ids.len(), category.units.len(), "{}", category.name);
        }
    }

    #[test]
    fn test_definition_points_back_to_category() {
        for category in Category::ALL {
            assert_eq!(category.definition().category, category);
        }
    }

    #[test]
    fn test_unit_counts() {
        let counts: Vec<usize> = categories().map(|c| c.units.len()).collect();
        assert_eq!(counts, vec![8, 6, 3, 8, 7, 5]);
    }

    #[test]
    fn test_unknown_unit() {
        let err = Category::Length.definition().unit("furlong").unwrap_err();
        assert_eq!(
            err,
            ConversionError::UnknownUnit {
                category: "Length".into(),
                unit: "furlong".into()
            }
        );
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("length".parse::<Category>().unwrap(), Category::Length);
        assert_eq!(" Speed ".parse::<Category>().unwrap(), Category::Speed);
        assert!("mass".parse::<Category>().is_err());
    }

    #[test]
    fn test_temperature_transforms() {
        let f = Category::Temperature.definition().unit("F").unwrap();
        assert_eq!(f.to_base(212.0), 100.0);
        assert_eq!(f.from_base(100.0), 212.0);
        assert_eq!(f.to_base(-40.0), -40.0);

        let k = Category::Temperature.definition().unit("K").unwrap();
        assert_eq!(k.to_base(273.15), 0.0);
        assert_eq!(k.from_base(0.0), 273.15);
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Temperature).unwrap();
        assert_eq!(json, "\"temperature\"");
    }
}
