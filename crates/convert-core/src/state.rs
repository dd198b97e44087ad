//! Two-field converter state
//!
//! Holds what a converter form shows: a category, a unit on each side and
//! the text of both value fields. Editing either field recomputes the
//! other through [`convert_text`].

use crate::engine::convert_text;
use crate::error::ConversionError;
use crate::units::Category;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConverterState {
    category: Category,
    from_unit: &'static str,
    to_unit: &'static str,
    from_value: String,
    to_value: String,
}

impl Default for ConverterState {
    /// Length, metres to feet, starting at 1
    fn default() -> Self {
        let mut state = Self {
            category: Category::Length,
            from_unit: "m",
            to_unit: "ft",
            from_value: "1".to_string(),
            to_value: String::new(),
        };
        state.recompute_to();
        state
    }
}

impl ConverterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start on `category` with its first two units selected
    pub fn for_category(category: Category) -> Self {
        let mut state = Self::default();
        state.set_category(category);
        state
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn from_unit(&self) -> &'static str {
        self.from_unit
    }

    pub fn to_unit(&self) -> &'static str {
        self.to_unit
    }

    pub fn from_value(&self) -> &str {
        &self.from_value
    }

    pub fn to_value(&self) -> &str {
        &self.to_value
    }

    pub fn set_from_value(&mut self, text: &str) {
        self.from_value = text.to_string();
        self.recompute_to();
    }

    pub fn set_to_value(&mut self, text: &str) {
        self.to_value = text.to_string();
        self.from_value = convert_text(self.category, text, self.to_unit, self.from_unit);
    }

    pub fn set_from_unit(&mut self, unit: &str) -> Result<(), ConversionError> {
        self.from_unit = self.category.definition().unit(unit)?.id;
        self.recompute_to();
        Ok(())
    }

    pub fn set_to_unit(&mut self, unit: &str) -> Result<(), ConversionError> {
        self.to_unit = self.category.definition().unit(unit)?.id;
        self.recompute_to();
        Ok(())
    }

    /// Exchange the units and the two field values
    pub fn swap_units(&mut self) {
        std::mem::swap(&mut self.from_unit, &mut self.to_unit);
        std::mem::swap(&mut self.from_value, &mut self.to_value);
    }

    /// Switch category, selecting its first two units and a value of 1
    pub fn set_category(&mut self, category: Category) {
        let units = category.definition().units;
        self.category = category;
        self.from_unit = units[0].id;
        self.to_unit = units.get(1).unwrap_or(&units[0]).id;
        self.from_value = "1".to_string();
        self.recompute_to();
    }

    fn recompute_to(&mut self) {
        self.to_value = convert_text(self.category, &self.from_value, self.from_unit, self.to_unit);
    }
}
