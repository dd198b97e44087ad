//! Unit converter form bindings

use crate::session::to_js_value;
use convert_core::{categories, Category, ConverterState};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// One `<option>` of a unit or category select
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub id: &'static str,
    pub name: &'static str,
}

/// Two-field unit converter. Every edit returns the recomputed state.
#[wasm_bindgen]
#[derive(Default)]
pub struct UnitConverter {
    state: ConverterState,
}

#[wasm_bindgen]
impl UnitConverter {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// `{ category, from_unit, to_unit, from_value, to_value }`
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.state)
    }

    #[wasm_bindgen(js_name = setCategory)]
    pub fn set_category(&mut self, category: &str) -> Result<JsValue, JsValue> {
        let category: Category = category
            .parse()
            .map_err(|e: convert_core::ConversionError| JsValue::from_str(&e.to_string()))?;
        self.state.set_category(category);
        self.get_state()
    }

    #[wasm_bindgen(js_name = setFromValue)]
    pub fn set_from_value(&mut self, text: &str) -> Result<JsValue, JsValue> {
        self.state.set_from_value(text);
        self.get_state()
    }

    #[wasm_bindgen(js_name = setToValue)]
    pub fn set_to_value(&mut self, text: &str) -> Result<JsValue, JsValue> {
        self.state.set_to_value(text);
        self.get_state()
    }

    #[wasm_bindgen(js_name = setFromUnit)]
    pub fn set_from_unit(&mut self, unit: &str) -> Result<JsValue, JsValue> {
        self.state
            .set_from_unit(unit)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.get_state()
    }

    #[wasm_bindgen(js_name = setToUnit)]
    pub fn set_to_unit(&mut self, unit: &str) -> Result<JsValue, JsValue> {
        self.state
            .set_to_unit(unit)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.get_state()
    }

    #[wasm_bindgen(js_name = swapUnits)]
    pub fn swap_units(&mut self) -> Result<JsValue, JsValue> {
        self.state.swap_units();
        self.get_state()
    }

    /// Units of the current category, in display order
    #[wasm_bindgen(js_name = getUnits)]
    pub fn get_units(&self) -> Result<JsValue, JsValue> {
        to_js_value(&unit_options(self.state.category()))
    }
}

pub(crate) fn unit_options(category: Category) -> Vec<SelectOption> {
    category
        .definition()
        .units
        .iter()
        .map(|unit| SelectOption {
            id: unit.id,
            name: unit.name,
        })
        .collect()
}

pub(crate) fn category_options() -> Vec<SelectOption> {
    categories()
        .map(|c| SelectOption {
            id: c.category.id(),
            name: c.name,
        })
        .collect()
}

/// Every category, for the category select
#[wasm_bindgen(js_name = getCategories)]
pub fn get_categories() -> Result<JsValue, JsValue> {
    to_js_value(&category_options())
}
