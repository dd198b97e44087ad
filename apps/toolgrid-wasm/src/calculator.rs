//! Calculator keypad bindings

use crate::session::to_js_value;
use calc_core::{AngleMode, CalcError, Calculator, Flavor};
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn to_js(error: CalcError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[derive(Debug, Serialize, PartialEq)]
struct CalculatorView {
    display: String,
    pending: Option<String>,
    memory: f64,
    angle_mode: AngleMode,
    history: Vec<String>,
}

/// Keypad calculator. Each key press returns the new display state.
#[wasm_bindgen]
pub struct CalculatorSession {
    calculator: Calculator,
}

#[wasm_bindgen]
impl CalculatorSession {
    #[wasm_bindgen(constructor)]
    pub fn new(scientific: bool) -> Self {
        let flavor = if scientific {
            Flavor::Scientific
        } else {
            Flavor::Basic
        };
        Self {
            calculator: Calculator::new(flavor),
        }
    }

    /// `{ display, pending, memory, angle_mode, history }`
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.view())
    }

    /// Press one key: a digit, ".", an operator ("+", "×", "=", "mod"),
    /// a function name ("sin", "sqrt"), "pi", "ms"/"mr"/"m+", "c", "ce" or "del"
    pub fn press(&mut self, key: &str) -> Result<JsValue, JsValue> {
        self.press_internal(key).map_err(to_js)?;
        self.get_state()
    }

    /// "deg", "rad" or "grad"
    #[wasm_bindgen(js_name = setAngleMode)]
    pub fn set_angle_mode(&mut self, mode: &str) -> Result<JsValue, JsValue> {
        let mode = parse_angle_mode(mode).map_err(to_js)?;
        self.calculator.set_angle_mode(mode);
        self.get_state()
    }

    #[wasm_bindgen(js_name = clearHistory)]
    pub fn clear_history(&mut self) -> Result<JsValue, JsValue> {
        self.calculator.clear_history();
        self.get_state()
    }
}

impl CalculatorSession {
    fn press_internal(&mut self, key: &str) -> Result<(), CalcError> {
        self.calculator.press(key.trim().parse()?)
    }

    fn view(&self) -> CalculatorView {
        CalculatorView {
            display: self.calculator.display().to_string(),
            pending: self.calculator.pending_expression(),
            memory: self.calculator.memory(),
            angle_mode: self.calculator.angle_mode(),
            history: self.calculator.history().map(str::to_string).collect(),
        }
    }
}

fn parse_angle_mode(mode: &str) -> Result<AngleMode, CalcError> {
    match mode.trim().to_ascii_lowercase().as_str() {
        "deg" => Ok(AngleMode::Deg),
        "rad" => Ok(AngleMode::Rad),
        "grad" => Ok(AngleMode::Grad),
        other => Err(CalcError::InvalidInput(format!("unknown angle mode '{}'", other))),
    }
}
