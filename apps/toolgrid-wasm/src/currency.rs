//! Currency converter form bindings

use crate::session::to_js_value;
use convert_core::{ConversionError, CurrencyState, ExchangeRates, CURRENCIES};
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn to_js(error: ConversionError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[derive(Debug, Serialize)]
struct CurrencyView<'a> {
    from_currency: &'a str,
    to_currency: &'a str,
    from_amount: &'a str,
    to_amount: &'a str,
    rate: Option<f64>,
    updated_at: String,
}

/// Two-field currency converter over the reference rate table
#[wasm_bindgen]
pub struct CurrencyConverter {
    rates: ExchangeRates,
    state: CurrencyState,
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        let rates = ExchangeRates::reference();
        let state = CurrencyState::new(&rates);
        Self { rates, state }
    }
}

#[wasm_bindgen]
impl CurrencyConverter {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// `{ from_currency, to_currency, from_amount, to_amount, rate, updated_at }`
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.view())
    }

    #[wasm_bindgen(js_name = setFromAmount)]
    pub fn set_from_amount(&mut self, text: &str) -> Result<JsValue, JsValue> {
        self.state.set_from_amount(&self.rates, text);
        self.get_state()
    }

    #[wasm_bindgen(js_name = setToAmount)]
    pub fn set_to_amount(&mut self, text: &str) -> Result<JsValue, JsValue> {
        self.state.set_to_amount(&self.rates, text);
        self.get_state()
    }

    #[wasm_bindgen(js_name = setFromCurrency)]
    pub fn set_from_currency(&mut self, code: &str) -> Result<JsValue, JsValue> {
        self.state
            .set_from_currency(&self.rates, code)
            .map_err(to_js)?;
        self.get_state()
    }

    #[wasm_bindgen(js_name = setToCurrency)]
    pub fn set_to_currency(&mut self, code: &str) -> Result<JsValue, JsValue> {
        self.state.set_to_currency(&self.rates, code).map_err(to_js)?;
        self.get_state()
    }

    pub fn swap(&mut self) -> Result<JsValue, JsValue> {
        self.state.swap();
        self.get_state()
    }

    /// Replace the per-USD rate of `code`, e.g. with a fresher quote
    #[wasm_bindgen(js_name = setRate)]
    pub fn set_rate(&mut self, code: &str, rate: f64) -> Result<JsValue, JsValue> {
        self.set_rate_internal(code, rate).map_err(to_js)?;
        self.get_state()
    }
}

impl CurrencyConverter {
    fn view(&self) -> CurrencyView<'_> {
        CurrencyView {
            from_currency: self.state.from_currency(),
            to_currency: self.state.to_currency(),
            from_amount: self.state.from_amount(),
            to_amount: self.state.to_amount(),
            rate: self
                .rates
                .cross_rate(self.state.from_currency(), self.state.to_currency())
                .ok(),
            updated_at: self.rates.updated_at().to_rfc3339(),
        }
    }

    fn set_rate_internal(&mut self, code: &str, rate: f64) -> Result<(), ConversionError> {
        self.rates.set_rate(code, rate)?;
        let from = self.state.from_amount().to_string();
        self.state.set_from_amount(&self.rates, &from);
        Ok(())
    }
}

/// `[{ code, name, symbol }]` in display order
#[wasm_bindgen(js_name = getCurrencies)]
pub fn get_currencies() -> Result<JsValue, JsValue> {
    to_js_value(&CURRENCIES)
}
