//! Text tools page bindings: statistics, case conversion, formatting and
//! the generators

use crate::session::to_js_value;
use calc_core::text::{
    add_line_breaks, base64_decode, base64_encode, collapse_spaces, remove_line_breaks,
    remove_spaces, url_decode, url_encode,
};
use calc_core::{
    convert_case, generate_lorem, generate_password, qr_data_url, text_stats, CalcError, Case,
    PasswordOptions,
};
use wasm_bindgen::prelude::*;

fn to_js(error: CalcError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// `{ characters, characters_no_spaces, words, sentences, paragraphs, reading_time_minutes }`
#[wasm_bindgen(js_name = textStats)]
pub fn js_text_stats(text: &str) -> Result<JsValue, JsValue> {
    to_js_value(&text_stats(text))
}

/// `case` is one of upper, lower, title, sentence, camel, snake, kebab,
/// alternating, reverse
#[wasm_bindgen(js_name = convertCase)]
pub fn js_convert_case(text: &str, case: &str) -> Result<String, JsValue> {
    let case: Case = case.parse().map_err(to_js)?;
    Ok(convert_case(text, case))
}

/// Formatting and encoding buttons, keyed by action name
#[wasm_bindgen(js_name = formatText)]
pub fn format_text(action: &str, text: &str) -> Result<String, JsValue> {
    apply_format(action, text).map_err(to_js)
}

fn apply_format(action: &str, text: &str) -> Result<String, CalcError> {
    Ok(match action {
        "removeSpaces" => remove_spaces(text),
        "removeExtraSpaces" => collapse_spaces(text),
        "addLineBreaks" => add_line_breaks(text),
        "removeLineBreaks" => remove_line_breaks(text),
        "base64Encode" => base64_encode(text),
        "base64Decode" => base64_decode(text)?,
        "urlEncode" => url_encode(text),
        "urlDecode" => url_decode(text)?,
        other => {
            return Err(CalcError::InvalidInput(format!(
                "unknown format action '{}'",
                other
            )))
        }
    })
}

/// `options` is `{ length, uppercase, lowercase, numbers, symbols }`;
/// missing fields take their defaults
#[wasm_bindgen(js_name = generatePassword)]
pub fn js_generate_password(options: JsValue) -> Result<String, JsValue> {
    let options: PasswordOptions = if options.is_undefined() || options.is_null() {
        PasswordOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options)?
    };
    generate_password(&mut rand::thread_rng(), &options).map_err(to_js)
}

#[wasm_bindgen(js_name = generateLorem)]
pub fn js_generate_lorem(words: usize) -> Result<String, JsValue> {
    generate_lorem(&mut rand::thread_rng(), words).map_err(to_js)
}

/// SVG QR code as a `data:` URL for an `<img>`
#[wasm_bindgen(js_name = qrCodeDataUrl)]
pub fn qr_code_data_url(text: &str) -> Result<String, JsValue> {
    qr_data_url(text).map_err(to_js)
}
