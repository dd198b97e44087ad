//! WASM bindings for the toolgrid pages
//!
//! State lives in Rust: [`PdfToolSession`] backs the split and merge pages,
//! [`UnitConverter`] and [`CurrencyConverter`] the converters,
//! [`CalculatorSession`] the calculators and [`ImageBatch`] the image
//! converter. The text tools are free functions in [`text`]. JavaScript only
//! handles DOM events and file I/O.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { PdfToolSession, SessionMode } from './pkg/toolgrid_wasm.js';
//!
//! await init();
//!
//! const session = new PdfToolSession(SessionMode.Merge);
//! session.setProgressCallback((done, total, msg) => updateUI(done, total, msg));
//! const a = session.addDocument("a.pdf", "application/pdf", bytesA);
//! const b = session.addDocument("b.pdf", "application/pdf", bytesB);
//! session.reorderDocuments([b.id, a.id]);
//! const result = session.execute();
//! downloadBlob(result, session.outputName());
//! ```

pub mod calculator;
pub mod converter;
pub mod currency;
pub mod images;
pub mod session;
pub mod text;

use session::to_js;
use wasm_bindgen::prelude::*;

pub use calculator::CalculatorSession;
pub use converter::UnitConverter;
pub use currency::CurrencyConverter;
pub use images::ImageBatch;
pub use session::{PdfToolSession, SessionMode};

/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Header and trailer check, without a full parse
#[wasm_bindgen]
pub fn quick_validate(bytes: &[u8]) -> Result<(), JsValue> {
    pdftools_core::quick_validate(bytes).map_err(to_js)
}

/// Detailed PDF info without creating a session
#[wasm_bindgen]
pub fn get_pdf_info(bytes: &[u8]) -> Result<JsValue, JsValue> {
    let info = pdftools_core::validate_pdf(bytes).map_err(to_js)?;
    session::to_js_value(&info)
}

#[wasm_bindgen]
pub fn get_page_count(bytes: &[u8]) -> Result<u32, JsValue> {
    pdftools_core::get_page_count(bytes).map_err(to_js)
}

/// Pages selected by a range expression, e.g. "1-3, 5" → [1, 2, 3, 5].
/// Fails when `page_count` is above `MAX_PAGE_COUNT`.
#[wasm_bindgen]
pub fn parse_page_ranges(range_text: &str, page_count: u32) -> Result<Vec<u32>, JsValue> {
    let page_count = pdftools_core::checked_page_count(page_count).map_err(to_js)?;
    Ok(pdftools_core::parse_page_ranges(range_text, page_count))
}

#[wasm_bindgen]
pub fn format_file_size(bytes: f64) -> String {
    pdftools_core::format_file_size(bytes.max(0.0) as u64)
}
