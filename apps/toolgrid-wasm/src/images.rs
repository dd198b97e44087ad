//! Image converter page bindings
//!
//! Files are queued, converted in one pass, and the outputs stay in Rust
//! memory until JavaScript fetches them by index for download.

use crate::session::to_js_value;
use image_convert::{
    convert_batch, BatchReport, ConvertOptions, ImageConvertError, ImageRsCodec, InputImage,
    OutputFormat, Quality,
};
use wasm_bindgen::prelude::*;

fn to_js(error: ImageConvertError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[wasm_bindgen]
#[derive(Default)]
pub struct ImageBatch {
    files: Vec<InputImage>,
    options: ConvertOptions,
    report: Option<BatchReport>,
    progress_callback: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl ImageBatch {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback signature: (completed: number, total: number) => void
    #[wasm_bindgen(js_name = setProgressCallback)]
    pub fn set_progress_callback(&mut self, callback: js_sys::Function) {
        self.progress_callback = Some(callback);
    }

    /// Queue a file. Returns the number of queued files.
    #[wasm_bindgen(js_name = addImage)]
    pub fn add_image(&mut self, name: &str, media_type: Option<String>, bytes: &[u8]) -> usize {
        self.files
            .push(InputImage::new(name, media_type.as_deref(), bytes.to_vec()));
        self.files.len()
    }

    #[wasm_bindgen(js_name = getImageCount)]
    pub fn get_image_count(&self) -> usize {
        self.files.len()
    }

    /// "jpeg", "png", "webp" or "bmp"
    #[wasm_bindgen(js_name = setFormat)]
    pub fn set_format(&mut self, format: &str) -> Result<(), JsValue> {
        self.options.format = format.parse::<OutputFormat>().map_err(to_js)?;
        Ok(())
    }

    /// Encoder quality in 0.0-1.0 (JPEG only)
    #[wasm_bindgen(js_name = setQuality)]
    pub fn set_quality(&mut self, quality: f32) -> Result<(), JsValue> {
        self.options.quality = Quality::new(quality).map_err(to_js)?;
        Ok(())
    }

    /// Convert every queued file. Returns `{ converted, failed }`; one
    /// failing file never stops the others.
    pub fn convert(&mut self) -> Result<JsValue, JsValue> {
        let callback = self.progress_callback.clone();
        self.convert_internal(|completed, total| {
            if let Some(callback) = &callback {
                let _ = callback.call2(
                    &JsValue::NULL,
                    &JsValue::from(completed as u32),
                    &JsValue::from(total as u32),
                );
            }
        })
        .map_err(to_js)?;
        to_js_value(&self.report)
    }

    /// Bytes of the `index`-th converted file
    #[wasm_bindgen(js_name = getOutput)]
    pub fn get_output(&self, index: usize) -> Option<js_sys::Uint8Array> {
        self.output(index)
            .map(|(_, bytes)| js_sys::Uint8Array::from(bytes))
    }

    #[wasm_bindgen(js_name = getOutputName)]
    pub fn get_output_name(&self, index: usize) -> Option<String> {
        self.output(index).map(|(name, _)| name.to_string())
    }

    /// Drop the queued files and any results
    pub fn clear(&mut self) {
        self.files.clear();
        self.report = None;
    }
}

impl ImageBatch {
    fn convert_internal(
        &mut self,
        progress: impl FnMut(usize, usize),
    ) -> Result<&BatchReport, ImageConvertError> {
        let report = convert_batch(&ImageRsCodec, &self.files, self.options, progress)?;
        Ok(self.report.insert(report))
    }

    fn output(&self, index: usize) -> Option<(&str, &[u8])> {
        let image = self.report.as_ref()?.converted.get(index)?;
        Some((image.output_name.as_str(), image.bytes.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tiny_png() -> Vec<u8> {
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            4,
            4,
            image::Rgba([200, 10, 10, 255]),
        ))
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
        bytes
    }

    #[test]
    fn test_convert_keeps_going_past_failures() {
        let mut batch = ImageBatch::new();
        batch.add_image("broken.png", Some("image/png".to_string()), b"nope");
        batch.add_image("dot.png", Some("image/png".to_string()), &tiny_png());
        batch.options.format = OutputFormat::Bmp;

        let mut calls = Vec::new();
        let report = batch
            .convert_internal(|done, total| calls.push((done, total)))
            .unwrap();
        assert_eq!(report.converted.len(), 1);
        assert_eq!(report.failed[0].name, "broken.png");
        assert_eq!(calls, vec![(1, 2), (2, 2)]);

        let (name, bytes) = batch.output(0).unwrap();
        assert_eq!(name, "dot.bmp");
        assert!(bytes.starts_with(b"BM"));
        assert!(batch.output(1).is_none());
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let mut batch = ImageBatch::new();
        assert!(matches!(
            batch.convert_internal(|_, _| {}),
            Err(ImageConvertError::Validation(_))
        ));
    }

    #[test]
    fn test_clear() {
        let mut batch = ImageBatch::new();
        batch.add_image("dot.png", None, &tiny_png());
        batch.convert_internal(|_, _| {}).unwrap();
        batch.clear();
        assert_eq!(batch.get_image_count(), 0);
        assert!(batch.output(0).is_none());
    }
}
