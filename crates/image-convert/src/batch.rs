//! Batch image conversion
//!
//! Unlike PDF compression, a failing image does not abort the batch: every
//! file is attempted and failures are reported next to the successes.

use crate::codec::ImageCodec;
use crate::error::ImageConvertError;
use crate::format::{is_image_file, output_name, OutputFormat, Quality};
use serde::{Deserialize, Serialize};

/// An input file as picked by the user
#[derive(Debug, Clone)]
pub struct InputImage {
    pub name: String,
    /// Declared media type, if the source provided one
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl InputImage {
    pub fn new(name: impl Into<String>, media_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.map(str::to_string),
            bytes,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub format: OutputFormat,
    pub quality: Quality,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertedImage {
    pub source_name: String,
    pub output_name: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub original_size: usize,
    pub converted_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedImage {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub converted: Vec<ConvertedImage>,
    pub failed: Vec<FailedImage>,
}

impl BatchReport {
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Convert one image
pub fn convert_image<C: ImageCodec>(
    codec: &C,
    file: &InputImage,
    options: ConvertOptions,
) -> Result<ConvertedImage, ImageConvertError> {
    if !is_image_file(&file.name, file.media_type.as_deref()) {
        return Err(ImageConvertError::UnsupportedFile(file.name.clone()));
    }

    let bitmap = codec.decode(&file.bytes)?;
    let bytes = codec.encode(&bitmap, options.format, options.quality)?;

    tracing::debug!(
        name = %file.name,
        format = %options.format,
        original = file.bytes.len(),
        converted = bytes.len(),
        "converted image"
    );

    Ok(ConvertedImage {
        source_name: file.name.clone(),
        output_name: output_name(&file.name, options.format),
        original_size: file.bytes.len(),
        converted_size: bytes.len(),
        bytes,
    })
}

/// Convert every file in order. `on_progress(completed, total)` fires after
/// each file, whether it succeeded or not.
pub fn convert_batch<C: ImageCodec>(
    codec: &C,
    files: &[InputImage],
    options: ConvertOptions,
    mut on_progress: impl FnMut(usize, usize),
) -> Result<BatchReport, ImageConvertError> {
    if files.is_empty() {
        return Err(ImageConvertError::Validation(
            "Please select at least one image file".to_string(),
        ));
    }

    let total = files.len();
    let mut report = BatchReport::default();

    for (index, file) in files.iter().enumerate() {
        match convert_image(codec, file, options) {
            Ok(converted) => report.converted.push(converted),
            Err(e) => {
                tracing::warn!(name = %file.name, error = %e, "image conversion failed");
                report.failed.push(FailedImage {
                    name: file.name.clone(),
                    error: e.to_string(),
                });
            }
        }
        on_progress(index + 1, total);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::tests::half_transparent_png;
    use crate::codec::ImageRsCodec;
    use pretty_assertions::assert_eq;

    fn png(name: &str) -> InputImage {
        InputImage::new(name, Some("image/png"), half_transparent_png())
    }

    #[test]
    fn test_convert_single_image() {
        let options = ConvertOptions {
            format: OutputFormat::Webp,
            quality: Quality::DEFAULT,
        };
        let converted = convert_image(&ImageRsCodec, &png("logo.png"), options).unwrap();
        assert_eq!(converted.output_name, "logo.webp");
        assert_eq!(converted.converted_size, converted.bytes.len());
        assert_eq!(
            image::guess_format(&converted.bytes).unwrap(),
            image::ImageFormat::WebP
        );
    }

    #[test]
    fn test_non_image_rejected() {
        let file = InputImage::new("notes.txt", Some("text/plain"), b"hello".to_vec());
        assert_eq!(
            convert_image(&ImageRsCodec, &file, ConvertOptions::default()).unwrap_err(),
            ImageConvertError::UnsupportedFile("notes.txt".into())
        );
    }

    #[test]
    fn test_batch_failures_are_independent() {
        let files = vec![
            png("a.png"),
            InputImage::new("broken.png", Some("image/png"), b"not really".to_vec()),
            InputImage::new("doc.pdf", Some("application/pdf"), b"%PDF-1.7".to_vec()),
            png("b.png"),
        ];

        let mut progress = Vec::new();
        let report = convert_batch(&ImageRsCodec, &files, ConvertOptions::default(), |done, total| {
            progress.push((done, total))
        })
        .unwrap();

        assert_eq!(progress, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
        let converted: Vec<_> = report.converted.iter().map(|c| c.output_name.as_str()).collect();
        assert_eq!(converted, vec!["a.jpeg", "b.jpeg"]);
        let failed: Vec<_> = report.failed.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(failed, vec!["broken.png", "doc.pdf"]);
        assert!(!report.is_complete_success());
    }

    #[test]
    fn test_empty_batch() {
        let err = convert_batch(&ImageRsCodec, &[], ConvertOptions::default(), |_, _| {}).unwrap_err();
        assert_eq!(
            err,
            ImageConvertError::Validation("Please select at least one image file".into())
        );
    }

    #[test]
    fn test_options_deserialize_defaults() {
        let options: ConvertOptions = serde_json::from_str(r#"{"format":"png"}"#).unwrap();
        assert_eq!(options.format, OutputFormat::Png);
        assert_eq!(options.quality, Quality::DEFAULT);

        let bad: Result<ConvertOptions, _> = serde_json::from_str(r#"{"quality":2.0}"#);
        assert!(bad.is_err());
    }
}
