//! Property tests for naming and quality handling

use image_convert::{
    convert_batch, output_name, ConvertOptions, ImageCodec, ImageConvertError, InputImage,
    OutputFormat, Quality,
};
use proptest::prelude::*;

/// Codec that fails on inputs starting with `!` and echoes everything else
struct EchoCodec;

impl ImageCodec for EchoCodec {
    type Bitmap = Vec<u8>;

    fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>, ImageConvertError> {
        if bytes.first() == Some(&b'!') {
            Err(ImageConvertError::DecodeFailure("bad header".into()))
        } else {
            Ok(bytes.to_vec())
        }
    }

    fn encode(
        &self,
        bitmap: &Vec<u8>,
        _format: OutputFormat,
        _quality: Quality,
    ) -> Result<Vec<u8>, ImageConvertError> {
        Ok(bitmap.clone())
    }
}

fn format() -> impl Strategy<Value = OutputFormat> {
    prop::sample::select(OutputFormat::ALL.to_vec())
}

proptest! {
    #[test]
    fn output_name_has_target_extension(stem in "[a-z][a-z0-9_]{0,12}", ext in "[a-z]{2,4}", format in format()) {
        let name = output_name(&format!("{}.{}", stem, ext), format);
        prop_assert_eq!(name, format!("{}.{}", stem, format.extension()));
    }

    #[test]
    fn quality_accepts_exactly_unit_interval(value in -2.0f32..3.0) {
        prop_assert_eq!(Quality::new(value).is_ok(), (0.0..=1.0).contains(&value));
    }

    #[test]
    fn jpeg_percent_in_range(value in 0.0f32..=1.0) {
        let percent = Quality::new(value).unwrap().jpeg_percent();
        prop_assert!((1..=100).contains(&percent));
    }

    #[test]
    fn batch_accounts_for_every_file(bad in prop::collection::vec(any::<bool>(), 1..12)) {
        let files: Vec<InputImage> = bad
            .iter()
            .enumerate()
            .map(|(i, &bad)| {
                let bytes = if bad { b"!x".to_vec() } else { b"ok".to_vec() };
                InputImage::new(format!("img{}.png", i), Some("image/png"), bytes)
            })
            .collect();

        let mut calls = 0;
        let report = convert_batch(&EchoCodec, &files, ConvertOptions::default(), |done, total| {
            calls += 1;
            assert_eq!(done, calls);
            assert_eq!(total, files.len());
        })
        .unwrap();

        prop_assert_eq!(calls, files.len());
        prop_assert_eq!(report.failed.len(), bad.iter().filter(|&&b| b).count());
        prop_assert_eq!(report.converted.len() + report.failed.len(), files.len());
    }
}
