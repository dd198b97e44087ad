//! Image format conversion
//!
//! Converts batches of raster images to JPEG, PNG, WebP or BMP. Decoding and
//! encoding sit behind [`ImageCodec`] so the batch rules can be exercised
//! without touching real pixels.
//!
//! # Example
//!
//! ```ignore
//! use image_convert::{convert_batch, ConvertOptions, ImageRsCodec, InputImage};
//!
//! let files = vec![InputImage::new("logo.png", Some("image/png"), png_bytes)];
//! let report = convert_batch(&ImageRsCodec, &files, ConvertOptions::default(), |_, _| {})?;
//! ```

pub mod batch;
pub mod codec;
pub mod error;
pub mod format;

pub use batch::{
    convert_batch, convert_image, BatchReport, ConvertOptions, ConvertedImage, FailedImage,
    InputImage,
};
pub use codec::{ImageCodec, ImageRsCodec};
pub use error::ImageConvertError;
pub use format::{is_image_file, output_name, OutputFormat, Quality};
