//! Image decode/encode collaborator
//!
//! The batch logic talks to [`ImageCodec`]; [`ImageRsCodec`] implements it
//! with the `image` crate.

use crate::error::ImageConvertError;
use crate::format::{OutputFormat, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage, Rgba};
use std::io::Cursor;

pub trait ImageCodec {
    type Bitmap;

    fn decode(&self, bytes: &[u8]) -> Result<Self::Bitmap, ImageConvertError>;

    fn encode(
        &self,
        bitmap: &Self::Bitmap,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, ImageConvertError>;
}

/// [`ImageCodec`] backed by the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRsCodec;

impl ImageCodec for ImageRsCodec {
    type Bitmap = DynamicImage;

    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, ImageConvertError> {
        image::load_from_memory(bytes).map_err(|e| ImageConvertError::DecodeFailure(e.to_string()))
    }

    fn encode(
        &self,
        bitmap: &DynamicImage,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, ImageConvertError> {
        let mut buffer = Vec::new();

        let result = match format {
            OutputFormat::Jpeg => {
                let flat = flatten_onto_white(bitmap);
                let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.jpeg_percent());
                DynamicImage::ImageRgb8(flat).write_with_encoder(encoder)
            }
            // The WebP encoder only takes 8-bit RGB(A)
            OutputFormat::Webp | OutputFormat::Bmp => DynamicImage::ImageRgba8(bitmap.to_rgba8())
                .write_to(&mut Cursor::new(&mut buffer), format.image_format()),
            OutputFormat::Png => bitmap.write_to(&mut Cursor::new(&mut buffer), format.image_format()),
        };

        result.map_err(|e| ImageConvertError::EncodeFailure(e.to_string()))?;
        Ok(buffer)
    }
}

/// Composite over an opaque white background
pub fn flatten_onto_white(bitmap: &DynamicImage) -> RgbImage {
    let rgba = bitmap.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let alpha = u32::from(a);
        let blend = |channel: u8| ((u32::from(channel) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, RgbaImage};

    /// A 16x16 PNG: opaque red on the left half, fully transparent on the right
    pub(crate) fn half_transparent_png() -> Vec<u8> {
        let img = RgbaImage::from_fn(16, 16, |x, _| {
            if x < 8 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_flatten_onto_white() {
        let img = image::load_from_memory(&half_transparent_png()).unwrap();
        let flat = flatten_onto_white(&img);
        assert_eq!(*flat.get_pixel(0, 0), Rgb([255, 0, 0]));
        assert_eq!(*flat.get_pixel(15, 15), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_flatten_half_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128])));
        let flat = flatten_onto_white(&img);
        assert_eq!(*flat.get_pixel(0, 0), Rgb([127, 127, 127]));
    }

    #[test]
    fn test_encode_each_format_round_trips_dimensions() {
        let codec = ImageRsCodec;
        let bitmap = codec.decode(&half_transparent_png()).unwrap();

        for format in OutputFormat::ALL {
            let bytes = codec.encode(&bitmap, format, Quality::DEFAULT).unwrap();
            assert_eq!(
                image::guess_format(&bytes).unwrap(),
                format.image_format(),
                "{}",
                format
            );
            let decoded = codec.decode(&bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (16, 16));
        }
    }

    #[test]
    fn test_jpeg_output_has_no_alpha() {
        let codec = ImageRsCodec;
        let bitmap = codec.decode(&half_transparent_png()).unwrap();
        let bytes = codec.encode(&bitmap, OutputFormat::Jpeg, Quality::DEFAULT).unwrap();
        let decoded = codec.decode(&bytes).unwrap();
        assert!(!decoded.color().has_alpha());
        // transparent half came out (near) white
        let pixel = decoded.to_rgb8().get_pixel(15, 15).0;
        assert!(pixel.iter().all(|&c| c > 200), "{:?}", pixel);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            ImageRsCodec.decode(b"definitely not an image"),
            Err(ImageConvertError::DecodeFailure(_))
        ));
    }
}
