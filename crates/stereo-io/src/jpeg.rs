//! JPEG reading and writing.
//!
//! Decoding accepts RGB, 8/16-bit grayscale and CMYK and always yields RGB.
//! Encoding writes baseline RGB or luma at a fixed quality
//! ([`DEFAULT_QUALITY`] unless [`JpegWriterOptions`] says otherwise).

use crate::{IoError, IoResult};
use std::io::{BufReader, Cursor};
use std::path::Path;
use stereo_core::Image;
use tracing::trace;

/// Quality used by [`write`] and [`write_gray`].
pub const DEFAULT_QUALITY: u8 = 90;

/// JPEG writer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegWriterOptions {
    /// Quality, 1 (smallest) to 100 (best).
    pub quality: u8,
}

impl Default for JpegWriterOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
        }
    }
}

/// Reads a JPEG file.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let file = std::fs::File::open(path.as_ref())?;
    decode_from(BufReader::new(file))
}

/// Decodes a JPEG held in memory.
pub fn decode(bytes: &[u8]) -> IoResult<Image> {
    decode_from(Cursor::new(bytes))
}

fn decode_from<R: std::io::Read>(reader: R) -> IoResult<Image> {
    let mut decoder = jpeg_decoder::Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;

    trace!(width = info.width, height = info.height, format = ?info.pixel_format, "jpeg decode");

    let rgb: Vec<u8> = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels,
        jpeg_decoder::PixelFormat::L8 => pixels.iter().flat_map(|&g| [g, g, g]).collect(),
        jpeg_decoder::PixelFormat::L16 => pixels
            .chunks_exact(2)
            .flat_map(|l16| [l16[0], l16[0], l16[0]])
            .collect(),
        jpeg_decoder::PixelFormat::CMYK32 => pixels.chunks_exact(4).flat_map(cmyk_to_rgb).collect(),
    };

    Ok(Image::from_data(info.width as u32, info.height as u32, rgb)?)
}

/// Approximate CMYK to RGB, no color management.
fn cmyk_to_rgb(cmyk: &[u8]) -> [u8; 3] {
    let k = 1.0 - cmyk[3] as f32 / 255.0;
    let channel = |v: u8| ((1.0 - v as f32 / 255.0) * k * 255.0) as u8;
    [channel(cmyk[0]), channel(cmyk[1]), channel(cmyk[2])]
}

/// Encodes an RGB image at the given quality.
pub fn encode(image: &Image, options: JpegWriterOptions) -> IoResult<Vec<u8>> {
    encode_raw(
        image.data(),
        image.width(),
        image.height(),
        jpeg_encoder::ColorType::Rgb,
        options,
    )
}

fn encode_raw(
    samples: &[u8],
    width: u32,
    height: u32,
    color_type: jpeg_encoder::ColorType,
    options: JpegWriterOptions,
) -> IoResult<Vec<u8>> {
    let (w, h) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(IoError::EncodeError(format!(
                "{}x{} exceeds the JPEG size limit of 65535",
                width, height
            )));
        }
    };
    let mut buffer = Vec::new();
    let encoder = jpeg_encoder::Encoder::new(&mut buffer, options.quality);
    encoder
        .encode(samples, w, h, color_type)
        .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;
    Ok(buffer)
}

/// Writes an RGB image at [`DEFAULT_QUALITY`].
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    write_with_options(path, image, JpegWriterOptions::default())
}

/// Writes an RGB image with explicit options.
pub fn write_with_options<P: AsRef<Path>>(
    path: P,
    image: &Image,
    options: JpegWriterOptions,
) -> IoResult<()> {
    let data = encode(image, options)?;
    std::fs::write(path.as_ref(), data)?;
    Ok(())
}

/// Writes 8-bit grayscale samples at [`DEFAULT_QUALITY`].
pub fn write_gray<P: AsRef<Path>>(path: P, width: u32, height: u32, samples: &[u8]) -> IoResult<()> {
    let data = encode_raw(
        samples,
        width,
        height,
        jpeg_encoder::ColorType::Luma,
        JpegWriterOptions::default(),
    )?;
    std::fs::write(path.as_ref(), data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_flat_color() {
        let image = Image::filled(16, 16, [200, 60, 30]);
        let bytes = encode(&image, JpegWriterOptions { quality: 95 }).unwrap();
        let loaded = decode(&bytes).unwrap();
        assert_eq!(loaded.dimensions(), (16, 16));
        // Lossy: stay within a few levels.
        for (a, b) in loaded.data().iter().zip(image.data()) {
            assert!((*a as i32 - *b as i32).abs() <= 4, "{a} vs {b}");
        }
    }

    #[test]
    fn test_gray_replicated() {
        let gray = vec![128u8; 8 * 8];
        let bytes = encode_raw(&gray, 8, 8, jpeg_encoder::ColorType::Luma, JpegWriterOptions::default())
            .unwrap();
        let loaded = decode(&bytes).unwrap();
        let px = loaded.pixel(3, 3);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
        assert!((px[0] as i32 - 128).abs() <= 2);
    }

    #[test]
    fn test_cmyk_conversion() {
        assert_eq!(cmyk_to_rgb(&[0, 0, 0, 0]), [255, 255, 255]);
        assert_eq!(cmyk_to_rgb(&[0, 0, 0, 255]), [0, 0, 0]);
        assert_eq!(cmyk_to_rgb(&[255, 0, 255, 0]), [0, 255, 0]);
    }

    #[test]
    fn test_oversized_rejected() {
        let err = encode_raw(&[], 70_000, 1, jpeg_encoder::ColorType::Rgb, JpegWriterOptions::default())
            .unwrap_err();
        assert!(matches!(err, IoError::EncodeError(_)));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(decode(b"\xFF\xD8\xFFnot really"), Err(IoError::DecodeError(_))));
    }
}
