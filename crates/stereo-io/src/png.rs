//! PNG reading and writing.
//!
//! Every supported layout decodes to 8-bit RGB:
//!
//! - gray and gray+alpha are replicated to three channels
//! - alpha is dropped
//! - 16-bit samples keep their high byte
//!
//! Palette and sub-byte images are expanded by the decoder first.
//! Images are written as 8-bit RGB, mattes as 8-bit grayscale.

use crate::{IoError, IoResult};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::Path;
use stereo_core::Image;
use tracing::trace;

/// Reads a PNG file.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let file = File::open(path.as_ref())?;
    decode_from(BufReader::new(file))
}

/// Decodes a PNG held in memory.
pub fn decode(bytes: &[u8]) -> IoResult<Image> {
    decode_from(Cursor::new(bytes))
}

fn decode_from<R: std::io::BufRead + std::io::Seek>(reader: R) -> IoResult<Image> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
    let samples = &buf[..info.buffer_size()];

    trace!(width = info.width, height = info.height, color = ?info.color_type, depth = ?info.bit_depth, "png decode");

    let step = match info.bit_depth {
        png::BitDepth::Eight => 1,
        // Big-endian: the first byte of each sample is the high byte.
        png::BitDepth::Sixteen => 2,
        depth => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?} {:?}",
                info.color_type, depth
            )));
        }
    };
    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        color => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?} {:?}",
                color, info.bit_depth
            )));
        }
    };

    let rgb: Vec<u8> = samples
        .chunks_exact(channels * step)
        .flat_map(|px| {
            let at = |c: usize| px[c * step];
            if channels < 3 {
                [at(0), at(0), at(0)]
            } else {
                [at(0), at(1), at(2)]
            }
        })
        .collect();

    Ok(Image::from_data(info.width, info.height, rgb)?)
}

/// Writes an image as 8-bit RGB PNG.
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    let file = File::create(path.as_ref())?;
    encode_to(
        BufWriter::new(file),
        image.width(),
        image.height(),
        png::ColorType::Rgb,
        image.data(),
    )
}

/// Writes 8-bit grayscale samples as PNG.
pub fn write_gray<P: AsRef<Path>>(path: P, width: u32, height: u32, samples: &[u8]) -> IoResult<()> {
    let file = File::create(path.as_ref())?;
    encode_to(BufWriter::new(file), width, height, png::ColorType::Grayscale, samples)
}

/// Encodes an image as 8-bit RGB PNG in memory.
pub fn encode(image: &Image) -> IoResult<Vec<u8>> {
    let mut buffer = Vec::new();
    encode_to(
        &mut buffer,
        image.width(),
        image.height(),
        png::ColorType::Rgb,
        image.data(),
    )?;
    Ok(buffer)
}

fn encode_to<W: Write>(
    writer: W,
    width: u32,
    height: u32,
    color_type: png::ColorType,
    samples: &[u8],
) -> IoResult<()> {
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());
    encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .write_image_data(samples)
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .finish()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_raw(w: u32, h: u32, color: png::ColorType, depth: png::BitDepth, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut encoder = png::Encoder::new(&mut out, w, h);
        encoder.set_color(color);
        encoder.set_depth(depth);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
        writer.finish().unwrap();
        out
    }

    #[test]
    fn test_roundtrip_rgb() {
        let mut image = Image::new(8, 4);
        for y in 0..4 {
            for x in 0..8 {
                image.set_pixel(x, y, [(x * 30) as u8, (y * 60) as u8, 128]);
            }
        }
        let bytes = encode(&image).unwrap();
        assert_eq!(decode(&bytes).unwrap(), image);
    }

    #[test]
    fn test_gray_replicated() {
        let bytes = encode_raw(2, 1, png::ColorType::Grayscale, png::BitDepth::Eight, &[10, 200]);
        let image = decode(&bytes).unwrap();
        assert_eq!(image.data(), &[10, 10, 10, 200, 200, 200]);
    }

    #[test]
    fn test_alpha_dropped() {
        let bytes = encode_raw(1, 1, png::ColorType::Rgba, png::BitDepth::Eight, &[1, 2, 3, 4]);
        assert_eq!(decode(&bytes).unwrap().data(), &[1, 2, 3]);
        let bytes = encode_raw(1, 1, png::ColorType::GrayscaleAlpha, png::BitDepth::Eight, &[9, 0]);
        assert_eq!(decode(&bytes).unwrap().data(), &[9, 9, 9]);
    }

    #[test]
    fn test_sixteen_bit_keeps_high_byte() {
        let data = [0x12, 0x34, 0xAB, 0xCD, 0xFF, 0x00];
        let bytes = encode_raw(1, 1, png::ColorType::Rgb, png::BitDepth::Sixteen, &data);
        assert_eq!(decode(&bytes).unwrap().data(), &[0x12, 0xAB, 0xFF]);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(decode(b"not a png"), Err(IoError::DecodeError(_))));
    }
}
