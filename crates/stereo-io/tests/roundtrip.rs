use stereo_core::{AlphaMatte, Image};
use stereo_io::{read, read_mask, write, write_matte, Format, IoError};
use tempfile::tempdir;

fn gradient(w: u32, h: u32) -> Image {
    let mut img = Image::new(w, h);
    for y in 0..h {
        for x in 0..w {
            img.set_pixel(x, y, [(x * 7) as u8, (y * 11) as u8, 90]);
        }
    }
    img
}

#[test]
fn png_roundtrip_is_lossless() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gradient.png");
    let image = gradient(20, 12);
    write(&path, &image).unwrap();
    assert_eq!(Format::detect(&path).unwrap(), Format::Png);
    assert_eq!(read(&path).unwrap(), image);
}

#[test]
fn jpeg_roundtrip_keeps_size() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("flat.jpg");
    let image = Image::filled(24, 16, [95, 147, 89]);
    write(&path, &image).unwrap();
    let loaded = read(&path).unwrap();
    assert_eq!(loaded.dimensions(), (24, 16));
    let [r, g, b] = loaded.pixel(12, 8);
    assert!((r as i32 - 95).abs() <= 4);
    assert!((g as i32 - 147).abs() <= 4);
    assert!((b as i32 - 89).abs() <= 4);
}

#[test]
fn magic_bytes_win_over_extension() {
    let dir = tempdir().unwrap();
    let png_path = dir.path().join("actually_png.png");
    let image = gradient(4, 4);
    write(&png_path, &image).unwrap();

    let misnamed = dir.path().join("actually_png.jpg");
    std::fs::copy(&png_path, &misnamed).unwrap();
    assert_eq!(read(&misnamed).unwrap(), image);
}

#[test]
fn matte_written_as_gray_reads_back_as_mask() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("matte.png");
    let matte = AlphaMatte::from_data(3, 1, vec![0.0, 0.5, 1.0]).unwrap();
    write_matte(&path, &matte).unwrap();

    let mask = read_mask(&path).unwrap();
    assert_eq!(mask.dimensions(), (3, 1));
    assert_eq!(mask.data(), &[0, 128, 255]);
}

#[test]
fn color_mask_uses_luma() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mask.png");
    let mut img = Image::new(2, 1);
    img.set_pixel(0, 0, [255, 255, 255]);
    img.set_pixel(1, 0, [255, 0, 0]);
    write(&path, &img).unwrap();

    let mask = read_mask(&path).unwrap();
    assert_eq!(mask.data(), &[255, 76]);
    assert!(mask.is_person(0, 0));
    assert!(!mask.is_person(1, 0));
}

#[test]
fn unknown_extension_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("image.bmp");
    let err = write(&path, &gradient(2, 2)).unwrap_err();
    assert!(matches!(err, IoError::UnsupportedFormat(ext) if ext == "bmp"));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = read(dir.path().join("nope.png")).unwrap_err();
    assert!(matches!(err, IoError::Io(_)));
}
