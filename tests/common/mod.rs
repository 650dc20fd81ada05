#![allow(dead_code)]

use image::{ImageFormat, Rgb, RgbImage, codecs::jpeg::JpegEncoder};
use std::io::Cursor;
use std::path::Path;

/// Little-endian TIFF block with a single DateTimeOriginal entry in the
/// Exif sub-IFD.
pub fn exif_tiff_block(datetime_original: &str) -> Vec<u8> {
    let mut value = datetime_original.as_bytes().to_vec();
    value.push(0);
    assert!(value.len() > 4, "short values would be stored inline");

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II*\0");
    tiff.extend_from_slice(&8u32.to_le_bytes());

    // IFD0: ExifOffset -> Exif IFD
    let exif_ifd_offset: u32 = 8 + 2 + 12 + 4;
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x8769u16.to_le_bytes());
    tiff.extend_from_slice(&4u16.to_le_bytes());
    tiff.extend_from_slice(&1u32.to_le_bytes());
    tiff.extend_from_slice(&exif_ifd_offset.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());

    // Exif IFD: DateTimeOriginal (ASCII)
    let value_offset = exif_ifd_offset + 2 + 12 + 4;
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x9003u16.to_le_bytes());
    tiff.extend_from_slice(&2u16.to_le_bytes());
    tiff.extend_from_slice(&(value.len() as u32).to_le_bytes());
    tiff.extend_from_slice(&value_offset.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());
    tiff.extend_from_slice(&value);
    tiff
}

/// APP1 segment wrapping [`exif_tiff_block`].
pub fn exif_app1_segment(datetime_original: &str) -> Vec<u8> {
    let tiff = exif_tiff_block(datetime_original);
    let mut segment = vec![0xFF, 0xE1];
    segment.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    segment.extend_from_slice(b"Exif\0\0");
    segment.extend_from_slice(&tiff);
    segment
}

/// A solid-color JPEG, optionally carrying a DateTimeOriginal tag.
pub fn jpeg_bytes(width: u32, height: u32, color: [u8; 3], date: Option<&str>) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb(color));
    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, 95)
        .encode_image(&img)
        .unwrap();

    match date {
        Some(date) => {
            // Insert right after SOI
            let mut with_exif = encoded[..2].to_vec();
            with_exif.extend_from_slice(&exif_app1_segment(date));
            with_exif.extend_from_slice(&encoded[2..]);
            with_exif
        }
        None => encoded,
    }
}

pub fn write_jpeg(path: &Path, width: u32, height: u32, date: Option<&str>) {
    std::fs::write(path, jpeg_bytes(width, height, [0, 0, 0], date)).unwrap();
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_pixel(width, height, Rgb([0, 0, 0]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    std::fs::write(path, bytes).unwrap();
}

/// A solid-color PNG with an `eXIf` chunk carrying DateTimeOriginal.
pub fn png_bytes_with_exif(width: u32, height: u32, date: &str) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([0, 0, 0]));
    let mut encoded = Vec::new();
    img.write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
        .unwrap();

    // Signature (8) + IHDR (4 length + 4 type + 13 data + 4 crc)
    let after_ihdr = 8 + 25;
    assert_eq!(&encoded[12..16], b"IHDR");

    let mut with_exif = encoded[..after_ihdr].to_vec();
    with_exif.extend_from_slice(&png_chunk(b"eXIf", &exif_tiff_block(date)));
    with_exif.extend_from_slice(&encoded[after_ihdr..]);
    with_exif
}

fn png_chunk(kind: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut chunk = (data.len() as u32).to_be_bytes().to_vec();
    chunk.extend_from_slice(kind);
    chunk.extend_from_slice(data);
    let crc = crc32(&chunk[4..]);
    chunk.extend_from_slice(&crc.to_be_bytes());
    chunk
}

fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in bytes {
        crc ^= byte as u32;
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

/// Number of pixels brighter than mid-gray inside the given rectangle.
pub fn bright_pixels(path: &Path, x0: u32, y0: u32, x1: u32, y1: u32) -> usize {
    let img = image::open(path).unwrap().to_luma8();
    let mut count = 0;
    for y in y0..y1.min(img.height()) {
        for x in x0..x1.min(img.width()) {
            if img.get_pixel(x, y)[0] > 128 {
                count += 1;
            }
        }
    }
    count
}
