//! Poster downscaling: decode, shrink, re-encode as JPEG.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};

/// Decodes `bytes`, shrinks both dimensions by `factor` and encodes as JPEG.
/// A factor of 1 still re-encodes so every saved poster is a JPEG.
pub fn shrink_to_jpeg(bytes: &[u8], factor: u32) -> image::ImageResult<Vec<u8>> {
    let img = image::load_from_memory(bytes)?;
    let img = shrink(img, factor);
    let mut out = Cursor::new(Vec::new());
    // JPEG has no alpha channel.
    DynamicImage::ImageRgb8(img.to_rgb8()).write_to(&mut out, ImageFormat::Jpeg)?;
    Ok(out.into_inner())
}

/// Integer-divides both dimensions by `factor`, never below 1 pixel.
pub fn shrunk_dimensions(width: u32, height: u32, factor: u32) -> (u32, u32) {
    let factor = factor.max(1);
    ((width / factor).max(1), (height / factor).max(1))
}

fn shrink(img: DynamicImage, factor: u32) -> DynamicImage {
    if factor <= 1 {
        return img;
    }
    let (width, height) = img.dimensions();
    let (w, h) = shrunk_dimensions(width, height, factor);
    img.resize_exact(w, h, FilterType::Lanczos3)
}
