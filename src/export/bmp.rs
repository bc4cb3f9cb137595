//! BMP output for baked map images.

use crate::error::Result;
use image::{ImageFormat, RgbaImage};
use std::path::Path;

/// Encode an RGBA buffer as a BMP file at `dest`.
pub fn encode_bmp(image: &RgbaImage, dest: &Path) -> Result<()> {
    image.save_with_format(dest, ImageFormat::Bmp)?;
    Ok(())
}

/// Decode the image at `source` and re-encode it as BMP at `dest`.
pub fn convert_to_bmp(source: &Path, dest: &Path) -> Result<()> {
    let image = image::open(source)?.to_rgba8();
    encode_bmp(&image, dest)
}
