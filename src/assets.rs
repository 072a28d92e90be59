//! Image decoding and asset loading

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::bitmap::Bitmap;
use crate::color::swap_red_blue;
use crate::error::{Error, Result};
use crate::text::Font;

/// Decode PNG/JPEG bytes into engine-packed pixels
pub fn decode_image(bytes: &[u8]) -> Result<Bitmap> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixels = rgba
        .pixels()
        .map(|p| swap_red_blue(u32::from_le_bytes(p.0)))
        .collect();
    Bitmap::from_pixels(width, height, pixels).ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "decoded pixel count does not match dimensions",
        ))
    })
}

/// Encode a bitmap as PNG, restoring decoder channel order
pub fn encode_png(bitmap: &Bitmap) -> Result<Vec<u8>> {
    let raw: Vec<u8> = bitmap
        .pixels()
        .iter()
        .flat_map(|&p| swap_red_blue(p).to_le_bytes())
        .collect();
    let rgba = image::RgbaImage::from_raw(bitmap.width(), bitmap.height(), raw).ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "bitmap buffer too small for its dimensions",
        ))
    })?;

    let mut bytes = Vec::new();
    rgba.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}

/// Read and decode an image file
pub fn try_load_image(path: impl AsRef<Path>) -> Result<Bitmap> {
    let bytes = std::fs::read(path)?;
    decode_image(&bytes)
}

/// Read and decode an image file. A missing or broken file gives an empty
/// bitmap, which draws as nothing.
pub fn load_image(path: impl AsRef<Path>) -> Bitmap {
    let path = path.as_ref();
    match try_load_image(path) {
        Ok(bitmap) => bitmap,
        Err(e) => {
            log::warn!("Failed to load image {}: {e}", path.display());
            Bitmap::empty()
        },
    }
}

/// Numbered frame files (`0.png`, `1.png`, ...) in ascending numeric order
fn numbered_frames(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut frames: Vec<(u32, PathBuf)> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        })
        .filter_map(|path| {
            let number = path.file_stem()?.to_str()?.parse::<u32>().ok()?;
            Some((number, path))
        })
        .collect();
    frames.sort_by_key(|(number, _)| *number);
    Ok(frames.into_iter().map(|(_, path)| path).collect())
}

/// Load every numbered frame in a folder
pub fn load_image_folder(path: impl AsRef<Path>) -> Result<Vec<Bitmap>> {
    let dir = path.as_ref();
    let files = numbered_frames(dir)?;
    if files.is_empty() {
        return Err(Error::EmptyAnimation(dir.to_path_buf()));
    }

    log::debug!("Loading {} frames from {}", files.len(), dir.display());
    files.iter().map(try_load_image).collect()
}

/// Load a font strip with `columns` letter cells
pub fn load_font(path: impl AsRef<Path>, columns: u32) -> Font {
    Font::from_strip(Rc::new(load_image(path)), columns)
}
