// Helpers for moving frames between image files and raw RGBA buffers, and for
// stroking detected areas onto an image.

use crate::core_modules::bounding_box::BoundingBox;
use crate::error::AdapterError;
use image::imageops::FilterType;
use image::{ImageEncoder, Rgba, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Loads an image as RGBA, optionally shrinking it to fit within `resize` (aspect
/// ratio preserved, nearest-neighbour sampling so card colors are not blended).
pub fn load_rgba(path: &Path, resize: Option<(u32, u32)>) -> Result<RgbaImage, AdapterError> {
    let image = image::open(path).map_err(|source| AdapterError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    let image = match resize {
        Some((width, height)) => image.resize(width, height, FilterType::Nearest),
        None => image,
    };
    Ok(image.to_rgba8())
}

/// Writes a raw RGBA buffer as a PNG file.
pub fn save(path: &Path, width: u32, height: u32, buffer: &[u8]) -> Result<(), AdapterError> {
    let save_error = |source| AdapterError::Save {
        path: path.to_path_buf(),
        source,
    };
    let output = File::create(path).map_err(|e| save_error(image::ImageError::IoError(e)))?;
    let encoder = image::codecs::png::PngEncoder::new(BufWriter::new(output));

    encoder
        .write_image(buffer, width, height, image::ExtendedColorType::Rgba8)
        .map_err(save_error)?;

    Ok(())
}

/// Strokes the outline of `area`, both corners inclusive. Parts outside the image
/// are clipped.
pub fn draw_area(img: &mut RgbaImage, area: &BoundingBox, color: Rgba<u8>) {
    let (width, height) = img.dimensions();
    let mut put = |x: u32, y: u32| {
        if x < width && y < height {
            img.put_pixel(x, y, color);
        }
    };

    for x in area.top_left.x..=area.bottom_right.x {
        put(x, area.top_left.y);
        put(x, area.bottom_right.y);
    }
    for y in area.top_left.y..=area.bottom_right.y {
        put(area.top_left.x, y);
        put(area.bottom_right.x, y);
    }
}
