// THEORY:
// The `FrameScanner` is the data transformation step between a raw frame buffer and
// the spatial grouping layer. It visits every pixel of a frame exactly once, asks the
// `color_classifier` what it is, and routes the pixel's coordinate into the list for
// that category.
//
// Key architectural principles:
// 1.  **Validation First**: A frame is checked once, when it is wrapped. A buffer
//     that is too short for its declared dimensions is a caller bug and is rejected
//     with `FrameError::InvalidFrameDimensions` instead of being scanned partially.
//     Trailing bytes beyond `width * height` pixels are ignored.
// 2.  **Deterministic Order**: Coordinates are appended in visiting order, and the
//     area builder downstream is order-sensitive. Row-major (row outer, column inner)
//     is the default because it matches the buffer layout; column-major is available
//     to reproduce prototype captures.
// 3.  **Borrowed Input**: The scanner never owns or copies the buffer. A `Frame`
//     borrows it for the duration of one scan.

use crate::core_modules::bounding_box::Point;
use crate::core_modules::color_classifier::{Category, classify};
use crate::core_modules::pixel::pixel::{CHANNELS, Pixel};
use crate::error::FrameError;
use std::collections::BTreeMap;
use tracing::trace;

/// Per-category coordinate lists in scan order. Every category has an entry.
pub type CategoryPoints = BTreeMap<Category, Vec<Point>>;

/// The traversal order used when visiting a frame's pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanOrder {
    /// Row index outer, column index inner.
    #[default]
    RowMajor,
    /// Column index outer, row index inner.
    ColumnMajor,
}

/// A validated, borrowed view over a row-major RGBA frame buffer.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    buffer: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> Frame<'a> {
    pub fn new(buffer: &'a [u8], width: u32, height: u32) -> Result<Self, FrameError> {
        let expected = (width as u64)
            .checked_mul(height as u64)
            .and_then(|pixels| pixels.checked_mul(CHANNELS as u64));
        match expected {
            Some(expected) if buffer.len() as u64 >= expected => Ok(Self {
                buffer,
                width,
                height,
            }),
            _ => Err(FrameError::InvalidFrameDimensions {
                width,
                height,
                expected: expected.unwrap_or(u64::MAX),
                actual: buffer.len(),
            }),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The pixel at (x, y), or `None` when the coordinate lies outside the frame.
    pub fn pixel_at(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * CHANNELS;
        let bytes: [u8; CHANNELS] = self.buffer[offset..offset + CHANNELS].try_into().ok()?;
        Some(Pixel::from(bytes))
    }
}

/// Visits every pixel of `frame` once in `order` and collects classified coordinates.
pub fn scan(frame: &Frame<'_>, order: ScanOrder) -> CategoryPoints {
    let mut points: CategoryPoints = Category::ALL
        .into_iter()
        .map(|category| (category, Vec::new()))
        .collect();

    let mut visit = |x: u32, y: u32| {
        if let Some(category) = frame.pixel_at(x, y).as_ref().and_then(classify) {
            points.entry(category).or_default().push(Point::new(x, y));
        }
    };

    match order {
        ScanOrder::RowMajor => {
            for y in 0..frame.height {
                for x in 0..frame.width {
                    visit(x, y);
                }
            }
        }
        ScanOrder::ColumnMajor => {
            for x in 0..frame.width {
                for y in 0..frame.height {
                    visit(x, y);
                }
            }
        }
    }

    for (category, coords) in &points {
        trace!(%category, count = coords.len(), "classified pixels");
    }
    points
}
