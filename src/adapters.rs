// THEORY:
// Adapters are the seams between the synchronous core and the outside world. The
// core never talks to a camera or a screen; it is handed raw pixel buffers by a
// `CaptureAdapter` and hands its bounding boxes to a `RenderAdapter`.
//
// Two file-backed implementations ship with the crate so the pipeline can be driven
// end-to-end without a camera: `ImageFileCapture` decodes a queue of image files, and
// `ImageRenderer` strokes the detected areas onto a copy of each frame and writes it
// out as a PNG.

use crate::core_modules::frame_scanner::Frame;
use crate::core_modules::utils::image_helper;
use crate::error::{AdapterError, FrameError};
use crate::pipeline::CategoryAreas;
use image::{Rgba, RgbaImage};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// An owned RGBA frame as delivered by a capture source.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Where the frame came from, if it has a name.
    pub source: Option<PathBuf>,
}

impl CapturedFrame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            source: None,
        }
    }

    pub fn from_image(image: RgbaImage, source: Option<PathBuf>) -> Self {
        let (width, height) = image.dimensions();
        Self {
            data: image.into_raw(),
            width,
            height,
            source,
        }
    }

    /// Borrows the buffer as a validated frame.
    pub fn frame(&self) -> Result<Frame<'_>, FrameError> {
        Frame::new(&self.data, self.width, self.height)
    }
}

/// Supplies frames. `Ok(None)` means the source is exhausted.
pub trait CaptureAdapter {
    fn capture(&mut self) -> Result<Option<CapturedFrame>, AdapterError>;
}

/// Consumes the areas computed for a frame.
pub trait RenderAdapter {
    fn render(&mut self, frame: &CapturedFrame, areas: &CategoryAreas) -> Result<(), AdapterError>;
}

/// Captures frames by decoding image files in order.
pub struct ImageFileCapture {
    paths: VecDeque<PathBuf>,
    resize: Option<(u32, u32)>,
}

impl ImageFileCapture {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            resize: None,
        }
    }

    /// Shrinks every image to fit within `width` x `height` before scanning.
    pub fn with_resize(mut self, width: u32, height: u32) -> Self {
        self.resize = Some((width, height));
        self
    }

    pub fn remaining(&self) -> usize {
        self.paths.len()
    }
}

impl CaptureAdapter for ImageFileCapture {
    fn capture(&mut self) -> Result<Option<CapturedFrame>, AdapterError> {
        let Some(path) = self.paths.pop_front() else {
            return Ok(None);
        };
        let image = image_helper::load_rgba(&path, self.resize)?;
        debug!(path = %path.display(), width = image.width(), height = image.height(), "captured frame");
        Ok(Some(CapturedFrame::from_image(image, Some(path))))
    }
}

/// Renders areas as stroked rectangles onto a copy of the frame, saved as PNG.
pub struct ImageRenderer {
    output_dir: PathBuf,
    rendered: u64,
}

impl ImageRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            rendered: 0,
        }
    }

    pub fn rendered(&self) -> u64 {
        self.rendered
    }

    /// Draws every area onto `frame` in its category color.
    pub fn annotate(frame: &CapturedFrame, areas: &CategoryAreas) -> Result<RgbaImage, AdapterError> {
        let mut image = RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
            .ok_or_else(|| FrameError::InvalidFrameDimensions {
                width: frame.width,
                height: frame.height,
                expected: frame.width as u64 * frame.height as u64 * 4,
                actual: frame.data.len(),
            })?;
        for (category, boxes) in areas {
            let color = Rgba(category.draw_color());
            for area in boxes {
                image_helper::draw_area(&mut image, area, color);
            }
        }
        Ok(image)
    }

    fn output_path(&self, frame: &CapturedFrame) -> PathBuf {
        let stem = frame
            .source
            .as_deref()
            .and_then(Path::file_stem)
            .map(|stem| stem.to_string_lossy().into_owned());
        match stem {
            Some(stem) => self.output_dir.join(format!("{stem}_cards.png")),
            None => self.output_dir.join(format!("frame_{:05}.png", self.rendered)),
        }
    }
}

impl RenderAdapter for ImageRenderer {
    fn render(&mut self, frame: &CapturedFrame, areas: &CategoryAreas) -> Result<(), AdapterError> {
        let image = Self::annotate(frame, areas)?;
        let path = self.output_path(frame);
        image_helper::save(&path, image.width(), image.height(), image.as_raw())?;
        self.rendered += 1;

        let total: usize = areas.values().map(Vec::len).sum();
        info!(path = %path.display(), areas = total, "rendered frame");
        Ok(())
    }
}
