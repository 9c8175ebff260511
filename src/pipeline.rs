// THEORY:
// The `pipeline` module is the top-level API of the card finder. It wraps the
// scanner and the area builder into a single call that takes a raw frame buffer and
// returns, for every color category, the bounding boxes of its contiguous areas.
//
// Stages per frame:
// 1.  **Validation**: the buffer is wrapped in a `Frame`, rejecting buffers that are
//     shorter than `width * height * 4` bytes.
// 2.  **Classification**: `frame_scanner::scan` routes every pixel coordinate into
//     its category's list, in the configured scan order.
// 3.  **Spatial Grouping**: each list is fed to the area builder independently.
//
// The pipeline holds only configuration. No frame state survives a call, so one
// pipeline can serve any number of frames, sequentially or from several workers.

use crate::core_modules::bounding_box::BoundingBox;
use crate::core_modules::color_classifier::Category;
use crate::core_modules::contiguous_areas::ClusterConfig;
use crate::core_modules::contiguous_areas::area_builder;
use crate::core_modules::frame_scanner::{self, Frame};
use crate::error::FrameError;
use std::collections::BTreeMap;
use tracing::debug;

// Re-export key configuration types for the public API.
pub use crate::core_modules::contiguous_areas::MergeStrategy;
pub use crate::core_modules::frame_scanner::ScanOrder;

/// Bounding boxes found in one frame, per category. Every category has an entry.
pub type CategoryAreas = BTreeMap<Category, Vec<BoundingBox>>;

/// Configuration for the CardPipeline, allowing for tunable behavior.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PipelineConfig {
    /// The order pixels are visited in. Clustering is order-sensitive.
    pub scan_order: ScanOrder,
    pub cluster: ClusterConfig,
}

/// The main, top-level struct for the card finder.
#[derive(Debug, Clone, Default)]
pub struct CardPipeline {
    config: PipelineConfig,
}

impl CardPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Scans a row-major RGBA buffer and clusters each category's pixels.
    pub fn process_frame(
        &self,
        frame_buffer: &[u8],
        width: u32,
        height: u32,
    ) -> Result<CategoryAreas, FrameError> {
        let frame = Frame::new(frame_buffer, width, height)?;
        Ok(self.process(&frame))
    }

    /// Same as `process_frame` for an already validated frame.
    pub fn process(&self, frame: &Frame<'_>) -> CategoryAreas {
        let points = frame_scanner::scan(frame, self.config.scan_order);
        points
            .into_iter()
            .map(|(category, coords)| {
                let areas = area_builder::find_contiguous_areas(&coords, &self.config.cluster);
                debug!(
                    %category,
                    pixels = coords.len(),
                    areas = areas.len(),
                    "grouped category"
                );
                (category, areas)
            })
            .collect()
    }
}

/// Scans one frame with the default configuration.
pub fn scan_frame(buffer: &[u8], width: u32, height: u32) -> Result<CategoryAreas, FrameError> {
    CardPipeline::default().process_frame(buffer, width, height)
}
