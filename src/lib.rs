// THEORY:
// This file is the main entry point for the `card_finder` library crate. It follows
// the standard Rust convention of using `lib.rs` to define the public API exposed to
// external consumers (like the `card_tester` binary).
//
// The primary export is the `CardPipeline` and its configuration: hand it a raw
// RGBA frame buffer and get back the bounding boxes of every blue and red card-sized
// area. The building blocks (`core_modules`) stay public for callers that want to run
// the scanner or the area builder on their own. The `adapters`, `polling` and
// `parallel_pipeline` modules are the plumbing that connects the synchronous core to
// frame sources, renderers and the async runtime.

pub mod adapters;
pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;
pub mod polling;

pub use core_modules::bounding_box::{BoundingBox, Point};
pub use core_modules::color_classifier::Category;
pub use error::{AdapterError, FrameError};
pub use pipeline::{CardPipeline, CategoryAreas, PipelineConfig, scan_frame};
