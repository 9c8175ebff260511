pub mod bounding_box;
pub mod color_classifier;
pub mod contiguous_areas;
pub mod frame_scanner;
pub mod pixel;
pub mod utils;
