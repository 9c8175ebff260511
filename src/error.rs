use std::path::PathBuf;
use thiserror::Error;

/// Contract violations on a frame handed to the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// The buffer cannot hold `width * height` pixels of four bytes each.
    #[error(
        "invalid frame dimensions {width}x{height}: expected at least {expected} bytes, got {actual}"
    )]
    InvalidFrameDimensions {
        width: u32,
        height: u32,
        expected: u64,
        actual: usize,
    },
}

/// Failures of the capture/render plumbing around the core.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("failed to load image {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to save image {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("render target is {target_width}x{target_height} but frame is {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        target_width: u32,
        target_height: u32,
    },
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error("worker pool is shut down")]
    PoolClosed,
}
