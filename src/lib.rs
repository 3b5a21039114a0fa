#![forbid(unsafe_code)]

pub mod compare;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod raster;

pub use compare::{
    ActualSource, CompareFlags, CompareInput, CompareOptions, CompareResult, DiffOutcome,
    DiffPixel, DiffRequest, FolderConfig, PixelDiffEngine, TestContext, execute_compare,
};
pub use error::{VisregError, VisregResult};
pub use geometry::{DeviceClass, DeviceRectangles, IgnoreBox, Rectangle, ResizeDimensions};
pub use logging::{CompareLogger, MemoryLogger, TracingLogger};
pub use raster::{BezelStore, PngImage, RasterImage, Tile};
