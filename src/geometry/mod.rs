//! Geometry resolver: turns heterogeneous platform measurements into one
//! DPR-correct pixel-rectangle model. Pure computation, no I/O.

pub mod chrome;
pub mod device;
pub mod element;
pub mod ignore;
pub mod rect;
pub mod screen;

pub use chrome::{ChromeBarFlags, resolve_chrome_bar_rectangles};
pub use device::{DeviceClass, ScreenshotMethod, effective_dpr};
pub use element::{ElementContext, ElementSource, RawRect, resolve_element_rectangle};
pub use ignore::{MergedIgnoreRegions, merge_ignore_regions};
pub use rect::{
    Axis, DeviceRectangles, IgnoreBox, Rectangle, ResizeDimensions, ScreenSize, clamp_axis,
};
pub use screen::{MeasuredScreenshot, ReportedViewport, ScreenContext, resolve_screen_rectangle};
