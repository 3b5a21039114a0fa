//! Raster transform engine: crop, rotate, bezel composite, full-page
//! stitching and ignore-box overlays on encoded PNG screenshots.

pub mod bezel;
pub mod image;
pub mod overlay;
pub mod stitch;
pub mod transform;

pub use bezel::{BezelStore, composite_bezel, normalize_device_name};
pub use image::{Blend, PngImage, RasterImage, from_base64, to_base64};
pub use overlay::{IGNORE_OVERLAY_COLOR, overlay_ignore_boxes};
pub use stitch::{Tile, stitch_full_page};
pub use transform::{crop_to_rectangle, rotate_if_needed};
