use crate::{
    error::VisregResult,
    geometry::{Axis, Rectangle, ResizeDimensions, clamp_axis},
    logging::CompareLogger,
    raster::image::RasterImage,
};

/// Rotates a capture into landscape orientation when the raster is still
/// portrait.
///
/// The decision is made from the decoded dimensions, never from a flag, so
/// re-applying the operation to an already-rotated image is a no-op. Element
/// screenshots are cropped out of an already-oriented raster and are never
/// rotated. When no rotation is needed the input bytes come back untouched.
pub fn rotate_if_needed<R: RasterImage>(
    bytes: &[u8],
    is_landscape: bool,
    is_element_screenshot: bool,
) -> VisregResult<Vec<u8>> {
    if !is_landscape || is_element_screenshot {
        return Ok(bytes.to_vec());
    }
    let img = R::decode(bytes)?;
    let (width, height) = img.dimensions();
    if height <= width {
        return Ok(bytes.to_vec());
    }
    img.rotate90().encode()
}

/// Crops a screenshot to `rect`, padded by `resize` (CSS pixels, scaled by
/// `dpr`) and clamped to the screenshot's own measured dimensions. A
/// rectangle that overshoots the raster is clamped, not rejected.
pub fn crop_to_rectangle<R: RasterImage>(
    bytes: &[u8],
    rect: Rectangle,
    resize: ResizeDimensions,
    dpr: f64,
    log: &dyn CompareLogger,
) -> VisregResult<Vec<u8>> {
    let img = R::decode(bytes)?;
    let (img_width, img_height) = img.dimensions();

    let pad = |v: u32| (f64::from(v) * dpr).round() as i64;
    let (left, right) = clamp_axis(
        Axis::Horizontal,
        i64::from(rect.x),
        i64::from(rect.width),
        pad(resize.left),
        pad(resize.right),
        img_width,
        log,
    );
    let (top, bottom) = clamp_axis(
        Axis::Vertical,
        i64::from(rect.y),
        i64::from(rect.height),
        pad(resize.top),
        pad(resize.bottom),
        img_height,
        log,
    );

    // A fully out-of-bounds rectangle collapses to a 1px sliver on the edge
    // rather than failing the capture.
    let width = (right - left).max(1).min(img_width - left.min(img_width - 1));
    let height = (bottom - top).max(1).min(img_height - top.min(img_height - 1));
    let left = left.min(img_width - width);
    let top = top.min(img_height - height);

    img.crop(left, top, width, height)?.encode()
}
