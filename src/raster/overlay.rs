use crate::{
    error::VisregResult,
    geometry::IgnoreBox,
    raster::image::RasterImage,
};

/// Translucent green used to document ignored regions on diff artifacts.
pub const IGNORE_OVERLAY_COLOR: [u8; 4] = [57, 170, 86, 128];

/// Draws a translucent rectangle over each ignore box.
///
/// Purely visual documentation of what was excluded from the diff; the
/// comparison itself never sees these pixels.
pub fn overlay_ignore_boxes<R: RasterImage>(
    bytes: &[u8],
    boxes: &[IgnoreBox],
    color: [u8; 4],
) -> VisregResult<Vec<u8>> {
    if boxes.is_empty() {
        return Ok(bytes.to_vec());
    }
    let mut img = R::decode(bytes)?;
    for boxed in boxes {
        img.fill_rect(boxed.left, boxed.top, boxed.width(), boxed.height(), color);
    }
    img.encode()
}
