use crate::geometry::rect::{IgnoreBox, Rectangle};

/// Combined mask handed to the diff engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedIgnoreRegions {
    pub ignored_boxes: Vec<IgnoreBox>,
    pub has_ignore_rectangles: bool,
}

/// Merges block-outs, caller ignore regions and chrome bars into one list of
/// edge-form boxes.
///
/// Android positions already arrive in device pixels, so they scale by 1;
/// every other platform scales by `dpr`. Boxes with zero width and zero
/// height are dropped.
pub fn merge_ignore_regions(
    block_out: &[Rectangle],
    ignore_regions: &[Rectangle],
    chrome_bars: &[Rectangle],
    dpr: f64,
    is_android: bool,
) -> MergedIgnoreRegions {
    let factor = if is_android { 1.0 } else { dpr };

    let ignored_boxes: Vec<IgnoreBox> = block_out
        .iter()
        .chain(ignore_regions)
        .chain(chrome_bars)
        .map(|rect| IgnoreBox::from_rectangle(*rect, factor))
        .filter(|boxed| !boxed.is_zero_sized())
        .collect();

    MergedIgnoreRegions {
        has_ignore_rectangles: !ignored_boxes.is_empty(),
        ignored_boxes,
    }
}
