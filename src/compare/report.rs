use crate::{
    compare::{
        engine::DiffPixel,
        options::CompareOptions,
        paths::{FilePaths, TestContext},
    },
    geometry::IgnoreBox,
};

/// Structured JSON report written next to the actual artifact when
/// `createJsonReportFiles` is enabled.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport<'a> {
    pub bounding_boxes: BoundingBoxes,
    pub data: ReportData,
    pub file_name: String,
    pub file_paths: &'a FilePaths,
    pub device_pixel_ratio: f64,
    pub image_compare_options: &'a CompareOptions,
    pub test_context: &'a TestContext,
    pub store_diffs: bool,
}

#[derive(Clone, Debug, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBoxes {
    pub diff_bounding_boxes: Vec<IgnoreBox>,
    pub ignored_boxes: Vec<IgnoreBox>,
}

#[derive(Clone, Debug, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub mis_match_percentage: f64,
    pub raw_mis_match_percentage: f64,
    pub diff_pixel_count: usize,
    pub analysis_time_ms: u64,
}

/// Clusters diff pixels into bounding boxes, merging any pixel that falls
/// within `proximity` of an existing box and then collapsing boxes that grew
/// into each other.
pub fn cluster_diff_pixels(pixels: &[DiffPixel], proximity: u32) -> Vec<IgnoreBox> {
    let mut boxes: Vec<IgnoreBox> = Vec::new();

    for pixel in pixels {
        match boxes
            .iter_mut()
            .find(|boxed| pixel_near_box(*pixel, **boxed, proximity))
        {
            Some(boxed) => grow_box(boxed, *pixel),
            None => boxes.push(IgnoreBox {
                top: pixel.y,
                right: pixel.x,
                bottom: pixel.y,
                left: pixel.x,
            }),
        }
    }

    // Growing can bring previously separate clusters into range of each
    // other; merge until stable.
    loop {
        let mut merged = false;
        let mut out: Vec<IgnoreBox> = Vec::with_capacity(boxes.len());
        for boxed in boxes {
            match out
                .iter_mut()
                .find(|existing| boxes_near(**existing, boxed, proximity))
            {
                Some(existing) => {
                    existing.left = existing.left.min(boxed.left);
                    existing.top = existing.top.min(boxed.top);
                    existing.right = existing.right.max(boxed.right);
                    existing.bottom = existing.bottom.max(boxed.bottom);
                    merged = true;
                }
                None => out.push(boxed),
            }
        }
        boxes = out;
        if !merged {
            return boxes;
        }
    }
}

fn pixel_near_box(pixel: DiffPixel, boxed: IgnoreBox, proximity: u32) -> bool {
    pixel.x + proximity >= boxed.left
        && pixel.x <= boxed.right + proximity
        && pixel.y + proximity >= boxed.top
        && pixel.y <= boxed.bottom + proximity
}

fn boxes_near(a: IgnoreBox, b: IgnoreBox, proximity: u32) -> bool {
    a.left <= b.right + proximity
        && b.left <= a.right + proximity
        && a.top <= b.bottom + proximity
        && b.top <= a.bottom + proximity
}

fn grow_box(boxed: &mut IgnoreBox, pixel: DiffPixel) {
    boxed.left = boxed.left.min(pixel.x);
    boxed.right = boxed.right.max(pixel.x);
    boxed.top = boxed.top.min(pixel.y);
    boxed.bottom = boxed.bottom.max(pixel.y);
}
