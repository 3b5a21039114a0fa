use crate::geometry::{ChromeBarFlags, Rectangle};

/// Options steering one comparison.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompareOptions {
    pub ignore_alpha: bool,
    pub ignore_antialiasing: bool,
    pub ignore_colors: bool,
    pub ignore_less: bool,
    pub ignore_nothing: bool,
    pub scale_images_to_same_size: bool,
    /// Mismatch percentage above which diff/actual artifacts are persisted.
    /// `None` means never auto-persist on diff unless forced.
    pub save_above_tolerance: Option<f64>,
    /// Report the raw mismatch instead of rounding to 3 decimals.
    pub raw_mis_match_percentage: bool,
    pub return_all_compare_data: bool,
    pub create_json_report_files: bool,
    /// Clustering radius, in pixels, for grouping diff pixels into bounding
    /// boxes in the JSON report.
    pub diff_pixel_bounding_box_proximity: u32,
    pub block_out: Vec<Rectangle>,
    pub ignore_regions: Vec<Rectangle>,
    pub block_out_status_bar: bool,
    pub block_out_tool_bar: bool,
    pub block_out_side_bar: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            ignore_alpha: false,
            ignore_antialiasing: false,
            ignore_colors: false,
            ignore_less: false,
            ignore_nothing: false,
            scale_images_to_same_size: false,
            save_above_tolerance: Some(0.0),
            raw_mis_match_percentage: false,
            return_all_compare_data: false,
            create_json_report_files: false,
            diff_pixel_bounding_box_proximity: 5,
            block_out: Vec::new(),
            ignore_regions: Vec::new(),
            block_out_status_bar: false,
            block_out_tool_bar: false,
            block_out_side_bar: false,
        }
    }
}

impl CompareOptions {
    pub fn chrome_bar_flags(&self) -> ChromeBarFlags {
        ChromeBarFlags {
            block_out_status_bar: self.block_out_status_bar,
            block_out_tool_bar: self.block_out_tool_bar,
            block_out_side_bar: self.block_out_side_bar,
        }
    }
}

/// Deprecated top-level block-out flags. Both the old top-level spelling and
/// the nested `compareOptions` form are accepted; the nested form wins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyBlockOutFlags {
    pub block_out_status_bar: Option<bool>,
    pub block_out_tool_bar: Option<bool>,
    pub block_out_side_bar: Option<bool>,
}

/// Folds deprecated top-level flags into options parsed from the nested form.
/// A flag explicitly present in the nested form is left alone.
pub fn apply_legacy_block_out(
    options: &mut CompareOptions,
    top_level: &LegacyBlockOutFlags,
    nested: &LegacyBlockOutFlags,
) {
    options.block_out_status_bar = nested
        .block_out_status_bar
        .or(top_level.block_out_status_bar)
        .unwrap_or(options.block_out_status_bar);
    options.block_out_tool_bar = nested
        .block_out_tool_bar
        .or(top_level.block_out_tool_bar)
        .unwrap_or(options.block_out_tool_bar);
    options.block_out_side_bar = nested
        .block_out_side_bar
        .or(top_level.block_out_side_bar)
        .unwrap_or(options.block_out_side_bar);
}
