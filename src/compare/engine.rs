use crate::{
    compare::options::CompareOptions,
    error::VisregResult,
    geometry::IgnoreBox,
};

/// Channel flags forwarded verbatim to the diff engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnoreChannels {
    pub alpha: bool,
    pub antialiasing: bool,
    pub colors: bool,
    pub less: bool,
    pub nothing: bool,
}

impl IgnoreChannels {
    pub fn from_options(options: &CompareOptions) -> Self {
        Self {
            alpha: options.ignore_alpha,
            antialiasing: options.ignore_antialiasing,
            colors: options.ignore_colors,
            less: options.ignore_less,
            nothing: options.ignore_nothing,
        }
    }
}

/// What the orchestrator asks of the diff engine.
#[derive(Clone, Debug, Default)]
pub struct DiffRequest {
    pub ignore: IgnoreChannels,
    pub ignored_boxes: Vec<IgnoreBox>,
    pub scale_to_same_size: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct DiffPixel {
    pub x: u32,
    pub y: u32,
}

/// What the diff engine reports back. `diff_image` is the rendered diff
/// raster as encoded PNG bytes.
#[derive(Clone, Debug, Default)]
pub struct DiffOutcome {
    pub raw_mis_match_percentage: f64,
    pub diff_pixels: Vec<DiffPixel>,
    pub diff_bounds: IgnoreBox,
    pub analysis_time_ms: u64,
    pub diff_image: Vec<u8>,
}

/// External pixel-diff collaborator. Consumed as a black box: this crate
/// never looks inside the mismatch computation.
pub trait PixelDiffEngine {
    fn diff(
        &self,
        baseline: &[u8],
        actual: &[u8],
        request: &DiffRequest,
    ) -> VisregResult<DiffOutcome>;
}

/// The mismatch value a caller sees: raw, or rounded to 3 decimal places.
pub fn reported_mismatch(raw: f64, report_raw: bool) -> f64 {
    if report_raw {
        raw
    } else {
        (raw * 1000.0).round() / 1000.0
    }
}
