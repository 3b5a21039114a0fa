use crate::logging::CompareLogger;

/// Axis-aligned pixel rectangle. All values are device pixels after the
/// resolver has applied DPR scaling and rounding.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(default)]
pub struct Rectangle {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_zero_sized(self) -> bool {
        self.width == 0 && self.height == 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

/// Edge-coordinate form of a [`Rectangle`], used to mask regions out of the
/// pixel diff.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(default)]
pub struct IgnoreBox {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl IgnoreBox {
    pub fn width(self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    pub fn is_zero_sized(self) -> bool {
        self.width() == 0 && self.height() == 0
    }

    /// Converts a rectangle, scaling every edge by `factor`.
    pub fn from_rectangle(rect: Rectangle, factor: f64) -> Self {
        let scale = |v: u32| (f64::from(v) * factor).round() as u32;
        Self {
            top: scale(rect.y),
            right: scale(rect.x + rect.width),
            bottom: scale(rect.y + rect.height),
            left: scale(rect.x),
        }
    }
}

/// Extra crop padding in CSS pixels, applied around a resolved rectangle.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(default)]
pub struct ResizeDimensions {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

/// Chrome/bar measurements reported by the platform for one device profile.
/// Immutable for the duration of a capture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DeviceRectangles {
    pub status_bar: Rectangle,
    pub status_bar_and_address_bar: Rectangle,
    pub tool_bar: Rectangle,
    pub home_bar: Rectangle,
    pub bottom_bar: Rectangle,
    pub left_side_padding: Rectangle,
    pub right_side_padding: Rectangle,
    pub viewport: Rectangle,
    pub screen_size: ScreenSize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn start_edge(self) -> &'static str {
        match self {
            Axis::Horizontal => "LEFT",
            Axis::Vertical => "TOP",
        }
    }

    fn end_edge(self) -> &'static str {
        match self {
            Axis::Horizontal => "RIGHT",
            Axis::Vertical => "BOTTOM",
        }
    }
}

/// Shared clamping primitive for both crop axes.
///
/// Computes `start - pad_start .. start + length + pad_end` and clamps the
/// result into `[0, max]`, emitting one warning per clamped edge. The
/// returned pair always satisfies `0 <= adjusted_start <= adjusted_end <= max`.
pub fn clamp_axis(
    axis: Axis,
    start: i64,
    length: i64,
    pad_start: i64,
    pad_end: i64,
    max: u32,
    log: &dyn CompareLogger,
) -> (u32, u32) {
    let max = i64::from(max);
    let mut adjusted_start = start - pad_start;
    let mut adjusted_end = start + length + pad_end;

    if adjusted_start < 0 {
        log.warn(&format!(
            "the crop area fell outside the screenshot on the {} side and has been set to 0",
            axis.start_edge()
        ));
        adjusted_start = 0;
    }
    if adjusted_end > max {
        log.warn(&format!(
            "the crop area fell outside the screenshot on the {} side and has been set to {max}",
            axis.end_edge()
        ));
        adjusted_end = max;
    }

    // A rectangle handed in past the far edge collapses onto it.
    let adjusted_start = adjusted_start.min(max);
    let adjusted_end = adjusted_end.max(adjusted_start);

    (adjusted_start as u32, adjusted_end as u32)
}
