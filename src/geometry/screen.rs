use crate::geometry::{
    device::{DeviceClass, ScreenshotMethod, effective_dpr},
    rect::Rectangle,
};

/// Pixel dimensions measured from the decoded screenshot itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeasuredScreenshot {
    pub width: u32,
    pub height: u32,
}

/// Viewport dimensions as reported by the platform, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportedViewport {
    pub inner_width: u32,
    pub inner_height: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct ScreenContext {
    pub device_class: DeviceClass,
    pub screenshot_method: ScreenshotMethod,
    pub dpr: f64,
    /// DPR captured at session start. Only consulted for the legacy
    /// screenshot method on emulated browsers.
    pub initial_dpr: f64,
    pub is_landscape: bool,
}

/// Computes the addressable screen rectangle for a capture.
///
/// Measured screenshot dimensions win over reported viewport dimensions
/// exactly where the platform is known to report them wrong: width on iOS and
/// Android ChromeDriver, height on iOS and Android native web. Everything
/// else trusts the reported viewport, scaled by DPR. A landscape capture
/// whose raster is still portrait (rotation pending) gets its axes swapped.
pub fn resolve_screen_rectangle(
    measured: MeasuredScreenshot,
    reported: ReportedViewport,
    ctx: &ScreenContext,
) -> Rectangle {
    let (measured_width, measured_height) =
        if ctx.is_landscape && measured.height > measured.width {
            (measured.height, measured.width)
        } else {
            (measured.width, measured.height)
        };

    let dpr = effective_dpr(
        ctx.device_class,
        ctx.screenshot_method,
        ctx.dpr,
        ctx.initial_dpr,
    );
    let scale = |v: u32| (f64::from(v) * dpr).round() as u32;

    let width = if ctx.device_class.trusts_measured_width() {
        measured_width
    } else {
        scale(reported.inner_width)
    };
    let height = if ctx.device_class.trusts_measured_height() {
        measured_height
    } else {
        scale(reported.inner_height)
    };

    Rectangle {
        x: 0,
        y: 0,
        width,
        height,
    }
}
