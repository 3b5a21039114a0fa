use crate::geometry::{
    device::DeviceClass,
    rect::{DeviceRectangles, Rectangle},
};

/// Which chrome bars a capture wants masked out of the diff.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChromeBarFlags {
    pub block_out_status_bar: bool,
    pub block_out_tool_bar: bool,
    pub block_out_side_bar: bool,
}

/// Chrome bar rectangles to block out of a viewport screenshot.
///
/// Only iOS and Android native-web screenshots contain OS chrome; everything
/// else, and any native-app capture, returns no rectangles. Enabled bars come
/// back in a fixed order: status/address bar, tool bar, side padding.
pub fn resolve_chrome_bar_rectangles(
    device: &DeviceRectangles,
    flags: ChromeBarFlags,
    device_class: DeviceClass,
    is_viewport_screenshot: bool,
    is_native_context: bool,
) -> Vec<Rectangle> {
    if !is_viewport_screenshot
        || is_native_context
        || !device_class.screenshot_includes_chrome()
    {
        return Vec::new();
    }

    let mut bars = Vec::new();
    if flags.block_out_status_bar {
        bars.push(device.status_bar_and_address_bar);
    }
    if flags.block_out_tool_bar {
        bars.push(device.tool_bar);
    }
    if flags.block_out_side_bar {
        // iPad landscape split view pads the page on both sides.
        bars.push(device.left_side_padding);
        bars.push(device.right_side_padding);
    }
    bars
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> DeviceRectangles {
        DeviceRectangles {
            status_bar_and_address_bar: Rectangle::new(0, 0, 375, 94),
            tool_bar: Rectangle::new(0, 723, 375, 44),
            left_side_padding: Rectangle::new(0, 0, 16, 767),
            right_side_padding: Rectangle::new(359, 0, 16, 767),
            ..DeviceRectangles::default()
        }
    }

    const ALL: ChromeBarFlags = ChromeBarFlags {
        block_out_status_bar: true,
        block_out_tool_bar: true,
        block_out_side_bar: true,
    };

    #[test]
    fn ios_viewport_screenshot_returns_bars_in_fixed_order() {
        let bars =
            resolve_chrome_bar_rectangles(&device(), ALL, DeviceClass::Ios, true, false);
        assert_eq!(
            bars,
            vec![
                Rectangle::new(0, 0, 375, 94),
                Rectangle::new(0, 723, 375, 44),
                Rectangle::new(0, 0, 16, 767),
                Rectangle::new(359, 0, 16, 767),
            ]
        );
    }

    #[test]
    fn disabled_flags_return_nothing() {
        let bars = resolve_chrome_bar_rectangles(
            &device(),
            ChromeBarFlags::default(),
            DeviceClass::Ios,
            true,
            false,
        );
        assert!(bars.is_empty());
    }

    #[test]
    fn native_context_never_blocks_chrome() {
        let bars = resolve_chrome_bar_rectangles(&device(), ALL, DeviceClass::Ios, true, true);
        assert!(bars.is_empty());
    }

    #[test]
    fn non_viewport_screenshot_returns_nothing() {
        let bars =
            resolve_chrome_bar_rectangles(&device(), ALL, DeviceClass::AndroidNativeWeb, false, false);
        assert!(bars.is_empty());
    }

    #[test]
    fn desktop_and_chromedriver_screenshots_carry_no_chrome() {
        for class in [
            DeviceClass::Desktop,
            DeviceClass::Emulated,
            DeviceClass::AndroidChromeDriver,
        ] {
            let bars = resolve_chrome_bar_rectangles(&device(), ALL, class, true, false);
            assert!(bars.is_empty());
        }
    }
}
