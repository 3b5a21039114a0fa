use crate::{
    error::{VisregError, VisregResult},
    geometry::{device::DeviceClass, rect::Rectangle},
};

/// Raw element position as reported by the measurement layer, in the
/// coordinate space of whatever source produced it. Fractional values are
/// expected; rounding happens after DPR scaling.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RawRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Where the raw element position came from. Native mobile drivers report
/// absolute screen coordinates, ChromeDriver and emulated browsers report
/// viewport-relative DOM coordinates, and desktop captures carry both DOM
/// and window-relative variants so the resolver can pick per scroll state.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ElementSource {
    /// Absolute screen coordinates (iOS, Android native web screenshots).
    Native(RawRect),
    /// Viewport-relative coordinates (Android ChromeDriver, emulated).
    Viewport(RawRect),
    /// Desktop captures both; the scroll check decides which applies.
    Desktop { dom: RawRect, window: RawRect },
}

#[derive(Clone, Debug)]
pub struct ElementContext {
    pub device_class: DeviceClass,
    pub dpr: f64,
    /// Height of the decoded screenshot, in device pixels.
    pub screenshot_height: u32,
    /// Reported viewport height, in CSS pixels.
    pub inner_height: u32,
    pub selector: Option<String>,
}

/// Resolves a raw element position into a DPR-correct pixel rectangle.
///
/// Fails with [`VisregError::InvisibleElement`] when the scaled rectangle has
/// no width or no height; the message names the selector when one is known.
pub fn resolve_element_rectangle(
    source: &ElementSource,
    ctx: &ElementContext,
) -> VisregResult<Rectangle> {
    let raw = select_raw_position(source, ctx)?;

    let scale = |v: f64| (v * ctx.dpr).round().max(0.0) as u32;
    let rect = Rectangle {
        x: scale(raw.x),
        y: scale(raw.y),
        width: scale(raw.width),
        height: scale(raw.height),
    };

    if rect.width == 0 || rect.height == 0 {
        let label = match &ctx.selector {
            Some(selector) => format!(" with selector \"$({selector})\""),
            None => String::new(),
        };
        return Err(VisregError::invisible_element(format!(
            "the element{label} resolved to a width or height of 0 and is not visible; \
             it cannot be captured or compared"
        )));
    }

    Ok(rect)
}

fn select_raw_position(source: &ElementSource, ctx: &ElementContext) -> VisregResult<RawRect> {
    match (ctx.device_class, source) {
        (DeviceClass::Ios | DeviceClass::AndroidNativeWeb, ElementSource::Native(raw)) => Ok(*raw),
        (
            DeviceClass::AndroidChromeDriver | DeviceClass::Emulated,
            ElementSource::Viewport(raw),
        ) => Ok(*raw),
        (DeviceClass::Desktop, ElementSource::Desktop { dom, window }) => {
            // A screenshot taller than the viewport means the page scrolled
            // during capture, so only DOM-absolute coordinates line up.
            let scrolled =
                ctx.screenshot_height > (f64::from(ctx.inner_height) * ctx.dpr).round() as u32;
            Ok(if scrolled { *dom } else { *window })
        }
        (class, _) => Err(VisregError::validation(format!(
            "element position source does not match device class {class:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(device_class: DeviceClass) -> ElementContext {
        ElementContext {
            device_class,
            dpr: 2.0,
            screenshot_height: 1334,
            inner_height: 667,
            selector: None,
        }
    }

    #[test]
    fn native_source_is_dpr_scaled_and_rounded() {
        let source = ElementSource::Native(RawRect {
            x: 10.4,
            y: 20.6,
            width: 100.0,
            height: 50.25,
        });
        let rect = resolve_element_rectangle(&source, &ctx(DeviceClass::Ios)).unwrap();
        assert_eq!(rect, Rectangle::new(21, 41, 200, 101));
    }

    #[test]
    fn desktop_uses_window_position_when_not_scrolled() {
        let source = ElementSource::Desktop {
            dom: RawRect {
                x: 0.0,
                y: 900.0,
                width: 10.0,
                height: 10.0,
            },
            window: RawRect {
                x: 0.0,
                y: 100.0,
                width: 10.0,
                height: 10.0,
            },
        };
        let rect = resolve_element_rectangle(&source, &ctx(DeviceClass::Desktop)).unwrap();
        assert_eq!(rect.y, 200);
    }

    #[test]
    fn desktop_uses_dom_position_when_scrolled() {
        let source = ElementSource::Desktop {
            dom: RawRect {
                x: 0.0,
                y: 900.0,
                width: 10.0,
                height: 10.0,
            },
            window: RawRect {
                x: 0.0,
                y: 100.0,
                width: 10.0,
                height: 10.0,
            },
        };
        let mut scrolled = ctx(DeviceClass::Desktop);
        scrolled.screenshot_height = 4_000;
        let rect = resolve_element_rectangle(&source, &scrolled).unwrap();
        assert_eq!(rect.y, 1_800);
    }

    #[test]
    fn zero_height_fails_without_selector_tag() {
        let source = ElementSource::Native(RawRect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 0.0,
        });
        let err = resolve_element_rectangle(&source, &ctx(DeviceClass::Ios)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("width or height of 0"));
        assert!(!msg.contains("$("));
    }

    #[test]
    fn zero_width_fails_with_selector_in_message() {
        let source = ElementSource::Viewport(RawRect {
            x: 5.0,
            y: 5.0,
            width: 0.0,
            height: 10.0,
        });
        let mut context = ctx(DeviceClass::Emulated);
        context.selector = Some("#login-button".to_string());
        let err = resolve_element_rectangle(&source, &context).unwrap_err();
        assert!(err.to_string().contains("$(#login-button)"));
        assert!(matches!(err, VisregError::InvisibleElement(_)));
    }

    #[test]
    fn mismatched_source_and_class_is_a_validation_error() {
        let source = ElementSource::Native(RawRect {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        });
        let err = resolve_element_rectangle(&source, &ctx(DeviceClass::Desktop)).unwrap_err();
        assert!(matches!(err, VisregError::Validation(_)));
    }
}
