/// Platform family a capture came from. Resolved once per capture and
/// dispatched on, instead of re-deriving platform checks in every function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DeviceClass {
    Ios,
    AndroidNativeWeb,
    AndroidChromeDriver,
    Desktop,
    Emulated,
}

impl DeviceClass {
    pub fn is_ios(self) -> bool {
        matches!(self, DeviceClass::Ios)
    }

    pub fn is_android(self) -> bool {
        matches!(
            self,
            DeviceClass::AndroidNativeWeb | DeviceClass::AndroidChromeDriver
        )
    }

    pub fn is_mobile(self) -> bool {
        self.is_ios() || self.is_android()
    }

    /// The decoded screenshot width is authoritative for these classes; the
    /// reported `innerWidth` is not.
    pub fn trusts_measured_width(self) -> bool {
        matches!(self, DeviceClass::Ios | DeviceClass::AndroidChromeDriver)
    }

    /// The decoded screenshot height is authoritative for these classes.
    pub fn trusts_measured_height(self) -> bool {
        matches!(self, DeviceClass::Ios | DeviceClass::AndroidNativeWeb)
    }

    /// OS chrome (status bar, address bar, tool bar) is part of the raster
    /// for these classes, so viewport captures must block it out.
    pub fn screenshot_includes_chrome(self) -> bool {
        matches!(self, DeviceClass::Ios | DeviceClass::AndroidNativeWeb)
    }
}

/// Capability flag for the two screenshot protocol generations. The legacy
/// method on emulated browsers reports dimensions against the DPR the session
/// started with, not the current one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ScreenshotMethod {
    #[default]
    Current,
    Legacy,
}

/// DPR to scale reported dimensions with.
pub fn effective_dpr(
    class: DeviceClass,
    method: ScreenshotMethod,
    dpr: f64,
    initial_dpr: f64,
) -> f64 {
    match (class, method) {
        (DeviceClass::Emulated, ScreenshotMethod::Legacy) => initial_dpr,
        _ => dpr,
    }
}
