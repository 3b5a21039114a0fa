use std::path::{Path, PathBuf};

use crate::{
    error::VisregResult,
    logging::CompareLogger,
    raster::image::{Blend, RasterImage},
};

/// Devices we ship bezel artwork for, in normalized-name form.
const SUPPORTED_DEVICES: &[&str] = &[
    "iphonex",
    "iphonexs",
    "iphonexsmax",
    "iphonexr",
    "iphone11",
    "iphone11pro",
    "iphone11promax",
    "iphone12",
    "iphone12mini",
    "iphone12pro",
    "iphone12promax",
    "iphone13",
    "iphone13mini",
    "iphone13pro",
    "iphone13promax",
    "iphone14",
    "iphone14plus",
    "iphone14pro",
    "iphone14promax",
    "iphone15",
    "ipadair",
    "ipadmini",
    "ipadpro11",
    "ipadpro129",
];

/// On-disk location of the bezel overlay assets. Loading these is the only
/// file I/O the raster engine performs.
#[derive(Clone, Debug)]
pub struct BezelStore {
    root: PathBuf,
}

impl BezelStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn asset_path(&self, device: &str, part: &str) -> PathBuf {
        self.root.join(format!("{device}.{part}.png"))
    }
}

/// Normalizes a platform-reported device name to allow-list form: lowercase,
/// marketing noise ("Simulator", screen-inch sizes, "(3rd generation)")
/// stripped, non-alphanumerics dropped.
pub fn normalize_device_name(raw: &str) -> String {
    let mut name = raw.to_ascii_lowercase();
    for noise in ["simulator", "generation", "inch"] {
        name = name.replace(noise, "");
    }

    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        // Ordinal generation markers ("3rd", "10th") disappear entirely.
        if c.is_ascii_digit() {
            let mut j = i;
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            let suffix: String = chars.iter().skip(j).take(2).collect();
            if matches!(suffix.as_str(), "st" | "nd" | "rd" | "th") {
                i = j + 2;
                continue;
            }
            out.extend(&chars[i..j]);
            i = j;
            continue;
        }
        if c.is_ascii_alphanumeric() {
            out.push(c);
        }
        i += 1;
    }
    out
}

/// Composites device bezel artwork over a screenshot.
///
/// Top bezel lands top-left; the bottom bezel is bottom-aligned, or
/// right-aligned in landscape, where both parts are rotated with the
/// screenshot. iPads carry an extra physical-size gate so split-view captures
/// do not get framed. Any reason not to composite — unknown device, iPad
/// gate, missing artwork — returns the input bytes untouched with exactly one
/// warning; bezel failure never fails a capture.
pub fn composite_bezel<R: RasterImage>(
    bytes: &[u8],
    device_name: &str,
    dpr: f64,
    is_landscape: bool,
    store: &BezelStore,
    log: &dyn CompareLogger,
) -> VisregResult<Vec<u8>> {
    let normalized = normalize_device_name(device_name);
    if !SUPPORTED_DEVICES.contains(&normalized.as_str()) {
        log.warn(&format!(
            "no bezel artwork is available for device \"{device_name}\" (normalized: \
             \"{normalized}\"); the screenshot is left as-is"
        ));
        return Ok(bytes.to_vec());
    }

    let mut img = R::decode(bytes)?;
    let (width, height) = img.dimensions();

    if normalized.starts_with("ipad")
        && f64::from(width) / dpr < 1133.0
        && f64::from(height) / dpr < 1133.0
    {
        log.warn(&format!(
            "device \"{device_name}\" reports an iPad bezel but the capture is too small for \
             one; the screenshot is left as-is"
        ));
        return Ok(bytes.to_vec());
    }

    let top_path = store.asset_path(&normalized, "top");
    let bottom_path = store.asset_path(&normalized, "bottom");
    let (top, bottom) = match (load_asset::<R>(&top_path), load_asset::<R>(&bottom_path)) {
        (Some(top), Some(bottom)) => (top, bottom),
        _ => {
            log.warn(&format!(
                "bezel artwork for \"{normalized}\" could not be loaded from {}; the \
                 screenshot is left as-is",
                store.root.display()
            ));
            return Ok(bytes.to_vec());
        }
    };

    let (top, bottom) = if is_landscape {
        (top.rotate90(), bottom.rotate90())
    } else {
        (top, bottom)
    };

    img.composite(&top, 0, 0, Blend::Over);
    let (bottom_w, bottom_h) = bottom.dimensions();
    let (x, y) = if is_landscape {
        (i64::from(width) - i64::from(bottom_w), 0)
    } else {
        (0, i64::from(height) - i64::from(bottom_h))
    };
    img.composite(&bottom, x, y, Blend::Over);

    img.encode()
}

fn load_asset<R: RasterImage>(path: &Path) -> Option<R> {
    let bytes = std::fs::read(path).ok()?;
    R::decode(&bytes).ok()
}
