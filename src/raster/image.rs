use std::io::Cursor;

use anyhow::Context;
use base64::Engine;

use crate::error::{VisregError, VisregResult};

/// How a source raster lands on a destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blend {
    /// Straight overwrite, alpha included. Used for tile stitching.
    Replace,
    /// Alpha-over compositing. Used for bezels and overlays.
    Over,
}

/// Abstract raster handle. The transform engine is written against this
/// trait so the codec backing it never leaks across component boundaries;
/// every public operation speaks encoded PNG bytes.
pub trait RasterImage: Sized {
    fn decode(bytes: &[u8]) -> VisregResult<Self>;
    fn encode(&self) -> VisregResult<Vec<u8>>;
    fn blank(width: u32, height: u32) -> VisregResult<Self>;
    fn dimensions(&self) -> (u32, u32);
    fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> VisregResult<Self>;
    /// Rotates 90 degrees clockwise.
    fn rotate90(&self) -> Self;
    /// Draws `src` at `(x, y)`, clipping whatever falls outside.
    fn composite(&mut self, src: &Self, x: i64, y: i64, blend: Blend);
    /// Blends a constant RGBA color over a rectangle; the color's alpha
    /// channel controls opacity.
    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: [u8; 4]);
}

/// [`RasterImage`] backed by the `image` crate, PNG on the wire.
#[derive(Clone, Debug)]
pub struct PngImage {
    pixels: image::RgbaImage,
}

impl PngImage {
    pub fn from_pixels(pixels: image::RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn pixels(&self) -> &image::RgbaImage {
        &self.pixels
    }
}

impl RasterImage for PngImage {
    fn decode(bytes: &[u8]) -> VisregResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode screenshot from memory")?;
        Ok(Self {
            pixels: dyn_img.to_rgba8(),
        })
    }

    fn encode(&self) -> VisregResult<Vec<u8>> {
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(self.pixels.clone())
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode raster to png")?;
        Ok(buf)
    }

    fn blank(width: u32, height: u32) -> VisregResult<Self> {
        if width == 0 || height == 0 {
            return Err(VisregError::validation(
                "canvas dimensions must be non-zero",
            ));
        }
        Ok(Self {
            pixels: image::RgbaImage::new(width, height),
        })
    }

    fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> VisregResult<Self> {
        let (img_width, img_height) = self.dimensions();
        if width == 0 || height == 0 {
            return Err(VisregError::validation("crop area must be non-empty"));
        }
        if u64::from(x) + u64::from(width) > u64::from(img_width)
            || u64::from(y) + u64::from(height) > u64::from(img_height)
        {
            return Err(VisregError::validation(format!(
                "crop {width}x{height}+{x}+{y} exceeds raster bounds {img_width}x{img_height}"
            )));
        }
        Ok(Self {
            pixels: image::imageops::crop_imm(&self.pixels, x, y, width, height).to_image(),
        })
    }

    fn rotate90(&self) -> Self {
        Self {
            pixels: image::imageops::rotate90(&self.pixels),
        }
    }

    fn composite(&mut self, src: &Self, x: i64, y: i64, blend: Blend) {
        match blend {
            Blend::Replace => image::imageops::replace(&mut self.pixels, &src.pixels, x, y),
            Blend::Over => image::imageops::overlay(&mut self.pixels, &src.pixels, x, y),
        }
    }

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: [u8; 4]) {
        use image::Pixel;

        let (img_width, img_height) = self.dimensions();
        let x_end = x.saturating_add(width).min(img_width);
        let y_end = y.saturating_add(height).min(img_height);
        let src = image::Rgba(color);
        for py in y.min(img_height)..y_end {
            for px in x.min(img_width)..x_end {
                self.pixels.get_pixel_mut(px, py).blend(&src);
            }
        }
    }
}

/// Encodes PNG bytes as the portable base64 payload.
pub fn to_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Decodes a base64 screenshot payload back to PNG bytes.
pub fn from_base64(payload: &str) -> VisregResult<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .context("decode base64 screenshot payload")
        .map_err(VisregError::from)
}

#[cfg(test)]
pub(crate) fn solid_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let pixels = image::RgbaImage::from_pixel(width, height, image::Rgba(color));
    PngImage::from_pixels(pixels).encode().unwrap()
}
