use crate::{
    error::VisregResult,
    raster::image::{Blend, RasterImage},
};

/// One scroll-position capture contributing to a stitched full-page image.
/// Crop coordinates are relative to the tile's own raster; `canvas_y_position`
/// places the cropped strip on the page canvas.
#[derive(Clone, Debug)]
pub struct Tile {
    pub data: Vec<u8>,
    pub canvas_y_position: u32,
    pub image_x: u32,
    pub image_y: u32,
    pub image_width: u32,
    pub image_height: u32,
}

/// Stitches scroll tiles into one full-page raster.
///
/// Tiles composite top to bottom in input order, straight overwrite. Crop
/// coordinates are clamped against each tile's actual decoded bounds: the
/// last tile of a page regularly claims more height than the raster
/// physically has, because its calculated position overshoots the page end.
pub fn stitch_full_page<R: RasterImage>(
    tiles: &[Tile],
    canvas_width: u32,
    canvas_height: u32,
    is_landscape: bool,
) -> VisregResult<Vec<u8>> {
    let mut canvas = R::blank(canvas_width, canvas_height)?;

    for tile in tiles {
        let img = R::decode(&tile.data)?;
        let (width, height) = img.dimensions();
        let img = if is_landscape && height > width {
            img.rotate90()
        } else {
            img
        };
        let (img_width, img_height) = img.dimensions();

        let crop_x = tile.image_x.min(img_width.saturating_sub(1));
        let crop_y = tile.image_y.min(img_height.saturating_sub(1));
        let crop_width = tile.image_width.min(img_width - crop_x).max(1);
        let crop_height = tile.image_height.min(img_height - crop_y).max(1);

        let strip = img.crop(crop_x, crop_y, crop_width, crop_height)?;
        canvas.composite(&strip, 0, i64::from(tile.canvas_y_position), Blend::Replace);
    }

    canvas.encode()
}
