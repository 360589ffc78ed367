use std::path::Path;

use anyhow::Context;

use crate::assets::decode::decode_image;
use crate::foundation::core::LayerImage;
use crate::foundation::error::{StackError, StackResult};

/// Cut a horizontal strip into `tile_width x tile_height` layers, left to right.
///
/// Tiles start at the top-left corner and continue to the right edge of the sheet. A trailing
/// tile narrower than `tile_width` is kept and padded with transparent pixels. The leftmost
/// tile becomes layer 0 (the bottom of the stack).
pub fn slice_row(
    sheet: &LayerImage,
    tile_width: u32,
    tile_height: u32,
) -> StackResult<Vec<LayerImage>> {
    if tile_width == 0 || tile_height == 0 {
        return Err(StackError::validation("tile dimensions must be > 0"));
    }
    if tile_height > sheet.height {
        return Err(StackError::validation(format!(
            "tile height {tile_height} exceeds sheet height {}",
            sheet.height
        )));
    }

    let sheet_stride = sheet.width as usize * 4;
    let tile_stride = tile_width as usize * 4;
    let mut out = Vec::new();
    let mut x0 = 0u32;
    while x0 < sheet.width {
        let copy_w = (sheet.width - x0).min(tile_width) as usize * 4;
        let mut buf = vec![0u8; tile_stride * tile_height as usize];
        for row in 0..tile_height as usize {
            let src = row * sheet_stride + x0 as usize * 4;
            let dst = row * tile_stride;
            buf[dst..dst + copy_w].copy_from_slice(&sheet.rgba8_premul[src..src + copy_w]);
        }
        out.push(LayerImage::from_premul_rgba8(tile_width, tile_height, buf)?);
        x0 += tile_width;
    }

    tracing::debug!(layers = out.len(), tile_width, tile_height, "sliced sprite row");
    Ok(out)
}

/// Read an image file and slice its first row into square `dims x dims` layers.
pub fn load_sprite_row(path: &Path, dims: u32) -> StackResult<Vec<LayerImage>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read sprite sheet '{}'", path.display()))?;
    let sheet = decode_image(&bytes)?;
    slice_row(&sheet, dims, dims)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/sheet.rs"]
mod tests;
