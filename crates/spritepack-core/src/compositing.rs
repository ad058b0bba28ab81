use crate::packer::PageLayout;
use crate::texture::SpriteTexture;
use image::RgbaImage;
use std::sync::Arc;

/// Blit `src` into `canvas` with its top-left at (dx, dy), optionally rotated
/// 90° clockwise. The source is read-only; rotation happens during the copy.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32, rotated: bool) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    // destination (rendered) size differs when rotated
    let (rw, rh) = if rotated { (sh, sw) } else { (sw, sh) };

    for yy in 0..rh {
        for xx in 0..rw {
            let (ix, iy) = if rotated {
                (yy, sh - 1 - xx)
            } else {
                (xx, yy)
            };
            if dx + xx < cw && dy + yy < ch {
                let px = *src.get_pixel(ix, iy);
                canvas.put_pixel(dx + xx, dy + yy, px);
            }
        }
    }
}

/// Rasterizes one page layout: a blank canvas of the page's dimensions with
/// every placed texture blitted at its assigned position and rotation.
pub fn compose_page(layout: &PageLayout, textures: &[Arc<SpriteTexture>]) -> RgbaImage {
    let mut canvas = RgbaImage::new(layout.width, layout.height);
    for rect in &layout.rects {
        let tex = &textures[rect.token];
        blit_rgba(tex.surface(), &mut canvas, rect.x, rect.y, rect.rotated);
    }
    canvas
}
