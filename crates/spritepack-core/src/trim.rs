use crate::model::{Bounds, Padding};
use image::RgbaImage;

/// Computes the tightest bounding box around pixels with non-zero alpha.
///
/// Scans every pixel; content can sit at any offset, so there is no early
/// exit. Returns `None` for a fully transparent image.
pub fn opaque_bounds(rgba: &RgbaImage) -> Option<Bounds> {
    let (w, h) = rgba.dimensions();
    let mut left = u32::MAX;
    let mut right = 0u32;
    let mut top = u32::MAX;
    let mut bottom = 0u32;
    let mut any = false;

    let raw = rgba.as_raw();
    let stride = w as usize * 4;
    for y in 0..h {
        let row = &raw[y as usize * stride..(y as usize + 1) * stride];
        for x in 0..w {
            if row[x as usize * 4 + 3] != 0 {
                any = true;
                left = left.min(x);
                right = right.max(x);
                top = top.min(y);
                bottom = bottom.max(y);
            }
        }
    }

    if any {
        Some(Bounds {
            top,
            left,
            right,
            bottom,
        })
    } else {
        None
    }
}

/// Distance from the original image edges to `bounds`, i.e. the transparent
/// margin that trimming removes.
pub fn padding_for(bounds: &Bounds, width: u32, height: u32) -> Padding {
    Padding {
        left: bounds.left,
        top: bounds.top,
        right: width - 1 - bounds.right,
        bottom: height - 1 - bounds.bottom,
    }
}
