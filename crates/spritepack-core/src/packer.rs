use crate::config::AtlasConfig;
use crate::error::{AtlasError, Result};
use crate::model::Rect;
use std::collections::HashSet;

/// One placed rectangle on a page.
///
/// `w,h` are the post-rotation (page-space) dimensions; `token` is the opaque
/// correlation value passed to [`BinPacker::add`].
#[derive(Debug, Clone, Copy)]
pub struct PackedRect {
    pub token: usize,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    pub rotated: bool,
}

/// One output page: final canvas dimensions plus its placements.
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub width: u32,
    pub height: u32,
    pub rects: Vec<PackedRect>,
}

/// Whole-batch bin-packing contract.
///
/// Submit every rectangle with `add`, then call `pack` once. Implementations
/// must be deterministic for a given submission order, may rotate rectangles
/// 90° when the configuration allows it, and return as many pages as the
/// bounded page capacity requires. The packing strategy behind this trait is
/// interchangeable; the rest of the pipeline never looks past the contract.
pub trait BinPacker {
    fn add(&mut self, width: u32, height: u32, token: usize);
    fn pack(&mut self) -> Result<Vec<PageLayout>>;
}

/// Default oracle: MaxRects free-rectangle packing with the best-area-fit
/// heuristic.
pub struct MaxRectsBin {
    cfg: AtlasConfig,
    queue: Vec<(u32, u32, usize)>,
}

impl MaxRectsBin {
    pub fn new(cfg: AtlasConfig) -> Self {
        Self {
            cfg,
            queue: Vec::new(),
        }
    }
}

impl BinPacker for MaxRectsBin {
    fn add(&mut self, width: u32, height: u32, token: usize) {
        self.queue.push((width, height, token));
    }

    fn pack(&mut self) -> Result<Vec<PageLayout>> {
        let items = std::mem::take(&mut self.queue);
        let mut remaining: Vec<usize> = (0..items.len()).collect();
        let mut pages: Vec<PageLayout> = Vec::new();

        while !remaining.is_empty() {
            let mut sheet = FreeRectSheet::new(&self.cfg);
            let mut rects: Vec<PackedRect> = Vec::new();

            // Keep sweeping the remaining set until nothing else fits on
            // this page; later items can fill gaps earlier ones left.
            loop {
                let mut placed_any = false;
                let mut remove_set: HashSet<usize> = HashSet::new();
                for &idx in &remaining {
                    let (w, h, token) = items[idx];
                    if let Some((rect, rotated)) = sheet.place(w, h) {
                        rects.push(PackedRect {
                            token,
                            x: rect.x,
                            y: rect.y,
                            w: rect.w,
                            h: rect.h,
                            rotated,
                        });
                        remove_set.insert(idx);
                        placed_any = true;
                    }
                }
                if !placed_any {
                    break;
                }
                remaining.retain(|i| !remove_set.contains(i));
            }

            if rects.is_empty() {
                // An empty fresh page rejected the first remaining texture,
                // so it can never fit anywhere.
                let (w, h, _) = items[remaining[0]];
                return Err(AtlasError::OutOfSpace {
                    w,
                    h,
                    max_w: self.cfg.max_width,
                    max_h: self.cfg.max_height,
                });
            }

            let (width, height) = page_extent(&rects, &self.cfg);
            pages.push(PageLayout {
                width,
                height,
                rects,
            });
        }

        Ok(pages)
    }
}

/// Trim the page canvas to the content extent instead of always emitting the
/// full bounded capacity.
fn page_extent(rects: &[PackedRect], cfg: &AtlasConfig) -> (u32, u32) {
    let pad_half = cfg.texture_padding / 2;
    let pad_rem = cfg.texture_padding - pad_half;
    let mut w = 0u32;
    let mut h = 0u32;
    for r in rects {
        w = w.max(r.x + r.w + pad_rem + cfg.border_padding);
        h = h.max(r.y + r.h + pad_rem + cfg.border_padding);
    }
    (w.max(1), h.max(1))
}

/// MaxRects free-list for a single page.
struct FreeRectSheet {
    allow_rotation: bool,
    texture_padding: u32,
    free: Vec<Rect>,
}

impl FreeRectSheet {
    fn new(cfg: &AtlasConfig) -> Self {
        let pad = cfg.border_padding;
        let w = cfg.max_width.saturating_sub(pad.saturating_mul(2));
        let h = cfg.max_height.saturating_sub(pad.saturating_mul(2));
        Self {
            allow_rotation: cfg.allow_rotation,
            texture_padding: cfg.texture_padding,
            free: vec![Rect::new(pad, pad, w, h)],
        }
    }

    /// Places a `w`x`h` rectangle, reserving the configured padding around
    /// it. Returns the content rectangle (post-rotation dimensions) and the
    /// rotation flag, or `None` when the page has no room left.
    fn place(&mut self, w: u32, h: u32) -> Option<(Rect, bool)> {
        let rw = w + self.texture_padding;
        let rh = h + self.texture_padding;
        let (slot, rotated) = self.find_position(rw, rh)?;
        self.split_free(&slot);
        self.prune_free_list();

        let pad_half = self.texture_padding / 2;
        let (fw, fh) = if rotated { (h, w) } else { (w, h) };
        Some((
            Rect::new(slot.x + pad_half, slot.y + pad_half, fw, fh),
            rotated,
        ))
    }

    /// Best-area-fit search over the free list, trying both orientations.
    /// Ties break on short-side fit, then top edge, then left edge, keeping
    /// placement deterministic.
    fn find_position(&self, w: u32, h: u32) -> Option<(Rect, bool)> {
        let mut best: Option<(Rect, bool)> = None;
        let mut best_area = i64::MAX;
        let mut best_short = i64::MAX;
        let mut best_top = u32::MAX;
        let mut best_left = u32::MAX;

        let mut consider =
            |fr: &Rect, cw: u32, ch: u32, rotated: bool, best: &mut Option<(Rect, bool)>| {
                if fr.w < cw || fr.h < ch {
                    return;
                }
                let area = (fr.w as i64) * (fr.h as i64) - (cw as i64) * (ch as i64);
                let leftover_h = (fr.w - cw) as i64;
                let leftover_v = (fr.h - ch) as i64;
                let short = leftover_h.min(leftover_v);
                let top = fr.y.saturating_add(ch);
                if area < best_area
                    || (area == best_area
                        && (short < best_short
                            || (short == best_short
                                && (top < best_top || (top == best_top && fr.x < best_left)))))
                {
                    best_area = area;
                    best_short = short;
                    best_top = top;
                    best_left = fr.x;
                    *best = Some((Rect::new(fr.x, fr.y, cw, ch), rotated));
                }
            };

        for fr in &self.free {
            consider(fr, w, h, false, &mut best);
            if self.allow_rotation && w != h {
                consider(fr, h, w, true, &mut best);
            }
        }
        best
    }

    /// Splits every free rectangle intersecting `node` into the leftover
    /// strips around it.
    fn split_free(&mut self, node: &Rect) {
        let mut new_free: Vec<Rect> = Vec::new();
        let n_x2 = node.x + node.w;
        let n_y2 = node.y + node.h;

        for fr in self.free.iter() {
            let fr_x2 = fr.x + fr.w;
            let fr_y2 = fr.y + fr.h;
            let disjoint = fr.x >= n_x2 || node.x >= fr_x2 || fr.y >= n_y2 || node.y >= fr_y2;
            if disjoint {
                new_free.push(*fr);
                continue;
            }

            let ix1 = fr.x.max(node.x);
            let iy1 = fr.y.max(node.y);
            let ix2 = fr_x2.min(n_x2);
            let iy2 = fr_y2.min(n_y2);

            // above
            if iy1 > fr.y {
                new_free.push(Rect::new(fr.x, fr.y, fr.w, iy1 - fr.y));
            }
            // below
            if iy2 < fr_y2 {
                new_free.push(Rect::new(fr.x, iy2, fr.w, fr_y2 - iy2));
            }
            // left
            if ix1 > fr.x && iy2 > iy1 {
                new_free.push(Rect::new(fr.x, iy1, ix1 - fr.x, iy2 - iy1));
            }
            // right
            if ix2 < fr_x2 && iy2 > iy1 {
                new_free.push(Rect::new(ix2, iy1, fr_x2 - ix2, iy2 - iy1));
            }
        }

        self.free = new_free;
    }

    /// Removes free rectangles fully contained in another.
    fn prune_free_list(&mut self) {
        let mut i = 0;
        while i < self.free.len() {
            let a = self.free[i];
            let mut remove_i = false;
            let mut j = i + 1;
            while j < self.free.len() {
                let b = self.free[j];
                if contained(&a, &b) {
                    remove_i = true;
                    break;
                }
                if contained(&b, &a) {
                    self.free.remove(j);
                    continue;
                }
                j += 1;
            }
            if remove_i {
                self.free.remove(i);
            } else {
                i += 1;
            }
        }
    }
}

/// True if `a` lies fully inside `b` (exclusive-edge arithmetic).
fn contained(a: &Rect, b: &Rect) -> bool {
    a.x >= b.x && a.y >= b.y && a.x + a.w <= b.x + b.w && a.y + a.h <= b.y + b.h
}
