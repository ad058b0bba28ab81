use crate::texture::SpriteTexture;
use std::sync::Arc;

/// Result of collapsing candidate textures into a unique set.
#[derive(Debug)]
pub struct DedupOutcome {
    /// Unique textures in first-seen order.
    pub uniques: Vec<Arc<SpriteTexture>>,
    /// For every input index, the index into `uniques` it maps to.
    pub assignment: Vec<usize>,
}

/// Collapses `textures` into a structurally-unique set.
///
/// Linear scan: each candidate is compared against every already-accepted
/// unique texture and the first structural match wins, so ties break on
/// first-seen order. Worst case is O(n²) pixel comparisons, which is an
/// accepted cost for bounded asset sets; the dimension short-circuit in
/// `SpriteTexture` equality keeps the common case cheap.
///
/// The input order must already be deterministic (the pipeline sorts sprites
/// by path before calling this).
pub fn dedup_textures(textures: &[Arc<SpriteTexture>]) -> DedupOutcome {
    let mut uniques: Vec<Arc<SpriteTexture>> = Vec::new();
    let mut assignment = Vec::with_capacity(textures.len());

    for tex in textures {
        let found = uniques.iter().position(|u| u.same_pixels(tex));
        match found {
            Some(idx) => assignment.push(idx),
            None => {
                assignment.push(uniques.len());
                uniques.push(Arc::clone(tex));
            }
        }
    }

    DedupOutcome {
        uniques,
        assignment,
    }
}
