use crate::config::{AtlasConfig, OutputFormat};
use crate::dedup::dedup_textures;
use crate::document::{AtlasDocument, Sprite, build_document};
use crate::error::{AtlasError, Result};
use crate::manifest::{CompiledRules, ProjectManifest};
use crate::packer::{BinPacker, MaxRectsBin};
use crate::texture::SpriteTexture;
use image::{DynamicImage, RgbaImage};
use std::sync::Arc;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// In-memory sprite to pack (relative path + decoded image).
pub struct InputSprite {
    /// Path relative to the input root, forward slashes.
    pub path: String,
    pub image: DynamicImage,
}

/// One composed output page.
#[derive(Debug)]
pub struct OutputPage {
    pub index: usize,
    pub rgba: RgbaImage,
}

/// Output of an atlas build: the frame manifest and the RGBA pages.
#[derive(Debug)]
pub struct AtlasOutput {
    pub document: AtlasDocument,
    pub pages: Vec<OutputPage>,
}

/// Page file names for a run: `<base>.<ext>` for a single page,
/// `<base>_<index>.<ext>` when more than one page exists.
pub fn page_file_names(base: &str, count: usize, format: OutputFormat) -> Vec<String> {
    let ext = format.extension();
    if count == 1 {
        vec![format!("{base}.{ext}")]
    } else {
        (0..count).map(|i| format!("{base}_{i}.{ext}")).collect()
    }
}

/// Builds a sprite atlas: trim, deduplicate, pack, composite, and synthesize
/// the frame manifest.
///
/// Inputs are re-sorted to lexical path order first so the run is
/// reproducible regardless of enumeration order. Fail-fast: a fully
/// transparent sprite aborts the whole build with no partial output.
#[instrument(skip_all)]
pub fn build_atlas(
    inputs: Vec<InputSprite>,
    manifest: &ProjectManifest,
    cfg: &AtlasConfig,
    output_base: &str,
    format: OutputFormat,
) -> Result<AtlasOutput> {
    cfg.validate()?;
    if inputs.is_empty() {
        return Err(AtlasError::Empty);
    }
    let rules = CompiledRules::compile(manifest)?;

    let mut inputs = inputs;
    inputs.sort_by(|a, b| a.path.cmp(&b.path));

    let textures = build_textures(&inputs)?;
    let outcome = dedup_textures(&textures);
    debug!(
        sprites = textures.len(),
        unique = outcome.uniques.len(),
        "deduplicated sprite textures"
    );

    let sprites: Vec<Sprite> = inputs
        .iter()
        .zip(textures.iter())
        .zip(outcome.assignment.iter())
        .map(|((inp, tex), &unique)| {
            let resolved = rules.resolve(&inp.path);
            Sprite {
                path: inp.path.clone(),
                name: resolved.name,
                anchor: resolved.anchor,
                texture: Arc::clone(tex),
                unique,
            }
        })
        .collect();

    let mut bin = MaxRectsBin::new(cfg.clone());
    for (token, tex) in outcome.uniques.iter().enumerate() {
        bin.add(tex.width(), tex.height(), token);
    }
    let layouts = bin.pack()?;
    debug!(pages = layouts.len(), "packed unique textures");

    let pages: Vec<OutputPage> = layouts
        .iter()
        .enumerate()
        .map(|(index, layout)| OutputPage {
            index,
            rgba: crate::compositing::compose_page(layout, &outcome.uniques),
        })
        .collect();

    let page_names = page_file_names(output_base, layouts.len(), format);
    let document = build_document(&sprites, &layouts, &rules, &page_names);

    Ok(AtlasOutput { document, pages })
}

/// Trims every input into a texture. Construction is independent per sprite,
/// so it may run in parallel; the input slice is already in path order and
/// the collected output preserves it.
fn build_textures(inputs: &[InputSprite]) -> Result<Vec<Arc<SpriteTexture>>> {
    #[cfg(feature = "parallel")]
    {
        inputs.par_iter().map(make_texture).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        inputs.iter().map(make_texture).collect()
    }
}

fn make_texture(inp: &InputSprite) -> Result<Arc<SpriteTexture>> {
    let rgba = inp.image.to_rgba8();
    SpriteTexture::from_image(&rgba)
        .map(Arc::new)
        .ok_or_else(|| AtlasError::EmptySprite(inp.path.clone()))
}
