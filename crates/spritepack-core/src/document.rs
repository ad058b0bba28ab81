use crate::manifest::CompiledRules;
use crate::model::{Padding, Rect};
use crate::packer::PageLayout;
use crate::texture::SpriteTexture;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

/// Normalized pivot point used by a consuming renderer to position a sprite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

/// One entry per original source file. Several sprites may share one texture
/// after deduplication; each still gets its own frame record.
#[derive(Debug, Clone)]
pub struct Sprite {
    /// Relative source path, forward slashes.
    pub path: String,
    /// Resolved display name (path unless a manifest rule renamed it).
    pub name: String,
    pub anchor: Anchor,
    pub texture: Arc<SpriteTexture>,
    /// Index into the unique texture set this sprite's pixels map to.
    pub unique: usize,
}

impl Sprite {
    pub fn padding(&self) -> Padding {
        self.texture.padding()
    }
}

/// Geometry of one sprite within the atlas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameRecord {
    /// Placement on the page; `w,h` are the texture's trimmed dimensions
    /// (unrotated — consumers apply `rotated` themselves).
    pub frame: Rect,
    pub rotated: bool,
    /// Trimming is unconditional in this pipeline.
    pub trimmed: bool,
    /// Where the trimmed content sits inside the original image.
    #[serde(rename = "spriteSourceSize")]
    pub sprite_source_size: Rect,
    /// Original (untrimmed) dimensions.
    #[serde(rename = "sourceSize")]
    pub source_size: Size,
    pub anchor: Anchor,
    /// Index into `meta.images`.
    pub page: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentMeta {
    pub app: String,
    pub version: String,
    /// First page file; kept for single-page consumers.
    pub image: String,
    /// Every page file, indexed by `FrameRecord::page`.
    pub images: Vec<String>,
    pub scale: f32,
}

/// The output manifest: frame geometry keyed by display name, named
/// animations as ordered frame-key lists, and page metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AtlasDocument {
    pub frames: BTreeMap<String, FrameRecord>,
    pub animations: BTreeMap<String, Vec<String>>,
    pub meta: DocumentMeta,
}

/// Builds the atlas document from the packed layout.
///
/// For every placed rectangle, every sprite assigned to its texture emits one
/// frame record (duplicates share placement but keep distinct keys). Frame
/// keys must be unique; a name collision logs a warning and the later sprite
/// wins.
pub fn build_document(
    sprites: &[Sprite],
    layouts: &[PageLayout],
    rules: &CompiledRules,
    page_names: &[String],
) -> AtlasDocument {
    let mut frames: BTreeMap<String, FrameRecord> = BTreeMap::new();

    for (page_idx, layout) in layouts.iter().enumerate() {
        for rect in &layout.rects {
            for sprite in sprites.iter().filter(|s| s.unique == rect.token) {
                let tex = &sprite.texture;
                let padding = tex.padding();
                let (src_w, src_h) = tex.source_size();
                let record = FrameRecord {
                    frame: Rect::new(rect.x, rect.y, tex.width(), tex.height()),
                    rotated: rect.rotated,
                    trimmed: true,
                    sprite_source_size: Rect::new(
                        padding.left,
                        padding.top,
                        tex.width(),
                        tex.height(),
                    ),
                    source_size: Size { w: src_w, h: src_h },
                    anchor: sprite.anchor,
                    page: page_idx,
                };
                if frames.insert(sprite.name.clone(), record).is_some() {
                    warn!(name = %sprite.name, path = %sprite.path, "duplicate frame key; later sprite wins");
                }
            }
        }
    }

    let mut animations: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for anim in rules.animations() {
        let mut keys: Vec<String> = Vec::new();
        // Rule order first, sprite enumeration order within a rule.
        for matcher in &anim.matchers {
            for sprite in sprites {
                if matcher.is_match(&sprite.name) {
                    keys.push(sprite.name.clone());
                }
            }
        }
        if keys.is_empty() {
            warn!(animation = %anim.name, "animation matched no sprites");
        }
        animations.insert(anim.name.clone(), keys);
    }

    AtlasDocument {
        frames,
        animations,
        meta: DocumentMeta {
            app: "spritepack".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            image: page_names.first().cloned().unwrap_or_default(),
            images: page_names.to_vec(),
            scale: 1.0,
        },
    }
}
