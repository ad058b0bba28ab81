//! Core library for building sprite atlases.
//!
//! Pipeline: decode sprites (caller) → trim transparent borders → collapse
//! pixel-identical textures → bin-pack unique textures onto bounded pages →
//! composite page images and synthesize the frame manifest.
//!
//! - `trim` / `texture`: content bounds extraction and trimmed textures with
//!   byte-exact structural equality
//! - `dedup`: first-seen-order unique texture set
//! - `packer`: whole-batch bin-packing contract (`BinPacker`) with a MaxRects
//!   default oracle; the strategy behind the trait is swappable
//! - `compositing`: page rasterization (rotation-aware blits)
//! - `document` / `export`: frame manifest synthesis and optional key
//!   compression
//!
//! Quick example:
//! ```ignore
//! use image::ImageReader;
//! use spritepack_core::prelude::*;
//! # fn main() -> anyhow::Result<()> {
//! let inputs = vec![InputSprite {
//!     path: "hero/idle.png".into(),
//!     image: ImageReader::open("sprites/hero/idle.png")?.decode()?,
//! }];
//! let manifest = ProjectManifest::default();
//! let cfg = AtlasConfig::default();
//! let out = build_atlas(inputs, &manifest, &cfg, "atlas", OutputFormat::Png)?;
//! println!("pages: {}", out.pages.len());
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod dedup;
pub mod document;
pub mod error;
pub mod export;
pub mod manifest;
pub mod model;
pub mod packer;
pub mod pipeline;
pub mod texture;
pub mod trim;

pub use config::*;
pub use document::{Anchor, AtlasDocument, DocumentMeta, FrameRecord, Size, Sprite};
pub use error::*;
pub use model::*;
pub use pipeline::*;
pub use texture::SpriteTexture;

/// Convenience prelude for common types and functions.
/// Importing `spritepack_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{AtlasConfig, AtlasConfigBuilder, OutputFormat};
    pub use crate::dedup::{DedupOutcome, dedup_textures};
    pub use crate::document::{Anchor, AtlasDocument, FrameRecord, Size, Sprite};
    pub use crate::error::{AtlasError, Result};
    pub use crate::export::{compress_keys, decompress_keys};
    pub use crate::manifest::{CompiledRules, ProjectManifest};
    pub use crate::model::{Bounds, Padding, Rect};
    pub use crate::packer::{BinPacker, MaxRectsBin, PackedRect, PageLayout};
    pub use crate::pipeline::{
        AtlasOutput, InputSprite, OutputPage, build_atlas, page_file_names,
    };
    pub use crate::texture::SpriteTexture;
}
