use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Page/packing configuration.
///
/// Pages are bounded canvases; content that does not fit on one page spills
/// onto additional pages. Rotation lets the packer turn a texture 90° when
/// that improves density.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// Maximum page width in pixels.
    pub max_width: u32,
    /// Maximum page height in pixels.
    pub max_height: u32,
    /// Allow 90° rotations for placements where beneficial.
    pub allow_rotation: bool,
    /// Pixels around the entire page border.
    pub border_padding: u32,
    /// Pixels between packed textures.
    pub texture_padding: u32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            max_width: 4096,
            max_height: 4096,
            allow_rotation: true,
            border_padding: 0,
            texture_padding: 1,
        }
    }
}

impl AtlasConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::AtlasError;

        if self.max_width == 0 || self.max_height == 0 {
            return Err(AtlasError::InvalidConfig(format!(
                "page dimensions must be non-zero, got {}x{}",
                self.max_width, self.max_height
            )));
        }

        let total_border = self.border_padding.saturating_mul(2);
        if total_border >= self.max_width || total_border >= self.max_height {
            return Err(AtlasError::InvalidConfig(format!(
                "border_padding ({}) * 2 exceeds page dimensions ({}x{})",
                self.border_padding, self.max_width, self.max_height
            )));
        }

        Ok(())
    }

    /// Create a fluent builder for `AtlasConfig`.
    pub fn builder() -> AtlasConfigBuilder {
        AtlasConfigBuilder::new()
    }
}

/// Builder for `AtlasConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct AtlasConfigBuilder {
    cfg: AtlasConfig,
}

impl AtlasConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: AtlasConfig::default(),
        }
    }
    pub fn with_max_dimensions(mut self, w: u32, h: u32) -> Self {
        self.cfg.max_width = w;
        self.cfg.max_height = h;
        self
    }
    pub fn allow_rotation(mut self, v: bool) -> Self {
        self.cfg.allow_rotation = v;
        self
    }
    pub fn border_padding(mut self, v: u32) -> Self {
        self.cfg.border_padding = v;
        self
    }
    pub fn texture_padding(mut self, v: u32) -> Self {
        self.cfg.texture_padding = v;
        self
    }
    pub fn build(self) -> AtlasConfig {
        self.cfg
    }
}

/// Lossless output codecs for atlas pages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    /// Lossless WebP (the `image` crate's WebP encoder is lossless-only).
    Webp,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Webp => image::ImageFormat::WebP,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = crate::error::AtlasError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::Webp),
            other => Err(crate::error::AtlasError::UnknownFormat(other.to_string())),
        }
    }
}
