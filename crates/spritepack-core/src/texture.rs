use crate::error::Result;
use crate::model::Padding;
use crate::trim::{opaque_bounds, padding_for};
use image::RgbaImage;
use std::sync::OnceLock;

/// A trimmed sprite image: the opaque content rectangle of a source image,
/// plus the padding needed to reconstruct the original placement.
///
/// Identity is structural: two textures are equal iff they have the same
/// trimmed dimensions and byte-identical RGBA pixels, regardless of which
/// files they were decoded from. Padding does not participate in equality.
///
/// Derived data (`surface`, `encoded_png`) is memoized per instance and never
/// invalidated; pixel data is immutable after construction, so redundant
/// computation under a race is idempotent and harmless.
pub struct SpriteTexture {
    width: u32,
    height: u32,
    padding: Padding,
    pixels: Vec<u8>,
    surface: OnceLock<RgbaImage>,
    encoded: OnceLock<Vec<u8>>,
}

impl SpriteTexture {
    /// Trims `rgba` to its opaque bounds. Returns `None` when the image has
    /// no opaque pixel at all; the caller must treat that as a fatal input
    /// error rather than packing a zero-size texture.
    pub fn from_image(rgba: &RgbaImage) -> Option<Self> {
        let (iw, ih) = rgba.dimensions();
        let bounds = opaque_bounds(rgba)?;
        let padding = padding_for(&bounds, iw, ih);
        let (tw, th) = (bounds.width(), bounds.height());

        let raw = rgba.as_raw();
        let mut pixels = Vec::with_capacity(tw as usize * th as usize * 4);
        for y in bounds.top..=bounds.bottom {
            // usize arithmetic: u32 byte offsets overflow past ~1 Gpx sources.
            let start = (y as usize * iw as usize + bounds.left as usize) * 4;
            let end = start + tw as usize * 4;
            pixels.extend_from_slice(&raw[start..end]);
        }

        Some(Self {
            width: tw,
            height: th,
            padding,
            pixels,
            surface: OnceLock::new(),
            encoded: OnceLock::new(),
        })
    }

    /// Trimmed width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Trimmed height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Transparent margin removed from the source image.
    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Original (untrimmed) source dimensions.
    pub fn source_size(&self) -> (u32, u32) {
        (
            self.width + self.padding.left + self.padding.right,
            self.height + self.padding.top + self.padding.bottom,
        )
    }

    /// Raw trimmed RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Rasterized surface of the trimmed buffer, for compositing.
    /// Built at most once per texture and reused.
    pub fn surface(&self) -> &RgbaImage {
        self.surface.get_or_init(|| {
            RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
                .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
        })
    }

    /// Lossless PNG encoding of the trimmed buffer, for standalone export.
    /// Encoded at most once per texture and reused.
    pub fn encoded_png(&self) -> Result<&[u8]> {
        if let Some(buf) = self.encoded.get() {
            return Ok(buf);
        }
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            &self.pixels,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(self.encoded.get_or_init(|| buf))
    }

    /// Byte-exact structural comparison. Mismatched dimensions short-circuit
    /// before the pixel scan; any single differing channel means not equal.
    pub fn same_pixels(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.pixels == other.pixels
    }
}

impl PartialEq for SpriteTexture {
    fn eq(&self, other: &Self) -> bool {
        self.same_pixels(other)
    }
}

impl Eq for SpriteTexture {}

impl std::fmt::Debug for SpriteTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpriteTexture")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("padding", &self.padding)
            .finish()
    }
}
