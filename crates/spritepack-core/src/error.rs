use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] globset::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Unsupported output format: {0}")]
    UnknownFormat(String),
    #[error("Sprite `{0}` is fully transparent; there is nothing to pack")]
    EmptySprite(String),
    #[error("Texture {w}x{h} does not fit within a {max_w}x{max_h} page")]
    OutOfSpace { w: u32, h: u32, max_w: u32, max_h: u32 },
    #[error("Unknown compressed frame key: {0}")]
    UnknownKey(String),
    #[error("Nothing to pack")]
    Empty,
}

pub type Result<T> = std::result::Result<T, AtlasError>;
