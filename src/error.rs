use thiserror::Error;

/// Errors raised while building the sprite catalog and loading its
/// configuration. None of these are raised at draw time.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A ground sprite does not match the inner size of the fuzz template.
    #[error(
        "fuzz template expects {expected_w}x{expected_h} sprites, got {actual_w}x{actual_h}"
    )]
    FuzzSizeMismatch {
        expected_w: u32,
        expected_h: u32,
        actual_w: u32,
        actual_h: u32,
    },

    /// The fuzz template margins leave no room for a sprite.
    #[error("fuzz margins {margin_x}x{margin_y} do not fit a {width}x{height} template")]
    FuzzMarginTooLarge {
        width: u32,
        height: u32,
        margin_x: u32,
        margin_y: u32,
    },

    #[error("invalid color '{0}'")]
    InvalidColor(String),

    #[error("invalid catalog config: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, RenderError>;
