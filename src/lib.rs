pub mod color;
pub mod config;
pub mod display;
pub mod error;
pub mod geometry;
pub mod messages;
pub mod renderer;

pub use display::{Display, Phase};
pub use error::{RenderError, Result};

/// Catalog of the stock sprite atlas (8px tiles), in the JSON format read by
/// `SpriteCatalog::parse_config`.
pub const DEFAULT_CATALOG: &str = include_str!("../resources/catalog.json");
pub const DEFAULT_TILE_SIZE: u32 = 8;
