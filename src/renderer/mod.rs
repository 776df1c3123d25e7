pub mod edge_fuzz;
pub mod layer_buffer;
pub mod sprite;
pub mod sprite_catalog;
pub mod surface;

pub use edge_fuzz::FuzzTemplate;
pub use layer_buffer::LayerBuffer;
pub use sprite::{LayerKind, LayeredSprite, Sprite, SpriteArea};
pub use sprite_catalog::{CatalogConfig, SpriteCatalog, SpriteDefinition};
pub use surface::{CompositeMode, PixelRect, Surface};
