use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use image::RgbaImage;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::Result;
use crate::renderer::edge_fuzz::FuzzTemplate;
use crate::renderer::sprite::{LayerKind, LayeredSprite, Sprite};

// ── SpriteDefinition ─────────────────────────────────────────────────────────

/// One catalog entry as written in the JSON config:
/// `{ "x": 5, "y": 1, "layer": "base", "border": "#222", "ho": true }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpriteDefinition {
    /// Atlas column, in tiles.
    pub x: u32,
    /// Atlas row, in tiles.
    pub y: u32,
    #[serde(default)]
    pub layer: LayerKind,
    /// Outline color of regions made of this sprite.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    /// Tall object: the atlas row above holds its top half.
    #[serde(default, rename = "ho")]
    pub overlay: bool,
}

impl SpriteDefinition {
    /// Ground sprites get a fuzz sub-sprite to blend their edges.
    pub fn is_ground(&self) -> bool {
        self.layer == LayerKind::Ground
    }
}

/// Name-keyed catalog configuration.
pub type CatalogConfig = BTreeMap<String, SpriteDefinition>;

// ── SpriteCatalog ────────────────────────────────────────────────────────────

/// Registry of every drawable name.  Built once at startup, read-only after.
#[derive(Default)]
pub struct SpriteCatalog {
    sprites: HashMap<String, LayeredSprite>,
}

impl SpriteCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog config from JSON.
    pub fn parse_config(json: &str) -> Result<CatalogConfig> {
        Ok(serde_json::from_str(json)?)
    }

    /// Register every entry of `config`, cutting `tile_size` squares out of
    /// `image`.  Ground entries are fuzzed with `fuzz`; any fuzz or color error
    /// aborts the whole build.
    pub fn add_sprites(
        &mut self,
        image: Rc<RgbaImage>,
        config: &CatalogConfig,
        tile_size: u32,
        fuzz: &FuzzTemplate,
    ) -> Result<()> {
        let (atlas_w, atlas_h) = image.dimensions();

        for (name, def) in config {
            let px = def.x * tile_size;
            let py = def.y * tile_size;
            if px + tile_size > atlas_w || py + tile_size > atlas_h {
                warn!(
                    "sprite_catalog: '{name}' at ({}, {}) lies outside the {atlas_w}x{atlas_h} atlas",
                    def.x, def.y
                );
            }

            let mut layers = BTreeMap::new();
            let main = Sprite::new(Rc::clone(&image), px, py, tile_size, tile_size);

            if def.overlay {
                match py.checked_sub(tile_size) {
                    Some(oy) => {
                        let top = Sprite::new(Rc::clone(&image), px, oy, tile_size, tile_size);
                        layers.insert(LayerKind::Overlay, top);
                    }
                    None => warn!("sprite_catalog: '{name}' is tall but has no atlas row above it"),
                }
            }
            if def.is_ground() {
                layers.insert(LayerKind::Fuzz, fuzz.fuzz(&main)?);
            }
            layers.insert(def.layer, main);

            let border = def.border.as_deref().map(str::parse::<Color>).transpose()?;
            self.sprites.insert(name.clone(), LayeredSprite { layers, border });
        }

        debug!("sprite_catalog: {} sprites registered", self.sprites.len());
        Ok(())
    }

    /// The sprite registered under `name`.  Unknown names are a normal
    /// condition; callers fall back to a hashed color.
    pub fn sprite(&self, name: &str) -> Option<&LayeredSprite> {
        self.sprites.get(name)
    }

    /// Border color of a tile's sprite stack: the topmost (first listed)
    /// sprite that defines one wins.
    pub fn border_of<S: AsRef<str>>(&self, stack: &[S]) -> Option<Color> {
        stack
            .iter()
            .filter_map(|name| self.sprite(name.as_ref()))
            .find_map(|sprite| sprite.border)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
