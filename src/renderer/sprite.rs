use std::collections::BTreeMap;
use std::rc::Rc;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::color::Color;

// ── LayerKind ─────────────────────────────────────────────────────────────────

/// Independently composited raster planes, declared bottom to top.  The
/// derived `Ord` is the composite order.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Ground,
    Fuzz,
    Base,
    Borders,
    #[default]
    Main,
    Creatures,
    /// Top half of tall objects, composited one tile above its cell.
    #[serde(rename = "ho")]
    Overlay,
}

impl LayerKind {
    pub const ALL: [LayerKind; 7] = [
        LayerKind::Ground,
        LayerKind::Fuzz,
        LayerKind::Base,
        LayerKind::Borders,
        LayerKind::Main,
        LayerKind::Creatures,
        LayerKind::Overlay,
    ];

    /// Static layers are diffed per tile; the creatures layer is repainted
    /// wholesale every frame at the zoomed resolution.
    pub fn is_dynamic(self) -> bool {
        self == LayerKind::Creatures
    }
}

// ── SpriteArea ────────────────────────────────────────────────────────────────

/// Where a sprite lands relative to its tile cell, in tile units.  Most sprites
/// cover exactly their cell; fuzz sprites overhang it by the template margin.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpriteArea {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl SpriteArea {
    pub const CELL: Self = Self { x: 0.0, y: 0.0, w: 1.0, h: 1.0 };
}

impl Default for SpriteArea {
    fn default() -> Self {
        Self::CELL
    }
}

// ── Sprite ────────────────────────────────────────────────────────────────────

/// A rectangle of a shared source image plus its placement within a tile.
#[derive(Clone, Debug)]
pub struct Sprite {
    pub image: Rc<RgbaImage>,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub area: SpriteArea,
}

impl Sprite {
    pub fn new(image: Rc<RgbaImage>, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { image, x, y, width, height, area: SpriteArea::CELL }
    }

    /// The whole image as one sprite.
    pub fn whole(image: Rc<RgbaImage>) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image, 0, 0, width, height)
    }

    pub fn with_area(mut self, area: SpriteArea) -> Self {
        self.area = area;
        self
    }
}

// ── LayeredSprite ─────────────────────────────────────────────────────────────

/// Everything drawn for one catalog name: one sub-sprite per layer it touches
/// and the border color its region is outlined with.
#[derive(Clone, Debug, Default)]
pub struct LayeredSprite {
    pub layers: BTreeMap<LayerKind, Sprite>,
    pub border: Option<Color>,
}

impl LayeredSprite {
    pub fn layer(&self, kind: LayerKind) -> Option<&Sprite> {
        self.layers.get(&kind)
    }

    pub fn has_overlay(&self) -> bool {
        self.layers.contains_key(&LayerKind::Overlay)
    }
}
