// ── DisplayConfig ─────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

/// Rendering parameters fixed at `Display` construction.
///
/// - **tile_size** is the edge length of one atlas tile in pixels; static
///   layers are buffered at this resolution.
/// - **scale** is the zoom factor applied when compositing.  The creatures
///   layer is buffered at `tile_size * scale` so moving entities keep
///   sub-tile precision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub tile_size: u32,
    pub scale: u32,
    /// Border stroke thickness, in tiles.
    pub border_width: f32,
}

impl Default for DisplayConfig {
    /// 8px tiles, 4x zoom, one-pixel borders.
    fn default() -> Self {
        Self { tile_size: 8, scale: 4, border_width: 1.0 / 8.0 }
    }
}

impl DisplayConfig {
    /// Edge length of one tile on the visible surface.
    pub fn tile_pixels(&self) -> u32 {
        self.tile_size * self.scale
    }

    /// Buffer resolution of the dynamic (entity) layer.
    pub fn dynamic_resolution(&self) -> u32 {
        self.tile_size * self.scale
    }
}

// ── FuzzMargins ───────────────────────────────────────────────────────────────

/// Width of the alpha falloff rim of the fuzz template, in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzMargins {
    pub x: u32,
    pub y: u32,
}

impl Default for FuzzMargins {
    fn default() -> Self {
        Self { x: 1, y: 1 }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
