// ── Display ───────────────────────────────────────────────────────────────────
//
// Owns every layer buffer, the border index and the visible surface.  World
// updates mutate the buffers tile by tile; `redraw` composites the buffers
// around the tracked center.  Nothing else reads or writes this state.

pub mod borders;
pub mod buffers;

use std::collections::HashMap;

use glam::Vec2;
use log::{debug, trace, warn};

use crate::color::Color;
use crate::config::DisplayConfig;
use crate::geometry::{Area, CARDINALS};
use crate::messages::{DynamicEntity, SpriteMapping, TileChange};
use crate::renderer::sprite::{LayerKind, Sprite};
use crate::renderer::sprite_catalog::SpriteCatalog;
use crate::renderer::surface::{CompositeMode, PixelRect, Surface};

use borders::{BorderIndex, neighbour};
use buffers::ViewportBuffers;

/// Static layers cleared before a tile is redrawn.  The fuzz layer is carved
/// instead, and borders are maintained separately.
const TILE_LAYERS: [LayerKind; 4] =
    [LayerKind::Ground, LayerKind::Base, LayerKind::Main, LayerKind::Overlay];

/// Lifecycle of a display.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No view area yet; nothing is buffered.
    Uninitialized,
    /// Buffers are allocated but no section has been drawn.
    AreaSet,
    /// At least one section has been drawn; updates and redraws take effect.
    Initialized,
}

pub struct Display {
    config: DisplayConfig,
    catalog: SpriteCatalog,
    /// Template-shaped eraser that carves a tile's cell out of the fuzz layer.
    fuzz_sprite: Sprite,
    surface: Surface,
    buffers: Option<ViewportBuffers>,
    borders: BorderIndex,
    center: Vec2,
    initialized: bool,
}

impl Display {
    pub fn new(
        config: DisplayConfig,
        catalog: SpriteCatalog,
        fuzz_sprite: Sprite,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            config,
            catalog,
            fuzz_sprite,
            surface: Surface::new(width, height),
            buffers: None,
            borders: BorderIndex::new(),
            center: Vec2::ZERO,
            initialized: false,
        }
    }

    pub fn phase(&self) -> Phase {
        match (&self.buffers, self.initialized) {
            (None, _) => Phase::Uninitialized,
            (Some(_), false) => Phase::AreaSet,
            (Some(_), true) => Phase::Initialized,
        }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn catalog(&self) -> &SpriteCatalog {
        &self.catalog
    }

    /// The composited frame.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn buffers(&self) -> Option<&ViewportBuffers> {
        self.buffers.as_ref()
    }

    pub fn borders(&self) -> &BorderIndex {
        &self.borders
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn view_area(&self) -> Option<Area> {
        self.buffers.as_ref().map(ViewportBuffers::area)
    }

    // ── Viewport ─────────────────────────────────────────────────────────

    /// Rebuild every layer buffer for `area`, keeping the pixels of the part
    /// of the world the old and new areas share.
    pub fn set_view_area(&mut self, area: Area) {
        debug!("display: view area {area:?}");
        let next = match self.buffers.take() {
            Some(previous) => ViewportBuffers::migrate(&previous, area, &self.config),
            None => ViewportBuffers::new(area, &self.config),
        };
        self.buffers = Some(next);
        self.borders.prune(area);
    }

    /// Record the focal world coordinate the frame is centered on.
    pub fn set_center(&mut self, x: f32, y: f32) {
        self.center = Vec2::new(x, y);
    }

    /// Resize the visible surface and recomposite.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface = Surface::new(width, height);
        self.redraw();
    }

    // ── World content ────────────────────────────────────────────────────

    /// Draw a `width x height` block of tiles whose top-left tile is
    /// `(offset_x, offset_y)`.  `cells` holds one mapping index per tile,
    /// row-major.  Borders are recomputed for the block and its halo once all
    /// tiles are in.
    pub fn draw_section(
        &mut self,
        width: u32,
        height: u32,
        offset_x: i32,
        offset_y: i32,
        cells: &[usize],
        mapping: &SpriteMapping,
    ) {
        let Some(bufs) = self.buffers.as_mut() else {
            warn!("display: section at ({offset_x}, {offset_y}) arrived before any view area; ignored");
            return;
        };
        let section = Area::new(offset_x, offset_y, width, height);
        debug!("display: drawing section {section:?}");

        let mut border_cache: HashMap<usize, Option<Color>> = HashMap::new();
        for (i, (x, y)) in section.tiles().enumerate() {
            let index = cells.get(i).copied();
            let stack = index.map(|idx| mapping.get(idx)).unwrap_or_default();
            draw_tile(bufs, &self.catalog, &self.fuzz_sprite, x, y, stack);
            let border = match index {
                Some(idx) => *border_cache
                    .entry(idx)
                    .or_insert_with(|| self.catalog.border_of(stack)),
                None => None,
            };
            self.borders.set(x, y, border);
        }

        for (x, y) in section.expanded(1).tiles() {
            draw_border(bufs, &self.borders, self.config.border_width, x, y);
        }
        self.initialized = true;
    }

    /// Redraw individually changed tiles.  Borders are only redrawn around
    /// tiles whose border color actually changed.
    pub fn change_tiles(&mut self, changes: &[TileChange]) {
        if !self.initialized {
            debug!("display: {} tile changes before first section; ignored", changes.len());
            return;
        }
        let Some(bufs) = self.buffers.as_mut() else { return };

        for change in changes {
            let (x, y) = change.pos;
            draw_tile(bufs, &self.catalog, &self.fuzz_sprite, x, y, &change.sprites);
            let border = self.catalog.border_of(&change.sprites);
            if border != self.borders.get(x, y) {
                self.borders.set(x, y, border);
                draw_border(bufs, &self.borders, self.config.border_width, x, y);
                for (nx, ny) in CARDINALS.into_iter().filter_map(|d| neighbour((x, y), d)) {
                    draw_border(bufs, &self.borders, self.config.border_width, nx, ny);
                }
            }
        }
    }

    /// Repaint the entity layer from scratch.  Entities only ever draw into
    /// the creatures layer, whatever layers their catalog entry names: the
    /// overlay part goes one tile up and fuzz is skipped.
    pub fn draw_dynamics(&mut self, entities: &[DynamicEntity]) {
        if !self.initialized {
            return;
        }
        let Some(bufs) = self.buffers.as_mut() else { return };

        let creatures = bufs.layer_mut(LayerKind::Creatures);
        creatures.clear();
        for entity in entities {
            let [x, y] = entity.pos;
            match self.catalog.sprite(&entity.sprite) {
                Some(sprite) => {
                    for (&kind, sub) in &sprite.layers {
                        match kind {
                            LayerKind::Fuzz => {}
                            LayerKind::Overlay => creatures.draw_sprite(sub, x, y - 1.0),
                            _ => creatures.draw_sprite(sub, x, y),
                        }
                    }
                }
                None => {
                    trace!("display: no sprite for entity '{}'", entity.sprite);
                    creatures.fill_tile(
                        Color::from_name(&entity.sprite),
                        x.round() as i32,
                        y.round() as i32,
                    );
                }
            }
        }
    }

    // ── Composition ──────────────────────────────────────────────────────

    /// Composite every layer onto the visible surface so the center tile sits
    /// in the middle of it.
    pub fn redraw(&mut self) {
        if !self.initialized {
            return;
        }
        let Some(bufs) = self.buffers.as_ref() else { return };

        let tile_px = self.config.tile_pixels() as f32;
        let area = bufs.area();
        let origin_x = self.surface.width() as f32 / 2.0 - (self.center.x - area.x as f32) * tile_px;
        let origin_y =
            self.surface.height() as f32 / 2.0 - (self.center.y - area.y as f32) * tile_px;

        self.surface.clear();
        for (kind, buf) in bufs.iter() {
            let src = buf.surface();
            let zoom = tile_px / buf.resolution() as f32;
            let lift = if kind == LayerKind::Overlay { tile_px } else { 0.0 };
            let dst = PixelRect::new(
                origin_x.round() as i32,
                (origin_y - lift).round() as i32,
                (src.width() as f32 * zoom).round() as u32,
                (src.height() as f32 * zoom).round() as u32,
            );
            let full = PixelRect::new(0, 0, src.width(), src.height());
            self.surface.draw_image(src.image(), full, dst, CompositeMode::SourceOver);
        }
    }
}

// ── Drawing helpers ──────────────────────────────────────────────────────────

/// Fully redraw tile `(x, y)`: clear its cells, carve its fuzz hole, then draw
/// the stack back to front so the first listed name ends up on top.
fn draw_tile<S: AsRef<str>>(
    bufs: &mut ViewportBuffers,
    catalog: &SpriteCatalog,
    fuzz_sprite: &Sprite,
    x: i32,
    y: i32,
    stack: &[S],
) {
    for kind in TILE_LAYERS {
        bufs.layer_mut(kind).clear_tile(x, y);
    }
    bufs.layer_mut(LayerKind::Fuzz)
        .draw_behind(|fuzz| fuzz.draw_sprite(fuzz_sprite, x as f32, y as f32));

    for name in stack.iter().rev() {
        let name = name.as_ref();
        match catalog.sprite(name) {
            Some(sprite) => {
                for (&kind, sub) in &sprite.layers {
                    bufs.layer_mut(kind).draw_sprite(sub, x as f32, y as f32);
                }
            }
            None => {
                trace!("display: no sprite for '{name}' at ({x}, {y})");
                bufs.layer_mut(LayerKind::Base).fill_tile(Color::from_name(name), x, y);
            }
        }
    }
}

/// Redraw the border cell of `(x, y)`: a stroke on every edge whose
/// neighbour has a different border color.
fn draw_border(bufs: &mut ViewportBuffers, borders: &BorderIndex, width: f32, x: i32, y: i32) {
    let layer = bufs.layer_mut(LayerKind::Borders);
    layer.clear_tile(x, y);
    if let Some((color, edges)) = borders.edges(x, y) {
        layer.draw_borders(color, x, y, edges, width);
    }
}
