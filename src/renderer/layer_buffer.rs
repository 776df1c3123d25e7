use crate::color::Color;
use crate::geometry::{Area, Edges};
use crate::renderer::sprite::Sprite;
use crate::renderer::surface::{CompositeMode, PixelRect, Surface};

/// One layer's raster, covering a world-space `Area` at `resolution` pixels
/// per tile.
pub struct LayerBuffer {
    surface: Surface,
    area: Area,
    resolution: u32,
    mode: CompositeMode,
    draw_calls: u64,
}

impl LayerBuffer {
    pub fn new(area: Area, resolution: u32) -> Self {
        Self {
            surface: Surface::new(area.w * resolution, area.h * resolution),
            area,
            resolution,
            mode: CompositeMode::SourceOver,
            draw_calls: 0,
        }
    }

    pub fn area(&self) -> Area {
        self.area
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Number of mutating operations applied since the buffer was created.
    pub fn draw_calls(&self) -> u64 {
        self.draw_calls
    }

    /// Pixel rect of the tile cell at world `(x, y)`.  Cells too far from the
    /// area to address in `i32` pixels are pinned to the `i32` range, which
    /// still lies outside the surface.
    pub fn tile_rect(&self, x: i32, y: i32) -> PixelRect {
        PixelRect::new(
            self.pixel_offset(x, self.area.x),
            self.pixel_offset(y, self.area.y),
            self.resolution,
            self.resolution,
        )
    }

    fn pixel_offset(&self, world: i32, origin: i32) -> i32 {
        let px = (world as i64 - origin as i64) * self.resolution as i64;
        px.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }

    /// Draw `sprite` at world position `(x, y)`.  Fractional positions are
    /// allowed; the sprite's area decides how far it overhangs the cell.
    pub fn draw_sprite(&mut self, sprite: &Sprite, x: f32, y: f32) {
        self.draw_calls += 1;
        let res = self.resolution as f32;
        let px = (x - self.area.x as f32) * res + sprite.area.x * res;
        let py = (y - self.area.y as f32) * res + sprite.area.y * res;
        let dst = PixelRect::new(
            px.round() as i32,
            py.round() as i32,
            (sprite.area.w * res).round() as u32,
            (sprite.area.h * res).round() as u32,
        );
        let src = PixelRect::new(sprite.x as i32, sprite.y as i32, sprite.width, sprite.height);
        self.surface.draw_image(&sprite.image, src, dst, self.mode);
    }

    /// Run `draw` with every blit erasing the destination where it is opaque
    /// instead of painting over it.
    pub fn draw_behind(&mut self, draw: impl FnOnce(&mut LayerBuffer)) {
        self.mode = CompositeMode::DestinationOut;
        draw(self);
        self.mode = CompositeMode::SourceOver;
    }

    /// Copy another buffer's pixels to their world position in this buffer.
    /// Both buffers must share a resolution.
    pub fn draw_buffer(&mut self, other: &LayerBuffer) {
        debug_assert_eq!(self.resolution, other.resolution);
        self.draw_calls += 1;
        let x = self.pixel_offset(other.area.x, self.area.x);
        let y = self.pixel_offset(other.area.y, self.area.y);
        self.surface.draw_surface(&other.surface, x, y, self.mode);
    }

    pub fn clear(&mut self) {
        self.draw_calls += 1;
        self.surface.clear();
    }

    pub fn fill_tile(&mut self, color: Color, x: i32, y: i32) {
        self.draw_calls += 1;
        let rect = self.tile_rect(x, y);
        self.surface.fill_rect(rect, color);
    }

    pub fn clear_tile(&mut self, x: i32, y: i32) {
        self.draw_calls += 1;
        let rect = self.tile_rect(x, y);
        self.surface.clear_rect(rect);
    }

    /// Stroke the flagged cell edges of tile `(x, y)`.  `width` is the line
    /// thickness in tiles; strokes lie inside the cell and are at least one
    /// pixel thick.
    pub fn draw_borders(&mut self, color: Color, x: i32, y: i32, edges: Edges, width: f32) {
        self.draw_calls += 1;
        let cell = self.tile_rect(x, y);
        let t = ((width * self.resolution as f32).round() as u32).clamp(1, self.resolution);
        let far = (self.resolution - t) as i32;

        if edges.left {
            self.surface.fill_rect(PixelRect::new(cell.x, cell.y, t, cell.h), color);
        }
        if edges.top {
            self.surface.fill_rect(PixelRect::new(cell.x, cell.y, cell.w, t), color);
        }
        if edges.right {
            self.surface.fill_rect(PixelRect::new(cell.x.saturating_add(far), cell.y, t, cell.h), color);
        }
        if edges.bottom {
            self.surface.fill_rect(PixelRect::new(cell.x, cell.y.saturating_add(far), cell.w, t), color);
        }
    }
}
