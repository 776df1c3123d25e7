// ── Edge fuzz ─────────────────────────────────────────────────────────────────
//
// Ground tiles bleed a little past their cell so neighbouring ground types
// blend instead of meeting at a hard grid seam.  The template is an image the
// size of one tile plus a margin on every side whose alpha falls off from
// opaque in the middle to transparent at the rim.  A fuzz sprite is the ground
// texture tiled across the whole template and masked by the template's alpha.

use std::rc::Rc;

use image::RgbaImage;

use crate::error::{RenderError, Result};
use crate::renderer::sprite::{Sprite, SpriteArea};
use crate::renderer::surface::{CompositeMode, PixelRect, Surface};

pub struct FuzzTemplate {
    image: Rc<RgbaImage>,
    margin_x: u32,
    margin_y: u32,
    inner_width: u32,
    inner_height: u32,
    /// Footprint of a fuzz sprite relative to its tile cell.
    area: SpriteArea,
}

impl FuzzTemplate {
    /// Fails when the margins leave no inner tile area.
    pub fn new(image: RgbaImage, margin_x: u32, margin_y: u32) -> Result<Self> {
        let (width, height) = image.dimensions();
        if 2 * margin_x >= width || 2 * margin_y >= height {
            return Err(RenderError::FuzzMarginTooLarge { width, height, margin_x, margin_y });
        }
        let inner_width = width - 2 * margin_x;
        let inner_height = height - 2 * margin_y;
        let margin_w = margin_x as f32 / inner_width as f32;
        let margin_h = margin_y as f32 / inner_height as f32;
        let area = SpriteArea {
            x: -margin_w,
            y: -margin_h,
            w: 1.0 + 2.0 * margin_w,
            h: 1.0 + 2.0 * margin_h,
        };
        Ok(Self { image: Rc::new(image), margin_x, margin_y, inner_width, inner_height, area })
    }

    pub fn area(&self) -> SpriteArea {
        self.area
    }

    /// Size a sprite must have to be fuzzed with this template.
    pub fn inner_size(&self) -> (u32, u32) {
        (self.inner_width, self.inner_height)
    }

    /// Build the fuzzed version of `sprite`.
    ///
    /// The sprite is tiled across a template-sized surface starting one sprite
    /// before the margin, so the tile lands exactly on the inner area and its
    /// wrapped copies fill the margins.  The template alpha then masks it.
    pub fn fuzz(&self, sprite: &Sprite) -> Result<Sprite> {
        if sprite.width != self.inner_width || sprite.height != self.inner_height {
            return Err(RenderError::FuzzSizeMismatch {
                expected_w: self.inner_width,
                expected_h: self.inner_height,
                actual_w: sprite.width,
                actual_h: sprite.height,
            });
        }

        let (width, height) = self.image.dimensions();
        let mut out = Surface::new(width, height);
        let src_rect = PixelRect::new(sprite.x as i32, sprite.y as i32, sprite.width, sprite.height);

        let mut x = self.margin_x as i32 - sprite.width as i32;
        while x < width as i32 {
            let mut y = self.margin_y as i32 - sprite.height as i32;
            while y < height as i32 {
                let dst = PixelRect::new(x, y, sprite.width, sprite.height);
                out.draw_image(&sprite.image, src_rect, dst, CompositeMode::SourceOver);
                y += sprite.height as i32;
            }
            x += sprite.width as i32;
        }

        let full = PixelRect::new(0, 0, width, height);
        out.draw_image(&self.image, full, full, CompositeMode::DestinationIn);

        Ok(Sprite::whole(Rc::new(out.into_image())).with_area(self.area))
    }

    /// The template itself, positioned like a fuzz sprite.  Erasing with it
    /// carves the hole a freshly drawn tile leaves in the fuzz layer.
    pub fn as_sprite(&self) -> Sprite {
        Sprite::whole(Rc::clone(&self.image)).with_area(self.area)
    }
}
