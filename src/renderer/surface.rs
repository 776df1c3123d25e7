// ── Surface ───────────────────────────────────────────────────────────────────
//
// CPU raster every layer buffer and the visible frame are drawn into.  The
// renderer needs only a handful of primitives: an alpha-blended blit, a
// mask-subtract blit (erase wherever the source is opaque), a mask-intersect
// blit used when generating fuzz sprites, and solid rect fill/clear.  All
// blits sample nearest-neighbour so pixel art stays crisp at any zoom.

use image::{Pixel, Rgba, RgbaImage};

use crate::color::Color;

/// How a blit combines source pixels with the destination.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CompositeMode {
    /// Standard alpha blending, source painted over destination.
    #[default]
    SourceOver,
    /// Destination alpha is reduced by source alpha: erases where the source
    /// is opaque and leaves the destination untouched where it is clear.
    DestinationOut,
    /// Destination alpha is scaled by source alpha: keeps the destination only
    /// where the source is opaque.  Applied within the destination rect only.
    DestinationIn,
}

/// Integer pixel rectangle; the origin may be negative for destinations that
/// hang off the surface edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Intersection with `[0, width) x [0, height)` as half-open pixel ranges,
    /// or `None` when nothing is left.
    fn clip(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = self.x.max(0) as i64;
        let y0 = self.y.max(0) as i64;
        let x1 = (self.x as i64 + self.w as i64).min(width as i64);
        let y1 = (self.y as i64 + self.h as i64).min(height as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// A fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self { image: RgbaImage::new(width, height) }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 {
            return None;
        }
        self.image.get_pixel_checked(x as u32, y as u32).map(|p| Color::from(*p))
    }

    /// Copy of the pixels inside `rect` (clipped to the surface).
    pub fn region(&self, rect: PixelRect) -> RgbaImage {
        match rect.clip(self.width(), self.height()) {
            Some((x0, y0, x1, y1)) => {
                image::imageops::crop_imm(&self.image, x0, y0, x1 - x0, y1 - y0).to_image()
            }
            None => RgbaImage::new(0, 0),
        }
    }

    /// True when every pixel is fully transparent.
    pub fn is_clear(&self) -> bool {
        self.pixels().iter().all(|p| p.alpha() == 0)
    }

    pub fn clear(&mut self) {
        self.pixels_mut().fill(Color::TRANSPARENT);
    }

    pub fn clear_rect(&mut self, rect: PixelRect) {
        self.write_rect(rect, Color::TRANSPARENT);
    }

    /// Paint `rect` with `color`, alpha-blended when the color is translucent.
    pub fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        match color.alpha() {
            0 => {}
            0xFF => self.write_rect(rect, color),
            _ => {
                let Some((x0, y0, x1, y1)) = rect.clip(self.width(), self.height()) else {
                    return;
                };
                let src: Rgba<u8> = color.into();
                for y in y0..y1 {
                    for x in x0..x1 {
                        self.image.get_pixel_mut(x, y).blend(&src);
                    }
                }
            }
        }
    }

    /// Blit `src_rect` of `src` into `dst_rect` of this surface, scaling with
    /// nearest-neighbour sampling.  Source reads outside `src` are treated as
    /// transparent.
    pub fn draw_image(
        &mut self,
        src: &RgbaImage,
        src_rect: PixelRect,
        dst_rect: PixelRect,
        mode: CompositeMode,
    ) {
        if src_rect.w == 0 || src_rect.h == 0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = dst_rect.clip(self.width(), self.height()) else {
            return;
        };

        for y in y0..y1 {
            let v = (y as i64 - dst_rect.y as i64) * src_rect.h as i64 / dst_rect.h as i64;
            let sy = src_rect.y as i64 + v;
            for x in x0..x1 {
                let u = (x as i64 - dst_rect.x as i64) * src_rect.w as i64 / dst_rect.w as i64;
                let sx = src_rect.x as i64 + u;
                let s = sample(src, sx, sy);
                composite(self.image.get_pixel_mut(x, y), s, mode);
            }
        }
    }

    /// Blit the whole of `src` unscaled with its top-left corner at `(x, y)`.
    pub fn draw_surface(&mut self, src: &Surface, x: i32, y: i32, mode: CompositeMode) {
        let (w, h) = src.image.dimensions();
        self.draw_image(&src.image, PixelRect::new(0, 0, w, h), PixelRect::new(x, y, w, h), mode);
    }

    fn write_rect(&mut self, rect: PixelRect, color: Color) {
        let Some((x0, y0, x1, y1)) = rect.clip(self.width(), self.height()) else {
            return;
        };
        let stride = self.width() as usize;
        let pixels = self.pixels_mut();
        for y in y0 as usize..y1 as usize {
            pixels[y * stride + x0 as usize..y * stride + x1 as usize].fill(color);
        }
    }

    fn pixels(&self) -> &[Color] {
        bytemuck::cast_slice(self.image.as_raw())
    }

    fn pixels_mut(&mut self) -> &mut [Color] {
        bytemuck::cast_slice_mut(&mut *self.image)
    }
}

fn sample(src: &RgbaImage, x: i64, y: i64) -> Rgba<u8> {
    if x < 0 || y < 0 || x >= src.width() as i64 || y >= src.height() as i64 {
        return Rgba([0, 0, 0, 0]);
    }
    *src.get_pixel(x as u32, y as u32)
}

fn composite(dst: &mut Rgba<u8>, src: Rgba<u8>, mode: CompositeMode) {
    match mode {
        CompositeMode::SourceOver => {
            if src.0[3] == 0xFF {
                *dst = src;
            } else if src.0[3] != 0 {
                dst.blend(&src);
            }
        }
        CompositeMode::DestinationOut => scale_alpha(dst, 0xFF - src.0[3]),
        CompositeMode::DestinationIn => scale_alpha(dst, src.0[3]),
    }
}

fn scale_alpha(dst: &mut Rgba<u8>, factor: u8) {
    let a = (dst.0[3] as u32 * factor as u32 + 127) / 255;
    if a == 0 {
        *dst = Rgba([0, 0, 0, 0]);
    } else {
        dst.0[3] = a as u8;
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
