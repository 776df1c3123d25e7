// ── Color ─────────────────────────────────────────────────────────────────────
//
// Straight (non-premultiplied) RGBA8 color, the pixel format of every surface
// in the crate.  Border colors arrive from the catalog config as CSS-style hex
// strings; tiles with no catalog entry get a color hashed from their name.

use std::fmt;
use std::str::FromStr;

use image::Rgba;

use crate::error::RenderError;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const TRANSPARENT: Self = Self([0, 0, 0, 0]);
    pub const BLACK: Self = Self([0, 0, 0, 0xFF]);
    pub const WHITE: Self = Self([0xFF, 0xFF, 0xFF, 0xFF]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 0xFF])
    }

    pub fn alpha(self) -> u8 {
        self.0[3]
    }

    /// Deterministic fallback color for a sprite name with no catalog entry.
    pub fn from_name(name: &str) -> Self {
        let hash = name_hash(name);
        Self::rgb((hash >> 16) as u8, (hash >> 8) as u8, hash as u8)
    }
}

impl From<Color> for Rgba<u8> {
    fn from(c: Color) -> Self {
        Rgba(c.0)
    }
}

impl From<Rgba<u8>> for Color {
    fn from(p: Rgba<u8>) -> Self {
        Self(p.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        if a == 0xFF {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

/// Parses `#rgb`, `#rgba`, `#rrggbb` and `#rrggbbaa`.
impl FromStr for Color {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RenderError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }

        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map_err(|_| invalid());
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());

        match hex.len() {
            3 | 4 => {
                let mut out = [0xFF; 4];
                for (i, channel) in out.iter_mut().enumerate().take(hex.len()) {
                    *channel = nibble(i)? * 0x11;
                }
                Ok(Self(out))
            }
            6 | 8 => {
                let mut out = [0xFF; 4];
                for (i, channel) in out.iter_mut().enumerate().take(hex.len() / 2) {
                    *channel = byte(i * 2)?;
                }
                Ok(Self(out))
            }
            _ => Err(invalid()),
        }
    }
}

// ── Name hashing ──────────────────────────────────────────────────────────────

const HASH_SEED: u32 = 583;
const HASH_MODULUS: u32 = 1 << 24;

/// 24-bit hash over the UTF-16 code units of `name`.
pub fn name_hash(name: &str) -> u32 {
    name.encode_utf16()
        .fold(HASH_SEED, |hash, unit| (hash * 7 + unit as u32) % HASH_MODULUS)
}

/// The fallback color of `name` formatted as `#rrggbb`.
pub fn hash_color(name: &str) -> String {
    format!("#{:06x}", name_hash(name))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
