// =============================================================================
// GEOMETRY.RS: Tile-space primitives
//
// World coordinates are whole tiles. An `Area` is the rectangle of tiles a
// set of layer buffers covers; the border index additionally keeps a one-tile
// halo around it so edges on the area boundary can be compared against their
// outside neighbours.
// =============================================================================

use serde::{Deserialize, Serialize};

/// A world tile coordinate.
pub type TilePos = (i32, i32);

/// Rectangle of world tiles: origin `(x, y)`, extent `w x h`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Area {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Area {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// One past the last column, saturating at `i32::MAX`.
    #[inline]
    pub fn right(&self) -> i32 {
        self.x.saturating_add_unsigned(self.w)
    }

    /// One past the last row, saturating at `i32::MAX`.
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add_unsigned(self.h)
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.right() && y < self.bottom()
    }

    /// The area grown by `margin` tiles on every side.
    pub fn expanded(&self, margin: u32) -> Area {
        Area {
            x: self.x.saturating_sub_unsigned(margin),
            y: self.y.saturating_sub_unsigned(margin),
            w: self.w.saturating_add(margin.saturating_mul(2)),
            h: self.h.saturating_add(margin.saturating_mul(2)),
        }
    }

    /// Number of tiles in the area.
    pub fn len(&self) -> usize {
        self.w as usize * self.h as usize
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// All tile coordinates, row-major.  Rows and columns past `i32::MAX`
    /// are skipped.
    pub fn tiles(&self) -> impl Iterator<Item = TilePos> + use<> {
        let (x0, y0) = (self.x, self.y);
        let (x1, y1) = (self.right(), self.bottom());
        (y0..y1).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
    }
}

// =============================================================================
// DIRECTION HELPERS
// =============================================================================

/// The 4 cardinal directions as (dx, dy) offsets: N, E, S, W.
pub const CARDINALS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Which sides of a tile cell carry a border stroke.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Edges {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Edges {
    pub const NONE: Self = Self { top: false, right: false, bottom: false, left: false };
    pub const ALL: Self = Self { top: true, right: true, bottom: true, left: true };

    /// Builds the edge set from a predicate over the `CARDINALS` offsets.
    pub fn from_fn(mut f: impl FnMut(i32, i32) -> bool) -> Self {
        let [n, e, s, w] = CARDINALS;
        Self {
            top: f(n.0, n.1),
            right: f(e.0, e.1),
            bottom: f(s.0, s.1),
            left: f(w.0, w.1),
        }
    }

    pub fn any(&self) -> bool {
        self.top || self.right || self.bottom || self.left
    }
}
