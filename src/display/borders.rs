use std::collections::HashMap;

use crate::color::Color;
use crate::geometry::{Area, Edges, TilePos};

/// Border color of every tile the display has seen, including tiles that
/// have no border (`None`).  Coordinates never recorded also read as `None`.
#[derive(Debug, Default)]
pub struct BorderIndex {
    colors: HashMap<TilePos, Option<Color>>,
}

impl BorderIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        self.colors.get(&(x, y)).copied().flatten()
    }

    /// Record the border of `(x, y)` and return the previous one.
    pub fn set(&mut self, x: i32, y: i32, border: Option<Color>) -> Option<Color> {
        self.colors.insert((x, y), border).flatten()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.colors.contains_key(&(x, y))
    }

    /// Edges of `(x, y)` that face a tile with a different border color, or
    /// `None` when the tile itself has no border.  Neighbours past the edge of
    /// the `i32` range read as `None`.
    pub fn edges(&self, x: i32, y: i32) -> Option<(Color, Edges)> {
        let color = self.get(x, y)?;
        let edges = Edges::from_fn(|dx, dy| match neighbour((x, y), (dx, dy)) {
            Some((nx, ny)) => self.get(nx, ny) != Some(color),
            None => true,
        });
        Some((color, edges))
    }

    /// Drop every entry outside `area` plus its one-tile halo.
    pub fn prune(&mut self, area: Area) {
        let halo = area.expanded(1);
        self.colors.retain(|&(x, y), _| halo.contains(x, y));
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = TilePos> + '_ {
        self.colors.keys().copied()
    }
}

/// `pos + offset`, or `None` when it leaves the `i32` range.
pub fn neighbour((x, y): TilePos, (dx, dy): (i32, i32)) -> Option<TilePos> {
    Some((x.checked_add(dx)?, y.checked_add(dy)?))
}
