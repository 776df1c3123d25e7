// ── World messages ────────────────────────────────────────────────────────────
//
// Decoded payloads of the server's "world" updates.  Each message is a
// two-element JSON array `[type, args]`; a world update bundles several of
// them and is applied as a unit before a single redraw.

use std::collections::HashMap;

use log::debug;
use serde::Deserialize;

use crate::display::Display;
use crate::geometry::{Area, TilePos};

// ── SpriteMapping ─────────────────────────────────────────────────────────────

/// Section palette: cell index -> sprite stack, topmost sprite first.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawMapping")]
pub struct SpriteMapping {
    stacks: HashMap<usize, Vec<String>>,
}

impl SpriteMapping {
    /// Stack for `index`; empty when the index is not mapped.
    pub fn get(&self, index: usize) -> &[String] {
        self.stacks.get(&index).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn insert(&mut self, index: usize, stack: Vec<String>) {
        self.stacks.insert(index, stack);
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}

impl From<Vec<Vec<String>>> for SpriteMapping {
    fn from(list: Vec<Vec<String>>) -> Self {
        Self { stacks: list.into_iter().enumerate().collect() }
    }
}

impl FromIterator<(usize, Vec<String>)> for SpriteMapping {
    fn from_iter<I: IntoIterator<Item = (usize, Vec<String>)>>(iter: I) -> Self {
        Self { stacks: iter.into_iter().collect() }
    }
}

/// The server sends the palette as a list; older payloads key it by index.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawMapping {
    List(Vec<Vec<String>>),
    Keyed(HashMap<String, Vec<String>>),
}

impl TryFrom<RawMapping> for SpriteMapping {
    type Error = String;

    fn try_from(raw: RawMapping) -> Result<Self, Self::Error> {
        match raw {
            RawMapping::List(list) => Ok(list.into()),
            RawMapping::Keyed(map) => map
                .into_iter()
                .map(|(key, stack)| {
                    key.parse::<usize>()
                        .map(|idx| (idx, stack))
                        .map_err(|_| format!("mapping key '{key}' is not a cell index"))
                })
                .collect(),
        }
    }
}

// ── Payloads ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ViewAreaMessage {
    pub area: Area,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SectionMessage {
    pub area: Area,
    /// One mapping index per tile of `area`, row-major.
    pub field: Vec<usize>,
    pub mapping: SpriteMapping,
}

/// New sprite stack of one tile: `[[x, y], [name, ...]]`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "(TilePos, Vec<String>)")]
pub struct TileChange {
    pub pos: TilePos,
    pub sprites: Vec<String>,
}

impl From<(TilePos, Vec<String>)> for TileChange {
    fn from((pos, sprites): (TilePos, Vec<String>)) -> Self {
        Self { pos, sprites }
    }
}

/// A moving entity: `{ "s": name, "p": [x, y] }`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DynamicEntity {
    #[serde(rename = "s")]
    pub sprite: String,
    #[serde(rename = "p")]
    pub pos: [f32; 2],
}

// ── WorldMessage ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "(String, serde_json::Value)")]
pub enum WorldMessage {
    ViewArea(ViewAreaMessage),
    Section(SectionMessage),
    ChangeCells(Vec<TileChange>),
    Dynamics(Vec<DynamicEntity>),
    PlayerPos([f32; 2]),
    /// Message types the renderer has no use for (inventory, chat, ...).
    Other(String),
}

impl TryFrom<(String, serde_json::Value)> for WorldMessage {
    type Error = serde_json::Error;

    fn try_from((kind, args): (String, serde_json::Value)) -> Result<Self, Self::Error> {
        Ok(match kind.as_str() {
            "viewarea" => WorldMessage::ViewArea(serde_json::from_value(args)?),
            "section" => WorldMessage::Section(serde_json::from_value(args)?),
            "changecells" => WorldMessage::ChangeCells(serde_json::from_value(args)?),
            "dynamics" => WorldMessage::Dynamics(serde_json::from_value(args)?),
            "playerpos" => WorldMessage::PlayerPos(serde_json::from_value(args)?),
            _ => WorldMessage::Other(kind),
        })
    }
}

/// Parse one world update: a JSON array of `[type, args]` messages.
pub fn parse_world(json: &str) -> serde_json::Result<Vec<WorldMessage>> {
    serde_json::from_str(json)
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

impl Display {
    /// Apply one decoded message without recompositing.
    pub fn apply(&mut self, message: &WorldMessage) {
        match message {
            WorldMessage::ViewArea(msg) => self.set_view_area(msg.area),
            WorldMessage::Section(msg) => self.draw_section(
                msg.area.w,
                msg.area.h,
                msg.area.x,
                msg.area.y,
                &msg.field,
                &msg.mapping,
            ),
            WorldMessage::ChangeCells(changes) => self.change_tiles(changes),
            WorldMessage::Dynamics(entities) => self.draw_dynamics(entities),
            WorldMessage::PlayerPos([x, y]) => self.set_center(*x, *y),
            WorldMessage::Other(kind) => debug!("display: ignoring '{kind}' message"),
        }
    }

    /// Apply a whole world update, then composite once.
    pub fn apply_world(&mut self, messages: &[WorldMessage]) {
        for message in messages {
            self.apply(message);
        }
        self.redraw();
    }
}
