use crate::config::DisplayConfig;
use crate::geometry::Area;
use crate::renderer::layer_buffer::LayerBuffer;
use crate::renderer::sprite::LayerKind;

/// One `LayerBuffer` per `LayerKind`, all covering the same view area.
pub struct ViewportBuffers {
    ground: LayerBuffer,
    fuzz: LayerBuffer,
    base: LayerBuffer,
    borders: LayerBuffer,
    main: LayerBuffer,
    creatures: LayerBuffer,
    overlay: LayerBuffer,
}

impl ViewportBuffers {
    /// Fresh, transparent buffers for `area`.
    pub fn new(area: Area, config: &DisplayConfig) -> Self {
        let make = |kind: LayerKind| LayerBuffer::new(area, resolution(kind, config));
        Self {
            ground: make(LayerKind::Ground),
            fuzz: make(LayerKind::Fuzz),
            base: make(LayerKind::Base),
            borders: make(LayerKind::Borders),
            main: make(LayerKind::Main),
            creatures: make(LayerKind::Creatures),
            overlay: make(LayerKind::Overlay),
        }
    }

    /// Buffers for `area` that start with whatever `previous` had rendered in
    /// the part of the world both areas share.
    pub fn migrate(previous: &ViewportBuffers, area: Area, config: &DisplayConfig) -> Self {
        let mut next = Self::new(area, config);
        for kind in LayerKind::ALL {
            next.layer_mut(kind).draw_buffer(previous.layer(kind));
        }
        next
    }

    pub fn area(&self) -> Area {
        self.ground.area()
    }

    pub fn layer(&self, kind: LayerKind) -> &LayerBuffer {
        match kind {
            LayerKind::Ground => &self.ground,
            LayerKind::Fuzz => &self.fuzz,
            LayerKind::Base => &self.base,
            LayerKind::Borders => &self.borders,
            LayerKind::Main => &self.main,
            LayerKind::Creatures => &self.creatures,
            LayerKind::Overlay => &self.overlay,
        }
    }

    pub fn layer_mut(&mut self, kind: LayerKind) -> &mut LayerBuffer {
        match kind {
            LayerKind::Ground => &mut self.ground,
            LayerKind::Fuzz => &mut self.fuzz,
            LayerKind::Base => &mut self.base,
            LayerKind::Borders => &mut self.borders,
            LayerKind::Main => &mut self.main,
            LayerKind::Creatures => &mut self.creatures,
            LayerKind::Overlay => &mut self.overlay,
        }
    }

    /// All buffers in composite order.
    pub fn iter(&self) -> impl Iterator<Item = (LayerKind, &LayerBuffer)> {
        LayerKind::ALL.into_iter().map(move |kind| (kind, self.layer(kind)))
    }
}

fn resolution(kind: LayerKind, config: &DisplayConfig) -> u32 {
    if kind.is_dynamic() { config.dynamic_resolution() } else { config.tile_size }
}
