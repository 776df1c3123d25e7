use std::rc::Rc;

use image::{Rgba, RgbaImage};

use tilescroll::color::Color;
use tilescroll::config::DisplayConfig;
use tilescroll::geometry::Area;
use tilescroll::messages::{DynamicEntity, SpriteMapping, TileChange};
use tilescroll::renderer::{FuzzTemplate, LayerKind, PixelRect, SpriteCatalog};
use tilescroll::{Display, Phase};

// ── Fixtures ──────────────────────────────────────────────────────────────

const TILE: u32 = 8;
const SCREEN: u32 = 256;

/// Solid color of atlas cell `(col, row)`.
fn cell_color(col: u32, row: u32) -> Color {
    Color([40 + 60 * col as u8, 40 + 60 * row as u8, 99, 0xFF])
}

/// 3x3-tile atlas, each cell a distinct solid color.
fn atlas() -> Rc<RgbaImage> {
    Rc::new(RgbaImage::from_fn(TILE * 3, TILE * 3, |x, y| cell_color(x / TILE, y / TILE).into()))
}

/// 10x10 template: opaque 8x8 core, half-transparent 1px rim.
fn fuzz_template() -> FuzzTemplate {
    let image = RgbaImage::from_fn(TILE + 2, TILE + 2, |x, y| {
        let rim = x == 0 || y == 0 || x == TILE + 1 || y == TILE + 1;
        Rgba([0, 0, 0, if rim { 0x80 } else { 0xFF }])
    });
    FuzzTemplate::new(image, 1, 1).unwrap()
}

const CATALOG: &str = r##"{
    "player": { "x": 0, "y": 0, "layer": "creatures" },
    "sage":   { "x": 2, "y": 0 },
    "grass1": { "x": 0, "y": 1, "layer": "ground" },
    "tree":   { "x": 1, "y": 1, "ho": true },
    "rock":   { "x": 2, "y": 1, "layer": "base", "border": "#222" },
    "water":  { "x": 0, "y": 2, "layer": "base", "border": "#004" },
    "wall":   { "x": 1, "y": 2, "layer": "base", "border": "#222" },
    "reed":   { "x": 2, "y": 2 }
}"##;

const ROCK_BORDER: Color = Color::rgb(0x22, 0x22, 0x22);

fn display() -> Display {
    let fuzz = fuzz_template();
    let config = SpriteCatalog::parse_config(CATALOG).unwrap();
    let mut catalog = SpriteCatalog::new();
    catalog.add_sprites(atlas(), &config, TILE, &fuzz).unwrap();
    Display::new(DisplayConfig::default(), catalog, fuzz.as_sprite(), SCREEN, SCREEN)
}

fn mapping(stacks: &[&[&str]]) -> SpriteMapping {
    stacks
        .iter()
        .map(|stack| stack.iter().map(|s| s.to_string()).collect::<Vec<_>>())
        .collect::<Vec<_>>()
        .into()
}

fn change(x: i32, y: i32, stack: &[&str]) -> TileChange {
    TileChange { pos: (x, y), sprites: stack.iter().map(|s| s.to_string()).collect() }
}

fn entity(name: &str, x: f32, y: f32) -> DynamicEntity {
    DynamicEntity { sprite: name.to_string(), pos: [x, y] }
}

/// Pixel of layer `kind` at offset `(px, py)` inside the cell of world tile `(x, y)`.
fn layer_pixel(d: &Display, kind: LayerKind, x: i32, y: i32, px: i32, py: i32) -> Color {
    let buf = d.buffers().unwrap().layer(kind);
    let cell = buf.tile_rect(x, y);
    buf.surface().pixel(cell.x + px, cell.y + py).unwrap()
}

#[derive(Debug, PartialEq)]
struct Strokes {
    top: bool,
    right: bool,
    bottom: bool,
    left: bool,
}

/// Which edges of tile `(x, y)` carry a border stroke (sampled at edge midpoints).
fn strokes(d: &Display, x: i32, y: i32) -> Strokes {
    let mid = TILE as i32 / 2;
    let far = TILE as i32 - 1;
    let on = |px, py| layer_pixel(d, LayerKind::Borders, x, y, px, py).alpha() != 0;
    Strokes { top: on(mid, 0), right: on(far, mid), bottom: on(mid, far), left: on(0, mid) }
}

fn border_calls(d: &Display) -> u64 {
    d.buffers().unwrap().layer(LayerKind::Borders).draw_calls()
}

// ── Section drawing & borders ─────────────────────────────────────────────

#[test]
fn grass_next_to_rock_outlines_rock_on_all_sides() {
    let mut d = display();
    d.set_view_area(Area::new(0, 0, 2, 1));
    d.draw_section(2, 1, 0, 0, &[0, 1], &mapping(&[&["grass1"], &["rock"]]));

    assert_eq!(d.phase(), Phase::Initialized);
    assert_eq!(strokes(&d, 0, 0), Strokes { top: false, right: false, bottom: false, left: false });
    assert_eq!(strokes(&d, 1, 0), Strokes { top: true, right: true, bottom: true, left: true });
    assert_eq!(layer_pixel(&d, LayerKind::Borders, 1, 0, 0, 3), ROCK_BORDER);
    // Cell interior stays clear.
    assert_eq!(layer_pixel(&d, LayerKind::Borders, 1, 0, 4, 4), Color::TRANSPARENT);
}

#[test]
fn same_colored_neighbours_share_no_edge() {
    let mut d = display();
    d.set_view_area(Area::new(0, 0, 2, 1));
    // rock and wall are different sprites with the same border color.
    d.draw_section(2, 1, 0, 0, &[0, 1], &mapping(&[&["rock"], &["wall"]]));
    assert_eq!(strokes(&d, 0, 0), Strokes { top: true, right: false, bottom: true, left: true });
    assert_eq!(strokes(&d, 1, 0), Strokes { top: true, right: true, bottom: true, left: false });
}

#[test]
fn border_strokes_are_symmetric() {
    let mut d = display();
    let area = Area::new(0, 0, 4, 4);
    d.set_view_area(area);
    let cells = [0, 0, 1, 2, 0, 1, 1, 2, 2, 2, 0, 0, 1, 0, 2, 1];
    d.draw_section(4, 4, 0, 0, &cells, &mapping(&[&["rock"], &["water"], &["wall"]]));

    for (x, y) in area.tiles() {
        if x + 1 < area.right() {
            let differ = d.borders().get(x, y) != d.borders().get(x + 1, y);
            assert_eq!(strokes(&d, x, y).right, differ, "({x},{y}) right");
            assert_eq!(strokes(&d, x + 1, y).left, differ, "({},{y}) left", x + 1);
        }
        if y + 1 < area.bottom() {
            let differ = d.borders().get(x, y) != d.borders().get(x, y + 1);
            assert_eq!(strokes(&d, x, y).bottom, differ, "({x},{y}) bottom");
            assert_eq!(strokes(&d, x, y + 1).top, differ, "({x},{}) top", y + 1);
        }
    }
}

#[test]
fn stack_is_drawn_back_to_front() {
    let mut d = display();
    d.set_view_area(Area::new(0, 0, 1, 1));
    // water and rock both live on the base layer; the first name wins.
    d.draw_section(1, 1, 0, 0, &[0], &mapping(&[&["water", "rock"]]));
    assert_eq!(layer_pixel(&d, LayerKind::Base, 0, 0, 3, 3), cell_color(0, 2));
    assert_eq!(d.borders().get(0, 0), Some(Color::rgb(0, 0, 0x44)));
}

#[test]
fn unknown_names_fill_base_with_hashed_color() {
    let mut d = display();
    d.set_view_area(Area::new(0, 0, 2, 1));
    d.draw_section(2, 1, 0, 0, &[0, 1], &mapping(&[&["unknowntile1"], &["grass1"]]));
    assert_eq!(layer_pixel(&d, LayerKind::Base, 0, 0, 2, 2), Color::from_name("unknowntile1"));

    d.change_tiles(&[change(1, 0, &["neverseen"])]);
    assert_eq!(layer_pixel(&d, LayerKind::Base, 1, 0, 2, 2), Color::from_name("neverseen"));
    assert_eq!(layer_pixel(&d, LayerKind::Ground, 1, 0, 2, 2), Color::TRANSPARENT);
}

// ── Incremental updates ───────────────────────────────────────────────────

#[test]
fn unchanged_border_skips_border_redraw() {
    let mut d = display();
    d.set_view_area(Area::new(0, 0, 3, 3));
    d.draw_section(3, 3, 0, 0, &[0; 9], &mapping(&[&["grass1"]]));

    let before = border_calls(&d);
    d.change_tiles(&[change(1, 1, &["reed", "grass1"])]);
    assert_eq!(border_calls(&d), before);

    // rock -> wall keeps the same color too.
    d.change_tiles(&[change(1, 1, &["rock"])]);
    let after_rock = border_calls(&d);
    d.change_tiles(&[change(1, 1, &["wall"])]);
    assert_eq!(border_calls(&d), after_rock);
}

#[test]
fn changed_border_redraws_tile_and_neighbours() {
    let mut d = display();
    d.set_view_area(Area::new(0, 0, 3, 3));
    d.draw_section(3, 3, 0, 0, &[0; 9], &mapping(&[&["rock"]]));
    assert_eq!(strokes(&d, 1, 1), Strokes { top: false, right: false, bottom: false, left: false });

    let before = border_calls(&d);
    d.change_tiles(&[change(1, 1, &["grass1"])]);
    // One clear per cell, plus a stroke for each of the four bordered neighbours.
    assert_eq!(border_calls(&d), before + 9);

    // The hole is outlined from the outside; the grass tile itself is not.
    assert_eq!(strokes(&d, 1, 1), Strokes { top: false, right: false, bottom: false, left: false });
    assert!(strokes(&d, 1, 0).bottom);
    assert!(strokes(&d, 0, 1).right);
    assert!(strokes(&d, 2, 1).left);
    assert!(strokes(&d, 1, 2).top);
    assert!(!strokes(&d, 0, 0).right);
}

#[test]
fn changing_ground_tile_carves_its_fuzz() {
    let mut d = display();
    d.set_view_area(Area::new(0, 0, 3, 3));
    d.draw_section(3, 3, 0, 0, &[0; 9], &mapping(&[&["grass1"]]));
    assert_eq!(layer_pixel(&d, LayerKind::Fuzz, 1, 1, 4, 4), cell_color(0, 1));

    d.change_tiles(&[change(1, 1, &["rock"])]);
    assert_eq!(layer_pixel(&d, LayerKind::Fuzz, 1, 1, 4, 4), Color::TRANSPARENT);
    assert_eq!(layer_pixel(&d, LayerKind::Ground, 1, 1, 4, 4), Color::TRANSPARENT);
    assert_eq!(layer_pixel(&d, LayerKind::Base, 1, 1, 4, 4), cell_color(2, 1));
    // Neighbouring fuzz is untouched in the middle of its cell.
    assert_eq!(layer_pixel(&d, LayerKind::Fuzz, 0, 1, 4, 4), cell_color(0, 1));
}

#[test]
fn change_outside_area_does_not_panic() {
    let mut d = display();
    d.set_view_area(Area::new(0, 0, 2, 2));
    d.draw_section(2, 2, 0, 0, &[0; 4], &mapping(&[&["rock"]]));
    d.change_tiles(&[change(50, -7, &["water"]), change(2, 0, &["grass1"])]);
    assert_eq!(d.borders().get(50, -7), Some(Color::rgb(0, 0, 0x44)));
    assert!(strokes(&d, 1, 0).right);
}

#[test]
fn far_away_coordinates_are_clipped() {
    let mut d = display();
    d.set_view_area(Area::new(0, 0, 2, 2));
    d.draw_section(2, 2, 0, 0, &[0; 4], &mapping(&[&["grass1"]]));
    let before = d.buffers().unwrap().layer(LayerKind::Base).surface().image().clone();

    d.change_tiles(&[
        change(400_000_000, 0, &["rock"]),
        change(-400_000_000, 400_000_000, &["water", "unknowntile1"]),
        change(i32::MAX, i32::MIN, &["wall"]),
    ]);
    d.draw_dynamics(&[entity("ghost", 4.0e8, -4.0e8), entity("player", 1.0e12, 0.0)]);
    d.redraw();

    assert_eq!(d.borders().get(i32::MAX, i32::MIN), Some(ROCK_BORDER));
    assert_eq!(d.buffers().unwrap().layer(LayerKind::Base).surface().image(), &before);
    assert!(d.buffers().unwrap().layer(LayerKind::Creatures).surface().is_clear());
}

// ── Viewport ──────────────────────────────────────────────────────────────

#[test]
fn set_view_area_prunes_border_index_to_halo() {
    let mut d = display();
    d.set_view_area(Area::new(0, 0, 10, 10));
    d.draw_section(10, 10, 0, 0, &[0; 100], &mapping(&[&["rock"]]));
    assert_eq!(d.borders().len(), 100);

    let area = Area::new(5, 5, 3, 3);
    d.set_view_area(area);
    assert!(!d.borders().is_empty());
    for (x, y) in d.borders().keys() {
        assert!(x >= area.x - 1 && x <= area.right(), "x={x}");
        assert!(y >= area.y - 1 && y <= area.bottom(), "y={y}");
    }
    assert_eq!(d.borders().len(), 25);
}

#[test]
fn panning_preserves_rendered_pixels() {
    let mut d = display();
    d.set_view_area(Area::new(0, 0, 4, 4));
    let cells: Vec<usize> = (0..16).map(|i| i % 3).collect();
    d.draw_section(4, 4, 0, 0, &cells, &mapping(&[&["rock"], &["grass1"], &["tree"]]));

    let snapshot = |d: &Display, kind: LayerKind| {
        let buf = d.buffers().unwrap().layer(kind);
        let cell = buf.tile_rect(3, 2);
        buf.surface().region(PixelRect::new(cell.x, cell.y, cell.w, cell.h))
    };
    let before: Vec<_> = LayerKind::ALL.iter().map(|&k| snapshot(&d, k)).collect();

    d.set_view_area(Area::new(2, 1, 4, 4));
    let after: Vec<_> = LayerKind::ALL.iter().map(|&k| snapshot(&d, k)).collect();
    assert_eq!(before, after);
    assert_eq!(d.view_area(), Some(Area::new(2, 1, 4, 4)));
}

// ── Lifecycle ─────────────────────────────────────────────────────────────

#[test]
fn updates_before_first_section_are_ignored() {
    let mut d = display();
    d.change_tiles(&[change(0, 0, &["rock"])]);
    d.draw_dynamics(&[entity("player", 0.0, 0.0)]);
    d.redraw();
    assert_eq!(d.phase(), Phase::Uninitialized);
    assert!(d.surface().is_clear());

    d.set_view_area(Area::new(0, 0, 2, 2));
    d.change_tiles(&[change(0, 0, &["rock"])]);
    d.draw_dynamics(&[entity("player", 0.0, 0.0)]);
    d.redraw();
    assert_eq!(d.phase(), Phase::AreaSet);
    assert!(d.surface().is_clear());
    assert!(d.borders().is_empty());
    for (kind, buf) in d.buffers().unwrap().iter() {
        assert_eq!(buf.draw_calls(), 0, "{kind:?}");
    }
}

// ── Entities ──────────────────────────────────────────────────────────────

#[test]
fn dynamics_are_fully_repainted() {
    let mut d = display();
    d.set_view_area(Area::new(0, 0, 4, 4));
    d.draw_section(4, 4, 0, 0, &[0; 16], &mapping(&[&["grass1"]]));

    d.draw_dynamics(&[entity("player", 2.0, 2.0)]);
    let creatures = d.buffers().unwrap().layer(LayerKind::Creatures);
    assert_eq!(creatures.surface().pixel(2 * 32 + 16, 2 * 32 + 16), Some(cell_color(0, 0)));

    d.draw_dynamics(&[]);
    assert!(d.buffers().unwrap().layer(LayerKind::Creatures).surface().is_clear());
}

#[test]
fn dynamics_draw_at_fractional_positions() {
    let mut d = display();
    d.set_view_area(Area::new(0, 0, 4, 4));
    d.draw_section(4, 4, 0, 0, &[0; 16], &mapping(&[&["grass1"]]));
    d.draw_dynamics(&[entity("player", 1.5, 0.0)]);
    let s = d.buffers().unwrap().layer(LayerKind::Creatures).surface();
    assert_eq!(s.pixel(47, 5), Some(Color::TRANSPARENT));
    assert_eq!(s.pixel(48, 5), Some(cell_color(0, 0)));
    assert_eq!(s.pixel(79, 5), Some(cell_color(0, 0)));
}

#[test]
fn unknown_entity_fills_creature_cell() {
    let mut d = display();
    d.set_view_area(Area::new(0, 0, 2, 2));
    d.draw_section(2, 2, 0, 0, &[0; 4], &mapping(&[&["grass1"]]));
    d.draw_dynamics(&[entity("ghost", 1.0, 1.0)]);
    let s = d.buffers().unwrap().layer(LayerKind::Creatures).surface();
    assert_eq!(s.pixel(40, 40), Some(Color::from_name("ghost")));
    d.draw_dynamics(&[]);
    assert!(d.buffers().unwrap().layer(LayerKind::Creatures).surface().is_clear());
}

#[test]
fn entities_never_touch_static_layers() {
    let mut d = display();
    d.set_view_area(Area::new(0, 0, 3, 3));
    d.draw_section(3, 3, 0, 0, &[0; 9], &mapping(&[&["grass1"]]));
    let static_calls: Vec<u64> = d
        .buffers()
        .unwrap()
        .iter()
        .filter(|(kind, _)| !kind.is_dynamic())
        .map(|(_, buf)| buf.draw_calls())
        .collect();

    // tree has a main sprite and an overlay; grass1 has ground and fuzz.
    d.draw_dynamics(&[entity("tree", 1.0, 2.0), entity("grass1", 0.0, 0.0)]);
    let creatures = d.buffers().unwrap().layer(LayerKind::Creatures).surface();
    assert_eq!(creatures.pixel(48, 80), Some(cell_color(1, 1)));
    assert_eq!(creatures.pixel(48, 48), Some(cell_color(1, 0)));
    assert_eq!(creatures.pixel(16, 16), Some(cell_color(0, 1)));

    let after: Vec<u64> = d
        .buffers()
        .unwrap()
        .iter()
        .filter(|(kind, _)| !kind.is_dynamic())
        .map(|(_, buf)| buf.draw_calls())
        .collect();
    assert_eq!(static_calls, after);

    d.draw_dynamics(&[]);
    assert!(d.buffers().unwrap().layer(LayerKind::Creatures).surface().is_clear());
    assert!(d.buffers().unwrap().layer(LayerKind::Main).surface().is_clear());
    assert!(d.buffers().unwrap().layer(LayerKind::Overlay).surface().is_clear());
}

// ── Composition ───────────────────────────────────────────────────────────

#[test]
fn redraw_centers_focal_tile_and_lifts_overlay() {
    let mut d = display();
    d.set_view_area(Area::new(0, 0, 1, 1));
    d.draw_section(1, 1, 0, 0, &[0], &mapping(&[&["tree"]]));
    d.set_center(0.0, 0.0);
    d.redraw();

    let mid = SCREEN as i32 / 2;
    // Tile (0,0) covers [mid, mid+32) on screen; its overlay sits one tile up.
    assert_eq!(d.surface().pixel(mid + 10, mid + 10), Some(cell_color(1, 1)));
    assert_eq!(d.surface().pixel(mid + 10, mid - 10), Some(cell_color(1, 0)));
    assert_eq!(d.surface().pixel(mid - 10, mid + 10), Some(Color::TRANSPARENT));
}

#[test]
fn redraw_follows_center() {
    let mut d = display();
    d.set_view_area(Area::new(0, 0, 3, 1));
    d.draw_section(3, 1, 0, 0, &[0, 1, 2], &mapping(&[&["rock"], &["water"], &["reed"]]));
    d.set_center(2.0, 0.0);
    d.redraw();
    let mid = SCREEN as i32 / 2;
    assert_eq!(d.surface().pixel(mid + 16, mid + 16), Some(cell_color(2, 2)));
    assert_eq!(d.surface().pixel(mid - 16, mid + 16), Some(cell_color(0, 2)));

    // Moving the center only moves the frame.
    d.set_center(1.0, 0.0);
    d.redraw();
    assert_eq!(d.surface().pixel(mid + 16, mid + 16), Some(cell_color(0, 2)));
}

#[test]
fn resize_recomposites() {
    let mut d = display();
    d.set_view_area(Area::new(0, 0, 1, 1));
    d.draw_section(1, 1, 0, 0, &[0], &mapping(&[&["rock"]]));
    d.resize(100, 60);
    assert_eq!((d.surface().width(), d.surface().height()), (100, 60));
    assert_eq!(d.surface().pixel(60, 40), Some(cell_color(2, 1)));
}
