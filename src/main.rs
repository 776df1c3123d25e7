// Headless front end: load the atlas and fuzz template from disk, replay a
// recorded list of world updates and write the last composited frame as PNG.
//
// `world.json` holds an array of world updates, each an array of
// `[type, args]` messages as sent by the server.

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use log::info;

use tilescroll::config::{DisplayConfig, FuzzMargins};
use tilescroll::messages::WorldMessage;
use tilescroll::renderer::{FuzzTemplate, SpriteCatalog};
use tilescroll::{DEFAULT_CATALOG, DEFAULT_TILE_SIZE, Display};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Replay world updates and render the last frame to PNG", long_about = None)]
struct Args {
    /// Sprite atlas image
    atlas: PathBuf,
    /// Fuzz template image
    fuzz: PathBuf,
    /// JSON array of world updates
    world: PathBuf,
    /// Output PNG
    output: PathBuf,
    /// Catalog JSON; the bundled catalog is used when omitted
    #[clap(long)]
    catalog: Option<PathBuf>,
    /// Surface size as <W>x<H>
    #[clap(long, value_parser = parse_pair, default_value = "800x600")]
    size: (u32, u32),
    /// Fuzz template margins as <X>x<Y>
    #[clap(long, value_parser = parse_margins, default_value = "1x1")]
    margins: FuzzMargins,
}

fn parse_pair(value: &str) -> Result<(u32, u32), String> {
    let (a, b) = value
        .split_once('x')
        .ok_or_else(|| format!("expected <A>x<B>, got '{value}'"))?;
    let num = |s: &str| s.parse::<u32>().map_err(|e| format!("'{s}': {e}"));
    Ok((num(a)?, num(b)?))
}

fn parse_margins(value: &str) -> Result<FuzzMargins, String> {
    parse_pair(value).map(|(x, y)| FuzzMargins { x, y })
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // --- Assets ---
    let atlas = image::open(&args.atlas)
        .with_context(|| format!("failed to load atlas {:?}", args.atlas))?
        .to_rgba8();
    let template = image::open(&args.fuzz)
        .with_context(|| format!("failed to load fuzz template {:?}", args.fuzz))?
        .to_rgba8();
    let fuzz = FuzzTemplate::new(template, args.margins.x, args.margins.y)?;

    let catalog_json = match &args.catalog {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {path:?}"))?,
        None => DEFAULT_CATALOG.to_string(),
    };
    let config = SpriteCatalog::parse_config(&catalog_json)?;
    let mut catalog = SpriteCatalog::new();
    catalog
        .add_sprites(Rc::new(atlas), &config, DEFAULT_TILE_SIZE, &fuzz)
        .context("failed to build sprite catalog")?;
    info!("Catalog loaded: {} sprites", catalog.len());

    // --- Replay ---
    let world_json = std::fs::read_to_string(&args.world)
        .with_context(|| format!("failed to read world updates {:?}", args.world))?;
    let updates: Vec<Vec<WorldMessage>> =
        serde_json::from_str(&world_json).context("failed to decode world updates")?;

    let display_config = DisplayConfig { tile_size: DEFAULT_TILE_SIZE, ..DisplayConfig::default() };
    let (width, height) = args.size;
    let mut display = Display::new(display_config, catalog, fuzz.as_sprite(), width, height);
    for update in &updates {
        display.apply_world(update);
    }
    info!("Applied {} world updates; display is {:?}", updates.len(), display.phase());

    // --- Output ---
    display
        .surface()
        .image()
        .save(&args.output)
        .with_context(|| format!("failed to write {:?}", args.output))?;
    info!("Frame written to {:?}", args.output);
    Ok(())
}
