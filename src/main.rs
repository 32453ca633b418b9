/*
 * Robot Arena
 *
 * Interactive viewer for a bounded 2D arena of obstacles, food and
 * autonomous robots: whisker-steered prey, beam-sensor foragers, predators
 * that grow and slow as they feed, and keyboard-driven player robots.
 *
 * The starting arena comes from the layout file given with --layout, then
 * from arena_layout.txt in the working directory if it exists, otherwise
 * from the default setup. Set RUST_LOG (e.g. `RUST_LOG=robot_arena=debug`)
 * to see simulation events.
 */

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::error;

use robot_arena::app::{self, LaunchConfig};
use robot_arena::{layout, Result, SimulationParams};

#[derive(Parser, Debug)]
#[command(name = "robot_arena")]
#[command(version)]
#[command(about = "Interactive 2D arena of predator, prey and sensor robots")]
struct Args {
    /// Layout file to start from (one `Kind,x,y,radius` line per entity)
    #[arg(short, long)]
    layout: Option<PathBuf>,

    /// Simulation parameters (JSON); missing fields keep their defaults
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Random seed for reproducible placement
    #[arg(long)]
    seed: Option<u64>,

    /// Start with periodic food spawning enabled
    #[arg(long)]
    food_spawning: bool,
}

fn main() {
    init_tracing();
    let args = Args::parse();

    match prepare(args) {
        Ok(config) => app::configure(config),
        Err(err) => {
            error!(%err, "failed to prepare the arena");
            std::process::exit(1);
        }
    }

    nannou::app(app::model).update(app::update).run();
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn prepare(args: Args) -> Result<LaunchConfig> {
    let mut params = match &args.params {
        Some(path) => SimulationParams::from_json_file(path)?,
        None => SimulationParams::default(),
    };
    if args.seed.is_some() {
        params.seed = args.seed;
    }
    params.food_spawning |= args.food_spawning;
    params.validate()?;

    let mut rng = app::seeded_rng(params.seed);
    let arena = layout::starting_arena(
        args.layout.as_deref(),
        Path::new(layout::DEFAULT_LAYOUT_PATH),
        &params,
        &mut rng,
    )?;

    Ok(LaunchConfig { params, arena, rng })
}
