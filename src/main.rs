use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use log::{error, info};

use loam::{NullSink, WorldManager};
use loam_world::GenParams;

/// Headless voxel world generator: builds a chunk region from a seed and
/// reports mesh statistics.
#[derive(Parser, Debug)]
#[command(name = "loam", version, about)]
struct Args {
    /// World seed (any integer; the UI convention is 8 decimal digits).
    #[arg(long, default_value_t = 12_345_678)]
    seed: i32,

    /// Horizontal chunk radius around the origin.
    #[arg(long, default_value_t = 1)]
    radius: i32,

    /// Vertical extent of the region, in chunks above y = 0.
    #[arg(long, default_value_t = 3)]
    chunks_y: usize,

    /// Worker threads for background generation; 0 runs synchronously.
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Optional TOML file overriding terrain parameters.
    #[arg(long)]
    params: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let params = match &args.params {
        Some(path) => match GenParams::from_path(path) {
            Ok(p) => p,
            Err(e) => {
                error!("failed to load params from {}: {e}", path.display());
                std::process::exit(2);
            }
        },
        None => GenParams::default(),
    };

    let mut world = WorldManager::new(args.seed, params).with_chunks_y(args.chunks_y);
    if args.threads > 0 {
        world = world.with_runtime(args.threads);
    }

    let t0 = Instant::now();
    world.generate_initial_chunks(args.radius);
    world.update(&mut NullSink);
    let totals = world.mesh_totals();

    info!(
        "world ready: {} chunks, {} meshes, {} vertices, {} triangles in {:?}",
        totals.chunks,
        totals.meshes,
        totals.vertices,
        totals.triangles,
        t0.elapsed()
    );
    info!(
        "surface height at origin: {}",
        world.height_at(0, 0)
    );
}
