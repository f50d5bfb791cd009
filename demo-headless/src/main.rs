mod village;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use fire_spread_core::{
    ChunkedGrid, FireSimulation, FlammabilityTable, SimulationConfig, TICKS_PER_SECOND,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Fire spread demo: lights a village house and reports burn progress
#[derive(Parser, Debug)]
#[command(name = "fire-spread-demo")]
#[command(about = "Voxel fire spread and burn progress demo", long_about = None)]
struct Args {
    /// Simulated time limit in seconds
    #[arg(short, long, default_value_t = 600)]
    duration: u32,

    /// RNG seed (overrides the config file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Simulation config JSON (fire and region tunables)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Flammability table JSON replacing the built-in one
    #[arg(long)]
    flammability: Option<PathBuf>,

    /// Multiply both base chances, to watch a fire in less time
    #[arg(long, default_value_t = 1.0)]
    intensity: f64,

    /// Number of houses in the village
    #[arg(long, default_value_t = 3)]
    houses: usize,

    /// Gap between houses in blocks
    #[arg(long, default_value_t = 2)]
    spacing: i32,

    /// House the fire starts in
    #[arg(long, default_value_t = 0)]
    start_house: usize,

    /// Report interval in seconds
    #[arg(short, long, default_value_t = 15)]
    report_interval: u32,

    /// Print final region summaries as JSON
    #[arg(long)]
    json: bool,
}

fn load_config(args: &Args) -> Result<SimulationConfig, String> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
            SimulationConfig::from_json(&text).map_err(|e| e.to_string())?
        }
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.intensity != 1.0 {
        info!(intensity = args.intensity, "Scaling spread and burn chances");
    }
    config.fire.base_spread_chance *= args.intensity;
    config.fire.base_burn_chance *= args.intensity;
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn load_table(args: &Args) -> Result<FlammabilityTable, String> {
    match &args.flammability {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
            FlammabilityTable::from_reader(BufReader::new(file)).map_err(|e| e.to_string())
        }
        None => Ok(FlammabilityTable::default()),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    if args.houses == 0 || args.start_house >= args.houses {
        eprintln!("--start-house must name one of the {} houses", args.houses);
        return ExitCode::FAILURE;
    }

    let (config, table) = match load_config(&args).and_then(|c| Ok((c, load_table(&args)?))) {
        Ok(loaded) => loaded,
        Err(message) => {
            error!("{message}");
            return ExitCode::FAILURE;
        }
    };

    println!("=== Fire Spread Demo ===\n");

    let mut grid = ChunkedGrid::new();
    let regions = match village::build(&mut grid, args.houses, args.spacing) {
        Ok(regions) => regions,
        Err(e) => {
            error!("Failed to build village: {e}");
            return ExitCode::FAILURE;
        }
    };
    println!(
        "Built {} houses over {} chunks (seed {})",
        regions.len(),
        grid.loaded_chunk_count(),
        config.seed
    );

    let mut sim = FireSimulation::with_table(grid, table, config);
    sim.replace_regions("village", &regions);

    let origin = village::ignition_point(args.start_house, args.spacing);
    if !sim.ignite(origin) {
        eprintln!("Could not light a fire at {origin:?}");
        return ExitCode::FAILURE;
    }
    println!(
        "Lit a fire in the {} at ({}, {}, {})\n",
        regions[args.start_house].name, origin.x, origin.y, origin.z
    );

    println!("Time(s) | Fires | Burned | Ignited | Remaining | Progress");
    println!("--------|-------|--------|---------|-----------|---------");

    let max_ticks = u64::from(args.duration) * u64::from(TICKS_PER_SECOND);
    let report_every = u64::from(args.report_interval.max(1)) * u64::from(TICKS_PER_SECOND);
    let mut stats = sim.get_stats();

    while stats.world_age < max_ticks {
        stats = sim.tick();

        if stats.world_age % report_every == 0 {
            let progress: Vec<String> = sim
                .tracker()
                .summaries()
                .iter()
                .map(|summary| format!("{} {}%", summary.name, summary.percent()))
                .collect();
            println!(
                "{:7} | {:5} | {:6} | {:7} | {:9} | {}",
                stats.world_age / u64::from(TICKS_PER_SECOND),
                stats.active_fires,
                stats.total_burned,
                stats.total_ignited,
                stats.flammable_blocks_remaining,
                progress.join(", ")
            );
        }

        if stats.active_fires == 0 && stats.pending_commands == 0 {
            println!("\nAll fires are out after {:.1}s", seconds(stats.world_age));
            break;
        }
        if sim.tracker().is_complete() {
            println!("\nEvery house burned down after {:.1}s", seconds(stats.world_age));
            break;
        }
    }

    println!("\n=== Results ===");
    for summary in sim.tracker().summaries() {
        let verdict = if summary.burned { "GONE" } else { "standing" };
        println!(
            "{:<8} {:>3}% burned ({} of {} flammable blocks left) - {}",
            summary.name,
            summary.percent(),
            summary.current,
            summary.total.map_or_else(|| "?".to_string(), |t| t.to_string()),
            verdict
        );
    }
    println!(
        "Fires started: {}, blocks burned: {}, fires out: {}",
        stats.total_ignited, stats.total_burned, stats.total_extinguished
    );

    if args.json {
        match serde_json::to_string_pretty(&sim.tracker().summaries()) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Failed to serialize summaries: {e}"),
        }
    }

    ExitCode::SUCCESS
}

fn seconds(ticks: u64) -> f64 {
    ticks as f64 / f64::from(TICKS_PER_SECOND)
}
