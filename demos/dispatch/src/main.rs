//! dispatch — on-demand ride dispatch simulation driver.
//!
//! Loads a road map (the built-in demo grid unless `--map-file` is given),
//! places a fleet, runs the seeded discrete-event simulation, prints a
//! summary, and writes the event trace, final fleet, network edges, and
//! metrics to `--output-dir` for external plotting.
//!
//! Logging goes to stderr; set `RUST_LOG=debug` to see every event.

mod map;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use rd_core::{Point, SimConfig};
use rd_output::{CsvWriter, SimOutputObserver};
use rd_sim::SimBuilder;
use rd_spatial::{DijkstraRouter, load_map_file};

use map::demo_network;

/// Default fleet: five vehicles along the southern avenue.
const DEFAULT_VEHICLES: [(f64, f64); 5] = [(0.0, 0.0), (2.0, 0.0), (4.0, 0.0), (6.0, 0.0), (8.0, 0.0)];

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "dispatch", about = "On-demand vehicle dispatch simulation")]
struct Args {
    /// Map file (`a, ax, ay, b, bx, by, weight` per line).  Uses the
    /// built-in demo map when omitted.
    #[arg(long)]
    map_file: Option<PathBuf>,

    /// JSON file with a full `SimConfig`; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulation horizon.
    #[arg(long)]
    max_time: Option<f64>,

    /// Mean time between rider requests.
    #[arg(long)]
    mean_arrival: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    /// Nearest available vehicles routed per request.
    #[arg(long)]
    candidates: Option<usize>,

    /// Initial vehicle positions as `x,y` (repeatable).
    #[arg(long, num_args = 1.., value_parser = parse_point)]
    vehicles: Vec<Point>,

    #[arg(long, default_value = "output/dispatch")]
    output_dir: PathBuf,
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected x,y, got {s:?}"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in {s:?}: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y in {s:?}: {e}"))?;
    Ok(Point::new(x, y))
}

impl Args {
    fn sim_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?
            }
            None => SimConfig::default(),
        };
        if let Some(v) = self.max_time {
            config.max_time = v;
        }
        if let Some(v) = self.mean_arrival {
            config.mean_arrival_time = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }
        if let Some(v) = self.candidates {
            config.candidate_count = v;
        }
        config.validate()?;
        Ok(config)
    }

    fn fleet(&self) -> Vec<Point> {
        if self.vehicles.is_empty() {
            DEFAULT_VEHICLES.iter().map(|&(x, y)| Point::new(x, y)).collect()
        } else {
            self.vehicles.clone()
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.sim_config()?;

    // 1. Road network.
    let network = match &args.map_file {
        Some(path) => load_map_file(path)?,
        None => demo_network()?,
    };
    info!(
        nodes = network.node_count(),
        roads = network.road_count(),
        bounds = %network.bounds(),
        "map loaded"
    );

    // 2. Sim.
    let fleet = args.fleet();
    let mut sim = SimBuilder::new(config.clone(), network, DijkstraRouter)
        .vehicles(fleet.iter().copied())
        .build()?;
    for id in sim.rejected_vehicles() {
        warn!(vehicle = %id, "vehicle starts outside the map and stays offline");
    }

    // 3. Output.
    let writer = CsvWriter::new(&args.output_dir)?;
    let mut obs = SimOutputObserver::new(writer);

    // 4. Run.
    let t0 = Instant::now();
    let metrics = sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    obs.write_final_state(&sim);
    if let Err(e) = obs.finish() {
        error!(error = %e, dir = %args.output_dir.display(), "writing output failed");
    }

    // 5. Summary.
    println!("=== dispatch — {} vehicles, horizon {}, seed {} ===", fleet.len(), config.max_time, config.seed);
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!();
    println!("Total trips:           {}", metrics.total_trips);
    println!("Total riders:          {}", metrics.total_riders_generated);
    println!("Dropped (no vehicle):  {}", metrics.dropped_requests);
    println!("Dropped (no route):    {}", metrics.unroutable_requests);
    println!("Average wait time:     {:.2}", metrics.avg_wait_time);
    println!("Average trip duration: {:.2}", metrics.avg_trip_duration);
    println!();

    println!("{:<10} {:<24} {:<10} {:>6}", "Vehicle", "State", "Position", "Trips");
    println!("{}", "-".repeat(54));
    for v in sim.vehicles() {
        println!(
            "{:<10} {:<24} {:<10} {:>6}",
            v.id.0,
            v.state.name(),
            format!("({:.1},{:.1})", v.position.x, v.position.y),
            v.completed_trips,
        );
    }
    println!();
    println!("Output written to {}", args.output_dir.display());

    Ok(())
}
