use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gridnav_common::Pose;
use gridnav_grid::{DEFAULT_SCALE, load_occupancy_grid};
use gridnav_kernel::StepOutcome;
use gridnav_render::{AsciiRenderer, RenderView, Renderer};
use tracing_subscriber::EnvFilter;

mod scenario;

use scenario::{EstimatorKind, Scenario, parse_pose};

#[derive(Parser)]
#[command(name = "gridnav", about = "Occupancy-grid robot navigation simulator")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print map dimensions and occupancy summary
    Info {
        /// Map image (black = obstacle)
        map: PathBuf,
        /// Meters per pixel
        #[arg(long, default_value_t = DEFAULT_SCALE)]
        scale: f64,
        /// Also print the map as text, one character per STRIDE pixels
        #[arg(long)]
        show: Option<usize>,
    },
    /// Run the navigation simulation
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// YAML scenario file; the flags below override its values
    #[arg(short, long)]
    scenario: Option<PathBuf>,
    /// Map image (black = obstacle)
    #[arg(long)]
    map: Option<PathBuf>,
    /// Meters per pixel
    #[arg(long)]
    scale: Option<f64>,
    /// Start pose as x,y[,theta]
    #[arg(long, value_parser = parse_pose)]
    start: Option<Pose>,
    /// Goal pose as x,y[,theta]
    #[arg(long, value_parser = parse_pose)]
    goal: Option<Pose>,
    /// Simulation timestep in seconds
    #[arg(long)]
    dt: Option<f64>,
    /// Planner lookahead in seconds
    #[arg(long)]
    lookahead: Option<f64>,
    /// Cost estimator used to rank candidate velocities
    #[arg(long, value_enum)]
    estimator: Option<EstimatorKind>,
    /// Playback speed multiplier; 0 runs without pacing
    #[arg(long)]
    sim_factor: Option<f64>,
    /// Stop after this many ticks; runs until interrupted if omitted
    #[arg(short, long)]
    ticks: Option<u64>,
    /// Print the map every N ticks (0 disables)
    #[arg(long, default_value_t = 0)]
    render_every: u64,
    /// Map pixels per printed character
    #[arg(long, default_value_t = 1)]
    stride: usize,
    /// Write every simulation event as a JSON line to this file
    #[arg(long)]
    trace: Option<PathBuf>,
}

impl RunArgs {
    /// Scenario file (if any) with command-line overrides applied.
    fn scenario(&self) -> Result<Scenario> {
        let mut scenario = match (&self.scenario, &self.map) {
            (Some(path), _) => Scenario::load(path)
                .with_context(|| format!("failed to load scenario {}", path.display()))?,
            (None, Some(map)) => Scenario::new(map),
            (None, None) => anyhow::bail!("either --scenario or --map is required"),
        };
        if let Some(map) = &self.map {
            scenario.map = map.clone();
        }
        if let Some(scale) = self.scale {
            scenario.scale = scale;
        }
        if let Some(start) = self.start {
            scenario.sim.start = start;
        }
        if let Some(goal) = self.goal {
            scenario.goal = goal;
        }
        if let Some(dt) = self.dt {
            scenario.sim.dt = dt;
        }
        if let Some(lookahead) = self.lookahead {
            scenario.sim.lookahead = lookahead;
        }
        if let Some(estimator) = self.estimator {
            scenario.estimator = estimator;
        }
        if let Some(sim_factor) = self.sim_factor {
            scenario.sim_factor = sim_factor;
        }
        scenario.validate()?;
        Ok(scenario)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info { map, scale, show } => {
            let grid = load_occupancy_grid(&map, scale)
                .with_context(|| format!("failed to load map {}", map.display()))?;
            println!("map: {}", map.display());
            println!(
                "cells: {} rows x {} cols @ {} m/cell",
                grid.rows(),
                grid.cols(),
                grid.scale()
            );
            println!("bounds: x_max={:.3} y_max={:.3}", grid.x_max(), grid.y_max());
            println!(
                "occupied: {} ({:.1}% free)",
                grid.occupied_count(),
                grid.free_fraction() * 100.0
            );
            if let Some(stride) = show {
                // Park the robot off the map so only the grid is drawn.
                let view = RenderView::new(Pose::new(-1.0, -1.0, 0.0));
                print!("{}", AsciiRenderer::with_stride(stride).render(&grid, &view));
            }
        }
        Commands::Run(args) => run(&args)?,
    }

    Ok(())
}

fn run(args: &RunArgs) -> Result<()> {
    let scenario = args.scenario()?;
    let grid = Arc::new(
        load_occupancy_grid(&scenario.map, scenario.scale)
            .with_context(|| format!("failed to load map {}", scenario.map.display()))?,
    );
    let mut sim = scenario.build_simulation(grid.clone())?;

    let renderer = AsciiRenderer::with_stride(args.stride);
    let mut trace = match &args.trace {
        Some(path) => Some(BufWriter::new(File::create(path).with_context(|| {
            format!("failed to create trace file {}", path.display())
        })?)),
        None => None,
    };
    let pacing = (scenario.sim_factor > 0.0)
        .then(|| Duration::from_secs_f64(scenario.sim.dt / scenario.sim_factor));

    tracing::info!(
        start = ?scenario.sim.start,
        goal = ?scenario.goal,
        dt = scenario.sim.dt,
        lookahead = scenario.sim.lookahead,
        "simulation starting"
    );

    let (mut committed, mut rejected) = (0u64, 0u64);
    while args.ticks.is_none_or(|limit| sim.tick() < limit) {
        match sim.step() {
            StepOutcome::Committed { .. } => committed += 1,
            StepOutcome::Rejected { .. } => rejected += 1,
        }

        // Drain every tick so an unbounded run does not grow the log.
        let events = sim.drain_events();
        if let Some(out) = trace.as_mut() {
            for event in &events {
                serde_json::to_writer(&mut *out, event)?;
                writeln!(out)?;
            }
        }

        if args.render_every > 0 && sim.tick() % args.render_every == 0 {
            let view = RenderView::new(sim.pose()).with_goal(scenario.goal);
            print!("{}", renderer.render(&grid, &view));
        }

        if let Some(interval) = pacing {
            std::thread::sleep(interval);
        }
    }

    if let Some(mut out) = trace {
        out.flush()?;
    }

    let pose = sim.pose();
    println!(
        "ticks={} committed={committed} rejected={rejected} pose=({:.3}, {:.3}, {:.3}) cost={:.3}",
        sim.tick(),
        pose.x,
        pose.y,
        pose.theta,
        sim.current_cost()
    );

    Ok(())
}
