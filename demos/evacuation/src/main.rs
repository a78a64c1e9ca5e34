//! evacuation — run a scenario until every pedestrian has left.
//!
//! ```text
//! cargo run -p evacuation                       # built-in corridor
//! cargo run -p evacuation -- scenario.toml      # or .json
//! RUST_LOG=debug cargo run -p evacuation        # per-agent exit events
//! ```
//!
//! Trajectories and per-step summaries are written as CSV to
//! `output/evacuation/`.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ps_agent::AgentRegistry;
use ps_core::{AgentId, Point, Step};
use ps_geometry::{distribute_by_number, Polygon};
use ps_output::{CsvWriter, OutputWriter, TrajectoryObserver};
use ps_scenario::Scenario;
use ps_sim::{SimObserver, StepReport};

// ── Constants ─────────────────────────────────────────────────────────────────

const AGENT_COUNT:     usize = 24;
const SEED:            u64   = 42;
const MAX_STEPS:       u64   = 20_000;
const OUTPUT_INTERVAL: u64   = 10;    // snapshot every 0.1 s at dt = 0.01
const PROGRESS_EVERY:  u64   = 500;
const OUTPUT_DIR:      &str  = "output/evacuation";

// ── Default scenario ──────────────────────────────────────────────────────────

/// 30 m × 6 m corridor with an exit strip on the far wall; agents start
/// scattered over the first 8 m.
fn default_corridor() -> Result<Scenario> {
    let start_area = Polygon::rectangle(Point::new(0.0, 0.0), Point::new(8.0, 6.0));
    let agents = distribute_by_number(&start_area, AGENT_COUNT, 0.8, 0.4, SEED)?
        .into_iter()
        .map(|p| [p.x, p.y])
        .collect();

    Ok(Scenario {
        boundary: vec![[0.0, 0.0], [30.0, 0.0], [30.0, 6.0], [0.0, 6.0]],
        exits:    vec![vec![[29.0, 2.0], [30.0, 2.0], [30.0, 4.0], [29.0, 4.0]]],
        agents,
        model:    Default::default(),
        agent:    Default::default(),
        dt:       0.01,
        output_interval: OUTPUT_INTERVAL,
    })
}

// ── Observer wrapper for progress and counts ──────────────────────────────────

struct ProgressObserver<W: OutputWriter> {
    inner:         TrajectoryObserver<W>,
    snapshot_rows: usize,
    summary_rows:  usize,
    exited:        Vec<(AgentId, Step)>,
}

impl<W: OutputWriter> ProgressObserver<W> {
    fn new(inner: TrajectoryObserver<W>) -> Self {
        Self { inner, snapshot_rows: 0, summary_rows: 0, exited: Vec::new() }
    }
}

impl<W: OutputWriter> SimObserver for ProgressObserver<W> {
    fn on_step_end(&mut self, report: &StepReport) {
        self.summary_rows += 1;
        if (report.step.0 + 1).is_multiple_of(PROGRESS_EVERY) {
            info!(step = report.step.0 + 1, live = report.live_agents, "progress");
        }
        self.inner.on_step_end(report);
    }

    fn on_snapshot(&mut self, step: Step, elapsed_secs: f64, agents: &AgentRegistry) {
        self.snapshot_rows += agents.len();
        self.inner.on_snapshot(step, elapsed_secs, agents);
    }

    fn on_agent_removed(&mut self, step: Step, agent: AgentId) {
        self.exited.push((agent, step));
    }

    fn on_sim_end(&mut self, final_step: Step) {
        self.inner.on_sim_end(final_step);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 1. Scenario: from argv, or the built-in corridor.
    let scenario = match std::env::args().nth(1) {
        Some(path) => Scenario::from_path(&path).with_context(|| format!("loading {path}"))?,
        None => {
            info!("no scenario given, using the built-in corridor");
            default_corridor()?
        }
    };

    // 2. Simulation.
    let mut sim = scenario.build_simulation()?;
    info!(
        agents = sim.agent_count(),
        walls  = sim.geometry().wall_count(),
        area   = sim.geometry().area(),
        dt     = sim.dt(),
        "simulation ready"
    );

    // 3. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = ProgressObserver::new(TrajectoryObserver::new(writer, sim.dt()));

    // 4. Run.
    let t0 = Instant::now();
    let steps = sim.run_until_empty(MAX_STEPS, &mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        warn!(error = %e, "output incomplete");
    }
    if sim.agent_count() > 0 {
        warn!(remaining = sim.agent_count(), max_steps = MAX_STEPS, "step cap reached");
    }

    // 5. Summary.
    info!(
        steps,
        sim_secs  = sim.elapsed_time(),
        wall_secs = elapsed.as_secs_f64(),
        "simulation complete"
    );
    println!("  trajectories.csv   : {} rows", obs.snapshot_rows);
    println!("  step_summaries.csv : {} rows", obs.summary_rows);
    println!();

    println!("{:<10} {:<10} {:<10}", "Agent", "Step", "Time [s]");
    println!("{}", "-".repeat(30));
    for (agent, step) in &obs.exited {
        println!("{:<10} {:<10} {:<10.2}", agent.0, step.0, step.0 as f64 * sim.dt());
    }

    Ok(())
}
