//! platform — a few minutes of rush hour on a mixed subway platform.
//!
//! Passengers enter at the three platform entrances, reserve a waiting spot
//! near their line, and board when their train stands at the platform;
//! arriving trains let their own passengers off toward the exits.
//!
//! ```text
//! cargo run -p platform                    # built-in scenario.toml
//! cargo run -p platform -- my_run.toml     # any scenario on the same roadmap
//! RUST_LOG=debug cargo run -p platform     # per-train and fallback logging
//! ```
//!
//! Writes `output/platform/steps.csv` (one row per step) and
//! `output/platform/agents.csv` (one row per agent per snapshot).

mod network;

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use csv::Writer;

use ped_agent::AgentStore;
use ped_core::{LineId, SimClock};
use ped_field::{GridLayout, StaggeredGrid};
use ped_sim::{ScenarioConfig, SimBuilder, SimObserver, SimStats};
use ped_station::Station;

use network::build_platform;

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_SCENARIO: &str = include_str!("../scenario.toml");
const OUTPUT_DIR:       &str = "output/platform";
const CELL_LENGTH:      f32  = 1.0; // metres
const MAX_DENSITY:      f32  = 4.0; // agents per square metre

// ── CSV observer ──────────────────────────────────────────────────────────────

/// Streams step totals and agent snapshots to CSV.
///
/// Observer hooks cannot fail, so the first write error is kept and every
/// later write is skipped.
struct CsvObserver {
    steps:    Writer<File>,
    agents:   Writer<File>,
    rows:     usize,
    trains:   Vec<(f32, LineId, &'static str)>,
    error:    Option<csv::Error>,
}

impl CsvObserver {
    fn new(dir: &Path) -> Result<Self> {
        let mut steps = Writer::from_path(dir.join("steps.csv"))?;
        steps.write_record([
            "step", "time_secs", "agents", "spawned", "exited", "boarded", "departed", "stranded",
        ])?;
        let mut agents = Writer::from_path(dir.join("agents.csv"))?;
        agents.write_record(["step", "agent", "x", "z", "state", "line"])?;
        Ok(Self { steps, agents, rows: 0, trains: Vec::new(), error: None })
    }

    fn record(&mut self, result: csv::Result<()>) {
        if let Err(e) = result {
            if self.error.is_none() {
                self.error = Some(e);
            }
        }
    }

    fn take_error(&mut self) -> Option<csv::Error> {
        self.error.take()
    }
}

impl SimObserver for CsvObserver {
    fn on_step_end(&mut self, clock: &SimClock, stats: &SimStats) {
        if self.error.is_some() {
            return;
        }
        let active = stats.spawned.saturating_sub(stats.removed());
        let result = self.steps.write_record(&[
            clock.step.to_string(),
            format!("{:.2}", clock.now.as_secs_f32()),
            active.to_string(),
            stats.spawned.to_string(),
            stats.exited.to_string(),
            stats.boarded.to_string(),
            stats.departed.to_string(),
            stats.stranded.to_string(),
        ]);
        self.record(result);
    }

    fn on_train_arrival(&mut self, line: LineId, clock: &SimClock) {
        self.trains.push((clock.now.as_secs_f32(), line, "arrived"));
    }

    fn on_train_departure(&mut self, line: LineId, _departed: usize, _stranded: usize, clock: &SimClock) {
        self.trains.push((clock.now.as_secs_f32(), line, "departed"));
    }

    fn on_snapshot(&mut self, clock: &SimClock, agents: &AgentStore, _station: &Station) {
        for (id, agent) in agents.iter() {
            if self.error.is_some() {
                return;
            }
            let line = agent.line.map(|l| l.0.to_string()).unwrap_or_default();
            let result = self.agents.write_record(&[
                clock.step.to_string(),
                format!("{id:?}"),
                format!("{:.3}", agent.position.x),
                format!("{:.3}", agent.position.y),
                agent.state.label().to_string(),
                line,
            ]);
            self.record(result);
            self.rows += 1;
        }
    }

    fn on_sim_end(&mut self, _clock: &SimClock, _stats: &SimStats) {
        let steps = self.steps.flush();
        let agents = self.agents.flush();
        self.record(steps.and(agents).map_err(csv::Error::from));
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    // 1. Scenario.
    let scenario = match std::env::args().nth(1) {
        Some(path) => ScenarioConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => ScenarioConfig::from_toml_str(DEFAULT_SCENARIO)?,
    };
    println!("=== platform — station crowd simulation ===");
    println!(
        "Steps: {} × {} s  |  Seed: {}  |  Spawners: {}",
        scenario.sim.total_steps,
        scenario.sim.time_step_secs,
        scenario.sim.seed,
        scenario.spawners.len()
    );

    // 2. Roadmap and field.
    let (roadmap, nodes) = build_platform()?;
    println!(
        "Roadmap: {} nodes, {} edges, {} waiting areas, {} + {} doors",
        roadmap.node_count(),
        roadmap.edge_count(),
        nodes.areas.len(),
        nodes.doors[0].len(),
        nodes.doors[1].len()
    );
    let [w, d] = scenario.sim.plane_size;
    let field = StaggeredGrid::new(GridLayout::covering(w, d, CELL_LENGTH)?, MAX_DENSITY)?;

    // 3. Sim.
    let mut sim = SimBuilder::from_scenario(scenario).roadmap(roadmap).field(field).build()?;

    // 4. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let mut obs = CsvObserver::new(Path::new(OUTPUT_DIR))?;

    // 5. Run.
    let t0 = Instant::now();
    sim.run(&mut obs);
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  {}", sim.stats);
    println!("  agents.csv : {} rows", obs.rows);
    println!();

    println!("{:<10} {:<6} {:<10}", "Time (s)", "Line", "Train");
    println!("{}", "-".repeat(28));
    for (t, line, what) in &obs.trains {
        println!("{t:<10.1} {:<6} {what:<10}", line.0);
    }
    println!();

    println!("{:<8} {:<10} {:<8}", "Area", "Occupied", "Spots");
    println!("{}", "-".repeat(28));
    for area in sim.station.allocator().areas() {
        println!("{:<8} {:<10} {:<8}", area.node.0, area.occupied_count(), area.total());
    }
    log::info!(
        "{} agents still on the floor, exits at {:?}, entrances at {:?}",
        sim.active_agents(),
        nodes.exits,
        nodes.entrances
    );

    Ok(())
}
