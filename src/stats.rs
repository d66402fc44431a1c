//! Statistics collection and export for simulation runs.
//!
//! The simulator keeps cheap counters in [`RunStats`] while stepping;
//! [`StatsCollector`] wraps a run with wall-clock timing and netlist shape
//! into a [`SimulationStats`] that can be exported as JSON, CSV or a
//! human-readable summary.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use crate::graph::Netlist;
use crate::logic::Logic;

/// Aggregate statistics for a simulation run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SimulationStats {
    pub metadata: SimulationMetadata,
    pub netlist: NetlistStats,
    pub run: RunStats,
    pub timing: TimingStats,
}

/// Metadata about the simulation run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SimulationMetadata {
    /// Simulation name/description
    pub name: String,

    /// Crate version that produced the run
    pub version: String,

    /// Configuration file used (if any)
    pub config_file: Option<String>,
}

/// Shape of the simulated netlist.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetlistStats {
    pub elements: usize,
    pub nets: usize,
    pub dffs: usize,
    pub primary_inputs: usize,
    pub primary_outputs: usize,
}

impl NetlistStats {
    pub fn from_netlist(netlist: &Netlist) -> Self {
        Self {
            elements: netlist.element_count(),
            nets: netlist.net_count(),
            dffs: netlist.dff_count(),
            primary_inputs: netlist.primary_inputs().count(),
            primary_outputs: netlist.primary_outputs().count(),
        }
    }
}

/// Counters updated by the simulator on every completed step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Applied vectors fully simulated
    pub steps_executed: u64,

    /// Element evaluations across all steps
    pub element_evaluations: u64,

    /// Flip-flop state updates committed
    pub state_captures: u64,

    /// Primary-output observations carrying `D` or `D'`
    pub sensitized_outputs: u64,

    /// Primary-output observations carrying `X`
    pub unknown_outputs: u64,

    /// Primary-output observations carrying `Error`
    pub error_outputs: u64,
}

impl RunStats {
    /// Records one completed step.
    pub fn record_step(&mut self, evaluations: usize, captures: usize, outputs: &[Logic]) {
        self.steps_executed += 1;
        self.element_evaluations += evaluations as u64;
        self.state_captures += captures as u64;
        for value in outputs {
            match value {
                Logic::D | Logic::NotD => self.sensitized_outputs += 1,
                Logic::X => self.unknown_outputs += 1,
                Logic::Error => self.error_outputs += 1,
                Logic::Zero | Logic::One => {}
            }
        }
    }
}

/// Timing/performance statistics.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TimingStats {
    /// Total wall-clock time in milliseconds
    pub total_wall_time_ms: f64,

    /// Applied vectors per wall-clock second
    pub steps_per_second: f64,

    /// Element evaluations per wall-clock second
    pub evaluations_per_second: f64,
}

impl SimulationStats {
    /// Creates a new empty statistics container.
    pub fn new() -> Self {
        Self {
            metadata: SimulationMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Sets the simulation name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.metadata.name = name.into();
        self
    }

    /// Updates timing statistics based on wall clock time.
    pub fn compute_timing(&mut self, wall_time_ms: f64) {
        self.timing.total_wall_time_ms = wall_time_ms;

        if wall_time_ms > 0.0 {
            let seconds = wall_time_ms / 1000.0;
            self.timing.steps_per_second = self.run.steps_executed as f64 / seconds;
            self.timing.evaluations_per_second = self.run.element_evaluations as f64 / seconds;
        }
    }

    /// Exports statistics to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Exports statistics to JSON file.
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = self
            .to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }

    /// Exports summary statistics to CSV.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        csv.push_str("metric,value\n");

        csv.push_str(&format!("elements,{}\n", self.netlist.elements));
        csv.push_str(&format!("nets,{}\n", self.netlist.nets));
        csv.push_str(&format!("dffs,{}\n", self.netlist.dffs));
        csv.push_str(&format!("primary_inputs,{}\n", self.netlist.primary_inputs));
        csv.push_str(&format!("primary_outputs,{}\n", self.netlist.primary_outputs));

        csv.push_str(&format!("steps_executed,{}\n", self.run.steps_executed));
        csv.push_str(&format!("element_evaluations,{}\n", self.run.element_evaluations));
        csv.push_str(&format!("state_captures,{}\n", self.run.state_captures));
        csv.push_str(&format!("sensitized_outputs,{}\n", self.run.sensitized_outputs));
        csv.push_str(&format!("unknown_outputs,{}\n", self.run.unknown_outputs));
        csv.push_str(&format!("error_outputs,{}\n", self.run.error_outputs));

        csv.push_str(&format!("wall_time_ms,{:.2}\n", self.timing.total_wall_time_ms));
        csv.push_str(&format!("steps_per_second,{:.2}\n", self.timing.steps_per_second));

        csv
    }

    /// Exports summary statistics to CSV file.
    pub fn to_csv_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        std::fs::write(path, self.to_csv())
    }

    /// Writes a human-readable summary to a writer.
    pub fn write_summary<W: Write>(&self, mut w: W) -> std::io::Result<()> {
        writeln!(w, "=== Simulation Statistics ===")?;
        if !self.metadata.name.is_empty() {
            writeln!(w, "Name: {}", self.metadata.name)?;
        }
        writeln!(w)?;

        writeln!(w, "--- Netlist ---")?;
        writeln!(
            w,
            "Elements: {} ({} flip-flops)",
            self.netlist.elements, self.netlist.dffs
        )?;
        writeln!(w, "Nets: {}", self.netlist.nets)?;
        writeln!(
            w,
            "Primary inputs/outputs: {}/{}",
            self.netlist.primary_inputs, self.netlist.primary_outputs
        )?;
        writeln!(w)?;

        writeln!(w, "--- Run ---")?;
        writeln!(w, "Steps executed: {}", self.run.steps_executed)?;
        writeln!(w, "Element evaluations: {}", self.run.element_evaluations)?;
        writeln!(w, "State captures: {}", self.run.state_captures)?;
        writeln!(w, "Sensitized outputs: {}", self.run.sensitized_outputs)?;
        writeln!(w, "Unknown outputs: {}", self.run.unknown_outputs)?;
        writeln!(w, "Error outputs: {}", self.run.error_outputs)?;
        writeln!(w)?;

        writeln!(w, "--- Timing ---")?;
        writeln!(w, "Wall time: {:.2} ms", self.timing.total_wall_time_ms)?;
        writeln!(w, "Steps/sec: {:.2}", self.timing.steps_per_second)?;

        Ok(())
    }

    /// Returns a summary string.
    pub fn summary(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_summary(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// A simple timer for measuring wall-clock time.
#[derive(Debug)]
pub struct Timer {
    start: std::time::Instant,
}

impl Timer {
    /// Starts a new timer.
    pub fn start() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }

    /// Returns elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::start()
    }
}

/// Collects statistics around a simulation run.
///
/// # Example
///
/// ```
/// use dcalc_sim::{AppliedVector, ElementType, Netlist, Simulator, StatsCollector};
///
/// let mut builder = Netlist::builder();
/// builder.connect("g1", ElementType::Not, &["I1"], &["O1"]);
/// let netlist = builder.build().unwrap();
///
/// let mut collector = StatsCollector::new(&netlist);
/// collector.start();
/// let mut sim = Simulator::new(&netlist).unwrap();
/// sim.simulate(&["1 0".parse::<AppliedVector>().unwrap()]).unwrap();
/// collector.stop(sim.stats());
///
/// assert_eq!(collector.stats().run.steps_executed, 1);
/// ```
#[derive(Debug, Default)]
pub struct StatsCollector {
    stats: SimulationStats,
    timer: Option<Timer>,
}

impl StatsCollector {
    /// Creates a collector for a run over `netlist`.
    pub fn new(netlist: &Netlist) -> Self {
        let mut stats = SimulationStats::new();
        stats.netlist = NetlistStats::from_netlist(netlist);
        Self { stats, timer: None }
    }

    /// Sets the simulation name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.stats.metadata.name = name.into();
    }

    /// Records the configuration file the run was loaded from.
    pub fn set_config_file(&mut self, path: impl Into<String>) {
        self.stats.metadata.config_file = Some(path.into());
    }

    /// Starts timing.
    pub fn start(&mut self) {
        self.timer = Some(Timer::start());
    }

    /// Stops timing and takes the simulator's counters.
    pub fn stop(&mut self, run: &RunStats) {
        self.stats.run = run.clone();
        if let Some(ref timer) = self.timer {
            self.stats.compute_timing(timer.elapsed_ms());
        }
    }

    /// Returns the collected statistics.
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Consumes the collector and returns the statistics.
    pub fn into_stats(self) -> SimulationStats {
        self.stats
    }
}
