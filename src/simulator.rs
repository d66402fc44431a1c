//! Cycle-based simulation driver.
//!
//! The `Simulator` computes the evaluation order once, then runs every
//! element in that order for each applied vector and reports the values seen
//! on the primary outputs.
//!
//! Three containers are kept apart, all indexed by element id:
//!
//! - `current`: outputs computed in the running step; combinational
//!   elements read their combinational predecessors from here
//! - [`SequentialState`]: flip-flop state settled at the end of the previous
//!   step; anything driven by a flip-flop reads from here
//! - `captures`: flip-flop updates staged during the step and committed
//!   only after every element has been evaluated

use std::fmt;
use std::io::Write;

use crate::error::{SimError, SimResult};
use crate::eval::evaluate;
use crate::graph::{Net, Netlist};
use crate::logic::Logic;
use crate::order::pseudo_topological_order;
use crate::stats::RunStats;
use crate::types::{ElementId, NetId, StepIndex};
use crate::vector::{AppliedVector, InputAddress};

/// Persistent flip-flop state, one slot per element.
///
/// Slots of combinational elements are never written and stay `X`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequentialState {
    values: Vec<Logic>,
}

impl SequentialState {
    /// Creates a state store with every slot at `X`.
    pub fn new(len: usize) -> Self {
        Self {
            values: vec![Logic::X; len],
        }
    }

    /// Returns the settled state of `id`.
    pub fn get(&self, id: ElementId) -> Logic {
        self.values.get(id).copied().unwrap_or(Logic::X)
    }

    /// Overwrites the state of `id`.
    pub fn set(&mut self, id: ElementId, value: Logic) {
        if let Some(slot) = self.values.get_mut(id) {
            *slot = value;
        }
    }

    /// Resets every slot to `X`.
    pub fn reset(&mut self) {
        self.values.fill(Logic::X);
    }

    pub fn as_slice(&self) -> &[Logic] {
        &self.values
    }
}

/// Primary-output values observed for one applied vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLine {
    pub step: StepIndex,
    pub values: Vec<Logic>,
}

impl OutputLine {
    pub fn values(&self) -> &[Logic] {
        &self.values
    }
}

impl fmt::Display for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

/// Where an element input takes its value from within a step.
#[derive(Clone, Copy, Debug)]
enum Source {
    Combinational(ElementId),
    Sequential(ElementId),
    Primary(InputAddress),
}

/// Zero-delay synchronous simulator over a fixed netlist.
///
/// # Example
///
/// ```
/// use dcalc_sim::{AppliedVector, ElementType, Logic, Netlist, Simulator};
///
/// let mut builder = Netlist::builder();
/// builder.connect("g1", ElementType::And, &["I1", "I2"], &["O1"]);
/// let netlist = builder.build().unwrap();
///
/// let mut sim = Simulator::new(&netlist).unwrap();
/// let line = sim
///     .step(&AppliedVector::with_clock([Logic::One, Logic::D], Logic::X))
///     .unwrap();
/// assert_eq!(line.to_string(), "D");
/// ```
pub struct Simulator<'a> {
    netlist: &'a Netlist,
    order: Vec<ElementId>,
    /// Input sources per element, resolved once from connectivity.
    sources: Vec<Vec<Source>>,
    /// Primary outputs in net enumeration order.
    outputs: Vec<OutputSource>,
    current: Vec<Logic>,
    state: SequentialState,
    captures: Vec<(ElementId, Logic)>,
    steps: StepIndex,
    stats: RunStats,
}

#[derive(Clone, Copy, Debug)]
enum OutputSource {
    Driver(ElementId),
    /// An undriven net observed directly.
    Primary(InputAddress, NetId),
}

impl<'a> Simulator<'a> {
    /// Prepares a simulator: orders the elements and resolves every input
    /// connection.
    ///
    /// # Errors
    ///
    /// - [`SimError::CombinationalCycle`] if the netlist cannot be ordered
    /// - [`SimError::MalformedInputName`] if a primary-input net name does
    ///   not follow the addressing convention
    pub fn new(netlist: &'a Netlist) -> SimResult<Self> {
        let order = pseudo_topological_order(netlist)?;

        let sources = netlist
            .elements()
            .iter()
            .map(|element| {
                element
                    .inputs()
                    .iter()
                    .map(|&net_id| -> SimResult<Source> {
                        let net = netlist.net(net_id).ok_or(SimError::UnknownNet(net_id))?;
                        source_of(netlist, net)
                    })
                    .collect::<SimResult<Vec<Source>>>()
            })
            .collect::<SimResult<Vec<_>>>()?;

        let outputs = netlist
            .primary_outputs()
            .map(|net| -> SimResult<OutputSource> {
                Ok(match net.driver() {
                    Some(driver) => OutputSource::Driver(driver),
                    None => OutputSource::Primary(InputAddress::parse(net.name())?, net.id()),
                })
            })
            .collect::<SimResult<Vec<_>>>()?;

        let n = netlist.element_count();
        tracing::info!(
            elements = n,
            nets = netlist.net_count(),
            dffs = netlist.dff_count(),
            primary_inputs = netlist.primary_inputs().count(),
            primary_outputs = outputs.len(),
            "simulator ready"
        );

        Ok(Self {
            netlist,
            order,
            sources,
            outputs,
            current: vec![Logic::X; n],
            state: SequentialState::new(n),
            captures: Vec::new(),
            steps: 0,
            stats: RunStats::default(),
        })
    }

    /// The evaluation order computed at construction.
    pub fn order(&self) -> &[ElementId] {
        &self.order
    }

    /// Flip-flop state settled at the end of the last step.
    pub fn state(&self) -> &SequentialState {
        &self.state
    }

    /// Output of `id` computed in the last step.
    pub fn element_output(&self, id: ElementId) -> Option<Logic> {
        self.current.get(id).copied()
    }

    /// Number of steps executed since construction or the last reset.
    pub fn steps_executed(&self) -> StepIndex {
        self.steps
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn netlist(&self) -> &Netlist {
        self.netlist
    }

    /// Returns every flip-flop to `X` and clears the step counter.
    pub fn reset(&mut self) {
        self.state.reset();
        self.current.fill(Logic::X);
        self.captures.clear();
        self.steps = 0;
        self.stats = RunStats::default();
    }

    /// Runs one time step and returns the primary-output values.
    ///
    /// On error no state is committed; the step must be considered aborted.
    pub fn step(&mut self, vector: &AppliedVector) -> SimResult<OutputLine> {
        let step = self.steps;
        if vector.is_empty() {
            return Err(SimError::MissingClock { step });
        }

        self.current.fill(Logic::X);
        self.captures.clear();

        let mut inputs: Vec<Logic> = Vec::new();
        for &id in &self.order {
            let element = &self.netlist.elements()[id];

            inputs.clear();
            for (slot, source) in element.inputs().iter().zip(&self.sources[id]) {
                match *source {
                    Source::Combinational(driver) => inputs.push(self.current[driver]),
                    Source::Sequential(driver) => inputs.push(self.state.get(driver)),
                    // The clock always leads the input list.
                    Source::Primary(InputAddress::Clock) => {
                        let clock = vector.resolve(InputAddress::Clock, self.net_name(*slot))?;
                        inputs.insert(0, clock);
                    }
                    Source::Primary(address) => {
                        inputs.push(vector.resolve(address, self.net_name(*slot))?);
                    }
                }
            }

            let eval = evaluate(element, &inputs, self.state.get(id))?;
            tracing::trace!(
                step,
                element = element.name(),
                kind = %element.kind(),
                ?inputs,
                output = %eval.output,
                "evaluated"
            );

            self.current[id] = eval.output;
            if let Some(next) = eval.next_state {
                self.captures.push((id, next));
            }
        }

        let mut values = Vec::with_capacity(self.outputs.len());
        for output in &self.outputs {
            let value = match *output {
                OutputSource::Driver(driver) => self.current[driver],
                OutputSource::Primary(address, net) => {
                    vector.resolve(address, self.net_name(net))?
                }
            };
            values.push(value);
        }

        for &(id, next) in &self.captures {
            tracing::trace!(step, element = self.netlist.elements()[id].name(), state = %next, "captured");
            self.state.set(id, next);
        }

        self.stats.record_step(self.order.len(), self.captures.len(), &values);
        self.steps += 1;

        let line = OutputLine { step, values };
        tracing::debug!(step, outputs = %line, "step complete");
        Ok(line)
    }

    /// Runs every vector in order and collects the output lines.
    ///
    /// Stops at the first error; no lines are returned in that case.
    pub fn simulate(&mut self, vectors: &[AppliedVector]) -> SimResult<Vec<OutputLine>> {
        vectors.iter().map(|vector| self.step(vector)).collect()
    }

    /// Runs every vector in order, writing one line per vector to `out`.
    ///
    /// Lines already written stay written when a later step fails.
    pub fn run<W: Write>(&mut self, vectors: &[AppliedVector], mut out: W) -> SimResult<()> {
        for vector in vectors {
            let line = self.step(vector)?;
            writeln!(out, "{}", line)?;
        }
        out.flush()?;
        Ok(())
    }

    fn net_name(&self, net: NetId) -> &str {
        self.netlist.net(net).map(|n| n.name()).unwrap_or_default()
    }
}

fn source_of(netlist: &Netlist, net: &Net) -> SimResult<Source> {
    match netlist.driver_of(net) {
        Some(driver) if driver.is_sequential() => Ok(Source::Sequential(driver.id())),
        Some(driver) => Ok(Source::Combinational(driver.id())),
        None => Ok(Source::Primary(InputAddress::parse(net.name())?)),
    }
}

/// Builds a simulator for `netlist` and runs `vectors` through it.
pub fn simulate(netlist: &Netlist, vectors: &[AppliedVector]) -> SimResult<Vec<OutputLine>> {
    Simulator::new(netlist)?.simulate(vectors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ElementType;
    use Logic::*;

    fn vector(data: &[Logic], clock: Logic) -> AppliedVector {
        AppliedVector::with_clock(data.iter().copied(), clock)
    }

    #[test]
    fn test_and_gate_lines() {
        let mut builder = Netlist::builder();
        builder.connect("g1", ElementType::And, &["I1", "I2"], &["O1"]);
        let netlist = builder.build().unwrap();

        let lines = simulate(
            &netlist,
            &[vector(&[Zero, One], X), vector(&[One, One], X)],
        )
        .unwrap();
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(text, vec!["0", "1"]);
        assert_eq!(lines[1].step, 1);
    }

    #[test]
    fn test_dff_lags_one_step() {
        let mut builder = Netlist::builder();
        builder.connect("ff", ElementType::Dff, &["CLOCK", "I1"], &["Q"]);
        let netlist = builder.build().unwrap();

        let mut sim = Simulator::new(&netlist).unwrap();
        let outputs: Vec<Logic> = [Zero, One, One]
            .iter()
            .map(|&d| sim.step(&vector(&[d], One)).unwrap().values[0])
            .collect();
        assert_eq!(outputs, vec![X, Zero, One]);
        assert_eq!(sim.state().get(0), One);
    }

    #[test]
    fn test_clock_leads_inputs_regardless_of_declaration() {
        let mut builder = Netlist::builder();
        builder.connect("ff", ElementType::Dff, &["I1", "CLOCK"], &["Q"]);
        let netlist = builder.build().unwrap();

        let mut sim = Simulator::new(&netlist).unwrap();
        sim.step(&vector(&[Zero], One)).unwrap();
        assert_eq!(sim.state().get(0), Zero);

        // Clock low: no capture even though data is 1.
        sim.step(&vector(&[One], Zero)).unwrap();
        assert_eq!(sim.state().get(0), Zero);
    }

    #[test]
    fn test_chained_dffs_read_settled_state() {
        // ff2 is ordered before ff1 here; both must still see pre-step state.
        let mut builder = Netlist::builder();
        builder.connect("ff2", ElementType::Dff, &["CLOCK", "q1"], &["Q2"]);
        builder.connect("ff1", ElementType::Dff, &["CLOCK", "I1"], &["q1"]);
        builder.mark_primary_output("q1");
        let netlist = builder.build().unwrap();

        let mut sim = Simulator::new(&netlist).unwrap();
        let lines: Vec<String> = [One, Zero, Zero]
            .iter()
            .map(|&d| sim.step(&vector(&[d], One)).unwrap().to_string())
            .collect();
        // Net order: q1, Q2.
        assert_eq!(lines, vec!["X X", "1 X", "0 1"]);
    }

    #[test]
    fn test_reset_restores_unknown_state() {
        let mut builder = Netlist::builder();
        builder.connect("ff", ElementType::Dff, &["CLOCK", "I1"], &["Q"]);
        let netlist = builder.build().unwrap();

        let mut sim = Simulator::new(&netlist).unwrap();
        sim.step(&vector(&[One], One)).unwrap();
        assert_eq!(sim.steps_executed(), 1);

        sim.reset();
        assert_eq!(sim.steps_executed(), 0);
        assert_eq!(sim.state().get(0), X);
        assert_eq!(sim.step(&vector(&[One], One)).unwrap().values, vec![X]);
    }

    #[test]
    fn test_empty_vector_rejected() {
        let mut builder = Netlist::builder();
        builder.connect("g", ElementType::Not, &["I1"], &["O1"]);
        let netlist = builder.build().unwrap();

        let mut sim = Simulator::new(&netlist).unwrap();
        let err = sim.step(&AppliedVector::default()).unwrap_err();
        assert!(matches!(err, SimError::MissingClock { step: 0 }));
    }

    #[test]
    fn test_failed_step_commits_nothing() {
        let mut builder = Netlist::builder();
        builder.connect("ff", ElementType::Dff, &["CLOCK", "I1"], &["Q"]);
        builder.connect("g", ElementType::And, &["I1", "I2"], &["O2"]);
        let netlist = builder.build().unwrap();

        let mut sim = Simulator::new(&netlist).unwrap();
        // One data value only: I2 is out of range.
        assert!(sim.step(&vector(&[One], One)).is_err());
        assert_eq!(sim.state().get(0), X);
        assert_eq!(sim.steps_executed(), 0);
    }

    #[test]
    fn test_passthrough_output() {
        let mut builder = Netlist::builder();
        builder.add_net("I1");
        builder.connect("g", ElementType::Not, &["I2"], &["O1"]);
        let netlist = builder.build().unwrap();

        let line = simulate(&netlist, &[vector(&[D, One], X)]).unwrap();
        assert_eq!(line[0].to_string(), "D 0");
    }

    #[test]
    fn test_run_writes_lines() {
        let mut builder = Netlist::builder();
        builder.connect("g", ElementType::Or, &["I1", "I2"], &["O1"]);
        builder.connect("h", ElementType::Not, &["I1"], &["O2"]);
        let netlist = builder.build().unwrap();

        let mut sim = Simulator::new(&netlist).unwrap();
        let mut out = Vec::new();
        sim.run(&[vector(&[Zero, Zero], X), vector(&[D, NotD], X)], &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0 1\n1 D'\n");
    }
}
