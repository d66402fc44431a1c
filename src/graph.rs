//! In-memory graph model of a gate-level netlist.
//!
//! A netlist is a fixed set of elements (gates and flip-flops) connected by
//! nets. Each net has at most one driving element and any number of sinks;
//! a net without a driver is a primary input, and a net whose sink list is
//! empty or carries an explicit `None` slot is a primary output.
//!
//! The graph is read-only once built. Nets refer to elements by id only, so
//! ownership of both stays with the [`Netlist`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{SimError, SimResult};
use crate::types::{ElementId, NetId};

/// The type tag of an element.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Not,
    And,
    Or,
    /// Edge-triggered flip-flop with inputs `[enable/clock, data]`.
    Dff,
    /// Any type the evaluator does not implement. Evaluating it is an error.
    Unsupported(String),
}

impl ElementType {
    /// Maps a type name to an element type, case-insensitively.
    ///
    /// Unknown names are kept as [`ElementType::Unsupported`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "NOT" | "INV" => ElementType::Not,
            "AND" => ElementType::And,
            "OR" => ElementType::Or,
            "DFF" => ElementType::Dff,
            _ => ElementType::Unsupported(name.trim().to_string()),
        }
    }

    /// Returns the canonical name of this type.
    pub fn name(&self) -> &str {
        match self {
            ElementType::Not => "NOT",
            ElementType::And => "AND",
            ElementType::Or => "OR",
            ElementType::Dff => "DFF",
            ElementType::Unsupported(name) => name,
        }
    }

    /// Returns true for sequential elements, whose outputs break
    /// combinational dependencies.
    pub fn is_sequential(&self) -> bool {
        matches!(self, ElementType::Dff)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A gate or flip-flop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    id: ElementId,
    name: String,
    kind: ElementType,
    inputs: Vec<NetId>,
    outputs: Vec<NetId>,
}

impl Element {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ElementType {
        &self.kind
    }

    /// Input nets, in declaration order.
    pub fn inputs(&self) -> &[NetId] {
        &self.inputs
    }

    /// Output nets, in declaration order.
    pub fn outputs(&self) -> &[NetId] {
        &self.outputs
    }

    pub fn is_sequential(&self) -> bool {
        self.kind.is_sequential()
    }
}

/// A wire connecting one driver to its sinks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Net {
    id: NetId,
    name: String,
    driver: Option<ElementId>,
    sinks: Vec<Option<ElementId>>,
}

impl Net {
    pub fn id(&self) -> NetId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element driving this net, absent for primary inputs.
    pub fn driver(&self) -> Option<ElementId> {
        self.driver
    }

    /// Sink slots in connection order; `None` marks a primary output.
    pub fn sinks(&self) -> &[Option<ElementId>] {
        &self.sinks
    }

    /// Iterates over the sink elements, skipping primary-output markers.
    pub fn sink_elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.sinks.iter().flatten().copied()
    }

    pub fn is_primary_input(&self) -> bool {
        self.driver.is_none()
    }

    pub fn is_primary_output(&self) -> bool {
        self.sinks.is_empty() || self.sinks.iter().any(Option::is_none)
    }
}

/// A complete, immutable netlist.
#[derive(Clone, Debug, Default)]
pub struct Netlist {
    elements: Vec<Element>,
    nets: Vec<Net>,
    net_index: HashMap<String, NetId>,
}

impl Netlist {
    /// Returns a builder for a new netlist.
    pub fn builder() -> NetlistBuilder {
        NetlistBuilder::new()
    }

    /// All elements, in ascending id order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// All nets, in enumeration order.
    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn net(&self, id: NetId) -> Option<&Net> {
        self.nets.get(id)
    }

    /// Looks up a net by name.
    pub fn find_net(&self, name: &str) -> Option<&Net> {
        self.net_index.get(name).and_then(|&id| self.nets.get(id))
    }

    /// Returns the element driving `net`, if any.
    pub fn driver_of(&self, net: &Net) -> Option<&Element> {
        net.driver.and_then(|id| self.elements.get(id))
    }

    /// Primary input nets, in enumeration order.
    pub fn primary_inputs(&self) -> impl Iterator<Item = &Net> {
        self.nets.iter().filter(|n| n.is_primary_input())
    }

    /// Primary output nets, in enumeration order.
    pub fn primary_outputs(&self) -> impl Iterator<Item = &Net> {
        self.nets.iter().filter(|n| n.is_primary_output())
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Number of flip-flops.
    pub fn dff_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_sequential()).count()
    }
}

/// Incremental builder for a [`Netlist`].
///
/// Nets are enumerated in order of first mention. Driver back-references and
/// sink lists are derived in [`NetlistBuilder::build`].
///
/// # Example
///
/// ```
/// use dcalc_sim::graph::{ElementType, Netlist};
///
/// let mut builder = Netlist::builder();
/// builder.connect("g1", ElementType::And, &["I1", "I2"], &["O1"]);
/// let netlist = builder.build().unwrap();
///
/// assert_eq!(netlist.primary_inputs().count(), 2);
/// assert_eq!(netlist.primary_outputs().count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct NetlistBuilder {
    elements: Vec<Element>,
    net_names: Vec<String>,
    net_index: HashMap<String, NetId>,
    forced_outputs: Vec<NetId>,
}

impl NetlistBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of the net called `name`, creating it if needed.
    pub fn add_net(&mut self, name: impl Into<String>) -> NetId {
        let name = name.into();
        if let Some(&id) = self.net_index.get(&name) {
            return id;
        }
        let id = self.net_names.len();
        self.net_index.insert(name.clone(), id);
        self.net_names.push(name);
        id
    }

    /// Adds an element connected to existing nets and returns its id.
    pub fn add_element(
        &mut self,
        name: impl Into<String>,
        kind: ElementType,
        inputs: &[NetId],
        outputs: &[NetId],
    ) -> ElementId {
        let id = self.elements.len();
        self.elements.push(Element {
            id,
            name: name.into(),
            kind,
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
        });
        id
    }

    /// Adds an element, creating its nets by name as needed.
    pub fn connect(
        &mut self,
        name: impl Into<String>,
        kind: ElementType,
        inputs: &[&str],
        outputs: &[&str],
    ) -> ElementId {
        let inputs: Vec<NetId> = inputs.iter().map(|n| self.add_net(*n)).collect();
        let outputs: Vec<NetId> = outputs.iter().map(|n| self.add_net(*n)).collect();
        self.add_element(name, kind, &inputs, &outputs)
    }

    /// Marks a net as a primary output even if it also feeds elements.
    pub fn mark_primary_output(&mut self, name: impl Into<String>) -> NetId {
        let id = self.add_net(name);
        if !self.forced_outputs.contains(&id) {
            self.forced_outputs.push(id);
        }
        id
    }

    /// Validates connectivity and produces the netlist.
    pub fn build(self) -> SimResult<Netlist> {
        let mut nets: Vec<Net> = self
            .net_names
            .into_iter()
            .enumerate()
            .map(|(id, name)| Net {
                id,
                name,
                driver: None,
                sinks: Vec::new(),
            })
            .collect();

        for element in &self.elements {
            for &net_id in &element.outputs {
                let net = nets.get_mut(net_id).ok_or(SimError::UnknownNet(net_id))?;
                if let Some(first) = net.driver {
                    return Err(SimError::MultipleDrivers {
                        net: net.name.clone(),
                        first: self.elements[first].name.clone(),
                        second: element.name.clone(),
                    });
                }
                net.driver = Some(element.id);
            }
            for &net_id in &element.inputs {
                let net = nets.get_mut(net_id).ok_or(SimError::UnknownNet(net_id))?;
                net.sinks.push(Some(element.id));
            }
        }

        for &net_id in &self.forced_outputs {
            let net = nets.get_mut(net_id).ok_or(SimError::UnknownNet(net_id))?;
            net.sinks.push(None);
        }
        for net in nets.iter_mut().filter(|n| n.sinks.is_empty()) {
            net.sinks.push(None);
        }

        tracing::debug!(
            elements = self.elements.len(),
            nets = nets.len(),
            "netlist built"
        );

        Ok(Netlist {
            elements: self.elements,
            nets,
            net_index: self.net_index,
        })
    }
}
