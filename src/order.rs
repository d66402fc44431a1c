//! Pseudotopological ordering of netlist elements.
//!
//! Elements are sorted with Kahn's algorithm so that every combinational
//! predecessor is evaluated before its dependents. Edges leaving a flip-flop
//! are not counted: a flip-flop output always reads the state settled in the
//! previous step, so it is available from the start of every step. This is
//! what lets feedback loops closed through flip-flops sort without a cycle.

use std::collections::VecDeque;

use crate::error::{SimError, SimResult};
use crate::graph::Netlist;
use crate::types::ElementId;

/// Computes one evaluation order covering every element exactly once.
///
/// Ties between simultaneously free elements are broken FIFO, seeded in
/// ascending id order, so the result is deterministic for a given netlist.
///
/// # Errors
///
/// Returns [`SimError::CombinationalCycle`] when the queue drains before all
/// elements are ordered, i.e. the netlist contains a cycle that does not pass
/// through a flip-flop.
pub fn pseudo_topological_order(netlist: &Netlist) -> SimResult<Vec<ElementId>> {
    let elements = netlist.elements();

    // One count per input slot driven by a combinational element.
    let mut in_degree: Vec<usize> = elements
        .iter()
        .map(|element| {
            element
                .inputs()
                .iter()
                .filter_map(|&net| netlist.net(net))
                .filter_map(|net| netlist.driver_of(net))
                .filter(|driver| !driver.is_sequential())
                .count()
        })
        .collect();

    let mut queue: VecDeque<ElementId> = in_degree
        .iter()
        .enumerate()
        .filter(|&(_, &deg)| deg == 0)
        .map(|(id, _)| id)
        .collect();

    let mut order = Vec::with_capacity(elements.len());
    while let Some(id) = queue.pop_front() {
        order.push(id);

        let element = &elements[id];
        if element.is_sequential() {
            continue;
        }

        for net in element.outputs().iter().filter_map(|&net| netlist.net(net)) {
            for sink in net.sink_elements() {
                let deg = &mut in_degree[sink];
                *deg -= 1;
                if *deg == 0 {
                    queue.push_back(sink);
                }
            }
        }
    }

    if order.len() != elements.len() {
        let stuck: Vec<String> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, &deg)| deg > 0)
            .map(|(id, _)| elements[id].name().to_string())
            .collect();
        tracing::warn!(
            ordered = order.len(),
            total = elements.len(),
            "combinational cycle detected"
        );
        return Err(SimError::CombinationalCycle {
            unresolved: elements.len() - order.len(),
            elements: stuck,
        });
    }

    tracing::debug!(elements = order.len(), "evaluation order computed");
    Ok(order)
}
