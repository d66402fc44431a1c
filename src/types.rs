//! Core type definitions for the netlist simulator.
//!
//! Identifiers are dense, zero-based indices assigned by the graph model and
//! stay stable for the whole run, so every per-element container in the
//! simulator is a plain `Vec` indexed by them.

/// Identifier of an element (gate or flip-flop) in the netlist.
pub type ElementId = usize;

/// Identifier of a net (wire) in the netlist.
pub type NetId = usize;

/// Zero-based index of an applied vector within a stimulus sequence.
pub type StepIndex = usize;
