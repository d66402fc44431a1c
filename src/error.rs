//! Error types for netlist construction and simulation.
//!
//! Every error is fatal to a run: there is no partial-result mode, and no
//! failure here is transient.

use thiserror::Error;

use crate::types::{NetId, StepIndex};

/// Errors raised by the graph model, the orderer, the evaluator and the
/// simulation driver.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("combinational cycle: {unresolved} element(s) could not be ordered: {elements:?}")]
    CombinationalCycle {
        unresolved: usize,
        elements: Vec<String>,
    },

    #[error("element '{element}' has unsupported type '{kind}'")]
    UnsupportedElement { element: String, kind: String },

    #[error("primary input net '{net}' does not follow the <letter><index> naming convention")]
    MalformedInputName { net: String },

    #[error("primary input net '{net}' addresses position {index}, but the applied vector has {width} data value(s)")]
    InputIndexOutOfRange {
        net: String,
        index: usize,
        width: usize,
    },

    #[error("element '{element}' ({kind}) expects {expected} input(s), found {found}")]
    ArityMismatch {
        element: String,
        kind: String,
        expected: &'static str,
        found: usize,
    },

    #[error("applied vector {step} is empty; the clock value is missing")]
    MissingClock { step: StepIndex },

    #[error("net '{net}' is driven by both '{first}' and '{second}'")]
    MultipleDrivers {
        net: String,
        first: String,
        second: String,
    },

    #[error("net {0} does not exist")]
    UnknownNet(NetId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SimError::InputIndexOutOfRange {
            net: "I4".to_string(),
            index: 4,
            width: 2,
        };
        assert_eq!(
            err.to_string(),
            "primary input net 'I4' addresses position 4, but the applied vector has 2 data value(s)"
        );

        let err = SimError::UnsupportedElement {
            element: "u7".to_string(),
            kind: "XOR".to_string(),
        };
        assert!(err.to_string().contains("XOR"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: SimError = io.into();
        assert!(matches!(err, SimError::Io(_)));
    }
}
