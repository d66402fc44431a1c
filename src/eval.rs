//! Gate semantics over the D-calculus alphabet.
//!
//! The functions here are pure: they map resolved input values (and, for
//! flip-flops, the state settled in the previous step) to an output value.
//! Reading inputs and storing results is the simulator's job.
//!
//! AND and OR share one reduction, parameterized by the controlling value
//! (`0` for AND, `1` for OR). Precedence, highest first:
//!
//! 1. any `Error` input yields `Error`
//! 2. `D` together with `D'` yields the controlling value
//! 3. any controlling input yields the controlling value
//! 4. a lone sensitized value (`D` or `D'`) propagates, even next to `X`
//! 5. any `X` yields `X`
//! 6. otherwise the non-controlling value
//!
//! All checks are set-membership tests, so the result does not depend on
//! input order.

use crate::error::{SimError, SimResult};
use crate::graph::{Element, ElementType};
use crate::logic::Logic;

/// Result of evaluating one element for one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Evaluation {
    /// Value presented on the element's output nets in this step.
    pub output: Logic,
    /// New flip-flop state, taking effect from the next step.
    pub next_state: Option<Logic>,
}

impl Evaluation {
    /// A combinational result with no state update.
    pub fn combinational(output: Logic) -> Self {
        Self {
            output,
            next_state: None,
        }
    }
}

/// Inverter: swaps `0`/`1` and `D`/`D'`; `X` and `Error` pass through.
pub fn not(input: Logic) -> Logic {
    input.complement().unwrap_or(input)
}

/// Multi-input AND.
pub fn and(inputs: &[Logic]) -> Logic {
    reduce(inputs, Logic::Zero, Logic::One)
}

/// Multi-input OR.
pub fn or(inputs: &[Logic]) -> Logic {
    reduce(inputs, Logic::One, Logic::Zero)
}

fn reduce(inputs: &[Logic], controlling: Logic, identity: Logic) -> Logic {
    let has = |value: Logic| inputs.contains(&value);

    if has(Logic::Error) {
        return Logic::Error;
    }

    let sensitized = inputs.iter().copied().find(|v| v.is_sensitized());
    if let Some(value) = sensitized {
        // D and D' mask each other.
        if value.complement().is_some_and(has) {
            return controlling;
        }
    }

    if has(controlling) {
        controlling
    } else if let Some(value) = sensitized {
        value
    } else if has(Logic::X) {
        Logic::X
    } else {
        identity
    }
}

/// Edge-triggered flip-flop.
///
/// The output is always the state settled in the previous step. When
/// `enable` is `1`, `data` becomes the state for the next step.
pub fn dff(enable: Logic, data: Logic, state: Logic) -> Evaluation {
    Evaluation {
        output: state,
        next_state: (enable == Logic::One).then_some(data),
    }
}

/// Evaluates `element` on its resolved inputs.
///
/// `state` is the element's sequential state from the previous step and is
/// ignored by combinational elements.
///
/// # Errors
///
/// - [`SimError::UnsupportedElement`] for element types without semantics
/// - [`SimError::ArityMismatch`] when the input count does not fit the type
pub fn evaluate(element: &Element, inputs: &[Logic], state: Logic) -> SimResult<Evaluation> {
    let arity = |expected: &'static str| SimError::ArityMismatch {
        element: element.name().to_string(),
        kind: element.kind().to_string(),
        expected,
        found: inputs.len(),
    };

    match element.kind() {
        ElementType::Not => match inputs {
            [input] => Ok(Evaluation::combinational(not(*input))),
            _ => Err(arity("exactly 1")),
        },
        ElementType::And if !inputs.is_empty() => Ok(Evaluation::combinational(and(inputs))),
        ElementType::Or if !inputs.is_empty() => Ok(Evaluation::combinational(or(inputs))),
        ElementType::And | ElementType::Or => Err(arity("at least 1")),
        ElementType::Dff => match inputs {
            [enable, data] => Ok(dff(*enable, *data, state)),
            _ => Err(arity("exactly 2")),
        },
        ElementType::Unsupported(kind) => Err(SimError::UnsupportedElement {
            element: element.name().to_string(),
            kind: kind.clone(),
        }),
    }
}
