//! Applied input vectors and primary-input addressing.
//!
//! One applied vector drives one time step. Its last value is the clock; the
//! values before it are addressed positionally by primary-input nets through
//! their names: the first character is dropped and the rest is read as a
//! 1-based index, so `I3` reads the third data value. A net named exactly
//! `CLOCK` reads the clock value instead.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{SimError, SimResult};
use crate::logic::{Logic, ParseLogicError};

/// Name of the primary-input net bound to the clock slot.
pub const CLOCK_NET: &str = "CLOCK";

/// Where a primary-input net takes its value from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAddress {
    /// The last value of the applied vector.
    Clock,
    /// A 1-based position among the data values.
    Position(usize),
}

impl InputAddress {
    /// Parses a primary-input net name.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MalformedInputName`] unless the name is `CLOCK` or
    /// a single letter followed by a positive decimal index.
    pub fn parse(net_name: &str) -> SimResult<Self> {
        if net_name == CLOCK_NET {
            return Ok(InputAddress::Clock);
        }

        let malformed = || SimError::MalformedInputName {
            net: net_name.to_string(),
        };

        let mut chars = net_name.chars();
        let prefix = chars.next().ok_or_else(malformed)?;
        let digits = chars.as_str();
        if !prefix.is_alphabetic() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        match digits.parse::<usize>() {
            Ok(position) if position > 0 => Ok(InputAddress::Position(position)),
            _ => Err(malformed()),
        }
    }
}

/// The values applied during one time step, clock last.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppliedVector {
    values: Vec<Logic>,
}

impl AppliedVector {
    /// Creates a vector from raw values; the last one is the clock.
    pub fn new(values: Vec<Logic>) -> Self {
        Self { values }
    }

    /// Creates a vector from data values followed by a separate clock.
    pub fn with_clock(data: impl IntoIterator<Item = Logic>, clock: Logic) -> Self {
        let mut values: Vec<Logic> = data.into_iter().collect();
        values.push(clock);
        Self { values }
    }

    /// The clock value, absent only for an empty vector.
    pub fn clock(&self) -> Option<Logic> {
        self.values.last().copied()
    }

    /// The data values, excluding the clock.
    pub fn data(&self) -> &[Logic] {
        match self.values.split_last() {
            Some((_, data)) => data,
            None => &[],
        }
    }

    /// Number of data values, excluding the clock.
    pub fn width(&self) -> usize {
        self.data().len()
    }

    /// All values, clock included.
    pub fn values(&self) -> &[Logic] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolves the value seen by the primary-input net `net` at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InputIndexOutOfRange`] when the position exceeds
    /// the vector's data width, or when the clock is requested from an empty
    /// vector.
    pub fn resolve(&self, address: InputAddress, net: &str) -> SimResult<Logic> {
        let out_of_range = |index: usize| SimError::InputIndexOutOfRange {
            net: net.to_string(),
            index,
            width: self.width(),
        };

        match address {
            InputAddress::Clock => self.clock().ok_or_else(|| out_of_range(0)),
            InputAddress::Position(k) => self
                .data()
                .get(k - 1)
                .copied()
                .ok_or_else(|| out_of_range(k)),
        }
    }
}

impl From<Vec<Logic>> for AppliedVector {
    fn from(values: Vec<Logic>) -> Self {
        Self::new(values)
    }
}

impl fmt::Display for AppliedVector {
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

impl FromStr for AppliedVector {
    type Err = ParseLogicError;

    /// Parses whitespace-separated logic symbols, clock last.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<Logic>, _>>()?;
        Ok(Self::new(values))
    }
}

/// Parses a stimulus text with one applied vector per line.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_stimulus(text: &str) -> Result<Vec<AppliedVector>, ParseLogicError> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::parse)
        .collect()
}
