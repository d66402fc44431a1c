//! Declarative testbench configuration.
//!
//! A testbench names the elements of a netlist, how they connect, and the
//! stimulus to apply. YAML and JSON are both accepted.
//!
//! # Configuration File Structure
//!
//! ```yaml
//! simulation:
//!   name: shift2
//!   log_level: info
//!
//! nets: [I1, CLOCK, q1, q2]   # optional, fixes enumeration order
//!
//! elements:
//!   - name: ff1
//!     type: DFF
//!     inputs: [CLOCK, I1]
//!     outputs: [q1]
//!   - name: ff2
//!     type: DFF
//!     inputs: [CLOCK, q1]
//!     outputs: [q2]
//!
//! outputs: [q1]               # optional, extra primary outputs
//!
//! stimulus:
//!   - "1 1"
//!   - "0 1"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::error::SimError;
use crate::graph::{ElementType, Netlist};
use crate::logic::ParseLogicError;
use crate::vector::AppliedVector;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown file format: {0}")]
    UnknownFormat(String),

    #[error("Netlist error: {0}")]
    Netlist(#[from] SimError),

    #[error("Stimulus error: {0}")]
    Stimulus(#[from] ParseLogicError),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Global simulation parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Simulation name/description
    #[serde(default)]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to collect detailed statistics
    #[serde(default)]
    pub collect_stats: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            name: String::new(),
            log_level: default_log_level(),
            collect_stats: false,
        }
    }
}

/// Configuration for one element.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ElementConfig {
    /// Unique element name
    pub name: String,

    /// Element type name (NOT, AND, OR, DFF)
    #[serde(rename = "type")]
    pub element_type: String,

    /// Input net names, in order
    #[serde(default)]
    pub inputs: Vec<String>,

    /// Output net names, in order
    #[serde(default)]
    pub outputs: Vec<String>,
}

/// Complete testbench configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SimConfig {
    /// Global simulation parameters
    #[serde(default)]
    pub simulation: SimulationParams,

    /// Net names in enumeration order; nets not listed follow in order of
    /// first mention
    #[serde(default)]
    pub nets: Vec<String>,

    /// Element definitions
    #[serde(default)]
    pub elements: Vec<ElementConfig>,

    /// Nets observed as primary outputs in addition to sink-less nets
    #[serde(default)]
    pub outputs: Vec<String>,

    /// Applied vectors, one whitespace-separated line each, clock last
    #[serde(default)]
    pub stimulus: Vec<String>,
}

impl SimConfig {
    /// Creates a new empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Loads configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        let config: SimConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Loads configuration from a JSON string.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file, auto-detecting format.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Self::from_yaml_file(path),
            "json" => Self::from_json_file(path),
            _ => Err(ConfigError::UnknownFormat(ext.to_string())),
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.elements.is_empty() {
            return Err(ConfigError::Validation(
                "Configuration declares no elements".to_string(),
            ));
        }

        let mut names = HashSet::new();
        let mut referenced = HashSet::new();
        for element in &self.elements {
            if !names.insert(element.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "Duplicate element name: {}",
                    element.name
                )));
            }
            if element.outputs.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Element {} has no output nets",
                    element.name
                )));
            }
            referenced.extend(element.inputs.iter().map(String::as_str));
            referenced.extend(element.outputs.iter().map(String::as_str));
        }

        for net in &self.outputs {
            if !referenced.contains(net.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "Output references unconnected net: {}",
                    net
                )));
            }
        }

        Ok(())
    }

    /// Builds the netlist described by this configuration.
    pub fn build_netlist(&self) -> ConfigResult<Netlist> {
        let mut builder = Netlist::builder();
        for net in &self.nets {
            builder.add_net(net.as_str());
        }
        for element in &self.elements {
            let inputs: Vec<&str> = element.inputs.iter().map(String::as_str).collect();
            let outputs: Vec<&str> = element.outputs.iter().map(String::as_str).collect();
            builder.connect(
                element.name.as_str(),
                ElementType::from_name(&element.element_type),
                &inputs,
                &outputs,
            );
        }
        for net in &self.outputs {
            builder.mark_primary_output(net.as_str());
        }
        Ok(builder.build()?)
    }

    /// Parses the stimulus into applied vectors.
    pub fn vectors(&self) -> ConfigResult<Vec<AppliedVector>> {
        self.stimulus
            .iter()
            .map(|line| line.parse::<AppliedVector>().map_err(ConfigError::from))
            .collect()
    }

    /// Saves configuration to a YAML file.
    pub fn to_yaml_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Saves configuration to a JSON file.
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Converts to YAML string.
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Converts to JSON string.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Finds an element configuration by name.
    pub fn find_element(&self, name: &str) -> Option<&ElementConfig> {
        self.elements.iter().find(|e| e.name == name)
    }
}

/// Builder for creating SimConfig programmatically.
#[derive(Default)]
pub struct SimConfigBuilder {
    config: SimConfig,
}

impl SimConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the simulation name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.simulation.name = name.into();
        self
    }

    /// Sets the log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.simulation.log_level = level.into();
        self
    }

    /// Enables statistics collection.
    pub fn collect_stats(mut self, enable: bool) -> Self {
        self.config.simulation.collect_stats = enable;
        self
    }

    /// Declares a net, fixing its enumeration position.
    pub fn net(mut self, name: impl Into<String>) -> Self {
        self.config.nets.push(name.into());
        self
    }

    /// Adds an element.
    pub fn element(
        mut self,
        name: impl Into<String>,
        element_type: impl Into<String>,
        inputs: &[&str],
        outputs: &[&str],
    ) -> Self {
        self.config.elements.push(ElementConfig {
            name: name.into(),
            element_type: element_type.into(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    /// Marks a net as a primary output.
    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.config.outputs.push(name.into());
        self
    }

    /// Appends one applied vector.
    pub fn vector(mut self, line: impl Into<String>) -> Self {
        self.config.stimulus.push(line.into());
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> ConfigResult<SimConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
