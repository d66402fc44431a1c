//! Configuration-driven simulation tests.

use std::path::PathBuf;

use dcalc_sim::config::ConfigError;
use dcalc_sim::{simulate, SimConfig, SimConfigBuilder, SimError, Simulator, StatsCollector};

const SHIFT_REGISTER_YAML: &str = r#"
simulation:
  name: shift2
  log_level: warn
  collect_stats: true

nets: [I1, CLOCK, q1, q2]

elements:
  - name: ff1
    type: DFF
    inputs: [CLOCK, I1]
    outputs: [q1]
  - name: ff2
    type: dff
    inputs: [CLOCK, q1]
    outputs: [q2]

outputs: [q1]

stimulus:
  - "1 1"
  - "0 1"
  - "D 1"
  - "1 0"
  - "1 1"
"#;

fn scratch_path(file: &str) -> PathBuf {
    std::env::temp_dir().join(format!("dcalc_sim_{}_{}", std::process::id(), file))
}

fn render(config: &SimConfig) -> Vec<String> {
    let netlist = config.build_netlist().unwrap();
    simulate(&netlist, &config.vectors().unwrap())
        .unwrap()
        .iter()
        .map(|line| line.to_string())
        .collect()
}

#[test]
fn test_yaml_testbench_runs() {
    let config = SimConfig::from_yaml(SHIFT_REGISTER_YAML).unwrap();
    assert_eq!(config.simulation.name, "shift2");
    assert!(config.simulation.collect_stats);

    // Outputs in net order: q1, q2. Step 4 holds because the clock is low.
    let lines = render(&config);
    assert_eq!(lines, vec!["X X", "1 X", "0 1", "D 0", "D 0"]);
}

#[test]
fn test_json_testbench_matches_yaml() {
    let yaml = SimConfig::from_yaml(SHIFT_REGISTER_YAML).unwrap();
    let json = SimConfig::from_json(&yaml.to_json().unwrap()).unwrap();
    assert_eq!(render(&json), render(&yaml));
}

#[test]
fn test_from_file_detects_format() {
    let config = SimConfig::from_yaml(SHIFT_REGISTER_YAML).unwrap();

    let yaml_path = scratch_path("bench.yaml");
    config.to_yaml_file(&yaml_path).unwrap();
    let from_yaml = SimConfig::from_file(&yaml_path).unwrap();
    std::fs::remove_file(&yaml_path).ok();

    let json_path = scratch_path("bench.json");
    config.to_json_file(&json_path).unwrap();
    let from_json = SimConfig::from_file(&json_path).unwrap();
    std::fs::remove_file(&json_path).ok();

    assert_eq!(from_yaml.elements.len(), 2);
    assert_eq!(from_json.stimulus, config.stimulus);
}

#[test]
fn test_from_file_rejects_unknown_extension() {
    match SimConfig::from_file("bench.toml") {
        Err(ConfigError::UnknownFormat(ext)) => assert_eq!(ext, "toml"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let path = scratch_path("missing.yaml");
    assert!(matches!(SimConfig::from_file(&path), Err(ConfigError::Io(_))));
}

#[test]
fn test_unsupported_type_loads_but_fails_to_simulate() {
    let config = SimConfigBuilder::new()
        .element("x", "XOR", &["I1", "I2"], &["O1"])
        .vector("0 1 X")
        .build()
        .unwrap();

    let netlist = config.build_netlist().unwrap();
    let err = simulate(&netlist, &config.vectors().unwrap()).unwrap_err();
    match err {
        SimError::UnsupportedElement { element, kind } => {
            assert_eq!(element, "x");
            assert_eq!(kind, "XOR");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_stats_from_configured_run() {
    let config = SimConfig::from_yaml(SHIFT_REGISTER_YAML).unwrap();
    let netlist = config.build_netlist().unwrap();

    let mut collector = StatsCollector::new(&netlist);
    collector.set_name(config.simulation.name.as_str());
    collector.set_config_file("shift2.yaml");
    collector.start();

    let mut sim = Simulator::new(&netlist).unwrap();
    sim.simulate(&config.vectors().unwrap()).unwrap();
    collector.stop(sim.stats());

    let stats = collector.into_stats();
    assert_eq!(stats.metadata.name, "shift2");
    assert_eq!(stats.metadata.config_file.as_deref(), Some("shift2.yaml"));
    assert_eq!(stats.netlist.elements, 2);
    assert_eq!(stats.netlist.dffs, 2);
    assert_eq!(stats.netlist.primary_outputs, 2);
    assert_eq!(stats.run.steps_executed, 5);
    assert_eq!(stats.run.state_captures, 8);

    let summary = stats.summary();
    assert!(summary.contains("Name: shift2"));
    assert!(summary.contains("Steps executed: 5"));

    let csv = stats.to_csv();
    assert!(csv.lines().count() >= 2);
    assert!(stats.to_json().unwrap().contains("\"steps_executed\": 5"));
}
