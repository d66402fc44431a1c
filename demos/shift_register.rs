//! Configuration-driven shift register example.
//!
//! Loads a three-stage shift register from an inline YAML testbench (or from
//! the file named by the first argument), runs its stimulus, streams the
//! output lines to stdout and prints run statistics.

use dcalc_sim::{SimConfig, Simulator, StatsCollector};

const TESTBENCH: &str = r#"
simulation:
  name: shift3
  log_level: info
  collect_stats: true

nets: [I1, CLOCK, q1, q2, q3]

elements:
  - name: ff1
    type: DFF
    inputs: [CLOCK, I1]
    outputs: [q1]
  - name: ff2
    type: DFF
    inputs: [CLOCK, q1]
    outputs: [q2]
  - name: ff3
    type: DFF
    inputs: [CLOCK, q2]
    outputs: [q3]

outputs: [q1, q2]

stimulus:
  - "1 1"
  - "0 1"
  - "D 1"
  - "1 0"
  - "1 1"
  - "0 1"
  - "0 1"
  - "0 1"
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1);
    let config = match &path {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::from_yaml(TESTBENCH)?,
    };

    dcalc_sim::init_logging(&config.simulation.log_level);

    let netlist = config.build_netlist()?;
    let vectors = config.vectors()?;

    println!("==== Shift register example ====");
    println!(
        "{} elements, {} vectors; columns: q1 q2 q3\n",
        netlist.element_count(),
        vectors.len()
    );

    let mut collector = StatsCollector::new(&netlist);
    collector.set_name(config.simulation.name.as_str());
    if let Some(path) = &path {
        collector.set_config_file(path.as_str());
    }

    let mut sim = Simulator::new(&netlist)?;
    collector.start();
    sim.run(&vectors, std::io::stdout().lock())?;
    collector.stop(sim.stats());

    if config.simulation.collect_stats {
        println!();
        print!("{}", collector.stats().summary());
    }
    Ok(())
}
