//! Fault sensitization and propagation example.
//!
//! A stuck-at-0 fault on the first primary input is modelled by applying `D`
//! there. Each vector sets the side inputs; whenever a primary output shows
//! `D` or `D'`, the vector is a test for the fault.

use dcalc_sim::{AppliedVector, ElementType, Logic, Netlist, SimResult, Simulator};

fn main() -> SimResult<()> {
    dcalc_sim::init_logging("warn");

    println!("==== Fault propagation example ====");
    println!("O1 = NOT(AND(I1, I2)), O2 = OR(AND(I1, I2), I3), fault D on I1\n");

    let mut builder = Netlist::builder();
    builder.connect("g1", ElementType::And, &["I1", "I2"], &["n1"]);
    builder.connect("g2", ElementType::Not, &["n1"], &["O1"]);
    builder.connect("g3", ElementType::Or, &["n1", "I3"], &["O2"]);
    let netlist = builder.build()?;

    let side_values = [Logic::Zero, Logic::One, Logic::X];
    let mut sim = Simulator::new(&netlist)?;
    let mut tests = 0;

    println!("{:>3} {:>3} | {:>3} {:>3}", "I2", "I3", "O1", "O2");
    println!("--------+--------");
    for &i2 in &side_values {
        for &i3 in &side_values {
            let vector = AppliedVector::with_clock([Logic::D, i2, i3], Logic::X);
            let line = sim.step(&vector)?;
            let detected = line.values().iter().any(|v| v.is_sensitized());
            if detected {
                tests += 1;
            }
            println!(
                "{:>3} {:>3} | {:>3} {:>3}{}",
                i2,
                i3,
                line.values()[0],
                line.values()[1],
                if detected { "  <- detects" } else { "" }
            );
        }
    }

    println!("\n{} of {} vectors detect the fault", tests, sim.steps_executed());
    Ok(())
}
