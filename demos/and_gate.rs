//! Single AND gate example.
//!
//! Drives a two-input AND gate with every combination of the D-calculus
//! alphabet and prints the resulting truth table, one applied vector per row.

use dcalc_sim::{AppliedVector, ElementType, Logic, Netlist, SimResult, Simulator};

fn main() -> SimResult<()> {
    dcalc_sim::init_logging("warn");

    println!("==== AND gate example ====");
    println!("g1 = AND(I1, I2); the clock slot is unused.\n");

    let mut builder = Netlist::builder();
    builder.connect("g1", ElementType::And, &["I1", "I2"], &["O1"]);
    let netlist = builder.build()?;

    let vectors: Vec<AppliedVector> = Logic::ALL
        .iter()
        .flat_map(|&a| {
            Logic::ALL
                .iter()
                .map(move |&b| AppliedVector::with_clock([a, b], Logic::X))
        })
        .collect();

    let mut sim = Simulator::new(&netlist)?;
    println!("{:>3} {:>3} | {:>3}", "I1", "I2", "O1");
    println!("--------+----");
    for vector in &vectors {
        let line = sim.step(vector)?;
        let data = vector.data();
        println!("{:>3} {:>3} | {:>3}", data[0], data[1], line.to_string());
    }

    println!("\nSteps simulated: {}", sim.steps_executed());
    Ok(())
}
