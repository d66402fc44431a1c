//! Performance benchmarks for the D-calculus simulator.
//!
//! Run with: `cargo bench`
//! Or for specific bench: `cargo bench --bench simulation_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use dcalc_sim::eval::{and, or};
use dcalc_sim::{pseudo_topological_order, AppliedVector, ElementType, Logic, Netlist, Simulator};

// ============================================================================
// Benchmark Netlists
// ============================================================================

/// A chain of `len` inverters driven by `I1`.
fn inverter_chain(len: usize) -> Netlist {
    let mut builder = Netlist::builder();
    let mut prev = "I1".to_string();
    for i in 0..len {
        let next = format!("n{i}");
        builder.connect(format!("inv{i}"), ElementType::Not, &[prev.as_str()], &[next.as_str()]);
        prev = next;
    }
    builder.build().unwrap()
}

/// `width` ripple stages, each an AND/OR pair feeding a flip-flop whose
/// output loops back into the next stage.
fn registered_ripple(width: usize) -> Netlist {
    let mut builder = Netlist::builder();
    for bit in 0..width {
        let q = format!("q{bit}");
        let carry_in = if bit == 0 { "I1".to_string() } else { format!("c{}", bit - 1) };
        let data_in = format!("I{}", bit % 4 + 2);
        let carry = format!("c{bit}");
        let d = format!("d{bit}");

        builder.connect(format!("and{bit}"), ElementType::And, &[q.as_str(), carry_in.as_str()], &[carry.as_str()]);
        builder.connect(format!("or{bit}"), ElementType::Or, &[carry.as_str(), data_in.as_str()], &[d.as_str()]);
        builder.connect(format!("ff{bit}"), ElementType::Dff, &["CLOCK", d.as_str()], &[q.as_str()]);
    }
    builder.build().unwrap()
}

/// Five data values and a clock, cycling through the alphabet.
fn stimulus(steps: usize) -> Vec<AppliedVector> {
    let pattern = [Logic::Zero, Logic::One, Logic::D, Logic::X, Logic::NotD, Logic::One];
    (0..steps)
        .map(|step| {
            let data = (0..5).map(|i| pattern[(step + i) % pattern.len()]);
            AppliedVector::with_clock(data, if step % 2 == 0 { Logic::One } else { Logic::Zero })
        })
        .collect()
}

// ============================================================================
// Ordering
// ============================================================================

fn bench_ordering(c: &mut Criterion) {
    let mut group = c.benchmark_group("ordering");

    for size in [100usize, 1_000, 10_000].iter() {
        let chain = inverter_chain(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("chain", size), &chain, |b, netlist| {
            b.iter(|| black_box(pseudo_topological_order(netlist).unwrap()));
        });

        let ripple = registered_ripple(*size / 3);
        group.bench_with_input(BenchmarkId::new("ripple", size), &ripple, |b, netlist| {
            b.iter(|| black_box(pseudo_topological_order(netlist).unwrap()));
        });
    }

    group.finish();
}

// ============================================================================
// Stepping
// ============================================================================

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");

    for width in [8usize, 64, 512].iter() {
        let netlist = registered_ripple(*width);
        let vectors = stimulus(64);
        group.throughput(Throughput::Elements((netlist.element_count() * vectors.len()) as u64));
        group.bench_with_input(BenchmarkId::new("ripple", width), &netlist, |b, netlist| {
            b.iter(|| {
                let mut sim = Simulator::new(netlist).unwrap();
                for vector in &vectors {
                    black_box(sim.step(vector).unwrap());
                }
            });
        });
    }

    group.finish();
}

fn bench_run_output(c: &mut Criterion) {
    let netlist = registered_ripple(64);
    let vectors = stimulus(256);

    c.bench_function("run_to_buffer", |b| {
        b.iter(|| {
            let mut sim = Simulator::new(&netlist).unwrap();
            let mut out = Vec::with_capacity(64 * 1024);
            sim.run(&vectors, &mut out).unwrap();
            black_box(out.len())
        });
    });
}

// ============================================================================
// Gate Evaluation
// ============================================================================

fn bench_gate_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_eval");

    for fan_in in [2usize, 8, 32].iter() {
        let inputs: Vec<Logic> = (0..*fan_in)
            .map(|i| if i == fan_in / 2 { Logic::D } else { Logic::One })
            .collect();
        group.throughput(Throughput::Elements(*fan_in as u64));
        group.bench_with_input(BenchmarkId::new("and", fan_in), &inputs, |b, inputs| {
            b.iter(|| black_box(and(black_box(inputs))));
        });
        group.bench_with_input(BenchmarkId::new("or", fan_in), &inputs, |b, inputs| {
            b.iter(|| black_box(or(black_box(inputs))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ordering, bench_step, bench_run_output, bench_gate_eval);
criterion_main!(benches);
