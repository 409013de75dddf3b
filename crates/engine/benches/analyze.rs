use criterion::{Criterion, criterion_group, criterion_main};
use echidna_coverage_engine::{ScanOptions, analyze_trace};
use std::fmt::Write;
use std::hint::black_box;

fn synthetic_trace(files: usize, functions: usize) -> String {
    let mut trace = String::new();
    for f in 0..files {
        writeln!(trace, "/home/dev/project/src/Contract{f}.sol").unwrap();
        writeln!(trace, "  1 |     |    | contract Contract{f} {{").unwrap();
        for n in 0..functions {
            let marker = if n % 3 == 0 { "" } else { "*" };
            writeln!(trace, "  2 | 4   | *  |     function f{n}(uint256 x) external {{").unwrap();
            writeln!(trace, "  3 | 4   | {marker:<2} |         total += x;").unwrap();
            writeln!(trace, "  4 | 4   | r  |         require(x > {n}, \"low\");").unwrap();
            writeln!(trace, "  5 |     |    |     }}").unwrap();
        }
        writeln!(trace, "  6 |     |    | }}").unwrap();
    }
    trace
}

fn benchmark_analyze(c: &mut Criterion) {
    let trace = synthetic_trace(50, 40);
    let options = ScanOptions::default();
    c.bench_function("analyze_trace_50_files", |b| {
        b.iter(|| black_box(analyze_trace(black_box(&trace), &options)));
    });
}

criterion_group!(benches, benchmark_analyze);
criterion_main!(benches);
