/// Pure Rust core benchmarks for the SMART sub-surface model.
///
/// Uses std::time::Instant for timing, a deterministic LCG PRNG for data generation,
/// and std::hint::black_box to prevent dead-code elimination.
use std::hint::black_box;
use std::time::{Duration, Instant};

use smart_core::forcing::ForcingData;
use smart_core::smart::run;
use smart_core::{Grid, Parameters};

const REPEATS: usize = 7;
const DT: f64 = 86_400.0;

/// Simple LCG PRNG for deterministic data generation.
///
/// Roughly one wet day in three; dry days carry evaporative demand.
fn make_data(n: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut state = seed;
    let mut next_f64 = || -> f64 {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as f64 / (1u64 << 31) as f64
    };

    let mut throughfall = Vec::with_capacity(n);
    let mut transpiration = Vec::with_capacity(n);
    for _ in 0..n {
        let wet = next_f64() < 0.33;
        let depth = next_f64();
        if wet {
            throughfall.push(depth * 30.0 / DT);
            transpiration.push(0.0);
        } else {
            throughfall.push(0.0);
            transpiration.push(depth * 4.0 / DT);
        }
    }
    (throughfall, transpiration)
}

/// Run a closure `REPEATS` times, return the median duration.
fn median_time<F: FnMut()>(mut f: F) -> Duration {
    let mut times: Vec<Duration> = (0..REPEATS)
        .map(|_| {
            let start = Instant::now();
            f();
            start.elapsed()
        })
        .collect();
    times.sort();
    times[REPEATS / 2]
}

fn params() -> Parameters {
    Parameters::new(0.5, 0.1, 0.3, 0.2, 600.0, 2.0 * DT, 5.0 * DT, 30.0 * DT)
        .expect("benchmark parameters are within bounds")
}

fn bench_cell(sizes: &[usize]) -> Vec<(&'static str, usize, Duration)> {
    let params = params();
    let mut results = Vec::new();

    for &n in sizes {
        let (throughfall, transpiration) = make_data(n, 42);
        let forcing =
            ForcingData::new(throughfall, transpiration, DT).expect("generated forcing is valid");

        // Warmup
        black_box(run::run(&params, &forcing, None));

        let dur = median_time(|| {
            black_box(run::run(&params, &forcing, None));
        });
        results.push(("smart-cell", n, dur));
    }
    results
}

fn bench_grid(cells: &[usize], steps: usize) -> Vec<(&'static str, usize, Duration)> {
    let mut results = Vec::new();

    for &n in cells {
        let (throughfall, transpiration) = make_data(n * steps, 7);

        let dur = median_time(|| {
            let mut grid = Grid::uniform(params(), n, DT).expect("valid grid");
            for t in 0..steps {
                let window = t * n..(t + 1) * n;
                black_box(
                    grid.step(&throughfall[window.clone()], &transpiration[window])
                        .expect("matching lengths"),
                );
            }
        });
        results.push(("smart-grid", n, dur));
    }
    results
}

fn main() {
    println!("SMART Core Benchmarks");
    println!("============================================================");
    println!("{:<18} {:>8}   {:>12}", "Case", "N", "Median (ms)");
    println!("--------------------------------------------");

    let mut all_results: Vec<(&str, usize, Duration)> = Vec::new();

    all_results.extend(bench_cell(&[3650, 36500]));
    all_results.extend(bench_grid(&[1_000, 100_000], 30));

    for (case, n, dur) in &all_results {
        let ms = dur.as_secs_f64() * 1000.0;
        println!("{:<18} {:>8}      {:>8.2}", case, n, ms);
    }

    println!("============================================================");
}
