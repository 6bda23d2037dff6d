// scripts/benchmark.rs
use chrono::{DateTime, Duration, TimeZone, Utc};
use coin_greeks::analytics::{forward_option_price, implied_vol};
use coin_greeks::instruments::{CallOrPut, Contract, Pair, Position};
use coin_greeks::math_utils::Timer;
use coin_greeks::risk::{MarketSnapshot, Portfolio, RiskMeasures};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, LogNormal, Uniform};
use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Host facts that affect the parallel numbers
#[derive(Debug)]
struct SystemInfo {
    os: &'static str,
    arch: &'static str,
    cpu_cores: usize,
    rustc_flags: String,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS,
            arch: env::consts::ARCH,
            cpu_cores: num_cpus::get(),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
            rayon_threads: rayon::current_num_threads(),
        }
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: String,
    calls: usize,
    time_ms: f64,
    throughput_per_sec: f64,
    value: f64,
}

impl BenchmarkResult {
    fn new(name: impl Into<String>, calls: usize, time_ms: f64, value: f64) -> Self {
        BenchmarkResult {
            name: name.into(),
            calls,
            time_ms,
            throughput_per_sec: calls as f64 / (time_ms / 1000.0),
            value,
        }
    }
}

/// Randomised option inputs: (days, strike, forward, vol, call/put)
struct Scenario {
    days: i64,
    strike: f64,
    forward: f64,
    vol: f64,
    call_put: CallOrPut,
}

fn scenarios(n: usize, seed: u64) -> Vec<Scenario> {
    let mut rng = StdRng::seed_from_u64(seed);
    let days = Uniform::new_inclusive(1i64, 365);
    let moneyness = LogNormal::new(0.0, 0.25).expect("valid lognormal");
    let vols = Uniform::new(0.2, 1.5);
    let forward: f64 = 9000.0;

    (0..n)
        .map(|_| Scenario {
            days: days.sample(&mut rng),
            strike: (forward * moneyness.sample(&mut rng) / 50.0).round() * 50.0,
            forward,
            vol: vols.sample(&mut rng),
            call_put: if rng.gen_bool(0.5) { CallOrPut::Call } else { CallOrPut::Put },
        })
        .collect()
}

fn random_portfolio(n: usize, asof: DateTime<Utc>, seed: u64) -> Portfolio {
    let mut rng = StdRng::seed_from_u64(seed);
    let expiries: Vec<DateTime<Utc>> = [7, 14, 35, 98, 189]
        .iter()
        .map(|&d| asof + Duration::days(d))
        .collect();
    let sizes = Uniform::new(-50.0, 50.0);

    (0..n)
        .map(|i| {
            let expiry = expiries[rng.gen_range(0..expiries.len())];
            let contract = if i % 10 == 0 {
                Contract::future(Pair::BTC_USD, expiry)
            } else {
                let strike = 500.0 * rng.gen_range(12..28) as f64;
                let call_put = if rng.gen_bool(0.5) { CallOrPut::Call } else { CallOrPut::Put };
                Contract::option(Pair::BTC_USD, expiry, strike, call_put)
            };
            let quantity = if contract.is_option() {
                sizes.sample(&mut rng)
            } else {
                1000.0 * sizes.sample(&mut rng)
            };
            Position::new(Arc::new(contract), quantity, 8800.0)
        })
        .collect::<Vec<_>>()
        .into()
}

fn run_pricer_benchmarks() -> Vec<BenchmarkResult> {
    let mut results = Vec::new();

    for &n in &[10_000, 100_000, 1_000_000] {
        info!(calls = n, "pricer benchmark");
        let cases = scenarios(n, 42);

        let mut timer = Timer::new();
        timer.start();
        let total: f64 = cases
            .iter()
            .map(|c| forward_option_price(c.days, c.strike, c.forward, c.vol, c.call_put))
            .sum();
        results.push(BenchmarkResult::new(
            format!("Black-76 forward price ({}k)", n / 1000),
            n,
            timer.elapsed_ms(),
            total / n as f64,
        ));
    }

    results
}

fn run_implied_vol_benchmarks() -> Vec<BenchmarkResult> {
    let mut results = Vec::new();
    let spot = 8900.0;

    for &n in &[1_000, 10_000, 100_000] {
        info!(calls = n, "implied vol benchmark");
        let cases = scenarios(n, 7);
        let premiums: Vec<f64> = cases
            .iter()
            .map(|c| spot / c.forward * forward_option_price(c.days, c.strike, c.forward, c.vol, c.call_put))
            .collect();

        let mut timer = Timer::new();
        timer.start();
        let mut failures = 0usize;
        let mut max_err: f64 = 0.0;
        for (c, &premium) in cases.iter().zip(&premiums) {
            let vol = implied_vol(c.days, c.strike, spot, c.forward, premium, c.call_put);
            if vol.is_nan() {
                failures += 1;
            } else {
                max_err = max_err.max((vol - c.vol).abs());
            }
        }
        let time_ms = timer.elapsed_ms();
        info!(calls = n, failures, max_err, "implied vol round trips");

        results.push(BenchmarkResult::new(
            format!("Implied vol ({}k)", n / 1000),
            n,
            time_ms,
            max_err,
        ));
    }

    results
}

fn run_portfolio_benchmarks() -> Vec<BenchmarkResult> {
    let mut results = Vec::new();
    let asof = Utc.with_ymd_and_hms(2019, 6, 21, 8, 0, 0).unwrap();
    let market = MarketSnapshot::new(asof, 8900.0, 8950.0, 0.75);

    for &n in &[1_000, 10_000, 100_000] {
        info!(positions = n, "portfolio benchmark");
        let book = random_portfolio(n, asof, 2019);

        let mut timer = Timer::new();
        timer.start();
        let serial: f64 = book
            .positions()
            .iter()
            .map(|p| p.delta(market.asof, market.spot, market.forward, market.vol))
            .sum();
        results.push(BenchmarkResult::new(
            format!("Delta serial ({}k positions)", n / 1000),
            n,
            timer.elapsed_ms(),
            serial,
        ));

        timer.start();
        let parallel = book.delta(&market);
        results.push(BenchmarkResult::new(
            format!("Delta parallel ({}k positions)", n / 1000),
            n,
            timer.elapsed_ms(),
            parallel,
        ));

        timer.start();
        let report = book.risk_report(&market, RiskMeasures::ALL);
        results.push(BenchmarkResult::new(
            format!("Full risk report ({}k positions)", n / 1000),
            n,
            timer.elapsed_ms(),
            report.pv.unwrap_or(f64::NAN),
        ));
    }

    results
}

fn write_results_to_csv(
    results: &[BenchmarkResult],
    system_info: &SystemInfo,
    filename: &str,
) -> io::Result<()> {
    let mut file = File::create(filename)?;

    writeln!(file, "# System Information")?;
    writeln!(file, "# Target: {}-{}", system_info.os, system_info.arch)?;
    writeln!(file, "# CPU Cores: {}", system_info.cpu_cores)?;
    writeln!(file, "# RUSTFLAGS: {}", system_info.rustc_flags)?;
    writeln!(file, "# Rayon Threads: {}", system_info.rayon_threads)?;
    writeln!(
        file,
        "# Benchmark Date: {}",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(file, "#")?;

    writeln!(file, "Benchmark,Calls,Time_ms,Throughput_per_sec,Value")?;
    for result in results {
        writeln!(
            file,
            "{},{},{:.2},{:.0},{:.6}",
            result.name, result.calls, result.time_ms, result.throughput_per_sec, result.value
        )?;
    }

    println!("Results written to {}", filename);
    Ok(())
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("coin-greeks Benchmark Suite");
    println!("===========================\n");

    let system_info = SystemInfo::gather();
    println!("System Information:");
    println!("  Target: {}-{}", system_info.os, system_info.arch);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  RUSTFLAGS: {}", system_info.rustc_flags);
    println!("  Rayon Threads: {}", system_info.rayon_threads);
    println!();

    let mut results = run_pricer_benchmarks();
    results.extend(run_implied_vol_benchmarks());
    results.extend(run_portfolio_benchmarks());

    println!(
        "\n{:<40} {:>10} {:>12} {:>16} {:>16}",
        "Benchmark", "Calls", "Time (ms)", "Throughput/s", "Value"
    );
    for r in &results {
        println!(
            "{:<40} {:>10} {:>12.2} {:>16.0} {:>16.6}",
            r.name, r.calls, r.time_ms, r.throughput_per_sec, r.value
        );
    }

    let filename = env::args().nth(1).unwrap_or_else(|| "benchmark_results.csv".to_string());
    write_results_to_csv(&results, &system_info, &filename)
}
