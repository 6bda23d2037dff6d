// demos/demo.rs
use chrono::{Duration, TimeZone, Utc};
use coin_greeks::analytics::{forward_option_price, option_vega};
use coin_greeks::instruments::{CallOrPut, Contract, ContractCache};
use coin_greeks::math_utils::Timer;
use coin_greeks::risk::{MarketSnapshot, Portfolio, RiskMeasures};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Running coin-greeks Pricing Demo\n");

    let asof = Utc.with_ymd_and_hms(2019, 6, 21, 8, 0, 0).unwrap();
    let (spot, forward, vol) = (5500.0, 5520.0, 0.8);

    // --- Single option ---
    let call: Contract = "BTC-28JUN19-5000-C".parse().expect("valid contract name");
    let days = call.expiry_days(asof);
    let premium = call.option_price(asof, spot, forward, vol);
    let fwd_premium = forward_option_price(days, call.strike(), forward, vol, CallOrPut::Call);
    let vega = option_vega(days, call.strike(), spot, forward, vol);

    println!("--- {} ({} days) ---", call, days);
    println!("Forward premium (USD):     {:.4}", fwd_premium);
    println!("Spot-value premium (USD):  {:.4}", premium);
    println!("Premium in BTC:            {:.6}", premium / spot);
    println!("Vega per vol point (USD):  {:.4}", vega);
    println!("Simple delta:              {:.4}", call.simple_delta(asof, forward, vol));

    let solved = call.implied_vol(asof, spot, forward, premium);
    let from_coin = call.implied_vol_from_coin_price(asof, spot, forward, premium / spot);
    println!("Implied vol (USD premium): {:.6}", solved);
    println!("Implied vol (BTC premium): {:.6}", from_coin);

    // --- Shorthand names ---
    println!("\n--- Partial names ---");
    for partial in ["JUN-5000-C", "FRI-P", "2FR-6000-C", "ETH-PERP", "SEP"] {
        match Contract::from_partial_name(partial, asof) {
            Ok(c) => println!("{:<12} -> {}", partial, c),
            Err(e) => println!("{:<12} -> error: {}", partial, e),
        }
    }

    // --- Portfolio ---
    let cache = ContractCache::new();
    let names = [
        "BTC-28JUN19-5000-C",
        "BTC-28JUN19-6000-C",
        "BTC-28JUN19-5000-P",
        "BTC-27SEP19-7000-C",
        "BTC-28JUN19",
        "BTC-PERPETUAL",
    ];
    let quantities = [25.0, -40.0, 10.0, 15.0, -60_000.0, 20_000.0];
    let prices = [0.0, 0.0, 0.0, 0.0, 5450.0, 5480.0];
    let positions = cache
        .positions_from_names(&names, Some(&quantities[..]), Some(&prices[..]))
        .expect("valid portfolio");
    let book = Portfolio::from(positions);
    let market = MarketSnapshot::new(asof, spot, forward, vol);

    let mut timer = Timer::new();
    timer.start();
    let report = book.risk_report(&market, RiskMeasures::ALL);
    let elapsed = timer.elapsed_ms();

    println!("\n--- Portfolio ({} positions, {} contracts cached) ---", report.positions, cache.len());
    for pos in book.positions() {
        println!(
            "{:<22} qty {:>10.1}  pv {:>12.2}  delta {:>10.4}",
            pos.contract().name(),
            pos.quantity(),
            pos.pv(asof, spot, forward, vol),
            pos.delta(asof, spot, forward, vol)
        );
    }
    println!("PV (USD):    {:.2}", report.pv.unwrap_or(f64::NAN));
    println!("Delta (BTC): {:.4}", report.delta.unwrap_or(f64::NAN));
    println!("Gamma (BTC): {:.4}", report.gamma.unwrap_or(f64::NAN));
    println!("Vega (USD):  {:.2}", report.vega.unwrap_or(f64::NAN));
    println!("Theta (USD): {:.2}", report.theta.unwrap_or(f64::NAN));
    if let Some(buckets) = &report.bucket_delta {
        println!("Bucket delta:");
        for (bucket, delta) in buckets {
            println!("  {:<14} {:>10.4}", bucket, delta);
        }
    }
    println!("Risk run took {:.3} ms", elapsed);

    // --- Time decay ladder ---
    println!("\n--- Decay of {} ---", call);
    for day in 0..=7 {
        let t = asof + Duration::days(day);
        println!(
            "{}  days {}  premium {:.2}",
            t.format("%Y-%m-%d"),
            call.expiry_days(t),
            call.option_price(t, spot, forward, vol)
        );
    }
}
