// demos/error_handling_demo.rs
use chrono::{TimeZone, Utc};
use coin_greeks::analytics::{solve_implied_vol, ImpliedVolConfig};
use coin_greeks::error::PricingError;
use coin_greeks::instruments::{CallOrPut, Contract, ContractCache};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("Error Handling Demo for coin-greeks");
    println!("===================================\n");

    let asof = Utc.with_ymd_and_hms(2019, 6, 21, 8, 0, 0).unwrap();

    // Test 1: Malformed names
    println!("1. Testing malformed contract names...");
    for name in ["BTC-28JUN19-5000", "XRP-28JUN19", "BTC-31FEB19", "BTC-PERPETUAL-5000-C"] {
        match name.parse::<Contract>() {
            Ok(c) => println!("   Unexpected: parsed {}", c),
            Err(e) => println!("   ✓ Caught error: {}", e),
        }
    }

    // Test 2: Shorthand with an unknown token
    println!("\n2. Testing unknown shorthand token...");
    match Contract::from_partial_name("JUN-5000-X", asof) {
        Ok(c) => println!("   Unexpected: parsed {}", c),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 3: Option maths on a linear contract
    println!("\n3. Testing option pricing on a future...");
    let fut: Contract = "BTC-28JUN19".parse().expect("valid future");
    match fut.try_option_price(asof, 5500.0, 5520.0, 0.8) {
        Ok(p) => println!("   Unexpected: priced at {}", p),
        Err(e @ PricingError::NotAnOption { .. }) => println!("   ✓ Caught error: {}", e),
        Err(e) => println!("   Unexpected error: {}", e),
    }
    println!("   NaN form: {}", fut.option_price(asof, 5500.0, 5520.0, 0.8));

    // Test 4: Implied vol on expiry day
    println!("\n4. Testing implied vol with zero days left...");
    let call: Contract = "BTC-21JUN19-5000-C".parse().expect("valid option");
    match call.try_implied_vol(asof, 5500.0, 5500.0, 520.0) {
        Ok(v) => println!("   Unexpected: vol {}", v),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 5: Solver budget too small
    println!("\n5. Testing non-convergence with a tight iteration budget...");
    let tight = ImpliedVolConfig {
        max_iterations: 2,
        ..Default::default()
    };
    match solve_implied_vol(30, 9000.0, 9000.0, 9000.0, 250.0, CallOrPut::Call, &tight) {
        Ok(v) => println!("   Unexpected: vol {}", v),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 6: Invalid solver configuration
    println!("\n6. Testing invalid solver configuration...");
    let bad = ImpliedVolConfig {
        initial_vol: 7.0,
        ..Default::default()
    };
    match bad.validate() {
        Ok(()) => println!("   Unexpected: configuration accepted"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 7: Mismatched portfolio inputs
    println!("\n7. Testing mismatched quantities and prices...");
    let cache = ContractCache::new();
    match cache.positions_from_names(
        &["BTC-28JUN19", "BTC-PERPETUAL"],
        Some(&[1.0][..]),
        Some(&[5400.0, 5450.0][..]),
    ) {
        Ok(p) => println!("   Unexpected: built {} positions", p.len()),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    println!("\nAll error cases handled without panicking.");
}
