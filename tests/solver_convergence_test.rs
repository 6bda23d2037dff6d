// tests/solver_convergence_test.rs
use coin_greeks::analytics::implied_vol::floor_premium;
use coin_greeks::analytics::{
    forward_option_price, implied_vol, option_vega, solve_implied_vol, ImpliedVolConfig,
};
use coin_greeks::error::PricingError;
use coin_greeks::instruments::CallOrPut;

const SPOT: f64 = 9900.0;
const FORWARD: f64 = 10000.0;

fn spot_premium(days: i64, strike: f64, vol: f64, call_put: CallOrPut) -> f64 {
    SPOT / FORWARD * forward_option_price(days, strike, FORWARD, vol, call_put)
}

#[test]
fn test_round_trip_grid() {
    let vols = [0.1, 0.2, 0.4, 0.6, 0.8, 1.0, 1.5, 2.0];
    let moneyness = [0.8, 0.9, 1.0, 1.1, 1.25];
    let expiries = [1, 7, 30, 90, 365];

    let mut checked = 0;
    let mut worst: f64 = 0.0;
    for &days in &expiries {
        for &m in &moneyness {
            for &vol in &vols {
                for call_put in [CallOrPut::Call, CallOrPut::Put] {
                    let strike = FORWARD * m;
                    let premium = spot_premium(days, strike, vol, call_put);

                    // deep wings carry no recoverable vol information
                    let floor = floor_premium(days, strike, SPOT, FORWARD, call_put);
                    let vega = option_vega(days, strike, SPOT, FORWARD, vol);
                    if premium <= floor || vega < 1e-4 * FORWARD {
                        continue;
                    }

                    let solved = implied_vol(days, strike, SPOT, FORWARD, premium, call_put);
                    let err = (solved - vol).abs();
                    assert!(
                        err < 1e-4,
                        "days {} K/F {} vol {} {:?}: solved {}",
                        days,
                        m,
                        vol,
                        call_put,
                        solved
                    );
                    worst = worst.max(err);
                    checked += 1;
                }
            }
        }
    }

    println!("\nRound trips checked: {}", checked);
    println!("Worst absolute vol error: {:e}", worst);
    assert!(checked > 200, "grid filter removed too many cases: {}", checked);
}

#[test]
fn test_premium_at_floor_is_zero_vol() {
    for call_put in [CallOrPut::Call, CallOrPut::Put] {
        for &strike in &[8000.0, 10000.0, 12000.0] {
            let floor = floor_premium(30, strike, SPOT, FORWARD, call_put);
            assert_eq!(implied_vol(30, strike, SPOT, FORWARD, floor, call_put), 0.0);
            assert_eq!(implied_vol(30, strike, SPOT, FORWARD, floor - 1.0, call_put), 0.0);
        }
    }
}

#[test]
fn test_unreachable_premium_is_nan() {
    // a call can never be worth more than the forward in spot value
    for &days in &[1, 30, 365] {
        let vol = implied_vol(days, 1.0, 5500.0, 5500.0, 6000.0, CallOrPut::Call);
        assert!(vol.is_nan(), "days {}: {}", days, vol);
    }
}

#[test]
fn test_results_stay_in_bounds() {
    let premiums = [1.0, 50.0, 400.0, 2000.0, 5000.0, 9800.0];
    for &days in &[1, 30, 365] {
        for &premium in &premiums {
            for call_put in [CallOrPut::Call, CallOrPut::Put] {
                let vol = implied_vol(days, 10000.0, SPOT, FORWARD, premium, call_put);
                assert!(vol.is_nan() || (0.0..=5.0).contains(&vol), "vol {}", vol);
            }
        }
    }
}

#[test]
fn test_zero_expiry_is_typed_error() {
    let err = solve_implied_vol(
        0,
        10000.0,
        SPOT,
        FORWARD,
        500.0,
        CallOrPut::Call,
        &ImpliedVolConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, PricingError::ZeroExpiry));
    assert!(implied_vol(0, 10000.0, SPOT, FORWARD, 500.0, CallOrPut::Call).is_nan());
}

#[test]
fn test_tight_budget_reports_non_convergence() {
    let cfg = ImpliedVolConfig {
        max_iterations: 1,
        ..Default::default()
    };
    let premium = spot_premium(30, 10000.0, 0.3, CallOrPut::Call);
    let err = solve_implied_vol(30, 10000.0, SPOT, FORWARD, premium, CallOrPut::Call, &cfg).unwrap_err();
    match err {
        PricingError::NonConvergence { iterations, last_vol } => {
            assert_eq!(iterations, 1);
            assert!((0.0..=5.0).contains(&last_vol));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_iteration_count_is_modest() {
    let cfg = ImpliedVolConfig {
        max_iterations: 50,
        ..Default::default()
    };
    let premium = spot_premium(90, 11000.0, 0.7, CallOrPut::Put);
    let vol = solve_implied_vol(90, 11000.0, SPOT, FORWARD, premium, CallOrPut::Put, &cfg).unwrap();
    assert!((vol - 0.7).abs() < 1e-4);
}
