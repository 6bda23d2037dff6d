// src/error.rs
use thiserror::Error;

/// Error types for the coin-greeks library
///
/// The numeric surface (`option_price`, `implied_vol`, the Greeks) reports
/// failure as `NaN`; these variants are what the typed `try_*` entry points
/// and the non-numeric operations (parsing, configuration) return.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// An option-only operation was applied to a linear contract
    #[error("Contract '{contract}' is not an option")]
    NotAnOption { contract: String },

    /// No time value left to invert
    #[error("Zero days to expiry: implied volatility is undefined")]
    ZeroExpiry,

    /// Implied volatility solver ran out of iterations
    #[error("Implied volatility did not converge after {iterations} iterations (last guess {last_vol:.6})")]
    NonConvergence { iterations: usize, last_vol: f64 },

    /// Invalid parameter values
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// Instrument identifier could not be understood
    #[error("Cannot parse contract '{input}': {reason}")]
    ContractParse { input: String, reason: String },
}

impl PricingError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        PricingError::ContractParse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for coin-greeks operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Validation utilities
pub mod validation {
    use super::{PricingError, PricingResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> PricingResult<()> {
        if value <= 0.0 || value.is_nan() {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> PricingResult<()> {
        if value < 0.0 || value.is_nan() {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is within a range
    pub fn validate_range(name: &str, value: f64, min: f64, max: f64) -> PricingResult<()> {
        if !(min..=max).contains(&value) {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: format!("must be in range [{}, {}]", min, max),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> PricingResult<()> {
        if !value.is_finite() {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate an iteration budget
    pub fn validate_iterations(iterations: usize) -> PricingResult<()> {
        if iterations == 0 {
            Err(PricingError::InvalidConfiguration {
                field: "max_iterations".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if iterations > 1_000_000 {
            Err(PricingError::InvalidConfiguration {
                field: "max_iterations".to_string(),
                reason: "exceeds maximum allowed (1 million)".to_string(),
            })
        } else {
            Ok(())
        }
    }
}
