use thiserror::Error;

/// Errors produced when validating a value for storage.
#[derive(Debug, Error, PartialEq)]
pub enum ValueError {
    /// Floating-point values must be finite to survive a JSON round trip.
    #[error("non-finite number {0} is not representable")]
    NonFiniteNumber(f64),
}
