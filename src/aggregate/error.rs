use thiserror::Error;

/// Inconsistent ratio selectors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectorError {
    /// Numerator given without a denominator
    #[error("A numerator 1/K0 needs a denominator 1/K0")]
    MissingDenominator,

    /// Denominator given without a numerator
    #[error("A denominator 1/K0 needs a numerator 1/K0")]
    MissingNumerator,

    /// Internal standard given without a ratio pair
    #[error("An internal standard m/z needs numerator and denominator 1/K0 values")]
    InternalStandardWithoutRatio,

    /// NaN or infinite selector
    #[error("Selector value must be finite, got {0}")]
    NonFinite(f64),
}
