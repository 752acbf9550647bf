//! Domain error taxonomy for the pricing engine.
//!
//! Every engine operation is a synchronous pure computation, so errors
//! are returned directly to the caller and never retried internally.

use thiserror::Error;

/// Errors raised by LMSR pricing, search and WAD conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LmsrError {
    /// A caller-supplied value violates its contract (`b <= 0`,
    /// negative share delta, non-finite quantity).
    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// An intermediate or final value left the finite f64 range.
    #[error("numeric overflow while computing {context}")]
    NumericOverflow { context: &'static str },

    /// Bracket expansion reached its ceiling without covering `spend`.
    #[error("bracket expansion reached ceiling {ceiling} without covering spend {spend}")]
    NonConvergence { spend: f64, ceiling: f64 },
}

impl LmsrError {
    pub(crate) const fn invalid(name: &'static str, value: f64) -> Self {
        Self::InvalidParameter { name, value }
    }

    pub(crate) const fn overflow(context: &'static str) -> Self {
        Self::NumericOverflow { context }
    }
}

/// Result alias used throughout the domain layer.
pub type LmsrResult<T> = Result<T, LmsrError>;
