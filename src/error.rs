//! Error types for the print toolkit.

use thiserror::Error;

use crate::types::Rect;

/// Errors produced by the toolkit.
///
/// A piece that is larger than the sheet is *not* an error: the optimizer
/// reports a zero-count layout instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Non-positive, NaN or infinite geometric input.
    #[error("invalid dimension {value}: must be a positive, finite number")]
    InvalidDimension { value: f64 },

    /// A zero-yield sheet cannot satisfy a positive target quantity.
    #[error("cannot plan {target_quantity} pieces: per-sheet yield is zero")]
    Unfittable { target_quantity: u64 },

    #[error("sheet plan for {target_quantity} pieces overflows")]
    QuantityOverflow { target_quantity: u64 },

    /// More grid cells than a `u64` can count.
    #[error("a {piece} piece on a {sheet} sheet gives more cells than can be counted")]
    LayoutOverflow { sheet: Rect, piece: Rect },

    #[error("unknown unit '{0}', expected mm or in")]
    UnknownUnit(String),

    #[error("unknown finish '{finish}', expected one of: {known}")]
    UnknownFinish { finish: String, known: String },

    #[error("no rate for {quantity} cards with finish '{finish}'")]
    UnknownQuantity { finish: String, quantity: u32 },

    #[error("unknown flex type '{kind}', expected one of: {known}")]
    UnknownFlexType { kind: String, known: String },

    #[error("invalid amount {0}: must be a finite, non-negative number")]
    InvalidAmount(f64),

    #[error("discount {discount:.2} exceeds subtotal {before_discount:.2}")]
    DiscountExceedsSubtotal { discount: f64, before_discount: f64 },

    #[error("rate file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("rate file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for toolkit operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for errors caused by caller input rather than storage.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Error::Io(_) | Error::Json(_))
    }
}

/// Checks that an amount of money is usable in an estimate.
pub(crate) fn check_amount(value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidAmount(value))
    }
}
