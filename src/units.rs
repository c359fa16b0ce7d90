//! Unit normalization. All geometry is compared in millimeters.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const MM_PER_INCH: f64 = 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "mm", alias = "millimeter", alias = "millimeters")]
    Millimeter,
    #[serde(rename = "in", alias = "inch", alias = "inches")]
    Inch,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Millimeter => "mm",
            Unit::Inch => "in",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::str::FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" => Ok(Unit::Millimeter),
            "in" | "inch" | "inches" => Ok(Unit::Inch),
            other => Err(Error::UnknownUnit(other.to_string())),
        }
    }
}

/// Rejects non-positive, NaN and infinite values.
pub fn check_dimension(value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidDimension { value })
    }
}

/// Converts a length to millimeters.
///
/// # Errors
///
/// Returns [`Error::InvalidDimension`] if `value` is not positive and finite.
pub fn to_millimeters(value: f64, unit: Unit) -> Result<f64> {
    let value = check_dimension(value)?;
    Ok(match unit {
        Unit::Millimeter => value,
        Unit::Inch => value * MM_PER_INCH,
    })
}

/// A length tagged with the unit it was entered in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub value: f64,
    #[serde(default)]
    pub unit: Unit,
}

impl Dimension {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub fn mm(value: f64) -> Self {
        Self::new(value, Unit::Millimeter)
    }

    pub fn inches(value: f64) -> Self {
        Self::new(value, Unit::Inch)
    }

    pub fn to_millimeters(&self) -> Result<f64> {
        to_millimeters(self.value, self.unit)
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}
