//! Price estimates for visiting cards and flex banners.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, check_amount};
use crate::rates::{CardRates, FlexRates};
use crate::units::Dimension;

pub const GST_RATE: f64 = 0.18;

const MM_PER_FOOT: f64 = 304.8;

/// Charges added on top of the base rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Charges {
    pub design: f64,
    pub extra: f64,
    pub discount: f64,
    pub include_gst: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Estimate {
    pub base: f64,
    pub design: f64,
    pub extra: f64,
    pub discount: f64,
    pub subtotal: f64,
    pub gst: f64,
    pub total: f64,
}

impl Estimate {
    /// Applies `charges` to a base price.
    pub fn new(base: f64, charges: &Charges) -> Result<Self> {
        let base = check_amount(base)?;
        let design = check_amount(charges.design)?;
        let extra = check_amount(charges.extra)?;
        let discount = check_amount(charges.discount)?;

        let before_discount = base + design + extra;
        if discount > before_discount {
            return Err(Error::DiscountExceedsSubtotal {
                discount,
                before_discount,
            });
        }
        let subtotal = before_discount - discount;
        let gst = if charges.include_gst {
            subtotal * GST_RATE
        } else {
            0.0
        };

        let total = check_amount(subtotal + gst)?;

        Ok(Self {
            base,
            design,
            extra,
            discount,
            subtotal,
            gst,
            total,
        })
    }

    /// State and central halves of the GST.
    pub fn sgst_cgst(&self) -> (f64, f64) {
        (self.gst / 2.0, self.gst / 2.0)
    }
}

pub fn card_estimate(
    rates: &CardRates,
    finish: &str,
    quantity: u32,
    charges: &Charges,
) -> Result<Estimate> {
    let base = rates.base_rate(finish, quantity)?;
    let estimate = Estimate::new(base, charges)?;
    tracing::debug!(finish, quantity, total = estimate.total, "card estimate");
    Ok(estimate)
}

/// Banner area in square feet.
pub fn area_sq_ft(width: Dimension, height: Dimension) -> Result<f64> {
    let w = width.to_millimeters()?;
    let h = height.to_millimeters()?;
    Ok(w * h / (MM_PER_FOOT * MM_PER_FOOT))
}

pub fn flex_estimate(
    rates: &FlexRates,
    kind: &str,
    width: Dimension,
    height: Dimension,
    charges: &Charges,
) -> Result<Estimate> {
    let rate = rates.rate(kind)?;
    let area = area_sq_ft(width, height)?;
    let estimate = Estimate::new(area * rate, charges)?;
    tracing::debug!(kind, area, total = estimate.total, "flex estimate");
    Ok(estimate)
}
