use crate::error::{Error, Result};
use crate::types::SheetPlan;

/// Works out how many whole sheets cover `target_quantity` pieces.
///
/// A target of zero needs no sheets whatever the yield.
///
/// # Errors
///
/// - [`Error::Unfittable`] if `per_sheet_yield` is zero and the target is not.
/// - [`Error::QuantityOverflow`] if the total yield does not fit in a `u64`.
pub fn plan_sheets(target_quantity: u64, per_sheet_yield: u64) -> Result<SheetPlan> {
    if target_quantity == 0 {
        return Ok(SheetPlan {
            sheets_needed: 0,
            total_yield: 0,
            surplus: 0,
        });
    }
    if per_sheet_yield == 0 {
        return Err(Error::Unfittable { target_quantity });
    }

    let sheets_needed = target_quantity.div_ceil(per_sheet_yield);
    let total_yield = sheets_needed
        .checked_mul(per_sheet_yield)
        .ok_or(Error::QuantityOverflow { target_quantity })?;

    let plan = SheetPlan {
        sheets_needed,
        total_yield,
        surplus: total_yield - target_quantity,
    };
    tracing::debug!(
        target_quantity,
        per_sheet_yield,
        sheets = plan.sheets_needed,
        surplus = plan.surplus,
        "planned sheets"
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_multiple() {
        let plan = plan_sheets(250, 2).unwrap();
        assert_eq!(plan.sheets_needed, 125);
        assert_eq!(plan.total_yield, 250);
        assert_eq!(plan.surplus, 0);
    }

    #[test]
    fn test_rounds_up_with_surplus() {
        let plan = plan_sheets(251, 2).unwrap();
        assert_eq!(plan.sheets_needed, 126);
        assert_eq!(plan.total_yield, 252);
        assert_eq!(plan.surplus, 1);
    }

    #[test]
    fn test_zero_yield_is_unfittable() {
        assert!(matches!(
            plan_sheets(100, 0),
            Err(Error::Unfittable {
                target_quantity: 100
            })
        ));
    }

    #[test]
    fn test_zero_target_needs_no_sheets() {
        let empty = SheetPlan {
            sheets_needed: 0,
            total_yield: 0,
            surplus: 0,
        };
        assert_eq!(plan_sheets(0, 8).unwrap(), empty);
        assert_eq!(plan_sheets(0, 0).unwrap(), empty);
    }

    #[test]
    fn test_large_quantities_stay_exact() {
        // Float ceil would lose precision at this magnitude.
        let target = (1u64 << 53) + 1;
        let plan = plan_sheets(target, 2).unwrap();
        assert_eq!(plan.sheets_needed, (1u64 << 52) + 1);
        assert_eq!(plan.surplus, 1);
    }

    #[test]
    fn test_overflow_is_reported() {
        assert!(matches!(
            plan_sheets(u64::MAX, 2),
            Err(Error::QuantityOverflow { .. })
        ));
        let plan = plan_sheets(u64::MAX, 1).unwrap();
        assert_eq!(plan.sheets_needed, u64::MAX);
        assert_eq!(plan.surplus, 0);
    }
}
