use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::units::check_dimension;

/// Width and height in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// Builds a rect after checking both sides are positive and finite.
    pub fn checked(w: f64, h: f64) -> Result<Self> {
        Ok(Self {
            w: check_dimension(w)?,
            h: check_dimension(h)?,
        })
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    pub fn rotated(&self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    AsGiven,
    Swapped,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::AsGiven => f.write_str("Original Orientation"),
            Orientation::Swapped => f.write_str("Rotated Orientation"),
        }
    }
}

/// A uniform grid of pieces on one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Layout {
    pub rows: u64,
    pub columns: u64,
    pub count: u64,
    pub used_width: f64,
    pub used_height: f64,
    pub waste_width: f64,
    pub waste_height: f64,
    pub used_area: f64,
    pub waste_area: f64,
}

impl Layout {
    pub fn sheet_area(&self) -> f64 {
        self.used_area + self.waste_area
    }

    /// Waste as a percentage of the full sheet area.
    pub fn waste_percent(&self) -> f64 {
        let sheet_area = self.sheet_area();
        if sheet_area == 0.0 {
            return 0.0;
        }
        self.waste_area / sheet_area * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestLayout {
    pub orientation: Orientation,
    pub sheet: Rect,
    /// The finish piece as placed on the sheet.
    pub piece: Rect,
    pub layout: Layout,
    /// Count of the orientation that lost.
    pub runner_up_count: u64,
}

impl BestLayout {
    pub fn count(&self) -> u64 {
        self.layout.count
    }

    pub fn is_empty(&self) -> bool {
        self.layout.count == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetPlan {
    pub sheets_needed: u64,
    pub total_yield: u64,
    pub surplus: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_rotation() {
        let r = Rect::new(210.0, 297.0);
        assert_eq!(r.rotated(), Rect::new(297.0, 210.0));
        assert_eq!(r.rotated().rotated(), r);
        assert_eq!(r.area(), 62370.0);
    }

    #[test]
    fn test_rect_checked() {
        assert!(Rect::checked(10.0, 20.0).is_ok());
        assert!(Rect::checked(0.0, 20.0).is_err());
        assert!(Rect::checked(10.0, f64::NAN).is_err());
    }

    #[test]
    fn test_waste_percent_uses_full_sheet() {
        let layout = Layout {
            rows: 1,
            columns: 1,
            count: 1,
            used_width: 50.0,
            used_height: 100.0,
            waste_width: 50.0,
            waste_height: 0.0,
            used_area: 5000.0,
            waste_area: 5000.0,
        };
        assert!((layout.waste_percent() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_orientation_json() {
        assert_eq!(
            serde_json::to_string(&Orientation::AsGiven).unwrap(),
            "\"as_given\""
        );
    }
}
