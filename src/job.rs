//! The sheet size optimizer as a single request/response call.
//!
//! Sheet and finish sizes may be entered in different units; each is
//! normalized to millimeters on its own before the two are compared.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::planner::plan_sheets;
use crate::solver::Solver;
use crate::types::{BestLayout, Rect, SheetPlan};
use crate::units::{Unit, to_millimeters};

/// A width and height as entered, with their unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeInput {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub unit: Unit,
}

impl SizeInput {
    pub fn new(width: f64, height: f64, unit: Unit) -> Self {
        Self {
            width,
            height,
            unit,
        }
    }

    pub fn to_millimeters(&self) -> Result<Rect> {
        Ok(Rect::new(
            to_millimeters(self.width, self.unit)?,
            to_millimeters(self.height, self.unit)?,
        ))
    }
}

impl std::fmt::Display for SizeInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}{}", self.width, self.height, self.unit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequest {
    pub sheet: SizeInput,
    pub finish: SizeInput,
    /// Pieces to produce; when set, the report includes a sheet plan.
    #[serde(default)]
    pub quantity: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub best: BestLayout,
    pub waste_percent: f64,
    pub plan: Option<SheetPlan>,
}

/// Runs one optimization request.
///
/// A finish size that does not fit the sheet yields a zero-count layout.
/// Asking for a positive quantity of such a piece fails with
/// [`Error::Unfittable`](crate::Error::Unfittable).
pub fn run_job(request: &JobRequest) -> Result<JobReport> {
    let sheet = request.sheet.to_millimeters()?;
    let finish = request.finish.to_millimeters()?;

    let best = Solver::new(sheet, finish).solve()?;
    let plan = request
        .quantity
        .map(|qty| plan_sheets(qty, best.count()))
        .transpose()?;

    Ok(JobReport {
        waste_percent: best.layout.waste_percent(),
        best,
        plan,
    })
}
