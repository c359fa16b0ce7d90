//! Calculators for a print shop.
//!
//! The centre of the crate is the sheet-to-finish optimizer: given a stock
//! sheet and a finish size, [`compute_best_layout`] finds how many finish
//! pieces fit on the sheet as a uniform grid, trying the piece as given and
//! rotated, and [`plan_sheets`] turns that per-sheet yield into a sheet count
//! for a print run.
//!
//! ```
//! use print_toolkit::{Orientation, compute_best_layout, plan_sheets};
//!
//! // A4 on a 330x483 mm sheet
//! let best = compute_best_layout(330.0, 483.0, 210.0, 297.0)?;
//! assert_eq!(best.orientation, Orientation::Swapped);
//! assert_eq!(best.count(), 2);
//!
//! let plan = plan_sheets(251, best.count())?;
//! assert_eq!(plan.sheets_needed, 126);
//! # Ok::<(), print_toolkit::Error>(())
//! ```
//!
//! Around it sit the shop's pricing helpers ([`estimate`]), the rate file
//! they read from ([`rates`]) and an HTTP front end ([`api`]).

pub mod api;
pub mod error;
pub mod estimate;
pub mod job;
pub mod planner;
pub mod rates;
pub mod render;
pub mod solver;
pub mod types;
pub mod units;

pub use error::{Error, Result};
pub use job::{JobReport, JobRequest, SizeInput, run_job};
pub use planner::plan_sheets;
pub use solver::{Solver, compute_best_layout};
pub use types::{BestLayout, Layout, Orientation, Rect, SheetPlan};
pub use units::{Dimension, MM_PER_INCH, Unit, to_millimeters};
