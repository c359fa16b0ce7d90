use crate::error::{Error, Result};
use crate::types::{BestLayout, Layout, Orientation, Rect};

/// Fits a single finish size onto a sheet as a uniform grid.
///
/// Only two layouts are considered: the piece as given, and the piece with
/// width and height swapped. Every cell of the grid uses the same
/// orientation.
pub struct Solver {
    sheet: Rect,
    piece: Rect,
}

impl Solver {
    /// Both rects must already be in millimeters.
    pub fn new(sheet: Rect, piece: Rect) -> Self {
        Self { sheet, piece }
    }

    /// Picks the orientation that yields more pieces; ties go to the
    /// orientation as given.
    ///
    /// A piece that fits neither way is not an error: the result has a
    /// count of zero and the whole sheet is waste.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimension`] if any side is non-positive or non-finite.
    /// - [`Error::LayoutOverflow`] if either grid has more rows, columns or
    ///   cells than a `u64` holds.
    pub fn solve(&self) -> Result<BestLayout> {
        let sheet = Rect::checked(self.sheet.w, self.sheet.h)?;
        let piece = Rect::checked(self.piece.w, self.piece.h)?;

        let as_given = grid_layout(sheet, piece)?;
        let swapped = grid_layout(sheet, piece.rotated())?;

        let best = if as_given.count >= swapped.count {
            BestLayout {
                orientation: Orientation::AsGiven,
                sheet,
                piece,
                layout: as_given,
                runner_up_count: swapped.count,
            }
        } else {
            BestLayout {
                orientation: Orientation::Swapped,
                sheet,
                piece: piece.rotated(),
                layout: swapped,
                runner_up_count: as_given.count,
            }
        };

        tracing::debug!(
            sheet = %sheet,
            piece = %piece,
            orientation = ?best.orientation,
            count = best.layout.count,
            runner_up = best.runner_up_count,
            "computed best layout"
        );

        Ok(best)
    }
}

/// Convenience form of [`Solver::solve`] taking raw millimeter values.
pub fn compute_best_layout(
    sheet_width_mm: f64,
    sheet_height_mm: f64,
    piece_width_mm: f64,
    piece_height_mm: f64,
) -> Result<BestLayout> {
    Solver::new(
        Rect::new(sheet_width_mm, sheet_height_mm),
        Rect::new(piece_width_mm, piece_height_mm),
    )
    .solve()
}

/// Lays `placed` out on `sheet` without rotating it.
fn grid_layout(sheet: Rect, placed: Rect) -> Result<Layout> {
    let overflow = || Error::LayoutOverflow {
        sheet,
        piece: placed,
    };

    // Whole pieces only: floor before anything is multiplied.
    let columns = whole_fits(sheet.w, placed.w).ok_or_else(overflow)?;
    let rows = whole_fits(sheet.h, placed.h).ok_or_else(overflow)?;
    let count = rows.checked_mul(columns).ok_or_else(overflow)?;

    let used_width = columns as f64 * placed.w;
    let used_height = rows as f64 * placed.h;
    let used_area = used_width * used_height;

    Ok(Layout {
        rows,
        columns,
        count,
        used_width,
        used_height,
        waste_width: sheet.w - used_width,
        waste_height: sheet.h - used_height,
        used_area,
        waste_area: sheet.area() - used_area,
    })
}

/// Number of whole `piece` lengths in `span`, if it fits in a `u64`.
fn whole_fits(span: f64, piece: f64) -> Option<u64> {
    let n = (span / piece).floor();
    // u64::MAX as f64 rounds up to 2^64, which is already out of range.
    (n < u64::MAX as f64).then_some(n as u64)
}
