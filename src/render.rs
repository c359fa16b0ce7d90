use crate::types::BestLayout;

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

/// Draws the chosen grid on its sheet as ASCII art.
pub fn render_layout(best: &BestLayout) -> String {
    let sheet = best.sheet;
    let piece = best.piece;
    let scale = f64::min(MAX_WIDTH / sheet.w, MAX_HEIGHT / sheet.h);
    // A very long, thin sheet still gets a border one cell deep.
    let grid_w = ((sheet.w * scale).round() as usize).max(1);
    let grid_h = ((sheet.h * scale).round() as usize).max(1);

    let mut grid = vec![vec![' '; grid_w + 1]; grid_h + 1];

    // Sheet border first
    draw_rect(&mut grid, 0, 0, grid_w, grid_h);

    let sw = (piece.w * scale).round() as usize;
    let sh = (piece.h * scale).round() as usize;
    if sw == 0 || sh == 0 {
        return to_text(&grid);
    }

    let label: Vec<char> = format!("{}x{}", piece.w, piece.h).chars().collect();

    for row in 0..best.layout.rows {
        for col in 0..best.layout.columns {
            let sx = (col as f64 * piece.w * scale).round() as usize;
            let sy = (row as f64 * piece.h * scale).round() as usize;

            draw_rect(&mut grid, sx, sy, sw, sh);

            if sw > 2 {
                let cx = sx + sw / 2;
                let cy = sy + sh / 2;
                let start_x = cx.saturating_sub(label.len() / 2);

                for (i, &ch) in label.iter().enumerate() {
                    let x = start_x + i;
                    if x > sx && x < sx + sw && cy > sy && cy < sy + sh {
                        grid[cy][x] = ch;
                    }
                }
            }
        }
    }

    to_text(&grid)
}

fn to_text(grid: &[Vec<char>]) -> String {
    let mut result = String::new();
    for row in grid {
        let line: String = row.iter().collect();
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}

#[allow(clippy::needless_range_loop)]
fn draw_rect(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    let rows = grid.len();
    let cols = if rows > 0 { grid[0].len() } else { return };

    // Horizontal edges
    for i in x..=x + w {
        if i >= cols {
            continue;
        }
        for j in [y, y + h] {
            if j < rows {
                grid[j][i] = if grid[j][i] == '|' || grid[j][i] == '+' {
                    '+'
                } else {
                    '-'
                };
            }
        }
    }

    // Vertical edges
    for j in y..=y + h {
        if j >= rows {
            continue;
        }
        for i in [x, x + w] {
            if i < cols {
                grid[j][i] = if grid[j][i] == '-' || grid[j][i] == '+' {
                    '+'
                } else {
                    '|'
                };
            }
        }
    }

    // Corners
    for &cx in &[x, x + w] {
        for &cy in &[y, y + h] {
            if cy < rows && cx < cols {
                grid[cy][cx] = '+';
            }
        }
    }
}
