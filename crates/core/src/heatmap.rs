//! Dense visit-frequency grid from the sparse `visit_counts` map.

use crate::results::VisitCounts;

/// Display shade floor and span: `shade = SHADE_FLOOR + SHADE_SPAN * intensity`.
pub const SHADE_FLOOR: f64 = 0.1;
pub const SHADE_SPAN: f64 = 0.85;

/// Decode a rendered coordinate such as `"(2, 3)"` or `"(2,3)"`.
///
/// The first `(` followed by digits, a comma, optional whitespace, digits and
/// `)` wins; anything else in the key is ignored.
pub fn parse_cell_key(key: &str) -> Option<(usize, usize)> {
    key.match_indices('(')
        .find_map(|(at, _)| parse_pair(&key[at + 1..]))
}

fn parse_pair(s: &str) -> Option<(usize, usize)> {
    let (row, rest) = take_digits(s)?;
    let rest = rest.strip_prefix(',')?.trim_start();
    let (col, rest) = take_digits(rest)?;
    rest.starts_with(')').then_some((row, col))
}

fn take_digits(s: &str) -> Option<(usize, &str)> {
    let end = s.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    let v = s[..end].parse::<usize>().ok()?;
    Some((v, &s[end..]))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitHeatmap {
    rows: usize,
    cols: usize,
    cells: Vec<u64>,
    max_count: u64,
}

impl VisitHeatmap {
    /// `None` when the run reported no visit counts (two-choice runs).
    /// Keys that do not decode or fall outside `rows × cols` are dropped.
    /// Keys that decode to the same cell are summed.
    pub fn build(visits: Option<&VisitCounts>, rows: usize, cols: usize) -> Option<Self> {
        let visits = visits?;
        let mut cells = vec![0_u64; rows * cols];

        for (key, &count) in visits {
            let Some((r, c)) = parse_cell_key(key) else {
                continue;
            };
            if r >= rows || c >= cols {
                continue;
            }
            let cell = &mut cells[r * cols + c];
            *cell = cell.saturating_add(count);
        }
        let max_count = cells.iter().copied().max().unwrap_or(0).max(1);

        Some(Self {
            rows,
            cols,
            cells,
            max_count,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Largest in-bounds count, never below 1.
    pub fn max_count(&self) -> u64 {
        self.max_count
    }

    pub fn count(&self, row: usize, col: usize) -> Option<u64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.cells[row * self.cols + col])
    }

    /// `count / max_count`, in `[0, 1]`.
    pub fn intensity(&self, row: usize, col: usize) -> Option<f64> {
        self.count(row, col)
            .map(|c| c as f64 / self.max_count as f64)
    }

    pub fn shade(&self, row: usize, col: usize) -> Option<f64> {
        self.intensity(row, col)
            .map(|i| SHADE_FLOOR + SHADE_SPAN * i)
    }

    pub fn row(&self, row: usize) -> Option<&[u64]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.cells[start..start + self.cols])
    }

    pub fn to_matrix(&self) -> Vec<Vec<u64>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.cells.chunks(self.cols).map(<[u64]>::to_vec).collect()
    }
}
