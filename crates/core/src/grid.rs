//! Grid-chamber layout: dimensions, start cell and levers.
//!
//! Two shapes arrive on input. Older saved experiments carry a single
//! `lever_row`/`lever_col` pair; everything written since carries a lever
//! list. [`GridConfig::normalized`] folds both into a [`LeverGrid`].

use serde::{Deserialize, Serialize};

use crate::input;
use crate::schedule::Schedule;

pub const MIN_GRID_SIDE: u32 = 2;
pub const MAX_GRID_SIDE: u32 = 20;

pub const MIN_LEVERS: usize = 1;
pub const MAX_LEVERS: usize = 8;

fn default_magnitude() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lever {
    pub row: u32,
    pub col: u32,
    pub schedule: Schedule,
    #[serde(default = "default_magnitude")]
    pub magnitude: f64,
}

impl Default for Lever {
    fn default() -> Self {
        Self {
            row: 0,
            col: 0,
            schedule: Schedule::fixed_ratio(5),
            magnitude: 1.0,
        }
    }
}

impl Lever {
    pub fn with_row(self, raw: &str) -> Self {
        Self {
            row: input::non_negative_or(raw, 0),
            ..self
        }
    }

    pub fn with_col(self, raw: &str) -> Self {
        Self {
            col: input::non_negative_or(raw, 0),
            ..self
        }
    }

    pub fn with_schedule(self, schedule: Schedule) -> Self {
        Self { schedule, ..self }
    }

    /// Negative or unparsable magnitudes become 0.
    pub fn with_magnitude(self, raw: &str) -> Self {
        Self {
            magnitude: input::float_or(raw, 0.0).max(0.0),
            ..self
        }
    }
}

/// Per-lever schedule sent with each grid condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeverSchedule {
    pub schedule: Schedule,
    pub magnitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeverGrid {
    pub rows: u32,
    pub cols: u32,
    #[serde(default)]
    pub start_row: u32,
    #[serde(default)]
    pub start_col: u32,
    pub levers: Vec<Lever>,
}

impl Default for LeverGrid {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 5,
            start_row: 0,
            start_col: 0,
            levers: vec![Lever {
                row: 2,
                col: 2,
                schedule: Schedule::fixed_ratio(5),
                magnitude: 1.0,
            }],
        }
    }
}

impl LeverGrid {
    pub fn with_rows(self, raw: &str) -> Self {
        Self {
            rows: input::clamped_or(raw, MIN_GRID_SIDE, MIN_GRID_SIDE, MAX_GRID_SIDE),
            ..self
        }
    }

    pub fn with_cols(self, raw: &str) -> Self {
        Self {
            cols: input::clamped_or(raw, MIN_GRID_SIDE, MIN_GRID_SIDE, MAX_GRID_SIDE),
            ..self
        }
    }

    pub fn with_start_row(self, raw: &str) -> Self {
        Self {
            start_row: input::non_negative_or(raw, 0),
            ..self
        }
    }

    pub fn with_start_col(self, raw: &str) -> Self {
        Self {
            start_col: input::non_negative_or(raw, 0),
            ..self
        }
    }

    pub fn can_add_lever(&self) -> bool {
        self.levers.len() < MAX_LEVERS
    }

    pub fn can_remove_lever(&self) -> bool {
        self.levers.len() > MIN_LEVERS
    }

    /// Append a lever at (0,0) on FR 5. No-op at eight levers.
    pub fn add_lever(mut self) -> Self {
        if self.can_add_lever() {
            self.levers.push(Lever::default());
        }
        self
    }

    /// Remove the lever currently at `index`. No-op at one lever.
    pub fn remove_lever(mut self, index: usize) -> Self {
        if self.can_remove_lever() && index < self.levers.len() {
            self.levers.remove(index);
        }
        self
    }

    pub fn replace_lever(mut self, index: usize, lever: Lever) -> Self {
        if let Some(slot) = self.levers.get_mut(index) {
            *slot = lever;
        }
        self
    }

    /// Clamp dimensions into `[2, 20]` and truncate the lever list to eight.
    /// An empty lever list gets the default lever back.
    pub fn normalized(mut self) -> Self {
        self.rows = self.rows.clamp(MIN_GRID_SIDE, MAX_GRID_SIDE);
        self.cols = self.cols.clamp(MIN_GRID_SIDE, MAX_GRID_SIDE);
        self.levers.truncate(MAX_LEVERS);
        if self.levers.is_empty() {
            self.levers.push(Lever::default());
        }
        self
    }

    /// Exactly one entry per lever. Entry `i` comes from `stored[i]` when
    /// present, otherwise from lever `i`'s own schedule and magnitude; extra
    /// stored entries are dropped.
    pub fn condition_lever_schedules(&self, stored: &[LeverSchedule]) -> Vec<LeverSchedule> {
        self.levers
            .iter()
            .enumerate()
            .map(|(i, l)| {
                stored.get(i).copied().unwrap_or(LeverSchedule {
                    schedule: l.schedule,
                    magnitude: l.magnitude,
                })
            })
            .collect()
    }
}

/// Single-lever layout from older saved experiments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyGrid {
    pub rows: u32,
    pub cols: u32,
    pub lever_row: u32,
    pub lever_col: u32,
    #[serde(default)]
    pub start_row: u32,
    #[serde(default)]
    pub start_col: u32,
}

impl LegacyGrid {
    pub fn migrate(self, schedule: Schedule) -> LeverGrid {
        LeverGrid {
            rows: self.rows,
            cols: self.cols,
            start_row: self.start_row,
            start_col: self.start_col,
            levers: vec![Lever {
                row: self.lever_row,
                col: self.lever_col,
                schedule,
                magnitude: 1.0,
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GridConfig {
    MultiLever(LeverGrid),
    LegacySingleLever(LegacyGrid),
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig::MultiLever(LeverGrid::default())
    }
}

impl From<LeverGrid> for GridConfig {
    fn from(grid: LeverGrid) -> Self {
        GridConfig::MultiLever(grid)
    }
}

impl GridConfig {
    /// Multi-lever form, clamped. `schedule` is used only when migrating a
    /// legacy layout.
    pub fn normalized(&self, schedule: Schedule) -> LeverGrid {
        match self {
            GridConfig::MultiLever(grid) => grid.clone().normalized(),
            GridConfig::LegacySingleLever(legacy) => legacy.migrate(schedule).normalized(),
        }
    }

    pub fn rows(&self) -> u32 {
        match self {
            GridConfig::MultiLever(g) => g.rows,
            GridConfig::LegacySingleLever(g) => g.rows,
        }
    }

    pub fn cols(&self) -> u32 {
        match self {
            GridConfig::MultiLever(g) => g.cols,
            GridConfig::LegacySingleLever(g) => g.cols,
        }
    }
}
