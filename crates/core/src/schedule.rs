use core::fmt;

use serde::{Deserialize, Serialize};

use crate::input;

// ─────────────────────────────────────────────────────────────────────────
// Reinforcement schedules: a contingency type plus its numeric parameter.
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleKind {
    #[serde(rename = "FR")]
    FixedRatio,
    #[serde(rename = "VR")]
    VariableRatio,
    #[serde(rename = "FI")]
    FixedInterval,
    #[serde(rename = "VI")]
    VariableInterval,
}

impl ScheduleKind {
    pub fn label(self) -> &'static str {
        match self {
            ScheduleKind::FixedRatio => "FR",
            ScheduleKind::VariableRatio => "VR",
            ScheduleKind::FixedInterval => "FI",
            ScheduleKind::VariableInterval => "VI",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ScheduleKind::FixedRatio => "Fixed Ratio",
            ScheduleKind::VariableRatio => "Variable Ratio",
            ScheduleKind::FixedInterval => "Fixed Interval",
            ScheduleKind::VariableInterval => "Variable Interval",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|k| k.label().eq_ignore_ascii_case(label.trim()))
    }

    pub fn all() -> &'static [ScheduleKind] {
        &[
            ScheduleKind::FixedRatio,
            ScheduleKind::VariableRatio,
            ScheduleKind::FixedInterval,
            ScheduleKind::VariableInterval,
        ]
    }
}

impl fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A schedule value object. `value` is always at least 1, including when
/// decoded from a hand-edited file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawSchedule")]
pub struct Schedule {
    #[serde(rename = "type")]
    pub kind: ScheduleKind,
    pub value: u32,
}

#[derive(Deserialize)]
struct RawSchedule {
    #[serde(rename = "type")]
    kind: ScheduleKind,
    value: u32,
}

impl From<RawSchedule> for Schedule {
    fn from(raw: RawSchedule) -> Self {
        Schedule::new(raw.kind, raw.value)
    }
}

impl Schedule {
    pub const fn new(kind: ScheduleKind, value: u32) -> Self {
        let value = if value == 0 { 1 } else { value };
        Self { kind, value }
    }

    pub const fn fixed_ratio(value: u32) -> Self {
        Self::new(ScheduleKind::FixedRatio, value)
    }

    pub const fn variable_interval(value: u32) -> Self {
        Self::new(ScheduleKind::VariableInterval, value)
    }

    /// Same value under a different contingency type.
    pub fn with_kind(self, kind: ScheduleKind) -> Self {
        Self { kind, ..self }
    }

    /// Parse `raw` as the schedule parameter; non-numeric or < 1 becomes 1.
    pub fn with_value(self, raw: &str) -> Self {
        Self {
            value: input::count_or_one(raw),
            ..self
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.label(), self.value)
    }
}
