//! Experimental conditions and the ordered sequence that owns them.
//!
//! Conditions are addressed by position. Removing index `i` removes whatever
//! currently sits at `i`; labels are assigned once at creation and never
//! renumbered afterwards.

use serde::{Deserialize, Deserializer, Serialize};

use crate::environment::EnvironmentKind;
use crate::grid::{LeverGrid, LeverSchedule};
use crate::input;
use crate::schedule::Schedule;

pub const MIN_CONDITIONS: usize = 1;
pub const MAX_CONDITIONS: usize = 6;

pub const DEFAULT_CONDITION_STEPS: u32 = 1000;
pub const MAX_CONDITION_STEPS: u32 = 100_000;

/// Coerce a raw step-budget entry: unparsable or < 1 gives the default,
/// anything above the ceiling clamps to it.
pub fn max_steps_from_input(raw: &str) -> u32 {
    input::positive_or(raw, DEFAULT_CONDITION_STEPS).min(MAX_CONDITION_STEPS)
}

/// [`max_steps_from_input`] for an already-numeric budget.
pub fn max_steps_from_value(steps: u32) -> u32 {
    if steps == 0 {
        DEFAULT_CONDITION_STEPS
    } else {
        steps.min(MAX_CONDITION_STEPS)
    }
}

/// Decode a step budget from a saved experiment under the editor's rules.
pub(crate) fn deserialize_max_steps<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    u32::deserialize(deserializer).map(max_steps_from_value)
}

/// Schedule(s) carried by one condition; the shape follows the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionSchedules {
    TwoChoice {
        schedule_a: Schedule,
        schedule_b: Schedule,
    },
    Grid {
        schedule: Schedule,
    },
}

impl ConditionSchedules {
    pub fn defaults_for(environment: EnvironmentKind) -> Self {
        match environment {
            EnvironmentKind::TwoChoice => ConditionSchedules::TwoChoice {
                schedule_a: Schedule::variable_interval(30),
                schedule_b: Schedule::variable_interval(60),
            },
            EnvironmentKind::GridChamber => ConditionSchedules::Grid {
                schedule: Schedule::fixed_ratio(5),
            },
        }
    }

    pub fn environment(&self) -> EnvironmentKind {
        match self {
            ConditionSchedules::TwoChoice { .. } => EnvironmentKind::TwoChoice,
            ConditionSchedules::Grid { .. } => EnvironmentKind::GridChamber,
        }
    }
}

/// In-progress single-mode schedules, as edited before multi-condition mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleModeSchedules {
    pub schedule_a: Schedule,
    pub schedule_b: Schedule,
    pub schedule: Schedule,
}

impl Default for SingleModeSchedules {
    fn default() -> Self {
        Self {
            schedule_a: Schedule::variable_interval(30),
            schedule_b: Schedule::variable_interval(60),
            schedule: Schedule::fixed_ratio(5),
        }
    }
}

impl SingleModeSchedules {
    pub fn for_environment(&self, environment: EnvironmentKind) -> ConditionSchedules {
        match environment {
            EnvironmentKind::TwoChoice => ConditionSchedules::TwoChoice {
                schedule_a: self.schedule_a,
                schedule_b: self.schedule_b,
            },
            EnvironmentKind::GridChamber => ConditionSchedules::Grid {
                schedule: self.schedule,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub label: String,
    #[serde(deserialize_with = "deserialize_max_steps")]
    pub max_steps: u32,
    #[serde(flatten)]
    pub schedules: ConditionSchedules,
    /// Grid conditions only: schedule and magnitude per lever, by lever index.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lever_schedules: Vec<LeverSchedule>,
}

impl Condition {
    /// A fresh condition. Grid conditions start with no per-lever entries;
    /// see [`Condition::with_levers`].
    pub fn create_default(environment: EnvironmentKind, index: usize) -> Self {
        Self {
            label: format!("Condition {}", index + 1),
            max_steps: DEFAULT_CONDITION_STEPS,
            schedules: ConditionSchedules::defaults_for(environment),
            lever_schedules: Vec::new(),
        }
    }

    /// First condition built from the caller's single-mode values and, for
    /// the grid chamber, the current lever layout.
    pub fn seed_from_current(
        environment: EnvironmentKind,
        current_max_steps: u32,
        current: &SingleModeSchedules,
        levers: &LeverGrid,
    ) -> Self {
        Self {
            label: "Condition 1".to_string(),
            max_steps: current_max_steps.clamp(1, MAX_CONDITION_STEPS),
            schedules: current.for_environment(environment),
            lever_schedules: Vec::new(),
        }
        .with_levers(levers)
    }

    /// Fill the per-lever entries so there is exactly one per lever in
    /// `levers`. Existing entries keep their position; missing ones copy the
    /// lever's own schedule and magnitude. Two-choice conditions are cleared.
    pub fn with_levers(self, levers: &LeverGrid) -> Self {
        let lever_schedules = match self.schedules {
            ConditionSchedules::Grid { .. } => levers.condition_lever_schedules(&self.lever_schedules),
            ConditionSchedules::TwoChoice { .. } => Vec::new(),
        };
        Self {
            lever_schedules,
            ..self
        }
    }

    /// No-op unless this is a grid condition holding an entry at `index`.
    pub fn with_lever_schedule(mut self, index: usize, schedule: Schedule) -> Self {
        if let (ConditionSchedules::Grid { .. }, Some(slot)) =
            (&self.schedules, self.lever_schedules.get_mut(index))
        {
            slot.schedule = schedule;
        }
        self
    }

    /// Negative or unparsable magnitudes become 0. Same no-op rules as
    /// [`Condition::with_lever_schedule`].
    pub fn with_lever_magnitude(mut self, index: usize, raw: &str) -> Self {
        if let (ConditionSchedules::Grid { .. }, Some(slot)) =
            (&self.schedules, self.lever_schedules.get_mut(index))
        {
            slot.magnitude = input::float_or(raw, 0.0).max(0.0);
        }
        self
    }

    pub fn with_label(self, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..self
        }
    }

    pub fn with_max_steps(self, raw: &str) -> Self {
        Self {
            max_steps: max_steps_from_input(raw),
            ..self
        }
    }

    /// No-op unless this is a two-choice condition.
    pub fn with_schedule_a(mut self, schedule: Schedule) -> Self {
        if let ConditionSchedules::TwoChoice { schedule_a, .. } = &mut self.schedules {
            *schedule_a = schedule;
        }
        self
    }

    /// No-op unless this is a two-choice condition.
    pub fn with_schedule_b(mut self, schedule: Schedule) -> Self {
        if let ConditionSchedules::TwoChoice { schedule_b, .. } = &mut self.schedules {
            *schedule_b = schedule;
        }
        self
    }

    /// No-op unless this is a grid condition. Also applied to every
    /// per-lever entry already present; magnitudes are kept.
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        if let ConditionSchedules::Grid { schedule: s } = &mut self.schedules {
            *s = schedule;
            for entry in &mut self.lever_schedules {
                entry.schedule = schedule;
            }
        }
        self
    }

    /// Re-shape the schedules for `environment`, keeping label and step budget.
    /// A condition already in the right shape is returned unchanged.
    pub fn reshaped_for(self, environment: EnvironmentKind) -> Self {
        if self.schedules.environment() == environment {
            return self;
        }
        Self {
            schedules: ConditionSchedules::defaults_for(environment),
            lever_schedules: Vec::new(),
            ..self
        }
    }
}

/// Ordered conditions. Empty until seeded; afterwards `1..=6` entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Condition>", into = "Vec<Condition>")]
pub struct ConditionSequence {
    conditions: Vec<Condition>,
}

impl From<Vec<Condition>> for ConditionSequence {
    fn from(mut conditions: Vec<Condition>) -> Self {
        conditions.truncate(MAX_CONDITIONS);
        Self { conditions }
    }
}

impl From<ConditionSequence> for Vec<Condition> {
    fn from(seq: ConditionSequence) -> Self {
        seq.conditions
    }
}

impl ConditionSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Condition> {
        self.conditions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.conditions.iter()
    }

    pub fn as_slice(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn can_add(&self) -> bool {
        self.conditions.len() < MAX_CONDITIONS
    }

    pub fn can_remove(&self) -> bool {
        self.conditions.len() > MIN_CONDITIONS
    }

    /// Seed the first condition from single-mode values. Only an empty
    /// sequence is seeded; a populated one comes back unchanged.
    pub fn seeded(
        self,
        environment: EnvironmentKind,
        current_max_steps: u32,
        current: &SingleModeSchedules,
        levers: &LeverGrid,
    ) -> Self {
        if !self.conditions.is_empty() {
            return self;
        }
        Self {
            conditions: vec![Condition::seed_from_current(
                environment,
                current_max_steps,
                current,
                levers,
            )],
        }
    }

    /// Append a default condition numbered after the current length. Grid
    /// conditions take their per-lever entries from `levers`.
    pub fn add(mut self, environment: EnvironmentKind, levers: &LeverGrid) -> Self {
        if !self.can_add() {
            return self;
        }
        let next = Condition::create_default(environment, self.conditions.len()).with_levers(levers);
        self.conditions.push(next);
        self
    }

    /// Remove whatever condition currently occupies `index`.
    pub fn remove_at(mut self, index: usize) -> Self {
        if !self.can_remove() || index >= self.conditions.len() {
            return self;
        }
        self.conditions.remove(index);
        self
    }

    pub fn replace_at(mut self, index: usize, updated: Condition) -> Self {
        if let Some(slot) = self.conditions.get_mut(index) {
            *slot = updated;
        }
        self
    }
}

impl<'a> IntoIterator for &'a ConditionSequence {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.conditions.iter()
    }
}
