//! The experiment configuration value and its reducers.
//!
//! Every edit consumes the current value and returns the next one; nothing
//! here mutates shared state. Text-backed edits take the raw field contents
//! and coerce them through [`crate::input`].

use serde::{Deserialize, Serialize};

use crate::compile::{self, ExperimentRequest};
use crate::condition::{self, Condition, ConditionSequence, SingleModeSchedules};
use crate::environment::{AlgorithmKind, EnvironmentKind};
use crate::grid::{GridConfig, LeverGrid};
use crate::params::ParamSet;
use crate::schedule::Schedule;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub environment: EnvironmentKind,
    pub algorithm: AlgorithmKind,
    #[serde(deserialize_with = "condition::deserialize_max_steps")]
    pub max_steps: u32,
    /// Raw seed text; compiled only when it parses as an integer.
    pub seed: String,
    pub schedules: SingleModeSchedules,
    pub grid: GridConfig,
    pub params: ParamSet,
    pub multi_condition: bool,
    pub conditions: ConditionSequence,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            environment: EnvironmentKind::default(),
            algorithm: AlgorithmKind::default(),
            max_steps: condition::DEFAULT_CONDITION_STEPS,
            seed: String::new(),
            schedules: SingleModeSchedules::default(),
            grid: GridConfig::default(),
            params: ParamSet::default(),
            multi_condition: false,
            conditions: ConditionSequence::new(),
        }
    }
}

impl ExperimentConfig {
    pub fn with_environment(self, environment: EnvironmentKind) -> Self {
        Self { environment, ..self }
    }

    pub fn with_algorithm(self, algorithm: AlgorithmKind) -> Self {
        Self { algorithm, ..self }
    }

    /// Single-mode step budget: unparsable or < 1 gives 1000.
    pub fn with_max_steps(self, raw: &str) -> Self {
        Self {
            max_steps: condition::max_steps_from_input(raw),
            ..self
        }
    }

    pub fn with_seed(self, raw: impl Into<String>) -> Self {
        Self {
            seed: raw.into(),
            ..self
        }
    }

    pub fn with_schedule_a(mut self, schedule: Schedule) -> Self {
        self.schedules.schedule_a = schedule;
        self
    }

    pub fn with_schedule_b(mut self, schedule: Schedule) -> Self {
        self.schedules.schedule_b = schedule;
        self
    }

    /// Single-mode grid schedule.
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedules.schedule = schedule;
        self
    }

    pub fn with_grid(self, grid: impl Into<GridConfig>) -> Self {
        Self {
            grid: grid.into(),
            ..self
        }
    }

    /// Edit the grid as a multi-lever layout; a legacy layout is migrated
    /// first using the single-mode grid schedule.
    pub fn edit_grid(self, edit: impl FnOnce(LeverGrid) -> LeverGrid) -> Self {
        let grid = edit(self.lever_grid());
        Self {
            grid: GridConfig::MultiLever(grid),
            ..self
        }
    }

    pub fn lever_grid(&self) -> LeverGrid {
        self.grid.normalized(self.schedules.schedule)
    }

    pub fn with_param(self, key: &str, raw: &str) -> Self {
        Self {
            params: self.params.with_field(self.algorithm, key, raw),
            ..self
        }
    }

    pub fn reset_params(self) -> Self {
        Self {
            params: self.params.reset(self.algorithm),
            ..self
        }
    }

    /// Toggle multi-condition mode. Turning it on with an empty sequence seeds
    /// the first condition from the current single-mode values and lever
    /// layout; an existing sequence is kept across toggles.
    pub fn with_multi_condition(self, enabled: bool) -> Self {
        let conditions = if enabled && !self.multi_condition {
            let levers = self.lever_grid();
            self.conditions
                .seeded(self.environment, self.max_steps, &self.schedules, &levers)
        } else {
            self.conditions
        };
        Self {
            multi_condition: enabled,
            conditions,
            ..self
        }
    }

    pub fn add_condition(self) -> Self {
        let levers = self.lever_grid();
        Self {
            conditions: self.conditions.add(self.environment, &levers),
            ..self
        }
    }

    pub fn remove_condition(self, index: usize) -> Self {
        Self {
            conditions: self.conditions.remove_at(index),
            ..self
        }
    }

    pub fn replace_condition(self, index: usize, updated: Condition) -> Self {
        Self {
            conditions: self.conditions.replace_at(index, updated),
            ..self
        }
    }

    /// True when a compiled request would carry the condition list.
    pub fn uses_conditions(&self) -> bool {
        self.multi_condition && !self.conditions.is_empty()
    }

    pub fn compile(&self) -> ExperimentRequest {
        compile::compile(self)
    }
}
