//! Request compilation.
//!
//! [`compile`] is total: every [`ExperimentConfig`] yields a request, and the
//! request always satisfies these shape rules:
//! - exactly one of `conditions` or the single-mode schedule field(s);
//! - `grid_config` present iff the environment is the grid chamber;
//! - exactly one parameter block, keyed by the algorithm.

use serde::{Deserialize, Serialize};

use crate::condition::{Condition, ConditionSchedules};
use crate::config::ExperimentConfig;
use crate::environment::{AlgorithmKind, EnvironmentKind};
use crate::grid::{LeverGrid, LeverSchedule};
use crate::params::AlgorithmParams;
use crate::schedule::Schedule;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionPayload {
    pub label: String,
    pub max_steps: u32,
    #[serde(flatten)]
    pub schedules: ConditionSchedules,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lever_schedules: Option<Vec<LeverSchedule>>,
}

impl ConditionPayload {
    fn from_condition(condition: &Condition, environment: EnvironmentKind, grid: &LeverGrid) -> Self {
        let condition = condition.clone().reshaped_for(environment);
        let lever_schedules = match condition.schedules {
            ConditionSchedules::Grid { .. } => Some(grid.condition_lever_schedules(&condition.lever_schedules)),
            ConditionSchedules::TwoChoice { .. } => None,
        };
        Self {
            label: condition.label,
            max_steps: condition.max_steps,
            schedules: condition.schedules,
            lever_schedules,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRequest {
    pub environment: EnvironmentKind,
    pub algorithm: AlgorithmKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_a: Option<Schedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_b: Option<Schedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_config: Option<LeverGrid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<ConditionPayload>>,
    #[serde(flatten)]
    pub params: AlgorithmParams,
}

impl ExperimentRequest {
    /// Sum of per-condition step budgets, or the single-mode budget.
    pub fn planned_steps(&self) -> u64 {
        match &self.conditions {
            Some(conditions) => conditions.iter().map(|c| c.max_steps as u64).sum(),
            None => self.max_steps.unwrap_or_default() as u64,
        }
    }

    /// Grid dimensions for result rendering; `None` outside the grid chamber.
    pub fn grid_dimensions(&self) -> Option<(u32, u32)> {
        self.grid_config.as_ref().map(|g| (g.rows, g.cols))
    }
}

/// Seed text is compiled only when the whole trimmed string is an integer.
pub fn parse_seed(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

pub fn compile(config: &ExperimentConfig) -> ExperimentRequest {
    let environment = config.environment;
    let grid = match environment {
        EnvironmentKind::GridChamber => Some(config.lever_grid()),
        EnvironmentKind::TwoChoice => None,
    };

    let mut request = ExperimentRequest {
        environment,
        algorithm: config.algorithm,
        max_steps: None,
        seed: parse_seed(&config.seed),
        schedule_a: None,
        schedule_b: None,
        schedule: None,
        grid_config: None,
        conditions: None,
        params: config.params.active(config.algorithm),
    };

    if config.uses_conditions() {
        let layout = grid.clone().unwrap_or_default();
        request.conditions = Some(
            config
                .conditions
                .iter()
                .map(|c| ConditionPayload::from_condition(c, environment, &layout))
                .collect(),
        );
    } else {
        request.max_steps = Some(config.max_steps);
        match config.schedules.for_environment(environment) {
            ConditionSchedules::TwoChoice {
                schedule_a,
                schedule_b,
            } => {
                request.schedule_a = Some(schedule_a);
                request.schedule_b = Some(schedule_b);
            }
            ConditionSchedules::Grid { schedule } => {
                request.schedule = Some(schedule);
            }
        }
    }

    request.grid_config = grid;
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Lever;
    use crate::schedule::ScheduleKind;
    use serde_json::{json, Value};

    fn keys(v: &Value) -> Vec<String> {
        let mut k: Vec<String> = v.as_object().unwrap().keys().cloned().collect();
        k.sort();
        k
    }

    #[test]
    fn single_mode_two_choice() {
        let req = ExperimentConfig::default().compile();
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(
            keys(&v),
            [
                "algorithm",
                "environment",
                "max_steps",
                "q_learning_params",
                "schedule_a",
                "schedule_b"
            ]
        );
        assert_eq!(v["schedule_a"], json!({ "type": "VI", "value": 30 }));
        assert_eq!(v["q_learning_params"]["history_window"], json!(3));
    }

    #[test]
    fn single_mode_grid_carries_layout() {
        let req = ExperimentConfig::default()
            .with_environment(EnvironmentKind::GridChamber)
            .with_algorithm(AlgorithmKind::Mpr)
            .compile();
        assert_eq!(req.schedule, Some(Schedule::fixed_ratio(5)));
        assert!(req.schedule_a.is_none() && req.schedule_b.is_none());
        assert!(req.conditions.is_none());
        assert_eq!(req.grid_dimensions(), Some((5, 5)));
        assert_eq!(req.params.key(), "mpr_params");
    }

    #[test]
    fn multi_mode_omits_single_fields() {
        let req = ExperimentConfig::default()
            .with_multi_condition(true)
            .add_condition()
            .add_condition()
            .compile();
        let conditions = req.conditions.as_ref().unwrap();
        assert_eq!(conditions.len(), 3);
        assert!(req.schedule_a.is_none() && req.schedule_b.is_none() && req.schedule.is_none());
        assert!(req.max_steps.is_none());
        assert!(req.grid_config.is_none());
        let v = serde_json::to_value(&req).unwrap();
        for single in ["schedule", "schedule_a", "schedule_b", "max_steps", "grid_config"] {
            assert!(v.get(single).is_none(), "{single} present in multi mode");
        }
        assert!(conditions.iter().all(|c| c.lever_schedules.is_none()));
        assert_eq!(req.planned_steps(), 3000);
    }

    #[test]
    fn multi_mode_grid_conditions_carry_lever_schedules() {
        let req = ExperimentConfig::default()
            .with_environment(EnvironmentKind::GridChamber)
            .edit_grid(|g| g.add_lever().replace_lever(1, Lever::default().with_magnitude("0")))
            .with_multi_condition(true)
            .compile();

        let v = serde_json::to_value(&req).unwrap();
        let first = &v["conditions"][0];
        assert_eq!(first["schedule"], json!({ "type": "FR", "value": 5 }));
        assert_eq!(
            first["lever_schedules"],
            json!([
                { "schedule": { "type": "FR", "value": 5 }, "magnitude": 1.0 },
                { "schedule": { "type": "FR", "value": 5 }, "magnitude": 0.0 },
            ])
        );
        assert!(v.get("grid_config").is_some());
        for single in ["schedule", "schedule_a", "schedule_b", "max_steps"] {
            assert!(v.get(single).is_none(), "{single} present in multi mode");
        }
    }

    #[test]
    fn distinct_lever_schedules_survive_multi_mode() {
        let config = ExperimentConfig::default()
            .with_environment(EnvironmentKind::GridChamber)
            .edit_grid(|g| {
                g.add_lever().replace_lever(
                    1,
                    Lever::default().with_schedule(Schedule::variable_interval(30)),
                )
            });
        let single: Vec<Schedule> = config
            .compile()
            .grid_config
            .unwrap()
            .levers
            .iter()
            .map(|l| l.schedule)
            .collect();
        assert_eq!(single, [Schedule::fixed_ratio(5), Schedule::variable_interval(30)]);

        let config = config.with_multi_condition(true).add_condition();
        let edited = config
            .conditions
            .get(1)
            .unwrap()
            .clone()
            .with_lever_schedule(0, Schedule::new(ScheduleKind::VariableRatio, 8));
        let req = config.replace_condition(1, edited).compile();

        let per_condition: Vec<Vec<Schedule>> = req
            .conditions
            .unwrap()
            .iter()
            .map(|c| c.lever_schedules.as_ref().unwrap().iter().map(|l| l.schedule).collect())
            .collect();
        assert_eq!(
            per_condition,
            [
                vec![Schedule::fixed_ratio(5), Schedule::variable_interval(30)],
                vec![
                    Schedule::new(ScheduleKind::VariableRatio, 8),
                    Schedule::variable_interval(30)
                ],
            ]
        );
    }

    #[test]
    fn levers_added_after_conditions_use_their_own_schedule() {
        let req = ExperimentConfig::default()
            .with_environment(EnvironmentKind::GridChamber)
            .with_multi_condition(true)
            .edit_grid(|g| {
                g.add_lever()
                    .replace_lever(1, Lever::default().with_schedule(Schedule::variable_interval(45)))
            })
            .compile();
        let ls = req.conditions.unwrap()[0].lever_schedules.clone().unwrap();
        assert_eq!(ls.len(), 2);
        assert_eq!(ls[0].schedule, Schedule::fixed_ratio(5));
        assert_eq!(ls[1].schedule, Schedule::variable_interval(45));
    }

    #[test]
    fn hand_edited_file_cannot_break_value_floor() {
        let config: ExperimentConfig = serde_json::from_str(
            r#"{"schedules":{"schedule_a":{"type":"FR","value":0}},"max_steps":0}"#,
        )
        .unwrap();
        let req = config.compile();
        assert_eq!(req.schedule_a, Some(Schedule::fixed_ratio(1)));
        assert_eq!(req.max_steps, Some(1000));

        let config: ExperimentConfig =
            serde_json::from_str(r#"{"max_steps":900000}"#).unwrap();
        assert_eq!(config.compile().max_steps, Some(100_000));
    }

    #[test]
    fn conditions_are_reshaped_after_environment_switch() {
        let req = ExperimentConfig::default()
            .with_multi_condition(true)
            .with_environment(EnvironmentKind::GridChamber)
            .compile();
        let c = &req.conditions.unwrap()[0];
        assert_eq!(c.label, "Condition 1");
        assert_eq!(
            c.schedules,
            ConditionSchedules::Grid {
                schedule: Schedule::fixed_ratio(5)
            }
        );
    }

    #[test]
    fn multi_mode_with_empty_sequence_falls_back_to_single() {
        let mut config = ExperimentConfig::default();
        config.multi_condition = true;
        let req = config.compile();
        assert!(req.conditions.is_none());
        assert!(req.schedule_a.is_some());
    }

    #[test]
    fn seed_is_included_only_when_numeric() {
        let base = ExperimentConfig::default();
        assert_eq!(base.clone().with_seed("42").compile().seed, Some(42));
        assert_eq!(base.clone().with_seed(" -7 ").compile().seed, Some(-7));
        assert_eq!(base.clone().with_seed("").compile().seed, None);
        assert_eq!(base.clone().with_seed("abc").compile().seed, None);
        assert_eq!(base.with_seed("12abc").compile().seed, None);
    }

    #[test]
    fn exactly_one_params_block() {
        for &alg in AlgorithmKind::all() {
            let req = ExperimentConfig::default().with_algorithm(alg).compile();
            let v = serde_json::to_value(&req).unwrap();
            let blocks: Vec<String> = keys(&v)
                .into_iter()
                .filter(|k| k.ends_with("_params"))
                .collect();
            assert_eq!(blocks, [alg.params_key()]);
        }
    }

    #[test]
    fn request_decodes_back() {
        let req = ExperimentConfig::default()
            .with_environment(EnvironmentKind::GridChamber)
            .with_multi_condition(true)
            .compile();
        let json = serde_json::to_string(&req).unwrap();
        let back: ExperimentRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, req);
    }
}
