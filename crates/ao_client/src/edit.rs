//! `ao-sim set ...` edits, mapped onto the experiment reducers.

use ao_sim::config::ExperimentConfig;
use ao_sim::environment::{AlgorithmKind, EnvironmentKind};
use ao_sim::grid::LeverGrid;
use ao_sim::schedule::{Schedule, ScheduleKind};

use crate::error::ClientError;

pub const EDIT_HELP: &str = "\
  environment <two_choice|grid_chamber>
  algorithm <q_learning|etbd|mpr>
  max-steps <n>
  seed <n|\"\">
  schedule-a|schedule-b|schedule <FR|VR|FI|VI> <value>
  param <key> <value>                 (active algorithm)
  reset-params
  multi <on|off>
  add-condition | remove-condition <i>
  condition <i> label <text>
  condition <i> max-steps <n>
  condition <i> schedule-a|schedule-b|schedule <type> <value>
  condition <i> lever <j> schedule <type> <value>
  condition <i> lever <j> magnitude <v>
  grid rows|cols|start-row|start-col <n>
  add-lever | remove-lever <i>
  lever <i> row|col|magnitude <v>
  lever <i> schedule <type> <value>";

fn bad(msg: impl Into<String>) -> ClientError {
    ClientError::Config(msg.into())
}

fn arg<'a>(args: &'a [String], i: usize, what: &str) -> Result<&'a str, ClientError> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| bad(format!("missing {what}")))
}

fn index(args: &[String], i: usize) -> Result<usize, ClientError> {
    let raw = arg(args, i, "index")?;
    raw.trim()
        .parse::<usize>()
        .map_err(|_| bad(format!("index must be a non-negative integer, got {raw:?}")))
}

fn on_off(raw: &str) -> Result<bool, ClientError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(bad(format!("expected on|off, got {raw:?}"))),
    }
}

/// Parse `<type> <value>` starting at `args[i]`, editing `current`.
fn schedule(args: &[String], i: usize, current: Schedule) -> Result<Schedule, ClientError> {
    let kind_raw = arg(args, i, "schedule type")?;
    let kind = ScheduleKind::from_label(kind_raw)
        .ok_or_else(|| bad(format!("unknown schedule type {kind_raw:?} (FR, VR, FI, VI)")))?;
    let value = arg(args, i + 1, "schedule value")?;
    Ok(current.with_kind(kind).with_value(value))
}

/// Apply one edit command. Numeric values are coerced the same way the
/// editors coerce them; only structural mistakes (unknown field, missing
/// argument, unknown label) are errors.
pub fn apply_edit(config: ExperimentConfig, args: &[String]) -> Result<ExperimentConfig, ClientError> {
    let field = arg(args, 0, "field")?;
    let next = match field {
        "environment" => {
            let raw = arg(args, 1, "environment")?;
            let env = EnvironmentKind::from_label(raw)
                .ok_or_else(|| bad(format!("unknown environment {raw:?}")))?;
            config.with_environment(env)
        }
        "algorithm" => {
            let raw = arg(args, 1, "algorithm")?;
            let alg = AlgorithmKind::from_label(raw)
                .ok_or_else(|| bad(format!("unknown algorithm {raw:?}")))?;
            config.with_algorithm(alg)
        }
        "max-steps" => config.with_max_steps(arg(args, 1, "max steps")?),
        "seed" => {
            let raw = args.get(1).cloned().unwrap_or_default();
            config.with_seed(raw)
        }
        "schedule-a" => {
            let s = schedule(args, 1, config.schedules.schedule_a)?;
            config.with_schedule_a(s)
        }
        "schedule-b" => {
            let s = schedule(args, 1, config.schedules.schedule_b)?;
            config.with_schedule_b(s)
        }
        "schedule" => {
            let s = schedule(args, 1, config.schedules.schedule)?;
            config.with_schedule(s)
        }
        "param" => {
            let key = arg(args, 1, "parameter key")?;
            let value = arg(args, 2, "parameter value")?;
            config.with_param(key, value)
        }
        "reset-params" => config.reset_params(),
        "multi" => config.with_multi_condition(on_off(arg(args, 1, "on|off")?)?),
        "add-condition" => config.add_condition(),
        "remove-condition" => {
            let i = index(args, 1)?;
            config.remove_condition(i)
        }
        "condition" => {
            let i = index(args, 1)?;
            let current = config
                .conditions
                .get(i)
                .cloned()
                .ok_or_else(|| bad(format!("no condition at index {i}")))?;
            let updated = match arg(args, 2, "condition field")? {
                "label" => current.with_label(arg(args, 3, "label")?),
                "max-steps" => current.with_max_steps(arg(args, 3, "max steps")?),
                "schedule-a" => {
                    let base = config.schedules.schedule_a;
                    current.with_schedule_a(schedule(args, 3, base)?)
                }
                "schedule-b" => {
                    let base = config.schedules.schedule_b;
                    current.with_schedule_b(schedule(args, 3, base)?)
                }
                "schedule" => {
                    let base = config.schedules.schedule;
                    current.with_schedule(schedule(args, 3, base)?)
                }
                "lever" => {
                    let j = index(args, 3)?;
                    let current = current.with_levers(&config.lever_grid());
                    let entry = *current
                        .lever_schedules
                        .get(j)
                        .ok_or_else(|| bad(format!("condition {i} has no lever at index {j}")))?;
                    match arg(args, 4, "lever field")? {
                        "schedule" => current.with_lever_schedule(j, schedule(args, 5, entry.schedule)?),
                        "magnitude" => current.with_lever_magnitude(j, arg(args, 5, "magnitude")?),
                        other => return Err(bad(format!("unknown lever field {other:?}"))),
                    }
                }
                other => return Err(bad(format!("unknown condition field {other:?}"))),
            };
            config.replace_condition(i, updated)
        }
        "grid" => {
            let which = arg(args, 1, "grid field")?;
            let raw = arg(args, 2, "value")?.to_string();
            let edit: fn(LeverGrid, &str) -> LeverGrid = match which {
                "rows" => LeverGrid::with_rows,
                "cols" => LeverGrid::with_cols,
                "start-row" => LeverGrid::with_start_row,
                "start-col" => LeverGrid::with_start_col,
                other => return Err(bad(format!("unknown grid field {other:?}"))),
            };
            config.edit_grid(|g| edit(g, &raw))
        }
        "add-lever" => config.edit_grid(LeverGrid::add_lever),
        "remove-lever" => {
            let i = index(args, 1)?;
            config.edit_grid(|g| g.remove_lever(i))
        }
        "lever" => {
            let i = index(args, 1)?;
            let grid = config.lever_grid();
            let current = *grid
                .levers
                .get(i)
                .ok_or_else(|| bad(format!("no lever at index {i}")))?;
            let updated = match arg(args, 2, "lever field")? {
                "row" => current.with_row(arg(args, 3, "row")?),
                "col" => current.with_col(arg(args, 3, "col")?),
                "magnitude" => current.with_magnitude(arg(args, 3, "magnitude")?),
                "schedule" => current.with_schedule(schedule(args, 3, current.schedule)?),
                other => return Err(bad(format!("unknown lever field {other:?}"))),
            };
            config.edit_grid(|g| g.replace_lever(i, updated))
        }
        other => return Err(bad(format!("unknown field {other:?}"))),
    };
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(config: ExperimentConfig, cmd: &str) -> Result<ExperimentConfig, ClientError> {
        let args: Vec<String> = cmd.split_whitespace().map(str::to_string).collect();
        apply_edit(config, &args)
    }

    #[test]
    fn top_level_edits() {
        let c = run(ExperimentConfig::default(), "environment grid_chamber").unwrap();
        let c = run(c, "algorithm etbd").unwrap();
        let c = run(c, "param population_size 3").unwrap();
        let c = run(c, "schedule vr 0").unwrap();
        let c = run(c, "seed 11").unwrap();

        assert_eq!(c.environment, EnvironmentKind::GridChamber);
        assert_eq!(c.params.etbd.population_size, 10);
        assert_eq!(c.schedules.schedule, Schedule::new(ScheduleKind::VariableRatio, 1));
        assert_eq!(c.compile().seed, Some(11));
    }

    #[test]
    fn condition_edits() {
        let c = run(ExperimentConfig::default(), "multi on").unwrap();
        let c = run(c, "add-condition").unwrap();
        let c = run(c, "condition 1 label Extinction").unwrap();
        let c = run(c, "condition 1 max-steps 300").unwrap();
        let c = run(c, "condition 1 schedule-a FR 10").unwrap();

        let second = c.conditions.get(1).unwrap();
        assert_eq!(second.label, "Extinction");
        assert_eq!(second.max_steps, 300);

        assert!(run(c.clone(), "condition 5 label X").is_err());
        let c = run(c, "remove-condition 0").unwrap();
        assert_eq!(c.conditions.len(), 1);
    }

    #[test]
    fn per_lever_condition_edits() {
        let c = run(ExperimentConfig::default(), "environment grid_chamber").unwrap();
        let c = run(c, "add-lever").unwrap();
        let c = run(c, "lever 1 schedule VI 30").unwrap();
        let c = run(c, "multi on").unwrap();
        let c = run(c, "condition 0 lever 1 schedule FR 12").unwrap();
        let c = run(c, "condition 0 lever 0 magnitude 0").unwrap();

        let req = c.compile();
        let ls = req.conditions.unwrap()[0].lever_schedules.clone().unwrap();
        assert_eq!(ls[0].schedule, Schedule::fixed_ratio(5));
        assert_eq!(ls[0].magnitude, 0.0);
        assert_eq!(ls[1].schedule, Schedule::fixed_ratio(12));

        assert!(run(c.clone(), "condition 0 lever 4 magnitude 1").is_err());
        assert!(run(c, "condition 0 lever 0 colour red").is_err());
    }

    #[test]
    fn grid_and_lever_edits() {
        let c = run(ExperimentConfig::default(), "grid rows 30").unwrap();
        let c = run(c, "add-lever").unwrap();
        let c = run(c, "lever 1 row 4").unwrap();
        let c = run(c, "lever 1 magnitude 0").unwrap();
        let c = run(c, "lever 1 schedule FI 20").unwrap();

        let g = c.lever_grid();
        assert_eq!(g.rows, 20);
        assert_eq!(g.levers.len(), 2);
        assert_eq!(g.levers[1].row, 4);
        assert_eq!(g.levers[1].magnitude, 0.0);
        assert_eq!(g.levers[1].schedule, Schedule::new(ScheduleKind::FixedInterval, 20));
    }

    #[test]
    fn structural_mistakes_are_errors() {
        let c = ExperimentConfig::default();
        assert!(run(c.clone(), "environment maze").is_err());
        assert!(run(c.clone(), "schedule-a XX 5").is_err());
        assert!(run(c.clone(), "remove-condition x").is_err());
        assert!(run(c.clone(), "nonsense").is_err());
        assert!(apply_edit(c, &[]).is_err());
    }
}
