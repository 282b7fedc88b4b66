use serde::{Deserialize, Serialize};

use crate::environment::AlgorithmKind;
use crate::input;

// ─────────────────────────────────────────────────────────────────────────
// Per-algorithm parameter blocks
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningParams {
    pub alpha: f64,
    pub gamma: f64,
    pub epsilon: f64,
    pub history_window: u32,
}

impl Default for QLearningParams {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 0.1,
            history_window: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EtbdParams {
    pub population_size: u32,
    pub mutation_rate: f64,
    pub fitness_decay: f64,
}

impl Default for EtbdParams {
    fn default() -> Self {
        Self {
            population_size: 100,
            mutation_rate: 0.1,
            fitness_decay: 0.95,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MprParams {
    pub initial_arousal: f64,
    pub activation_decay: f64,
    pub coupling_floor: f64,
    pub temperature: f64,
}

impl Default for MprParams {
    fn default() -> Self {
        Self {
            initial_arousal: 1.0,
            activation_decay: 0.95,
            coupling_floor: 0.01,
            temperature: 1.0,
        }
    }
}

/// Round a raw integer entry and hold it at or above `min`.
fn rounded_at_least(raw: &str, fallback: u32, min: u32) -> u32 {
    let v = input::float_or(raw, fallback as f64).round();
    if v < min as f64 {
        min
    } else {
        v.min(u32::MAX as f64) as u32
    }
}

impl QLearningParams {
    /// Apply one raw field edit. Unknown keys leave the block unchanged.
    pub fn with_field(self, key: &str, raw: &str) -> Self {
        let d = Self::default();
        match key {
            "alpha" => Self { alpha: input::float_or(raw, d.alpha), ..self },
            "gamma" => Self { gamma: input::float_or(raw, d.gamma), ..self },
            "epsilon" => Self { epsilon: input::float_or(raw, d.epsilon), ..self },
            "history_window" => Self {
                history_window: rounded_at_least(raw, d.history_window, 1),
                ..self
            },
            _ => self,
        }
    }
}

impl EtbdParams {
    pub fn with_field(self, key: &str, raw: &str) -> Self {
        let d = Self::default();
        match key {
            "population_size" => Self {
                population_size: rounded_at_least(raw, d.population_size, 10),
                ..self
            },
            "mutation_rate" => Self {
                mutation_rate: input::float_or(raw, d.mutation_rate),
                ..self
            },
            "fitness_decay" => Self {
                fitness_decay: input::float_or(raw, d.fitness_decay),
                ..self
            },
            _ => self,
        }
    }
}

impl MprParams {
    pub fn with_field(self, key: &str, raw: &str) -> Self {
        let d = Self::default();
        match key {
            "initial_arousal" => Self {
                initial_arousal: input::float_or(raw, d.initial_arousal),
                ..self
            },
            "activation_decay" => Self {
                activation_decay: input::float_or(raw, d.activation_decay),
                ..self
            },
            "coupling_floor" => Self {
                coupling_floor: input::float_or(raw, d.coupling_floor),
                ..self
            },
            "temperature" => Self {
                temperature: input::float_or(raw, d.temperature),
                ..self
            },
            _ => self,
        }
    }
}

/// Exactly one parameter block, keyed on the wire by the algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AlgorithmParams {
    #[serde(rename = "q_learning_params")]
    QLearning(QLearningParams),
    #[serde(rename = "etbd_params")]
    Etbd(EtbdParams),
    #[serde(rename = "mpr_params")]
    Mpr(MprParams),
}

impl AlgorithmParams {
    pub fn algorithm(&self) -> AlgorithmKind {
        match self {
            AlgorithmParams::QLearning(_) => AlgorithmKind::QLearning,
            AlgorithmParams::Etbd(_) => AlgorithmKind::Etbd,
            AlgorithmParams::Mpr(_) => AlgorithmKind::Mpr,
        }
    }

    pub fn key(&self) -> &'static str {
        self.algorithm().params_key()
    }
}

/// Edited values for every algorithm, so switching algorithm keeps edits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamSet {
    pub q_learning: QLearningParams,
    pub etbd: EtbdParams,
    pub mpr: MprParams,
}

impl ParamSet {
    pub fn active(&self, algorithm: AlgorithmKind) -> AlgorithmParams {
        match algorithm {
            AlgorithmKind::QLearning => AlgorithmParams::QLearning(self.q_learning),
            AlgorithmKind::Etbd => AlgorithmParams::Etbd(self.etbd),
            AlgorithmKind::Mpr => AlgorithmParams::Mpr(self.mpr),
        }
    }

    pub fn with_field(self, algorithm: AlgorithmKind, key: &str, raw: &str) -> Self {
        match algorithm {
            AlgorithmKind::QLearning => Self {
                q_learning: self.q_learning.with_field(key, raw),
                ..self
            },
            AlgorithmKind::Etbd => Self {
                etbd: self.etbd.with_field(key, raw),
                ..self
            },
            AlgorithmKind::Mpr => Self {
                mpr: self.mpr.with_field(key, raw),
                ..self
            },
        }
    }

    /// Restore one algorithm's block to its defaults.
    pub fn reset(self, algorithm: AlgorithmKind) -> Self {
        match algorithm {
            AlgorithmKind::QLearning => Self {
                q_learning: QLearningParams::default(),
                ..self
            },
            AlgorithmKind::Etbd => Self {
                etbd: EtbdParams::default(),
                ..self
            },
            AlgorithmKind::Mpr => Self {
                mpr: MprParams::default(),
                ..self
            },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Field metadata for editors
// ─────────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct ParamSpec {
    pub algorithm: AlgorithmKind,
    pub key: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: Option<f64>,
    pub step: f64,
    pub default: f64,
    pub integer: bool,
}

pub fn param_specs(algorithm: AlgorithmKind) -> Vec<ParamSpec> {
    let spec = |key: &'static str,
                label: &'static str,
                min: f64,
                max: Option<f64>,
                step: f64,
                default: f64,
                integer: bool| ParamSpec {
        algorithm,
        key,
        label,
        min,
        max,
        step,
        default,
        integer,
    };

    match algorithm {
        AlgorithmKind::QLearning => {
            let d = QLearningParams::default();
            vec![
                spec("alpha", "Alpha (learning rate)", 0.0, Some(1.0), 0.01, d.alpha, false),
                spec("gamma", "Gamma (discount)", 0.0, Some(1.0), 0.01, d.gamma, false),
                spec("epsilon", "Epsilon (exploration)", 0.0, Some(1.0), 0.01, d.epsilon, false),
                spec("history_window", "History Window", 1.0, None, 1.0, d.history_window as f64, true),
            ]
        }
        AlgorithmKind::Etbd => {
            let d = EtbdParams::default();
            vec![
                spec("population_size", "Population Size", 10.0, None, 10.0, d.population_size as f64, true),
                spec("mutation_rate", "Mutation Rate", 0.0, Some(1.0), 0.01, d.mutation_rate, false),
                spec("fitness_decay", "Fitness Decay", 0.0, Some(1.0), 0.01, d.fitness_decay, false),
            ]
        }
        AlgorithmKind::Mpr => {
            let d = MprParams::default();
            vec![
                spec("initial_arousal", "Initial Arousal (a)", 0.01, None, 0.01, d.initial_arousal, false),
                spec("activation_decay", "Activation Decay (b)", 0.01, None, 0.01, d.activation_decay, false),
                spec("coupling_floor", "Coupling Floor", 0.0, None, 0.01, d.coupling_floor, false),
                spec("temperature", "Temperature (grid)", 0.01, None, 0.01, d.temperature, false),
            ]
        }
    }
}

impl ParamSet {
    /// Current value of `key` for `algorithm`, as a float.
    pub fn value(&self, algorithm: AlgorithmKind, key: &str) -> Option<f64> {
        let v = match (algorithm, key) {
            (AlgorithmKind::QLearning, "alpha") => self.q_learning.alpha,
            (AlgorithmKind::QLearning, "gamma") => self.q_learning.gamma,
            (AlgorithmKind::QLearning, "epsilon") => self.q_learning.epsilon,
            (AlgorithmKind::QLearning, "history_window") => self.q_learning.history_window as f64,
            (AlgorithmKind::Etbd, "population_size") => self.etbd.population_size as f64,
            (AlgorithmKind::Etbd, "mutation_rate") => self.etbd.mutation_rate,
            (AlgorithmKind::Etbd, "fitness_decay") => self.etbd.fitness_decay,
            (AlgorithmKind::Mpr, "initial_arousal") => self.mpr.initial_arousal,
            (AlgorithmKind::Mpr, "activation_decay") => self.mpr.activation_decay,
            (AlgorithmKind::Mpr, "coupling_floor") => self.mpr.coupling_floor,
            (AlgorithmKind::Mpr, "temperature") => self.mpr.temperature,
            _ => return None,
        };
        Some(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_fields_round_and_hold_minimum() {
        let p = QLearningParams::default();
        assert_eq!(p.with_field("history_window", "4.6").history_window, 5);
        assert_eq!(p.with_field("history_window", "0").history_window, 1);
        assert_eq!(p.with_field("history_window", "x").history_window, 3);

        let e = EtbdParams::default();
        assert_eq!(e.with_field("population_size", "3").population_size, 10);
        assert_eq!(e.with_field("population_size", "250").population_size, 250);
    }

    #[test]
    fn float_fields_fall_back_to_default() {
        let p = QLearningParams::default().with_field("alpha", "0.5");
        assert_eq!(p.alpha, 0.5);
        assert_eq!(p.with_field("alpha", "oops").alpha, 0.1);
        assert_eq!(p.with_field("unknown", "1"), p);
    }

    #[test]
    fn active_block_serializes_under_its_key() {
        let set = ParamSet::default().with_field(AlgorithmKind::Mpr, "temperature", "2");
        let active = set.active(AlgorithmKind::Mpr);
        assert_eq!(active.key(), "mpr_params");

        let v = serde_json::to_value(active).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["mpr_params"]["temperature"], serde_json::json!(2.0));
    }

    #[test]
    fn reset_only_touches_one_block() {
        let set = ParamSet::default()
            .with_field(AlgorithmKind::QLearning, "gamma", "0.5")
            .with_field(AlgorithmKind::Etbd, "mutation_rate", "0.3")
            .reset(AlgorithmKind::QLearning);
        assert_eq!(set.q_learning, QLearningParams::default());
        assert_eq!(set.etbd.mutation_rate, 0.3);
    }

    #[test]
    fn specs_cover_every_field() {
        let set = ParamSet::default();
        for &alg in AlgorithmKind::all() {
            let specs = param_specs(alg);
            assert!(!specs.is_empty());
            for s in specs {
                assert_eq!(set.value(alg, s.key), Some(s.default), "{}", s.key);
                assert!(s.min <= s.default);
                if let Some(max) = s.max {
                    assert!(s.default <= max);
                }
            }
        }
    }
}
