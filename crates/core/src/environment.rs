//! Environment and algorithm inventories.
//!
//! Both enums are closed: every site that branches on them matches
//! exhaustively, so adding a variant is a compile error until each
//! display and compile path handles it.

use serde::{Deserialize, Serialize};

pub const ACTION_CHOICE_A: &str = "choice_a";
pub const ACTION_CHOICE_B: &str = "choice_b";
pub const ACTION_PRESS_LEVER: &str = "press_lever";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentKind {
    #[default]
    TwoChoice,
    GridChamber,
}

impl EnvironmentKind {
    pub fn label(self) -> &'static str {
        match self {
            EnvironmentKind::TwoChoice => "two_choice",
            EnvironmentKind::GridChamber => "grid_chamber",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            EnvironmentKind::TwoChoice => "Two-Choice",
            EnvironmentKind::GridChamber => "Grid Chamber",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            EnvironmentKind::TwoChoice => "Concurrent chamber with two selectable responses (choice_a, choice_b), each under its own schedule.",
            EnvironmentKind::GridChamber => "Spatial chamber: the agent moves up/down/left/right/stay and presses levers placed on fixed cells, each lever under its own schedule.",
        }
    }

    /// Actions whose running totals form the cumulative record.
    pub fn tracked_actions(self) -> &'static [&'static str] {
        match self {
            EnvironmentKind::TwoChoice => &[ACTION_CHOICE_A, ACTION_CHOICE_B],
            EnvironmentKind::GridChamber => &[ACTION_PRESS_LEVER],
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.label() == label.trim())
    }

    pub fn all() -> &'static [EnvironmentKind] {
        &[EnvironmentKind::TwoChoice, EnvironmentKind::GridChamber]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmKind {
    #[default]
    QLearning,
    Etbd,
    Mpr,
}

impl AlgorithmKind {
    pub fn label(self) -> &'static str {
        match self {
            AlgorithmKind::QLearning => "q_learning",
            AlgorithmKind::Etbd => "etbd",
            AlgorithmKind::Mpr => "mpr",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AlgorithmKind::QLearning => "Q-Learning",
            AlgorithmKind::Etbd => "ETBD",
            AlgorithmKind::Mpr => "MPR",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AlgorithmKind::QLearning => "Tabular Q-learning with epsilon-greedy exploration over a short response-history state.",
            AlgorithmKind::Etbd => "Evolutionary theory of behavior dynamics: a population of bit-string behaviors under selection, recombination and mutation.",
            AlgorithmKind::Mpr => "Mathematical principles of reinforcement: arousal and coupling drive response probabilities.",
        }
    }

    /// Request key of this algorithm's parameter block.
    pub fn params_key(self) -> &'static str {
        match self {
            AlgorithmKind::QLearning => "q_learning_params",
            AlgorithmKind::Etbd => "etbd_params",
            AlgorithmKind::Mpr => "mpr_params",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.label() == label.trim())
    }

    pub fn all() -> &'static [AlgorithmKind] {
        &[AlgorithmKind::QLearning, AlgorithmKind::Etbd, AlgorithmKind::Mpr]
    }
}
