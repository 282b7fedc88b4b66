use std::collections::BTreeMap;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Sparse visit map, keyed by rendered `(row, col)` tuples.
pub type VisitCounts = HashMap<String, u64>;

/// Per-action totals, kept in name order for stable rendering.
pub type ActionCounts = BTreeMap<String, u64>;

fn first_condition() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStep {
    pub step: u64,
    pub action: String,
    pub reinforced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<String>,
    /// 1-indexed.
    #[serde(default = "first_condition")]
    pub condition: u32,
    #[serde(default)]
    pub reinforcement_magnitude: f64,
}

impl SimulationStep {
    pub fn new(step: u64, action: impl Into<String>, reinforced: bool) -> Self {
        Self {
            step,
            action: action.into(),
            reinforced,
            state: None,
            schedule_id: None,
            condition: 1,
            reinforcement_magnitude: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSummary {
    pub condition: u32,
    pub label: String,
    pub start_step: u64,
    pub end_step: u64,
    pub total_steps: u64,
    pub total_reinforcements: u64,
    pub reinforcement_rate: f64,
    #[serde(default)]
    pub action_counts: ActionCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    #[serde(default)]
    pub agent: String,
    #[serde(default)]
    pub environment: String,
    pub total_steps: u64,
    pub total_reinforcements: u64,
    pub reinforcement_rate: f64,
    #[serde(default)]
    pub action_counts: ActionCounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_counts: Option<VisitCounts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_params: Option<serde_json::Value>,
}

/// Body of `/api/simulate` and `/api/simulate/json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    #[serde(default)]
    pub config: serde_json::Value,
    pub summary: SummaryStats,
    pub steps: Vec<SimulationStep>,
    #[serde(default)]
    pub condition_summaries: Vec<ConditionSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_service_body() {
        let body = json!({
            "config": { "agent": "Q-Learning" },
            "summary": {
                "agent": "Q-Learning",
                "environment": "TwoChoice",
                "total_steps": 2,
                "total_reinforcements": 1,
                "reinforcement_rate": 0.5,
                "action_counts": { "choice_b": 1, "choice_a": 1 },
                "agent_params": { "alpha": 0.1 }
            },
            "steps": [
                { "step": 1, "state": "s", "action": "choice_a", "reinforced": true,
                  "schedule_id": "VI30", "condition": 1, "reinforcement_magnitude": 1.0 },
                { "step": 2, "action": "choice_b", "reinforced": false }
            ]
        });
        let r: SimulationResponse = serde_json::from_value(body).unwrap();
        assert_eq!(r.steps.len(), 2);
        assert_eq!(r.steps[1].condition, 1);
        assert_eq!(r.steps[1].reinforcement_magnitude, 0.0);
        assert!(r.condition_summaries.is_empty());
        assert!(r.summary.visit_counts.is_none());
        let names: Vec<&str> = r.summary.action_counts.keys().map(String::as_str).collect();
        assert_eq!(names, ["choice_a", "choice_b"]);
    }

    #[test]
    fn visit_counts_pass_through() {
        let s: SummaryStats = serde_json::from_value(json!({
            "total_steps": 3, "total_reinforcements": 0, "reinforcement_rate": 0.0,
            "visit_counts": { "(0, 0)": 2, "(1, 1)": 1 }
        }))
        .unwrap();
        let visits = s.visit_counts.unwrap();
        assert_eq!(visits.get("(0, 0)"), Some(&2));
    }
}
