//! Results aggregation: cumulative records, condition markers, breakdowns.
//!
//! Everything here reads the service response as-is. Per-condition figures
//! come straight from the condition summaries and are never recomputed from
//! the step trace.

use std::iter::FusedIterator;

use crate::compile::ExperimentRequest;
use crate::environment::{EnvironmentKind, ACTION_CHOICE_A, ACTION_CHOICE_B, ACTION_PRESS_LEVER};
use crate::float_fmt;
use crate::heatmap::VisitHeatmap;
use crate::results::{ActionCounts, ConditionSummary, SimulationResponse, SimulationStep};

pub const DEFAULT_HEATMAP_SIDE: usize = 5;

// ─────────────────────────────────────────────────────────────────────────
// Cumulative record
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CumulativePoint {
    TwoChoice { step: u64, cum_a: u64, cum_b: u64 },
    Grid { step: u64, cum_total: u64 },
}

impl CumulativePoint {
    pub fn step(&self) -> u64 {
        match *self {
            CumulativePoint::TwoChoice { step, .. } | CumulativePoint::Grid { step, .. } => step,
        }
    }

    /// Sum of every tracked counter at this point.
    pub fn total(&self) -> u64 {
        match *self {
            CumulativePoint::TwoChoice { cum_a, cum_b, .. } => cum_a + cum_b,
            CumulativePoint::Grid { cum_total, .. } => cum_total,
        }
    }
}

/// A lazily evaluated running count over a step trace. Each call to
/// [`CumulativeRecord::iter`] starts again from zero.
#[derive(Debug, Clone, Copy)]
pub struct CumulativeRecord<'a> {
    steps: &'a [SimulationStep],
    environment: EnvironmentKind,
}

impl<'a> CumulativeRecord<'a> {
    pub fn new(steps: &'a [SimulationStep], environment: EnvironmentKind) -> Self {
        Self { steps, environment }
    }

    pub fn environment(&self) -> EnvironmentKind {
        self.environment
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> CumulativeIter<'a> {
        CumulativeIter {
            steps: self.steps.iter(),
            environment: self.environment,
            first: 0,
            second: 0,
        }
    }

    /// Final point of the record.
    pub fn last(&self) -> Option<CumulativePoint> {
        self.iter().last()
    }
}

impl<'a> IntoIterator for &CumulativeRecord<'a> {
    type Item = CumulativePoint;
    type IntoIter = CumulativeIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct CumulativeIter<'a> {
    steps: std::slice::Iter<'a, SimulationStep>,
    environment: EnvironmentKind,
    first: u64,
    second: u64,
}

impl Iterator for CumulativeIter<'_> {
    type Item = CumulativePoint;

    fn next(&mut self) -> Option<Self::Item> {
        let s = self.steps.next()?;
        let point = match self.environment {
            EnvironmentKind::TwoChoice => {
                match s.action.as_str() {
                    ACTION_CHOICE_A => self.first += 1,
                    ACTION_CHOICE_B => self.second += 1,
                    _ => {}
                }
                CumulativePoint::TwoChoice {
                    step: s.step,
                    cum_a: self.first,
                    cum_b: self.second,
                }
            }
            EnvironmentKind::GridChamber => {
                if s.action == ACTION_PRESS_LEVER {
                    self.first += 1;
                }
                CumulativePoint::Grid {
                    step: s.step,
                    cum_total: self.first,
                }
            }
        };
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.steps.size_hint()
    }
}

impl ExactSizeIterator for CumulativeIter<'_> {}

impl FusedIterator for CumulativeIter<'_> {}

// ─────────────────────────────────────────────────────────────────────────
// Condition markers and breakdown
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionBoundary {
    pub start_step: u64,
    pub label: String,
}

/// One marker per condition after the first.
pub fn condition_boundaries(summaries: &[ConditionSummary]) -> Vec<ConditionBoundary> {
    summaries
        .iter()
        .skip(1)
        .map(|cs| ConditionBoundary {
            start_step: cs.start_step,
            label: cs.label.clone(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionBreakdownRow {
    pub condition: u32,
    pub label: String,
    pub start_step: u64,
    pub end_step: u64,
    pub total_steps: u64,
    pub total_reinforcements: u64,
    /// `reinforcement_rate * 100`, two decimals.
    pub rate_percent: f64,
    pub action_counts: Vec<(String, u64)>,
}

impl ConditionBreakdownRow {
    pub fn rate_label(&self) -> String {
        format!("{}%", float_fmt::fixed(self.rate_percent, 2))
    }
}

/// Per-condition table; only meaningful when there is more than one condition.
pub fn condition_breakdown(summaries: &[ConditionSummary]) -> Option<Vec<ConditionBreakdownRow>> {
    if summaries.len() <= 1 {
        return None;
    }
    let rows = summaries
        .iter()
        .map(|cs| ConditionBreakdownRow {
            condition: cs.condition,
            label: cs.label.clone(),
            start_step: cs.start_step,
            end_step: cs.end_step,
            total_steps: cs.total_steps,
            total_reinforcements: cs.total_reinforcements,
            rate_percent: float_fmt::round_to(cs.reinforcement_rate * 100.0, 2),
            action_counts: cs
                .action_counts
                .iter()
                .map(|(a, &n)| (a.clone(), n))
                .collect(),
        })
        .collect();
    Some(rows)
}

// ─────────────────────────────────────────────────────────────────────────
// Action proportions
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ActionProportion {
    pub action: String,
    pub count: u64,
    /// One-decimal percentage of all steps.
    pub percent: f64,
}

impl ActionProportion {
    pub fn percent_label(&self) -> String {
        format!("{}%", float_fmt::fixed(self.percent, 1))
    }
}

pub fn action_proportion(count: u64, total_steps: u64) -> f64 {
    if total_steps == 0 {
        return 0.0;
    }
    float_fmt::round_to(count as f64 / total_steps as f64 * 100.0, 1)
}

pub fn action_proportions(counts: &ActionCounts, total_steps: u64) -> Vec<ActionProportion> {
    counts
        .iter()
        .map(|(action, &count)| ActionProportion {
            action: action.clone(),
            count,
            percent: action_proportion(count, total_steps),
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────
// Report bundle
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: String,
}

/// Everything a results view needs, derived from one response.
#[derive(Debug, Clone)]
pub struct ResultsReport<'a> {
    pub summary: Vec<SummaryRow>,
    pub proportions: Vec<ActionProportion>,
    pub cumulative: CumulativeRecord<'a>,
    pub boundaries: Vec<ConditionBoundary>,
    pub breakdown: Option<Vec<ConditionBreakdownRow>>,
    pub heatmap: Option<VisitHeatmap>,
}

impl<'a> ResultsReport<'a> {
    pub fn build(response: &'a SimulationResponse, request: &ExperimentRequest) -> Self {
        let s = &response.summary;
        let summary = vec![
            SummaryRow {
                label: "Agent",
                value: s.agent.clone(),
            },
            SummaryRow {
                label: "Environment",
                value: s.environment.clone(),
            },
            SummaryRow {
                label: "Total Steps",
                value: s.total_steps.to_string(),
            },
            SummaryRow {
                label: "Total Reinforcements",
                value: s.total_reinforcements.to_string(),
            },
            SummaryRow {
                label: "Reinforcement Rate",
                value: float_fmt::percent(s.reinforcement_rate, 2),
            },
        ];

        let (rows, cols) = request
            .grid_dimensions()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((DEFAULT_HEATMAP_SIDE, DEFAULT_HEATMAP_SIDE));

        Self {
            summary,
            proportions: action_proportions(&s.action_counts, s.total_steps),
            cumulative: CumulativeRecord::new(&response.steps, request.environment),
            boundaries: condition_boundaries(&response.condition_summaries),
            breakdown: condition_breakdown(&response.condition_summaries),
            heatmap: VisitHeatmap::build(s.visit_counts.as_ref(), rows, cols),
        }
    }
}
