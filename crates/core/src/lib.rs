//! # ao_sim
//!
//! Experiment configuration and results aggregation for operant-conditioning
//! simulations.
//!
//! The simulation itself runs in an external service. This crate builds the
//! request that service expects and turns its step trace back into analysis
//! artifacts: cumulative records, per-condition breakdowns and visit heatmaps.
//! Every operation is synchronous and total.
//!
//! ## Quick Start
//!
//! ```
//! use ao_sim::prelude::*;
//!
//! let config = ExperimentConfig::default()
//!     .with_environment(EnvironmentKind::GridChamber)
//!     .with_seed("42")
//!     .with_multi_condition(true)
//!     .add_condition();
//!
//! let request = config.compile();
//! assert_eq!(request.conditions.as_ref().map(Vec::len), Some(2));
//! assert_eq!(request.seed, Some(42));
//! assert!(request.grid_config.is_some());
//! ```
//!
//! ## Modules
//!
//! - [`schedule`]: reinforcement schedule value objects
//! - [`condition`]: conditions and the bounded condition sequence
//! - [`grid`]: grid-chamber layout and legacy migration
//! - [`params`]: per-algorithm parameter blocks
//! - [`config`]: the experiment configuration and its reducers
//! - [`compile`]: request compilation
//! - [`results`]: service response types
//! - [`aggregate`]: cumulative records, boundaries, breakdowns
//! - [`heatmap`]: dense visit grids

pub mod aggregate;
pub mod compile;
pub mod condition;
pub mod config;
pub mod environment;
pub mod float_fmt;
pub mod grid;
pub mod heatmap;
pub mod input;
pub mod params;
pub mod results;
pub mod schedule;

/// Prelude for convenient imports.
///
/// ```
/// use ao_sim::prelude::*;
/// ```
pub mod prelude {
    pub use crate::aggregate::{
        ActionProportion, ConditionBoundary, ConditionBreakdownRow, CumulativePoint,
        CumulativeRecord, ResultsReport, SummaryRow,
    };
    pub use crate::compile::{ConditionPayload, ExperimentRequest};
    pub use crate::condition::{Condition, ConditionSchedules, ConditionSequence, SingleModeSchedules};
    pub use crate::config::ExperimentConfig;
    pub use crate::environment::{AlgorithmKind, EnvironmentKind};
    pub use crate::grid::{GridConfig, LegacyGrid, Lever, LeverGrid, LeverSchedule};
    pub use crate::heatmap::VisitHeatmap;
    pub use crate::params::{AlgorithmParams, EtbdParams, MprParams, ParamSet, QLearningParams};
    pub use crate::results::{
        ConditionSummary, SimulationResponse, SimulationStep, SummaryStats, VisitCounts,
    };
    pub use crate::schedule::{Schedule, ScheduleKind};
}
