//! Service client, local persistence and text reports for `ao_sim`.

pub mod client;
pub mod edit;
pub mod error;
pub mod paths;
pub mod report;
pub mod settings;

pub use client::SimulationClient;
pub use error::ClientError;
pub use paths::AppPaths;
pub use settings::ClientSettings;
