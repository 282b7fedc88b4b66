//! Cross-platform application paths

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ClientError;

#[derive(Debug, Clone)]
pub struct AppPaths {
    data_dir: PathBuf,
}

impl AppPaths {
    pub fn new() -> Result<Self, ClientError> {
        let base = dirs::data_dir()
            .ok_or_else(|| ClientError::Config("could not determine data directory".into()))?;
        Self::with_data_dir(base.join("ao_sim"))
    }

    /// Use `data_dir` instead of the OS data directory, creating it if needed.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(ClientError::io(&data_dir))?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn experiment_file(&self) -> PathBuf {
        self.data_dir.join("experiment.json")
    }

    pub fn csv_download(&self) -> PathBuf {
        self.data_dir.join("simulation_results.csv")
    }

    pub fn json_download(&self) -> PathBuf {
        self.data_dir.join("simulation_results.json")
    }
}
