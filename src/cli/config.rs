//! Shared configuration types for CLI commands

use std::{fs::File, io::BufReader, path::Path, sync::Arc};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::{JsonRepository, MsgPackRepository},
    app::{AgentConfig, App, AppBuilder},
    pipeline::TrainingConfig,
    ports::ValueMapRepository,
};

/// Contents of a `--config` file for `train`
///
/// Every section and field is optional; command-line flags override values
/// read from the file.
///
/// ```json
/// {
///   "agent": { "learning_rate": 0.5, "exploration": { "mode": "probability", "value": 0.01 } },
///   "training": { "episodes": 10000, "window": 500, "blocking_expert": false }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainFileConfig {
    pub agent: AgentConfig,
    pub training: TrainingConfig,
}

impl TrainFileConfig {
    /// Read a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// On-disk format of a value table
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TableFormat {
    Msgpack,
    Json,
}

impl TableFormat {
    /// Pick the format from a file extension, defaulting to MessagePack
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => TableFormat::Json,
            _ => TableFormat::Msgpack,
        }
    }

    pub fn repository(self) -> Arc<dyn ValueMapRepository + Send + Sync> {
        match self {
            TableFormat::Msgpack => Arc::new(MsgPackRepository::new()),
            TableFormat::Json => Arc::new(JsonRepository::new()),
        }
    }
}

/// Build an app whose repository matches the table file at `path`
pub fn app_for(path: &Path, format: Option<TableFormat>) -> App {
    let format = format.unwrap_or_else(|| TableFormat::from_path(path));
    AppBuilder::new()
        .with_shared_repository(format.repository())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::td_learning::Exploration;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(TableFormat::from_path(Path::new("a.json")), TableFormat::Json);
        assert_eq!(TableFormat::from_path(Path::new("a.JSON")), TableFormat::Json);
        assert_eq!(
            TableFormat::from_path(Path::new("a.msgpack")),
            TableFormat::Msgpack
        );
        assert_eq!(TableFormat::from_path(Path::new("values")), TableFormat::Msgpack);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.json");
        std::fs::write(
            &path,
            r#"{"agent": {"exploration": {"mode": "period", "value": 100}}, "training": {"episodes": 20}}"#,
        )
        .unwrap();

        let config = TrainFileConfig::load(&path).unwrap();
        assert_eq!(config.agent.exploration, Exploration::Period(100));
        assert_eq!(config.agent.learning_rate, 0.5);
        assert_eq!(config.training.episodes, 20);
        assert_eq!(config.training.window, 500);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(TrainFileConfig::load(&dir.path().join("missing.json")).is_err());
    }
}
