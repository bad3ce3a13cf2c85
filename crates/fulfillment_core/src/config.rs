//! Pipeline configuration.
//!
//! Built once at startup and handed to the orchestrator; no other component
//! reads the environment.

use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Partition that is always processed.
pub const TRAIN_PARTITION: &str = "train";
/// Partition enabled by `VALIDATE_TEST=true`.
pub const TEST_PARTITION: &str = "test";

/// Default location of the raw partitions.
pub const DEFAULT_RAW_BASE_PATH: &str = "data/raw";
/// Default location of the contracted output.
pub const DEFAULT_CONTRACTED_BASE_PATH: &str = "data/contracted";

/// Where raw data lives, where contracted data goes, and which partitions to process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding one subdirectory per partition
    pub raw_base_path: PathBuf,

    /// Directory receiving contracted tables, one subdirectory per partition
    pub contracted_base_path: PathBuf,

    /// Partitions in processing order
    pub partitions: Vec<String>,
}

impl PipelineConfig {
    /// Creates a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Builds the configuration from process environment variables.
    ///
    /// - `RAW_DATA_BASE_PATH` (default `data/raw`)
    /// - `CONTRACTED_DATA_BASE_PATH` (default `data/contracted`)
    /// - `VALIDATE_TEST`: `true` (any case) adds the `test` partition
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let include_test = lookup("VALIDATE_TEST")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let mut builder = PipelineConfig::builder().include_test(include_test);
        if let Some(raw) = lookup("RAW_DATA_BASE_PATH") {
            builder = builder.raw_base_path(raw);
        }
        if let Some(contracted) = lookup("CONTRACTED_DATA_BASE_PATH") {
            builder = builder.contracted_base_path(contracted);
        }
        builder.build()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.partitions.is_empty() {
            return Err(CoreError::InvalidConfig(
                "at least one partition is required".to_string(),
            ));
        }

        for (idx, partition) in self.partitions.iter().enumerate() {
            if partition.trim().is_empty() {
                return Err(CoreError::InvalidConfig(
                    "partition names cannot be empty".to_string(),
                ));
            }
            if self.partitions[..idx].contains(partition) {
                return Err(CoreError::InvalidConfig(format!(
                    "partition '{partition}' is listed twice"
                )));
            }
        }

        Ok(())
    }

    /// Checks that writing contracted tables cannot overwrite raw input.
    ///
    /// Only runs that write output need this; validation reads the raw
    /// partitions and may point at a contracted directory.
    pub fn validate_output(&self) -> Result<()> {
        if self.raw_base_path == self.contracted_base_path {
            return Err(CoreError::InvalidConfig(format!(
                "contracted output path must differ from raw input path ({})",
                self.raw_base_path.display()
            )));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            raw_base_path: PathBuf::from(DEFAULT_RAW_BASE_PATH),
            contracted_base_path: PathBuf::from(DEFAULT_CONTRACTED_BASE_PATH),
            partitions: vec![TRAIN_PARTITION.to_string()],
        }
    }
}

/// Builder for `PipelineConfig`.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    raw_base_path: Option<PathBuf>,
    contracted_base_path: Option<PathBuf>,
    partitions: Option<Vec<String>>,
    include_test: bool,
}

impl PipelineConfigBuilder {
    /// Sets the raw data directory.
    pub fn raw_base_path(mut self, path: impl AsRef<Path>) -> Self {
        self.raw_base_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the contracted output directory.
    pub fn contracted_base_path(mut self, path: impl AsRef<Path>) -> Self {
        self.contracted_base_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Replaces the partition list.
    pub fn partitions<I, S>(mut self, partitions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.partitions = Some(partitions.into_iter().map(Into::into).collect());
        self
    }

    /// Appends the `test` partition when `include` is true.
    pub fn include_test(mut self, include: bool) -> Self {
        self.include_test = include;
        self
    }

    /// Builds the `PipelineConfig`.
    ///
    /// Returns an error if the resulting configuration is invalid.
    pub fn build(self) -> Result<PipelineConfig> {
        let defaults = PipelineConfig::default();
        let mut partitions = self.partitions.unwrap_or(defaults.partitions);
        if self.include_test && !partitions.iter().any(|p| p == TEST_PARTITION) {
            partitions.push(TEST_PARTITION.to_string());
        }

        let config = PipelineConfig {
            raw_base_path: self.raw_base_path.unwrap_or(defaults.raw_base_path),
            contracted_base_path: self
                .contracted_base_path
                .unwrap_or(defaults.contracted_base_path),
            partitions,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.partitions, vec!["train"]);
        assert_eq!(config.raw_base_path, PathBuf::from("data/raw"));
    }

    #[test]
    fn test_validate_test_toggle() {
        let config =
            PipelineConfig::from_lookup(lookup_from(&[("VALIDATE_TEST", "TRUE")])).unwrap();
        assert_eq!(config.partitions, vec!["train", "test"]);

        let config =
            PipelineConfig::from_lookup(lookup_from(&[("VALIDATE_TEST", "yes")])).unwrap();
        assert_eq!(config.partitions, vec!["train"]);
    }

    #[test]
    fn test_paths_from_lookup() {
        let config = PipelineConfig::from_lookup(lookup_from(&[
            ("RAW_DATA_BASE_PATH", "/srv/raw"),
            ("CONTRACTED_DATA_BASE_PATH", "/srv/contracted"),
        ]))
        .unwrap();
        assert_eq!(config.raw_base_path, PathBuf::from("/srv/raw"));
        assert_eq!(config.contracted_base_path, PathBuf::from("/srv/contracted"));
    }

    #[test]
    fn test_output_must_not_overwrite_raw_data() {
        let config = PipelineConfig::builder()
            .raw_base_path("data/contracted")
            .contracted_base_path("data/contracted")
            .build()
            .unwrap();
        assert!(matches!(
            config.validate_output(),
            Err(CoreError::InvalidConfig(_))
        ));
        assert!(PipelineConfig::default().validate_output().is_ok());
    }

    #[test]
    fn test_rejects_bad_partitions() {
        assert!(
            PipelineConfig::builder()
                .partitions(Vec::<String>::new())
                .build()
                .is_err()
        );
        assert!(
            PipelineConfig::builder()
                .partitions(["train", "train"])
                .build()
                .is_err()
        );
        let config = PipelineConfig::builder()
            .partitions(["train", "test"])
            .include_test(true)
            .build()
            .unwrap();
        assert_eq!(config.partitions, vec!["train", "test"]);
    }
}
