pub mod catalog;
pub mod enforce;
pub mod validate;

use anyhow::{Context, Result};
use fulfillment_core::{PipelineConfig, RuleCatalog, TEST_PARTITION};
use fulfillment_parser::parse_file;
use std::path::Path;
use tracing::info;

/// Loads the catalog from `path`, or the built-in one.
pub fn load_catalog(path: Option<&str>) -> Result<RuleCatalog> {
    match path {
        Some(path) => {
            info!("Loading rule catalog: {}", path);
            parse_file(Path::new(path))
                .with_context(|| format!("Failed to parse catalog file: {}", path))
        }
        None => Ok(RuleCatalog::fulfillment()),
    }
}

/// Builds the pipeline configuration from the environment, then applies
/// command-line overrides.
pub fn pipeline_config(
    raw_path: Option<&str>,
    output_path: Option<&str>,
    include_test: bool,
) -> Result<PipelineConfig> {
    let env = PipelineConfig::from_env().context("Invalid pipeline environment")?;
    let include_test = include_test || env.partitions.iter().any(|p| p == TEST_PARTITION);

    let mut builder = PipelineConfig::builder()
        .raw_base_path(&env.raw_base_path)
        .contracted_base_path(&env.contracted_base_path)
        .include_test(include_test);
    if let Some(raw) = raw_path {
        builder = builder.raw_base_path(raw);
    }
    if let Some(output) = output_path {
        builder = builder.contracted_base_path(output);
    }

    builder.build().context("Invalid pipeline configuration")
}
