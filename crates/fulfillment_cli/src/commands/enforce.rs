use crate::output;
use anyhow::{Context, Result};
use fulfillment_loader::{CsvTableSink, CsvTableSource};
use fulfillment_validator::Orchestrator;
use std::sync::Arc;

pub async fn execute(
    catalog_path: Option<&str>,
    raw_path: Option<&str>,
    output_path: Option<&str>,
    include_test: bool,
    format: &str,
) -> Result<()> {
    let catalog = super::load_catalog(catalog_path)?;
    let config = super::pipeline_config(raw_path, output_path, include_test)?;
    config
        .validate_output()
        .context("Refusing to write contracted tables")?;

    if format != "json" {
        output::print_info(&format!(
            "Enforcing contracts from {} into {}",
            config.raw_base_path.display(),
            config.contracted_base_path.display()
        ));
    }

    let source = Arc::new(CsvTableSource::from_config(&config));
    let sink = Arc::new(CsvTableSink::from_config(&config));
    let orchestrator = Orchestrator::new(source, catalog, config);
    let run = orchestrator.enforce(sink).await;

    output::print_enforcement_run(&run, format)?;

    if !run.passed() {
        std::process::exit(1);
    }

    Ok(())
}
