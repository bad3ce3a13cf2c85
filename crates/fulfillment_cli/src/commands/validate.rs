use crate::output;
use anyhow::Result;
use fulfillment_loader::CsvTableSource;
use fulfillment_validator::Orchestrator;
use std::sync::Arc;

pub async fn execute(
    catalog_path: Option<&str>,
    raw_path: Option<&str>,
    include_test: bool,
    format: &str,
) -> Result<()> {
    let catalog = super::load_catalog(catalog_path)?;
    let config = super::pipeline_config(raw_path, None, include_test)?;

    if format != "json" {
        output::print_info(&format!(
            "Validating {} table(s) in {} across partition(s): {}",
            catalog.len(),
            config.raw_base_path.display(),
            config.partitions.join(", ")
        ));
    }

    let source = Arc::new(CsvTableSource::from_config(&config));
    let orchestrator = Orchestrator::new(source, catalog, config);
    let report = orchestrator.validate().await;

    output::print_validation_report(&report, format)?;

    if !report.passed() {
        std::process::exit(1);
    }

    Ok(())
}
