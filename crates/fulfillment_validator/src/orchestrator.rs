//! Partition × table orchestration.
//!
//! Within a partition, each catalogued table is loaded and validated on the
//! tokio blocking pool with a private report buffer. Buffers are merged in
//! catalog order once every task finished, then cross-table rules run over
//! the admitted tables. Partitions run one after another and share nothing.

use crate::{
    validate_cross_table, validator_for, BaseValidator, ContractEnforcer, RemovalCounts,
};
use fulfillment_core::{
    PipelineConfig, RuleCatalog, Table, TableConfig, TableSet, TableSink, TableSource,
    ValidationReport,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Result of enforcing one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEnforcement {
    pub partition: String,
    pub table: String,
    /// Rows written
    pub rows: usize,
    pub removed: RemovalCounts,
    /// Where the contracted table was written
    pub location: String,
}

/// Result of an enforcement run.
#[derive(Debug, Clone, Default)]
pub struct EnforcementRun {
    pub report: ValidationReport,
    /// Successfully enforced tables, in partition then catalog order
    pub tables: Vec<TableEnforcement>,
}

impl EnforcementRun {
    /// Returns true if no table failed.
    pub fn passed(&self) -> bool {
        self.report.passed()
    }
}

/// Runs validation and enforcement over every configured partition.
///
/// # Example
///
/// ```no_run
/// use fulfillment_core::{PipelineConfig, RuleCatalog, TableSource};
/// use fulfillment_validator::Orchestrator;
/// use std::sync::Arc;
///
/// # async fn run(source: Arc<dyn TableSource>) {
/// let orchestrator = Orchestrator::new(source, RuleCatalog::fulfillment(), PipelineConfig::default());
/// let report = orchestrator.validate().await;
/// if !report.passed() {
///     std::process::exit(1);
/// }
/// # }
/// ```
pub struct Orchestrator {
    source: Arc<dyn TableSource>,
    catalog: Arc<RuleCatalog>,
    config: PipelineConfig,
}

impl Orchestrator {
    /// Creates an orchestrator reading tables from `source`.
    pub fn new(source: Arc<dyn TableSource>, catalog: RuleCatalog, config: PipelineConfig) -> Self {
        Self {
            source,
            catalog: Arc::new(catalog),
            config,
        }
    }

    /// Returns the rule catalog.
    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Returns the pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Validates every partition. The run passed iff the report has no errors.
    pub async fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        for partition in &self.config.partitions {
            report.merge(self.validate_partition(partition).await);
        }

        info!(
            "Validation finished: {} error(s), {} warning(s)",
            report.errors().len(),
            report.warnings().len()
        );
        report
    }

    /// Validates one partition: load, base and role rules per table, then
    /// cross-table rules.
    pub async fn validate_partition(&self, partition: &str) -> ValidationReport {
        info!("Validating partition: {}", partition);

        let handles = self.spawn_per_table(partition, validate_table);

        let mut report = ValidationReport::new();
        let mut tables = TableSet::new();
        for (name, handle) in handles {
            match handle.await {
                Ok((buffer, admitted)) => {
                    report.merge(buffer);
                    if let Some(table) = admitted {
                        tables.insert(table);
                    }
                }
                Err(e) => report.add_error(format!("{name}: validation task failed: {e}")),
            }
        }

        debug!(
            "Partition {}: {} table(s) admitted to cross-table validation",
            partition,
            tables.len()
        );
        validate_cross_table(&tables, &self.catalog, &mut report);
        report
    }

    /// Enforces every table of every partition and writes the results to `sink`.
    pub async fn enforce(&self, sink: Arc<dyn TableSink>) -> EnforcementRun {
        let mut run = EnforcementRun::default();

        for partition in &self.config.partitions {
            info!("Enforcing contracts for partition: {}", partition);

            let sink = Arc::clone(&sink);
            let handles = self.spawn_per_table(
                partition,
                move |source: &dyn TableSource, partition: &str, name: &str, config: &TableConfig| {
                    enforce_table(source, sink.as_ref(), partition, name, config)
                },
            );

            for (name, handle) in handles {
                match handle.await {
                    Ok((buffer, enforced)) => {
                        run.report.merge(buffer);
                        run.tables.extend(enforced);
                    }
                    Err(e) => run
                        .report
                        .add_error(format!("{name}: enforcement task failed: {e}")),
                }
            }
        }

        info!(
            "Enforcement finished: {} table(s) written, {} error(s)",
            run.tables.len(),
            run.report.errors().len()
        );
        run
    }

    /// Starts one blocking task per catalogued table, returned in catalog order.
    fn spawn_per_table<F, T>(&self, partition: &str, work: F) -> Vec<(String, JoinHandle<T>)>
    where
        F: Fn(&dyn TableSource, &str, &str, &TableConfig) -> T + Clone + Send + 'static,
        T: Send + 'static,
    {
        self.catalog
            .tables()
            .map(|entry| {
                let source = Arc::clone(&self.source);
                let partition = partition.to_string();
                let name = entry.name.clone();
                let config = entry.config.clone();
                let work = work.clone();

                let handle = tokio::task::spawn_blocking({
                    let name = name.clone();
                    move || work(source.as_ref(), &partition, &name, &config)
                });
                (name, handle)
            })
            .collect()
    }
}

/// Loads `name` and applies base and role rules. Returns the table only if
/// base validation admitted it.
fn validate_table(
    source: &dyn TableSource,
    partition: &str,
    name: &str,
    config: &TableConfig,
) -> (ValidationReport, Option<Table>) {
    let mut report = ValidationReport::new();

    let Some(table) = load(source, partition, name, &mut report) else {
        return (report, None);
    };

    debug!("Validating {} ({} role, {} rows)", name, config.role, table.num_rows());
    if !BaseValidator::new().validate(&table, &config.primary_key, &mut report) {
        return (report, None);
    }
    validator_for(config.role).validate(&table, config, &mut report);

    (report, Some(table))
}

/// Loads `name`, enforces its contract and writes the result.
fn enforce_table(
    source: &dyn TableSource,
    sink: &dyn TableSink,
    partition: &str,
    name: &str,
    config: &TableConfig,
) -> (ValidationReport, Option<TableEnforcement>) {
    let mut report = ValidationReport::new();

    let Some(table) = load(source, partition, name, &mut report) else {
        return (report, None);
    };

    let outcome = match ContractEnforcer::new().enforce(&table, config) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Enforcement aborted for {}/{}: {}", partition, name, e);
            report.add_error(e.to_string());
            return (report, None);
        }
    };

    let location = match sink.write(partition, &outcome.table) {
        Ok(location) => location,
        Err(e) => {
            warn!("Write failed for {}/{}: {}", partition, name, e);
            report.add_error(e.to_string());
            return (report, None);
        }
    };

    report.add_info(outcome.summary());
    report.add_info(format!("Wrote {name} to {location}"));

    let enforced = TableEnforcement {
        partition: partition.to_string(),
        table: name.to_string(),
        rows: outcome.table.num_rows(),
        removed: outcome.removed,
        location,
    };
    (report, Some(enforced))
}

fn load(
    source: &dyn TableSource,
    partition: &str,
    name: &str,
    report: &mut ValidationReport,
) -> Option<Table> {
    match source.load(partition, name, report) {
        Ok(table) => Some(table.with_name(name)),
        Err(e) => {
            warn!("Skipping {}/{}: {}", partition, name, e);
            report.add_error(e.to_string());
            None
        }
    }
}
