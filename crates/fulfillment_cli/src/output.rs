use anyhow::Result;
use colored::*;
use fulfillment_core::{RuleCatalog, Severity, ValidationReport};
use fulfillment_validator::EnforcementRun;
use serde_json::json;

pub fn print_validation_report(report: &ValidationReport, format: &str) -> Result<()> {
    match format {
        "json" => print_json(&report.to_json()),
        _ => {
            print_text_report("VALIDATION REPORT", "Validation", report);
            Ok(())
        }
    }
}

pub fn print_enforcement_run(run: &EnforcementRun, format: &str) -> Result<()> {
    match format {
        "json" => {
            let mut output = run.report.to_json();
            output["tables"] = run
                .tables
                .iter()
                .map(|t| {
                    json!({
                        "partition": t.partition,
                        "table": t.table,
                        "rows": t.rows,
                        "location": t.location,
                        "removed": {
                            "duplicate_rows": t.removed.duplicate_rows,
                            "unparsable_timestamps": t.removed.unparsable_timestamps,
                            "temporal_violations": t.removed.temporal_violations,
                        }
                    })
                })
                .collect();
            print_json(&output)
        }
        _ => {
            print_text_report("ENFORCEMENT REPORT", "Enforcement", &run.report);
            print_enforced_tables(run);
            Ok(())
        }
    }
}

fn print_text_report(title: &str, label: &str, report: &ValidationReport) {
    println!("\n{}", "═".repeat(60));
    println!("{}", format!("  {title}").bold());
    println!("{}", "═".repeat(60));

    if report.passed() {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            format!("{label} PASSED").green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            format!("{label} FAILED").red().bold()
        );
    }

    if !report.is_empty() {
        println!();
        for (severity, message) in report.entries() {
            let prefix = match severity {
                Severity::Info => severity.prefix().blue(),
                Severity::Warning => severity.prefix().yellow().bold(),
                Severity::Error => severity.prefix().red().bold(),
            };
            println!("{prefix} {message}");
        }
    }

    println!("\n{}", "Summary:".bold());
    println!("  Total errors:   {}", report.errors().len());
    println!("  Total warnings: {}", report.warnings().len());
    println!("  Total info:     {}", report.info().len());
    println!("{}", "═".repeat(60));
}

fn print_enforced_tables(run: &EnforcementRun) {
    if run.tables.is_empty() {
        return;
    }

    println!("\n{}", "Contracted tables:".bold());
    println!(
        "  {:<10} {:<16} {:>8} {:>10} {:>11} {:>9}",
        "PARTITION", "TABLE", "ROWS", "DUPLICATE", "UNPARSABLE", "TEMPORAL"
    );
    for t in &run.tables {
        println!(
            "  {:<10} {:<16} {:>8} {:>10} {:>11} {:>9}",
            t.partition,
            t.table,
            t.rows,
            t.removed.duplicate_rows,
            t.removed.unparsable_timestamps,
            t.removed.temporal_violations
        );
    }
}

pub fn print_catalog(catalog: &RuleCatalog, format: &str) -> Result<()> {
    if format == "json" {
        return print_json(&serde_json::to_value(catalog)?);
    }

    println!("\n{}", "Tables:".bold());
    for entry in catalog.tables() {
        println!(
            "  {:<16} {:<20} [{}]",
            entry.name,
            entry.config.role.as_str(),
            entry.config.primary_key.join(", ")
        );
    }

    if !catalog.references().is_empty() {
        println!("\n{}", "References:".bold());
        for reference in catalog.references() {
            println!("  {reference}");
        }
    }

    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
