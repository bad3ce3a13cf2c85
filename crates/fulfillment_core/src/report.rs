//! Validation report accumulated over one run.
//!
//! A [`ValidationReport`] has three independent append-only channels (errors,
//! warnings, info). It also remembers the order in which messages were
//! emitted across channels, so a printed report reads in the same order the
//! checks ran. Only the error channel decides pass/fail.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

/// Level of a report message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Returns the line prefix used when printing a message of this level.
    pub fn prefix(&self) -> &'static str {
        match self {
            Severity::Info => "[INFO]",
            Severity::Warning => "[WARNING]",
            Severity::Error => "[ERROR]",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Report of one validation or enforcement run.
///
/// # Example
///
/// ```rust
/// use fulfillment_core::{Severity, ValidationReport};
///
/// let mut report = ValidationReport::new();
/// report.add_info("Loaded df_Orders file: df_Orders.csv (3 rows)");
/// report.add_error("df_Orders: 1 duplicated primary key value(s)");
///
/// assert!(!report.passed());
/// let order: Vec<Severity> = report.entries().map(|(level, _)| level).collect();
/// assert_eq!(order, vec![Severity::Info, Severity::Error]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Error messages; any entry fails the run
    errors: Vec<String>,

    /// Warning messages
    warnings: Vec<String>,

    /// Informational messages
    info: Vec<String>,

    /// Emission order across channels
    #[serde(skip)]
    order: Vec<Severity>,
}

impl ValidationReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an error to the report.
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.push(Severity::Error, error.into());
    }

    /// Adds a warning to the report.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.push(Severity::Warning, warning.into());
    }

    /// Adds an informational message to the report.
    pub fn add_info(&mut self, info: impl Into<String>) {
        self.push(Severity::Info, info.into());
    }

    /// Adds a message at the given level.
    pub fn push(&mut self, severity: Severity, message: String) {
        match severity {
            Severity::Error => self.errors.push(message),
            Severity::Warning => self.warnings.push(message),
            Severity::Info => self.info.push(message),
        }
        self.order.push(severity);
    }

    /// Appends every message of `other`, keeping its emission order.
    pub fn merge(&mut self, other: ValidationReport) {
        let mut errors = other.errors.into_iter();
        let mut warnings = other.warnings.into_iter();
        let mut info = other.info.into_iter();

        for severity in other.order {
            let message = match severity {
                Severity::Error => errors.next(),
                Severity::Warning => warnings.next(),
                Severity::Info => info.next(),
            };
            if let Some(message) = message {
                self.push(severity, message);
            }
        }
    }

    /// Returns the error channel.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Returns the warning channel.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Returns the info channel.
    pub fn info(&self) -> &[String] {
        &self.info
    }

    /// Returns true if the run produced no errors.
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of messages across channels.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no message was recorded.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates all messages in emission order.
    pub fn entries(&self) -> impl Iterator<Item = (Severity, &str)> + '_ {
        let mut cursors = [0usize; 3];
        self.order.iter().filter_map(move |severity| {
            let (channel, slot) = match severity {
                Severity::Error => (&self.errors, 0),
                Severity::Warning => (&self.warnings, 1),
                Severity::Info => (&self.info, 2),
            };
            let message = channel.get(cursors[slot])?;
            cursors[slot] += 1;
            Some((*severity, message.as_str()))
        })
    }

    /// Renders the report as a JSON document with a summary block.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "passed": self.passed(),
            "errors": self.errors,
            "warnings": self.warnings,
            "info": self.info,
            "summary": {
                "error_count": self.errors.len(),
                "warning_count": self.warnings.len(),
                "info_count": self.info.len(),
            }
        })
    }
}
