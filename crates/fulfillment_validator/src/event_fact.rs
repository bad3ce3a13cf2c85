//! Timeline rules for event-fact tables.
//!
//! All four timeline columns must be present and fully parsable. Only then are
//! the ordering rules checked, each independently of the other.

use crate::timestamp::parse_column;
use crate::RoleValidator;
use chrono::NaiveDateTime;
use fulfillment_core::{Role, Table, TableConfig, TimelineColumns, ValidationReport};

/// Parsed timeline columns, one entry per row.
#[derive(Debug, Clone)]
pub(crate) struct ParsedTimeline {
    pub columns: [(String, Vec<Option<NaiveDateTime>>); 4],
}

impl ParsedTimeline {
    /// Parses the timeline columns, or returns the names of the missing ones.
    pub fn parse(table: &Table, timeline: &TimelineColumns) -> Result<Self, Vec<String>> {
        let missing: Vec<String> = timeline
            .all()
            .into_iter()
            .filter(|c| !table.has_column(c))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        let columns = timeline.all().map(|name| {
            let values = table
                .column_index(name)
                .map(|idx| parse_column(table, idx))
                .unwrap_or_default();
            (name.to_string(), values)
        });

        Ok(Self { columns })
    }

    pub fn purchase(&self) -> &[Option<NaiveDateTime>] {
        &self.columns[0].1
    }

    pub fn approval(&self) -> &[Option<NaiveDateTime>] {
        &self.columns[1].1
    }

    pub fn delivery(&self) -> &[Option<NaiveDateTime>] {
        &self.columns[2].1
    }

    /// Returns true when every timeline value of `row` parsed.
    pub fn row_parsed(&self, row: usize) -> bool {
        self.columns.iter().all(|(_, values)| values[row].is_some())
    }

    /// Returns true when approval or delivery of `row` precedes purchase.
    pub fn row_out_of_order(&self, row: usize) -> bool {
        precedes(self.approval()[row], self.purchase()[row])
            || precedes(self.delivery()[row], self.purchase()[row])
    }
}

fn precedes(event: Option<NaiveDateTime>, purchase: Option<NaiveDateTime>) -> bool {
    matches!((event, purchase), (Some(e), Some(p)) if e < p)
}

fn count_preceding(events: &[Option<NaiveDateTime>], purchases: &[Option<NaiveDateTime>]) -> usize {
    events
        .iter()
        .zip(purchases)
        .filter(|(e, p)| precedes(**e, **p))
        .count()
}

fn range(values: &[Option<NaiveDateTime>]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let mut parsed = values.iter().flatten();
    let first = *parsed.next()?;
    Some(parsed.fold((first, first), |(lo, hi), v| (lo.min(*v), hi.max(*v))))
}

/// Validates event-fact tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct EventFactValidator;

impl RoleValidator for EventFactValidator {
    fn role(&self) -> Role {
        Role::EventFact
    }

    fn validate(&self, table: &Table, config: &TableConfig, report: &mut ValidationReport) {
        let name = table.name();

        let timeline = match ParsedTimeline::parse(table, &config.timeline) {
            Ok(timeline) => timeline,
            Err(missing) => {
                report.add_error(format!(
                    "{name}: missing required timestamp column(s): {}",
                    missing.join(", ")
                ));
                return;
            }
        };

        let mut parsing_failed = false;
        for (column, values) in &timeline.columns {
            let invalid = values.iter().filter(|v| v.is_none()).count();
            if invalid > 0 {
                parsing_failed = true;
                report.add_error(format!(
                    "{name}: {invalid} unparsable timestamp value(s) in `{column}`"
                ));
            }
        }

        if parsing_failed {
            return;
        }

        if let (Some((p_lo, p_hi)), Some((d_lo, d_hi))) =
            (range(timeline.purchase()), range(timeline.delivery()))
        {
            report.add_info(format!(
                "{name}: purchases span {p_lo} to {p_hi}, deliveries span {d_lo} to {d_hi}"
            ));
        }

        let approval_first = count_preceding(timeline.approval(), timeline.purchase());
        if approval_first > 0 {
            report.add_error(format!(
                "{name}: {approval_first} record(s) where approval precedes purchase"
            ));
        }

        let delivery_first = count_preceding(timeline.delivery(), timeline.purchase());
        if delivery_first > 0 {
            report.add_error(format!(
                "{name}: {delivery_first} record(s) where delivery precedes purchase"
            ));
        }
    }
}
