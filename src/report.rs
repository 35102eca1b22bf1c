use crate::aggregate::Snapshot;
use crate::frequency::{top_key, FrequencyTable};
use serde::Serialize;
use std::fmt;

/// Finalized summary of one analysis pass. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    total: u64,
    errors: u64,
    top_address: Option<String>,
    top_path: Option<String>,
    status_table: FrequencyTable,
}

impl Report {
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            total: snapshot.total,
            errors: snapshot.errors,
            top_address: top_key(&snapshot.addresses).map(str::to_string),
            top_path: top_key(&snapshot.paths).map(str::to_string),
            status_table: snapshot.statuses,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Lines whose status was 404 or 500.
    pub fn errors(&self) -> u64 {
        self.errors
    }

    pub fn top_address(&self) -> Option<&str> {
        self.top_address.as_deref()
    }

    pub fn top_path(&self) -> Option<&str> {
        self.top_path.as_deref()
    }

    pub fn top_status(&self) -> Option<&str> {
        top_key(&self.status_table)
    }

    pub fn status_table(&self) -> &FrequencyTable {
        &self.status_table
    }
}

/// Plain-text dashboard: headline counters, then the status breakdown.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Requests:   {}", self.total)?;
        writeln!(f, "Errors (404/500): {}", self.errors)?;
        writeln!(f, "Top IP:           {}", self.top_address().unwrap_or("N/A"))?;
        writeln!(f, "Top URL:          {}", self.top_path().unwrap_or("N/A"))?;
        writeln!(f, "Status Code Breakdown:")?;
        if self.status_table.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for (status, count) in self.status_table.iter() {
            writeln!(f, "  {status:<6} {count}")?;
        }
        Ok(())
    }
}
