use crate::extract::ParsedFields;
use crate::frequency::FrequencyTable;

/// Status codes counted as errors. Other 4xx/5xx codes are not.
pub const ERROR_STATUSES: [&str; 2] = ["404", "500"];

pub fn is_error_status(status: &str) -> bool {
    ERROR_STATUSES.contains(&status)
}

/// Running counts for one analysis pass. Owned by a single pipeline run.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    total: u64,
    errors: u64,
    addresses: FrequencyTable,
    paths: FrequencyTable,
    statuses: FrequencyTable,
}

/// Point-in-time copy of an [`Aggregator`]'s state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub total: u64,
    pub errors: u64,
    pub addresses: FrequencyTable,
    pub paths: FrequencyTable,
    pub statuses: FrequencyTable,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.total = 0;
        self.errors = 0;
        self.addresses.clear();
        self.paths.clear();
        self.statuses.clear();
    }

    /// Records one line. `total` moves on every call, whether or not any
    /// field matched.
    pub fn observe(&mut self, fields: &ParsedFields<'_>) {
        self.total += 1;
        if let Some(address) = fields.address {
            self.addresses.increment(address);
        }
        if let Some(path) = fields.path {
            self.paths.increment(path);
        }
        if let Some(status) = fields.status {
            self.statuses.increment(status);
            if is_error_status(status) {
                self.errors += 1;
            }
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn errors(&self) -> u64 {
        self.errors
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            total: self.total,
            errors: self.errors,
            addresses: self.addresses.clone(),
            paths: self.paths.clone(),
            statuses: self.statuses.clone(),
        }
    }

    /// Consumes the aggregator without copying its tables.
    pub fn into_snapshot(self) -> Snapshot {
        Snapshot {
            total: self.total,
            errors: self.errors,
            addresses: self.addresses,
            paths: self.paths,
            statuses: self.statuses,
        }
    }
}
