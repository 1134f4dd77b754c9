use std::fmt;

/// Result of handling one item inside a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Synced,
    /// Nothing to do: the row is untracked or the provider has no record.
    Skipped,
    Failed(String),
}

/// Aggregated counts of a batch run.
///
/// `last_id` is the id of the last item handled, whatever its outcome, and
/// is the cursor to resume from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub synced: usize,
    pub skipped: usize,
    pub failed: usize,
    pub last_id: Option<i64>,
    pub cancelled: bool,
    pub failures: Vec<(i64, String)>,
}

impl BatchReport {
    pub fn record(&mut self, id: i64, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Synced => self.synced += 1,
            ItemOutcome::Skipped => self.skipped += 1,
            ItemOutcome::Failed(error) => {
                self.failed += 1;
                self.failures.push((id, error));
            }
        }
        self.last_id = Some(id);
    }

    /// Items that completed without error.
    pub fn processed(&self) -> usize {
        self.synced + self.skipped
    }

    /// Items that produced a new or updated row.
    pub fn imported(&self) -> usize {
        self.synced
    }

    pub fn attempted(&self) -> usize {
        self.synced + self.skipped + self.failed
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "synced={} skipped={} failed={}",
            self.synced, self.skipped, self.failed
        )?;
        if let Some(last_id) = self.last_id {
            write!(f, " last_id={last_id}")?;
        }
        if self.cancelled {
            f.write_str(" (cancelled)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processed_excludes_failures() {
        let mut report = BatchReport::default();
        report.record(1, ItemOutcome::Synced);
        report.record(2, ItemOutcome::Skipped);
        report.record(3, ItemOutcome::Failed("boom".into()));

        assert_eq!(report.processed(), 2);
        assert_eq!(report.attempted(), 3);
        assert_eq!(report.last_id, Some(3));
        assert_eq!(report.failures, vec![(3, "boom".to_string())]);
        assert_eq!(report.to_string(), "synced=1 skipped=1 failed=1 last_id=3");
    }
}
