//! Outcome of one orchestrated run

use uuid::Uuid;

use super::aggregator::UnitFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Import,
    Delete,
}

impl std::fmt::Display for RunKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunKind::Import => write!(f, "import"),
            RunKind::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    CompletedWithErrors,
}

/// What a successful unit did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOutcome {
    Created { published: bool },
    Revised { published: bool },
    Deleted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub run_id: Uuid,
    pub kind: RunKind,
    pub model_id: String,
    pub status: RunStatus,
    pub total: usize,
    pub created: usize,
    pub revised: usize,
    pub published: usize,
    pub deleted: usize,
    /// Entries left out of a delete run because they carry no id
    pub skipped: usize,
    pub failed: usize,
    pub errors: Vec<UnitFailure>,
}

impl RunReport {
    pub fn new(run_id: Uuid, kind: RunKind, model_id: impl Into<String>, total: usize) -> Self {
        Self {
            run_id,
            kind,
            model_id: model_id.into(),
            status: RunStatus::Completed,
            total,
            created: 0,
            revised: 0,
            published: 0,
            deleted: 0,
            skipped: 0,
            failed: 0,
            errors: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: UnitOutcome) {
        match outcome {
            UnitOutcome::Created { published } => {
                self.created += 1;
                self.published += published as usize;
            }
            UnitOutcome::Revised { published } => {
                self.revised += 1;
                self.published += published as usize;
            }
            UnitOutcome::Deleted => self.deleted += 1,
        }
    }

    /// Attach the run's errors and settle the final status
    pub fn finish(mut self, errors: Vec<UnitFailure>) -> Self {
        self.errors = errors;
        self.status = if self.failed == 0 && self.errors.is_empty() {
            RunStatus::Completed
        } else {
            RunStatus::CompletedWithErrors
        };
        self
    }

    pub fn has_errors(&self) -> bool {
        self.status == RunStatus::CompletedWithErrors
    }

    pub fn summary(&self) -> String {
        match self.kind {
            RunKind::Import => format!(
                "{} of {} entries: {} created, {} revised, {} published, {} failed",
                self.kind, self.total, self.created, self.revised, self.published, self.failed
            ),
            RunKind::Delete => format!(
                "{} of {} entries: {} deleted, {} skipped, {} failed",
                self.kind, self.total, self.deleted, self.skipped, self.failed
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::services::migration::aggregator::Stage;

    #[test]
    fn test_tally_and_status() {
        let mut report = RunReport::new(Uuid::new_v4(), RunKind::Import, "article", 3);
        report.record(UnitOutcome::Created { published: true });
        report.record(UnitOutcome::Revised { published: false });
        report.failed += 1;

        let report = report.finish(vec![UnitFailure::api(
            "Foo",
            Stage::Create,
            ApiError::malformed("x"),
        )]);

        assert_eq!(report.created, 1);
        assert_eq!(report.revised, 1);
        assert_eq!(report.published, 1);
        assert_eq!(report.status, RunStatus::CompletedWithErrors);
        assert_eq!(
            report.summary(),
            "import of 3 entries: 1 created, 1 revised, 1 published, 1 failed"
        );
    }

    #[test]
    fn test_clean_run_completes() {
        let mut report = RunReport::new(Uuid::new_v4(), RunKind::Delete, "article", 2);
        report.record(UnitOutcome::Deleted);
        report.skipped = 1;

        let report = report.finish(Vec::new());

        assert!(!report.has_errors());
        assert_eq!(
            report.summary(),
            "delete of 2 entries: 1 deleted, 1 skipped, 0 failed"
        );
    }
}
