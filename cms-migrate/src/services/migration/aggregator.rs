//! Run-scoped accumulator for unit failures

use std::sync::Mutex;

use crate::api::ApiError;

/// Step of a unit of work that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Create,
    Revise,
    Publish,
    Delete,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Create => "create",
            Stage::Revise => "revise",
            Stage::Publish => "publish",
            Stage::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FailureCause {
    Api(ApiError),
    Panicked(String),
}

impl std::fmt::Display for FailureCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureCause::Api(error) => write!(f, "{}", error),
            FailureCause::Panicked(message) => write!(f, "unit panicked: {}", message),
        }
    }
}

/// One recorded failure: which entry, at which step, and why
#[derive(Debug, Clone, PartialEq)]
pub struct UnitFailure {
    pub entry: String,
    pub stage: Stage,
    pub cause: FailureCause,
}

impl UnitFailure {
    pub fn api(entry: impl Into<String>, stage: Stage, error: ApiError) -> Self {
        Self {
            entry: entry.into(),
            stage,
            cause: FailureCause::Api(error),
        }
    }

    pub fn panicked(entry: impl Into<String>, stage: Stage, message: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
            stage,
            cause: FailureCause::Panicked(message.into()),
        }
    }
}

impl std::fmt::Display for UnitFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Failed to {} '{}': {}",
            self.stage.label(),
            self.entry,
            self.cause
        )
    }
}

/// Append-only failure list shared by the concurrent units of one run
///
/// No deduplication; the order of concurrent appends is unspecified.
#[derive(Debug, Default)]
pub struct ErrorAggregator {
    errors: Mutex<Vec<UnitFailure>>,
}

impl ErrorAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, failure: UnitFailure) {
        log::warn!("{}", failure);
        self.errors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(failure);
    }

    /// Take every accumulated failure, leaving the aggregator empty
    pub fn drain(&self) -> Vec<UnitFailure> {
        std::mem::take(&mut *self.errors.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn len(&self) -> usize {
        self.errors.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_append_and_drain() {
        let errors = ErrorAggregator::new();
        assert!(errors.is_empty());

        errors.append(UnitFailure::api("Foo", Stage::Create, ApiError::malformed("x")));
        errors.append(UnitFailure::api("Foo", Stage::Create, ApiError::malformed("x")));
        assert_eq!(errors.len(), 2);

        let drained = errors.drain();
        assert_eq!(drained.len(), 2, "duplicates are kept");
        assert!(errors.is_empty());
        assert!(errors.drain().is_empty());
    }

    #[test]
    fn test_concurrent_append() {
        let errors = Arc::new(ErrorAggregator::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let errors = Arc::clone(&errors);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        errors.append(UnitFailure::panicked(
                            format!("{}-{}", t, i),
                            Stage::Delete,
                            "boom",
                        ));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut labels: Vec<String> = errors.drain().into_iter().map(|f| f.entry).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 400);
    }

    #[test]
    fn test_failure_display() {
        let failure = UnitFailure::api(
            "Foo",
            Stage::Publish,
            ApiError::transport("connection reset", None),
        );
        assert_eq!(
            failure.to_string(),
            "Failed to publish 'Foo': Transport error: connection reset"
        );
    }
}
