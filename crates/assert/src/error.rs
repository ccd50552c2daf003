// Assertion Error Types

use procflow_core::EngineError;
use thiserror::Error;

/// Failure of a fluent assertion.
///
/// Every variant renders the full story in its message: a compact descriptor
/// of the entity under test plus the expected and actual values. Tests
/// propagate these with `?` or unwrap them; either way the message reaches
/// the test runner intact.
#[derive(Error, Debug)]
pub enum AssertionError {
    /// The wrapped entity was absent; checked before any attribute access
    #[error("expecting a {entity} to be present, but none was found")]
    NoEntity { entity: &'static str },

    /// The caller passed an empty expected value
    #[error("expecting a non-empty {argument} value to compare against")]
    EmptyExpectation { argument: &'static str },

    /// Attribute value differs from the expectation
    #[error("expecting {subject} to have {property} '{expected}', but found it to be '{actual}'")]
    PropertyMismatch {
        subject: String,
        property: &'static str,
        expected: String,
        actual: String,
    },

    #[error("expecting {subject} to have {expected} retries left, but found {actual} retries")]
    RetriesMismatch {
        subject: String,
        expected: i32,
        actual: i32,
    },

    #[error("expecting {subject} to be due at '{expected}', but found it to be due at '{actual}'")]
    DueDateMismatch {
        subject: String,
        expected: String,
        actual: String,
    },

    #[error("expecting {subject} to have an exception message, but found none")]
    MissingExceptionMessage { subject: String },

    /// State-style expectation (active, ended, waiting at an activity, ...)
    #[error("expecting {subject} {expectation}, but {actual}")]
    Predicate {
        subject: String,
        expectation: String,
        actual: String,
    },

    /// The underlying query failed before any comparison could happen
    #[error("query failed: {0}")]
    Query(#[from] EngineError),

    #[error("condition not met within {timeout_ms} ms, last failure: {last_error}")]
    Timeout {
        timeout_ms: u64,
        last_error: Box<AssertionError>,
    },
}

/// Rejected before any comparison; an empty expected value is never valid.
pub(crate) fn require_non_empty(
    argument: &'static str,
    value: &str,
) -> Result<(), AssertionError> {
    if value.is_empty() {
        return Err(AssertionError::EmptyExpectation { argument });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_expected_and_actual() {
        let err = AssertionError::PropertyMismatch {
            subject: "Job {id: 'j1'}".to_string(),
            property: "id",
            expected: "j2".to_string(),
            actual: "j1".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("Job {id: 'j1'}"));
        assert!(message.contains("'j2'"));
        assert!(message.contains("'j1'"));
    }

    #[test]
    fn timeout_embeds_last_failure() {
        let err = AssertionError::Timeout {
            timeout_ms: 5000,
            last_error: Box::new(AssertionError::NoEntity { entity: "Job" }),
        };
        let message = err.to_string();
        assert!(message.contains("5000 ms"));
        assert!(message.contains("expecting a Job to be present"));
    }

    #[test]
    fn require_non_empty_rejects_empty_only() {
        assert!(require_non_empty("id", "").is_err());
        assert!(require_non_empty("id", "j1").is_ok());
    }
}
