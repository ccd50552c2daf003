// ID Provider Port (for deterministic testing)

/// ID provider interface (allows deterministic IDs in tests)
pub trait IdProvider: Send + Sync {
    /// Generate a new unique entity ID
    fn generate_id(&self) -> String;
}

/// UUID v4 provider (production)
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn generate_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Sequence provider (tests): prefix-1, prefix-2, ...
pub struct SequenceIdProvider {
    prefix: String,
    counter: std::sync::atomic::AtomicU64,
}

impl SequenceIdProvider {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: std::sync::atomic::AtomicU64::new(1),
        }
    }
}

impl IdProvider for SequenceIdProvider {
    fn generate_id(&self) -> String {
        let n = self
            .counter
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_ids_are_unique() {
        let provider = UuidProvider;
        assert_ne!(provider.generate_id(), provider.generate_id());
    }

    #[test]
    fn sequence_ids_count_up_from_one() {
        let provider = SequenceIdProvider::new("task");
        assert_eq!(provider.generate_id(), "task-1");
        assert_eq!(provider.generate_id(), "task-2");
    }
}
