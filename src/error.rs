//! Error types for pooling, spawning and configuration

use crate::entity::{Category, HandleId};

/// Failures of pool and spawn operations
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SpawnError {
    /// Every handle in the pool is active
    #[error("{category} pool exhausted")]
    PoolExhausted { category: Category },

    /// No clear position found within the retry budget
    #[error("no clear {category} spawn point after {tries} tries")]
    PlacementFailed { category: Category, tries: u32 },

    /// Request for a category that has no pool
    #[error("no pool configured for category {0}")]
    InvalidCategory(Category),

    /// Pool cannot be built from the given settings
    #[error("{category} pool misconfigured: {reason}")]
    EmptyConfiguration { category: Category, reason: String },

    /// Handle is already in use
    #[error("handle {0} is already active")]
    AlreadyActive(HandleId),

    /// Handle index outside its pool
    #[error("handle {0} does not belong to any pool")]
    UnknownHandle(HandleId),
}

impl SpawnError {
    /// Per-spawn failures that only mean "nothing spawned this cycle"
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SpawnError::PoolExhausted { .. } | SpawnError::PlacementFailed { .. }
        )
    }
}

/// Configuration loading errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Values that parse but cannot drive a session
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_split() {
        assert!(SpawnError::PoolExhausted { category: Category::Enemy }.is_recoverable());
        assert!(
            SpawnError::PlacementFailed {
                category: Category::Powerup,
                tries: 10
            }
            .is_recoverable()
        );
        assert!(!SpawnError::InvalidCategory(Category::Enemy).is_recoverable());
        assert!(
            !SpawnError::EmptyConfiguration {
                category: Category::Enemy,
                reason: "capacity is zero".into()
            }
            .is_recoverable()
        );
    }

    #[test]
    fn test_display() {
        let err = SpawnError::PlacementFailed {
            category: Category::Enemy,
            tries: 1000,
        };
        assert_eq!(err.to_string(), "no clear Enemy spawn point after 1000 tries");
    }
}
