// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Prospecta call-session tracker.

use thiserror::Error;

/// The primary error type used across all Prospecta components.
#[derive(Debug, Error)]
pub enum ProspectaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// A caller-supplied argument is missing, empty, or a sentinel value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An entity does not resolve for the caller's tenant or ownership scope.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Storage backend errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ProspectaError {
    /// Shorthand for a [`ProspectaError::NotFound`] with the given entity and id.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_entity_and_id() {
        let err = ProspectaError::not_found("session", "sess-42");
        assert_eq!(err.to_string(), "session not found: sess-42");
    }

    #[test]
    fn storage_error_wraps_source() {
        let err = ProspectaError::Storage {
            source: Box::new(std::io::Error::other("disk gone")),
        };
        assert!(err.to_string().contains("disk gone"));
    }
}
