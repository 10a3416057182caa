//! Error types and result alias for model operations.
//!
//! Use [`ModelResult<T>`] as the return type for fallible operations. Every
//! failure coming out of the driver is wrapped exactly once, tagged with the
//! operation that produced it, and returned to the caller without retries.

use bson::error::Error as BsonError;
use thiserror::Error;

/// Represents all possible errors raised by the model layer.
///
/// The variants deliberately distinguish the three "nothing matched" shapes:
/// [`ModelError::NotFound`] is raised only by `find_one`, `find_many` returns
/// an empty `Vec` instead, and `aggregate` raises
/// [`ModelError::EmptyResult`] when the pipeline produces zero rows.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Client construction or connection string parsing failed.
    #[error("connection error: {0}")]
    Connection(String),
    /// `find_one` matched zero documents in the collection.
    #[error("no document matched in collection {collection}")]
    NotFound { collection: String },
    /// An insert violated a uniqueness constraint enforced by the server.
    #[error("document conflicts with an existing key in collection {collection}")]
    Conflict { collection: String },
    /// A stored document could not be decoded into the requested type.
    #[error("{operation}: failed to decode document: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: BsonError,
    },
    /// A document could not be encoded into the store's native format.
    #[error("serialization error: {0}")]
    Serialization(#[from] BsonError),
    /// The server rejected an operation (bad pipeline, write failure, ...).
    #[error("{operation}: {source}")]
    Execution {
        operation: &'static str,
        #[source]
        source: mongodb::error::Error,
    },
    /// An aggregation pipeline executed successfully but produced zero rows.
    #[error("aggregation returned no rows for collection {collection}")]
    EmptyResult { collection: String },
}

/// A specialized `Result` type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

impl ModelError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Wrap a driver error, classifying server-side duplicate key failures
    /// as [`ModelError::Conflict`].
    pub(crate) fn from_driver(
        operation: &'static str,
        collection: &str,
        source: mongodb::error::Error,
    ) -> Self {
        if is_duplicate_key(&source) {
            Self::Conflict {
                collection: collection.to_string(),
            }
        } else {
            Self::Execution { operation, source }
        }
    }

    /// Check if this is a not found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a uniqueness conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Check if this is a decode error.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Check if this is an empty aggregation result.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::EmptyResult { .. })
    }
}

/// Server error code for duplicate key violations.
const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) => write.code == DUPLICATE_KEY,
        ErrorKind::Command(command) => command.code == DUPLICATE_KEY,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_names_the_collection() {
        let err = ModelError::NotFound {
            collection: "users".to_string(),
        };
        assert_eq!(err.to_string(), "no document matched in collection users");
        assert!(err.is_not_found());
        assert!(!err.is_conflict());
    }

    #[test]
    fn empty_result_is_distinct_from_not_found() {
        let err = ModelError::EmptyResult {
            collection: "users".to_string(),
        };
        assert!(err.is_empty_result());
        assert!(!err.is_not_found());
        assert_eq!(
            err.to_string(),
            "aggregation returned no rows for collection users"
        );
    }

    #[test]
    fn connection_helper_builds_connection_variant() {
        let err = ModelError::connection("refused");
        assert_eq!(err.to_string(), "connection error: refused");
    }

    #[test]
    fn decode_display_carries_the_operation() {
        let source = bson::de::deserialize_from_document::<i64>(bson::doc! {})
            .expect_err("empty document is not an i64");
        let err = ModelError::Decode {
            operation: "find_one",
            source,
        };
        assert!(err.is_decode());
        assert!(err.to_string().starts_with("find_one: failed to decode document"));
    }
}
