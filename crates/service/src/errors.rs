use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One rejected rule on one request field, serialized as `{"errorMessage": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub error_message: String,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error_message: message.into() }
    }
}

/// Every violation found in a single validation pass, in the order they were detected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn single(message: impl Into<String>) -> Self {
        Self(vec![FieldError::new(message)])
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(FieldError::new(message));
    }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.error_message.as_str()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

/// Failure of the persistence medium itself.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode '{}': {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("could not encode users: {0}")]
    Encode(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("no stored user with id '{0}'")]
    UnknownId(String),
}

impl From<sea_orm::DbErr> for StorageError {
    fn from(e: sea_orm::DbErr) -> Self {
        StorageError::Db(e.to_string())
    }
}

impl From<models::errors::ModelError> for StorageError {
    fn from(e: models::errors::ModelError) -> Self {
        StorageError::Db(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("password hashing failed: {0}")]
    Hash(String),
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

impl ServiceError {
    /// Whether the caller can fix the request and retry.
    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Validation(_))
    }
}
