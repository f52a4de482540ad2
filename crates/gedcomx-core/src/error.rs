//! Error types for `gedcomx-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("xml error: {0}")]
  Xml(String),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// A polymorphic value carried a type marker no registered subtype claims.
  #[error("unknown type marker: {0:?}")]
  UnknownType(String),

  #[error("polymorphic value has no @type marker")]
  MissingTypeMarker,

  #[error("expected root element {expected}, found {found}")]
  UnexpectedRoot { expected: String, found: String },

  #[error("<{element}> is missing required {field:?}")]
  MissingField {
    element: String,
    field:   &'static str,
  },

  #[error("invalid value for {field:?}: {value:?}")]
  InvalidValue { field: &'static str, value: String },

  #[error("type {0:?} is already registered")]
  DuplicateType(String),

  #[error("the process-wide type registry is already initialised")]
  RegistryInitialised,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
