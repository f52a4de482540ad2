//! Error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unsupported media type: {0:?}")]
  UnsupportedMediaType(String),

  #[error("invalid body: {0}")]
  Body(String),

  #[error(transparent)]
  Codec(#[from] gedcomx_core::Error),

  #[error("resource error: {0}")]
  Resource(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
  /// Wrap a failure reported by a resource implementation.
  pub fn resource(error: impl std::error::Error + Send + Sync + 'static) -> Self {
    Error::Resource(Box::new(error))
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match &self {
      Error::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
      Error::Body(_) | Error::Codec(_) => StatusCode::BAD_REQUEST,
      Error::Resource(error) => {
        tracing::error!(%error, "conclusions resource failed");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
