//! The Conclusions resource: the list of conclusions held by a person or
//! relationship. Implementations may bind it to the same path as the entity
//! that owns the conclusions.
//!
//! | Verb   | Body      | Status codes |
//! |--------|-----------|--------------|
//! | `GET`  | none      | 200 read, 204 nothing to return, 404 entity gone or moved |
//! | `POST` | `Gedcomx` | 201 created (with `Location`), 410 entity deleted |

use std::future::Future;

use axum::http::StatusCode;
use gedcomx_core::{common::Uri, document::Gedcomx, names};

use crate::definition::{
  Operation,
  ResourceDefinition,
  ResponseCode,
  Verb,
};

/// Link relation advertising a Conclusions resource.
pub const REL: &str = "http://gedcomx.org/conclusions";

pub static DEFINITION: ResourceDefinition = ResourceDefinition {
  name:             "Conclusions",
  namespace:        names::GEDCOMX,
  rel:              REL,
  resource_element: names::gedcomx::ROOT,
  operations:       &[
    Operation {
      verb:  Verb::Get,
      codes: &[
        ResponseCode::new(200, "Upon a successful read."),
        ResponseCode::new(204, "Upon a successful query with no results."),
        ResponseCode::new(
          404,
          "The specified entity has been moved, deleted, or otherwise not found.",
        ),
      ],
    },
    Operation {
      verb:  Verb::Post,
      codes: &[
        ResponseCode::new(
          201,
          "The creation of the conclusion was successful. Expect a location \
           header specifying the link to the created conclusion.",
        ),
        ResponseCode::new(410, "If the specified person has been deleted."),
      ],
    },
  ],
};

// ─── Responses ───────────────────────────────────────────────────────────────

/// Outcome of reading the conclusions of an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadResponse {
  Ok(Gedcomx),
  NoContent,
  NotFound,
}

impl ReadResponse {
  pub fn status(&self) -> StatusCode {
    match self {
      ReadResponse::Ok(_) => StatusCode::OK,
      ReadResponse::NoContent => StatusCode::NO_CONTENT,
      ReadResponse::NotFound => StatusCode::NOT_FOUND,
    }
  }

  /// `Ok` for a document with conclusions, `NoContent` otherwise.
  pub fn from_document(document: Gedcomx) -> Self {
    let populated = document
      .conclusions
      .as_ref()
      .is_some_and(|list| !list.is_empty());
    if populated {
      ReadResponse::Ok(document)
    } else {
      ReadResponse::NoContent
    }
  }
}

/// Outcome of creating or updating conclusions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResponse {
  Created { location: Uri },
  Gone,
}

impl WriteResponse {
  pub fn status(&self) -> StatusCode {
    match self {
      WriteResponse::Created { .. } => StatusCode::CREATED,
      WriteResponse::Gone => StatusCode::GONE,
    }
  }

  pub fn location(&self) -> Option<&Uri> {
    match self {
      WriteResponse::Created { location } => Some(location),
      WriteResponse::Gone => None,
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A Conclusions resource bound to one entity.
///
/// All methods return `Send` futures so implementations can be driven from a
/// multi-threaded runtime (e.g. tokio with `axum`).
pub trait ConclusionsResource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the conclusions of the entity.
  fn get(
    &self,
  ) -> impl Future<Output = Result<ReadResponse, Self::Error>> + Send + '_;

  /// Create or update conclusions.
  fn post(
    &self,
    conclusions: Gedcomx,
  ) -> impl Future<Output = Result<WriteResponse, Self::Error>> + Send + '_;
}
