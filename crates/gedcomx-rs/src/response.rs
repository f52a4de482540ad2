//! Conversion of resource outcomes into `axum` responses, and decoding of
//! request bodies. [`get`] and [`post`] drive a [`ConclusionsResource`] for
//! one request; routing stays with the caller.

use axum::{
  body::Body,
  http::{HeaderMap, HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use gedcomx_core::document::Gedcomx;

use crate::{
  Error,
  Result,
  conclusions::{ConclusionsResource, ReadResponse, WriteResponse},
  media::MediaType,
};

/// A resource outcome paired with the media type its body is written in.
#[derive(Debug, Clone)]
pub struct Encoded<R> {
  pub media_type: MediaType,
  pub response:   R,
}

impl<R> Encoded<R> {
  pub fn new(media_type: MediaType, response: R) -> Self {
    Self {
      media_type,
      response,
    }
  }
}

fn server_error(context: &str, error: impl std::fmt::Display) -> Response {
  tracing::error!(%error, "{context}");
  StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

impl IntoResponse for Encoded<ReadResponse> {
  fn into_response(self) -> Response {
    let status = self.response.status();
    let ReadResponse::Ok(document) = self.response else {
      return status.into_response();
    };
    match self.media_type.encode_body(&document) {
      Ok(body) => (
        status,
        [(header::CONTENT_TYPE, self.media_type.header_value())],
        Body::from(body),
      )
        .into_response(),
      Err(e) => server_error("failed to encode conclusions", e),
    }
  }
}

impl IntoResponse for Encoded<WriteResponse> {
  fn into_response(self) -> Response {
    let status = self.response.status();
    let Some(location) = self.response.location() else {
      return status.into_response();
    };
    match HeaderValue::try_from(location.as_str()) {
      Ok(location) => (status, [(header::LOCATION, location)]).into_response(),
      Err(e) => server_error("invalid location header", e),
    }
  }
}

/// Decode a `POST` body, using `Content-Type` (GEDCOM X XML when absent).
pub fn decode_request(headers: &HeaderMap, body: &[u8]) -> Result<Gedcomx> {
  let media = MediaType::from_headers(
    headers,
    header::CONTENT_TYPE,
    MediaType::GedcomxXml,
  )?;
  tracing::debug!(%media, bytes = body.len(), "decoding conclusions body");
  media.decode_body(body)
}

/// Answer a `GET`: read from `resource` and encode for the `Accept` header
/// (GEDCOM X XML when absent).
pub async fn get<R: ConclusionsResource>(
  resource: &R,
  headers: &HeaderMap,
) -> Result<Encoded<ReadResponse>> {
  let media =
    MediaType::from_headers(headers, header::ACCEPT, MediaType::GedcomxXml)?;
  let response = resource.get().await.map_err(Error::resource)?;
  Ok(Encoded::new(media, response))
}

/// Answer a `POST`: decode `body` by its `Content-Type` and hand it to
/// `resource`.
pub async fn post<R: ConclusionsResource>(
  resource: &R,
  headers: &HeaderMap,
  body: &[u8],
) -> Result<Encoded<WriteResponse>> {
  let media =
    MediaType::from_headers(headers, header::ACCEPT, MediaType::GedcomxXml)?;
  let document = decode_request(headers, body)?;
  let response = resource.post(document).await.map_err(Error::resource)?;
  Ok(Encoded::new(media, response))
}

#[cfg(test)]
mod tests {
  use axum::body::to_bytes;
  use gedcomx_core::{
    conclusion::Gender,
    types::{GenderType, KnownType},
  };

  use super::*;

  fn document() -> Gedcomx {
    let mut doc = Gedcomx::default();
    doc.add_conclusion(Gender {
      id:   Some("g1".to_string()),
      kind: GenderType::Female.to_uri(),
    });
    doc
  }

  #[tokio::test]
  async fn ok_carries_body_and_content_type() {
    let response =
      Encoded::new(MediaType::GedcomxJson, ReadResponse::Ok(document()))
        .into_response();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
      response.headers()[header::CONTENT_TYPE],
      "application/x-gedcomx-v1+json"
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let back: Gedcomx = MediaType::GedcomxJson.decode_body(&body).unwrap();
    assert_eq!(back, document());
  }

  #[tokio::test]
  async fn empty_outcomes_have_no_body() {
    for (read, status) in [
      (ReadResponse::NoContent, StatusCode::NO_CONTENT),
      (ReadResponse::NotFound, StatusCode::NOT_FOUND),
    ] {
      let response = Encoded::new(MediaType::GedcomxXml, read).into_response();
      assert_eq!(response.status(), status);
      assert!(response.headers().get(header::CONTENT_TYPE).is_none());
      let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
      assert!(body.is_empty());
    }
  }

  #[test]
  fn created_sets_location() {
    let created = WriteResponse::Created {
      location: "https://example.org/persons/1/conclusions/7".into(),
    };
    let response = Encoded::new(MediaType::GedcomxXml, created).into_response();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
      response.headers()[header::LOCATION],
      "https://example.org/persons/1/conclusions/7"
    );

    let gone =
      Encoded::new(MediaType::GedcomxXml, WriteResponse::Gone).into_response();
    assert_eq!(gone.status(), StatusCode::GONE);
    assert!(gone.headers().get(header::LOCATION).is_none());
  }

  #[test]
  fn bad_location_is_a_server_error() {
    let created = WriteResponse::Created {
      location: "line\nbreak".into(),
    };
    let response = Encoded::new(MediaType::GedcomxXml, created).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[test]
  fn decode_request_follows_content_type() {
    let body = MediaType::GedcomxJson.encode_body(&document()).unwrap();
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, MediaType::GedcomxJson.header_value());
    assert_eq!(decode_request(&headers, &body).unwrap(), document());

    // Without a content type the body is read as XML.
    assert!(decode_request(&HeaderMap::new(), &body).is_err());

    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    assert!(matches!(
      decode_request(&headers, &body),
      Err(Error::UnsupportedMediaType(_))
    ));
  }

  /// Serves one fixed document, or fails every call.
  struct Fixed {
    offline: bool,
  }

  impl ConclusionsResource for Fixed {
    type Error = std::io::Error;

    async fn get(&self) -> Result<ReadResponse, std::io::Error> {
      if self.offline {
        return Err(std::io::Error::other("store offline"));
      }
      Ok(ReadResponse::Ok(document()))
    }

    async fn post(&self, conclusions: Gedcomx) -> Result<WriteResponse, std::io::Error> {
      if self.offline {
        return Err(std::io::Error::other("store offline"));
      }
      assert_eq!(conclusions, document());
      Ok(WriteResponse::Created {
        location: "https://example.org/persons/1/conclusions/0".into(),
      })
    }
  }

  #[tokio::test]
  async fn get_negotiates_accept() {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    let response = get(&Fixed { offline: false }, &headers)
      .await
      .into_response();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
      response.headers()[header::CONTENT_TYPE],
      "application/x-gedcomx-v1+json"
    );

    headers.insert(header::ACCEPT, HeaderValue::from_static("text/html"));
    let refused = get(&Fixed { offline: false }, &headers).await;
    assert!(matches!(refused, Err(Error::UnsupportedMediaType(_))));
  }

  #[tokio::test]
  async fn post_decodes_and_creates() {
    let body = MediaType::GedcomxXml.encode_body(&document()).unwrap();
    let response = post(&Fixed { offline: false }, &HeaderMap::new(), &body)
      .await
      .into_response();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
      response.headers()[header::LOCATION],
      "https://example.org/persons/1/conclusions/0"
    );

    let bad = post(&Fixed { offline: false }, &HeaderMap::new(), b"<feed/>")
      .await
      .into_response();
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn resource_failures_are_server_errors() {
    let offline = Fixed { offline: true };
    let read = get(&offline, &HeaderMap::new()).await;
    assert!(matches!(read, Err(Error::Resource(_))));
    assert_eq!(
      read.into_response().status(),
      StatusCode::INTERNAL_SERVER_ERROR
    );

    let body = MediaType::GedcomxXml.encode_body(&document()).unwrap();
    let written = post(&offline, &HeaderMap::new(), &body).await;
    let err = written.unwrap_err();
    assert!(err.to_string().contains("store offline"), "{err}");
    assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[test]
  fn errors_map_to_statuses() {
    let unsupported = Error::UnsupportedMediaType("text/plain".to_string());
    assert_eq!(
      unsupported.into_response().status(),
      StatusCode::UNSUPPORTED_MEDIA_TYPE
    );
    let body = Error::Body("truncated".to_string());
    assert_eq!(body.into_response().status(), StatusCode::BAD_REQUEST);
  }
}
