//! Resource contract for GEDCOM X conclusions.
//!
//! This crate describes the Conclusions resource (its link relation, verbs
//! and documented status codes), the typed responses an implementation
//! returns, and the media types its bodies are exchanged in. It does not
//! route requests or talk to a network; a collaborator implements
//! [`conclusions::ConclusionsResource`] and mounts it however it likes,
//! using [`response::get`] and [`response::post`] (or [`response::Encoded`]
//! directly) to turn results into `axum` responses.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn conclusions(
//!   State(resource): State<Arc<PersonConclusions>>,
//!   headers: HeaderMap,
//! ) -> impl IntoResponse {
//!   gedcomx_rs::response::get(&*resource, &headers).await
//! }
//! ```

pub mod conclusions;
pub mod definition;
pub mod error;
pub mod media;
pub mod response;

pub use error::{Error, Result};
