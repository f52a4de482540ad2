//! Static description of a REST resource: its link relation, the element its
//! bodies are rooted at, and the status codes each verb may answer with.

use std::fmt;

use axum::http::{Method, StatusCode};
use gedcomx_core::names::XmlName;

/// Prefix of every GEDCOM X link relation.
pub const LINK_REL_PREFIX: &str = "http://gedcomx.org/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
  Get,
  Post,
}

impl Verb {
  pub fn method(self) -> Method {
    match self {
      Verb::Get => Method::GET,
      Verb::Post => Method::POST,
    }
  }
}

impl fmt::Display for Verb {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Verb::Get => "GET",
      Verb::Post => "POST",
    })
  }
}

/// One documented outcome of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseCode {
  pub code:      u16,
  pub condition: &'static str,
}

impl ResponseCode {
  pub const fn new(code: u16, condition: &'static str) -> Self {
    Self { code, condition }
  }
}

#[derive(Debug, Clone, Copy)]
pub struct Operation {
  pub verb:  Verb,
  pub codes: &'static [ResponseCode],
}

#[derive(Debug, Clone, Copy)]
pub struct ResourceDefinition {
  pub name:             &'static str,
  pub namespace:        &'static str,
  /// Link relation under which other resources advertise this one.
  pub rel:              &'static str,
  /// Root element of request and response bodies.
  pub resource_element: XmlName,
  pub operations:       &'static [Operation],
}

impl ResourceDefinition {
  pub fn operation(&self, verb: Verb) -> Option<&'static Operation> {
    self.operations.iter().find(|op| op.verb == verb)
  }

  pub fn supports(&self, verb: Verb) -> bool { self.operation(verb).is_some() }

  /// Whether `status` is a documented answer to `verb`.
  pub fn documents(&self, verb: Verb, status: StatusCode) -> bool {
    self
      .operation(verb)
      .is_some_and(|op| op.codes.iter().any(|c| c.code == status.as_u16()))
  }

  /// `Allow` header value listing the supported verbs.
  pub fn allow(&self) -> String {
    self
      .operations
      .iter()
      .map(|op| op.verb.to_string())
      .collect::<Vec<_>>()
      .join(", ")
  }
}
