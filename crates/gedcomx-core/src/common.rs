//! Shared value types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A URI as it appears on the wire. No parsing or normalisation is applied;
/// two URIs are equal when their text is equal.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Uri(String);

impl Uri {
  pub fn new(value: impl Into<String>) -> Self { Self(value.into()) }

  pub fn as_str(&self) -> &str { &self.0 }

  pub fn into_string(self) -> String { self.0 }
}

impl fmt::Display for Uri {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for Uri {
  fn from(value: &str) -> Self { Self(value.to_string()) }
}

impl From<String> for Uri {
  fn from(value: String) -> Self { Self(value) }
}

impl AsRef<str> for Uri {
  fn as_ref(&self) -> &str { &self.0 }
}

impl PartialEq<str> for Uri {
  fn eq(&self, other: &str) -> bool { self.0 == other }
}

impl PartialEq<&str> for Uri {
  fn eq(&self, other: &&str) -> bool { self.0 == *other }
}
