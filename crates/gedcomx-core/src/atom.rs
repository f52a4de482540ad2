//! Atom feed and entry types used for search results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer, ser};

use crate::{
  common::Uri,
  document::Gedcomx,
  links::{HasLinks, Link},
  types::ResultConfidence,
  xml::Element,
};

// ─── Entry ───────────────────────────────────────────────────────────────────

/// An individual entry, acting as a container for metadata and data
/// associated with it. When the entry is a search result it also carries a
/// relevance `score` and a `confidence`.
///
/// `updated` is expected to be no earlier than `published`; this is not
/// checked. Children from other vocabularies are kept in
/// `extension_elements` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub authors:      Option<Vec<Person>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub categories:   Option<Vec<Category>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub content:      Option<Content>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub contributors: Option<Vec<Person>>,
  /// Permanent identifier, unique within a feed and never reused.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id:           Option<Uri>,
  /// Implementation-specific relevance score. Must be finite to encode.
  #[serde(
    serialize_with = "serialize_score",
    skip_serializing_if = "Option::is_none"
  )]
  pub score:        Option<f32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub confidence:   Option<ResultConfidence>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub links:        Option<Vec<Link>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub published:    Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rights:       Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title:        Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub updated:      Option<DateTime<Utc>>,
  #[serde(
    rename = "extensionElements",
    skip_serializing_if = "Option::is_none"
  )]
  pub extension_elements: Option<Vec<Element>>,
}

/// JSON has no spelling for infinities or NaN; serde_json would write `null`.
fn serialize_score<S: Serializer>(
  score: &Option<f32>,
  serializer: S,
) -> Result<S::Ok, S::Error> {
  match score {
    Some(value) if !value.is_finite() => Err(ser::Error::custom(format!(
      "score {value} is not a finite number"
    ))),
    _ => score.serialize(serializer),
  }
}

impl Entry {
  pub fn add_author(&mut self, author: Person) {
    self.authors.get_or_insert_with(Vec::new).push(author);
  }

  pub fn add_contributor(&mut self, contributor: Person) {
    self.contributors.get_or_insert_with(Vec::new).push(contributor);
  }

  pub fn add_category(&mut self, category: Category) {
    self.categories.get_or_insert_with(Vec::new).push(category);
  }
}

impl HasLinks for Entry {
  fn links(&self) -> Option<&Vec<Link>> { self.links.as_ref() }

  fn links_mut(&mut self) -> &mut Option<Vec<Link>> { &mut self.links }
}

// ─── Feed ────────────────────────────────────────────────────────────────────

/// A list of entries, typically one page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id:            Option<Uri>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title:         Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub updated:       Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub authors:       Option<Vec<Person>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub links:         Option<Vec<Link>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub entries:       Option<Vec<Entry>>,
  /// Total number of search results, across all pages.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub total_results: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub extension_elements: Option<Vec<Element>>,
}

impl Feed {
  pub fn add_entry(&mut self, entry: Entry) {
    self.entries.get_or_insert_with(Vec::new).push(entry);
  }
}

impl HasLinks for Feed {
  fn links(&self) -> Option<&Vec<Link>> { self.links.as_ref() }

  fn links_mut(&mut self) -> &mut Option<Vec<Link>> { &mut self.links }
}

// ─── Supporting constructs ───────────────────────────────────────────────────

/// An Atom person construct (author or contributor).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name:  Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub uri:   Option<Uri>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
}

impl Person {
  pub fn named(name: impl Into<String>) -> Self {
    Self {
      name: Some(name.into()),
      ..Self::default()
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub scheme: Option<Uri>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub term:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub label:  Option<String>,
}

/// Entry content; carries an embedded GEDCOM X document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
  /// Media type of the content (the Atom `type` attribute).
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub content_type: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub gedcomx:      Option<Gedcomx>,
}
