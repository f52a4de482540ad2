//! Namespaces and the per-field wire-name table.
//!
//! Every named field is listed here once with its XML qualified name
//! (element or attribute) and its JSON property name. Extension elements have
//! no fixed name and are not listed. The XML codec reads its
//! names from these constants; the JSON encoding is derived with serde and
//! checked against the same table in tests, so the two formats cannot drift
//! apart silently.

use std::fmt;

// ─── Namespaces ──────────────────────────────────────────────────────────────

pub const ATOM: &str = "http://www.w3.org/2005/Atom";
pub const GEDCOMX: &str = "http://gedcomx.org/v1/";
pub const COMMON: &str = "http://gedcomx.org/common/v1/";
pub const CONCLUSION: &str = "http://gedcomx.org/conclusion/v1/";
pub const SEARCH: &str = "http://gedcomx.org/search/v1/";
pub const TYPES: &str = "http://gedcomx.org/types/v1/";
/// Reserved `xml:` namespace; never declared on output.
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";

/// Conventional prefixes used when writing XML.
pub const PREFIXES: &[(&str, &str)] = &[
  (ATOM, "atom"),
  (GEDCOMX, "gx"),
  (COMMON, "common"),
  (CONCLUSION, "gxc"),
  (SEARCH, "gxs"),
  (TYPES, "gxt"),
];

// ─── Names ───────────────────────────────────────────────────────────────────

/// A namespace-qualified XML name. An empty namespace means "no namespace".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XmlName {
  pub namespace: &'static str,
  pub local:     &'static str,
}

impl XmlName {
  pub const fn new(namespace: &'static str, local: &'static str) -> Self {
    Self { namespace, local }
  }

  /// Unqualified name (used for most attributes).
  pub const fn local(local: &'static str) -> Self { Self::new("", local) }

  /// `{namespace}local` form.
  pub fn clark(&self) -> String { clark(self.namespace, self.local) }
}

impl fmt::Display for XmlName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.namespace.is_empty() {
      f.write_str(self.local)
    } else {
      write!(f, "{{{}}}{}", self.namespace, self.local)
    }
  }
}

pub fn clark(namespace: &str, local: &str) -> String {
  if namespace.is_empty() {
    local.to_string()
  } else {
    format!("{{{namespace}}}{local}")
  }
}

/// How a field is carried in XML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlKind {
  Element,
  Attribute,
  /// Child elements named by the registered subtype of each value.
  Polymorphic,
}

/// One field's wire names in both formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldName {
  pub xml:  XmlName,
  pub kind: XmlKind,
  pub json: &'static str,
}

impl FieldName {
  pub const fn element(
    namespace: &'static str,
    local: &'static str,
    json: &'static str,
  ) -> Self {
    Self {
      xml: XmlName::new(namespace, local),
      kind: XmlKind::Element,
      json,
    }
  }

  pub const fn attribute(
    namespace: &'static str,
    local: &'static str,
    json: &'static str,
  ) -> Self {
    Self {
      xml: XmlName::new(namespace, local),
      kind: XmlKind::Attribute,
      json,
    }
  }

  pub const fn polymorphic(json: &'static str) -> Self {
    Self {
      xml: XmlName::local(""),
      kind: XmlKind::Polymorphic,
      json,
    }
  }
}

// ─── Atom ────────────────────────────────────────────────────────────────────

pub mod entry {
  use super::*;

  pub const ROOT: XmlName = XmlName::new(ATOM, "entry");

  pub const AUTHORS: FieldName = FieldName::element(ATOM, "author", "authors");
  pub const CATEGORIES: FieldName =
    FieldName::element(ATOM, "category", "categories");
  pub const CONTENT: FieldName = FieldName::element(ATOM, "content", "content");
  pub const CONTRIBUTORS: FieldName =
    FieldName::element(ATOM, "contributor", "contributors");
  pub const ID: FieldName = FieldName::element(ATOM, "id", "id");
  pub const SCORE: FieldName = FieldName::element(GEDCOMX, "score", "score");
  pub const CONFIDENCE: FieldName =
    FieldName::element(GEDCOMX, "confidence", "confidence");
  pub const LINKS: FieldName = FieldName::element(ATOM, "link", "links");
  pub const PUBLISHED: FieldName =
    FieldName::element(ATOM, "published", "published");
  pub const RIGHTS: FieldName = FieldName::element(ATOM, "rights", "rights");
  pub const TITLE: FieldName = FieldName::element(ATOM, "title", "title");
  pub const UPDATED: FieldName = FieldName::element(ATOM, "updated", "updated");

  pub const FIELDS: &[FieldName] = &[
    AUTHORS,
    CATEGORIES,
    CONTENT,
    CONTRIBUTORS,
    ID,
    SCORE,
    CONFIDENCE,
    LINKS,
    PUBLISHED,
    RIGHTS,
    TITLE,
    UPDATED,
  ];
}

pub mod feed {
  use super::*;

  pub const ROOT: XmlName = XmlName::new(ATOM, "feed");

  pub const ID: FieldName = FieldName::element(ATOM, "id", "id");
  pub const TITLE: FieldName = FieldName::element(ATOM, "title", "title");
  pub const UPDATED: FieldName = FieldName::element(ATOM, "updated", "updated");
  pub const AUTHORS: FieldName = FieldName::element(ATOM, "author", "authors");
  pub const LINKS: FieldName = FieldName::element(ATOM, "link", "links");
  pub const ENTRIES: FieldName = FieldName::element(ATOM, "entry", "entries");
  pub const TOTAL_RESULTS: FieldName =
    FieldName::element(GEDCOMX, "totalResults", "totalResults");

  pub const FIELDS: &[FieldName] =
    &[ID, TITLE, UPDATED, AUTHORS, LINKS, ENTRIES, TOTAL_RESULTS];
}

pub mod person {
  use super::*;

  pub const NAME: FieldName = FieldName::element(ATOM, "name", "name");
  pub const URI: FieldName = FieldName::element(ATOM, "uri", "uri");
  pub const EMAIL: FieldName = FieldName::element(ATOM, "email", "email");

  pub const FIELDS: &[FieldName] = &[NAME, URI, EMAIL];
}

pub mod category {
  use super::*;

  pub const SCHEME: FieldName = FieldName::attribute("", "scheme", "scheme");
  pub const TERM: FieldName = FieldName::attribute("", "term", "term");
  pub const LABEL: FieldName = FieldName::attribute("", "label", "label");

  pub const FIELDS: &[FieldName] = &[SCHEME, TERM, LABEL];
}

pub mod content {
  use super::*;

  pub const TYPE: FieldName = FieldName::attribute("", "type", "type");
  pub const GEDCOMX: FieldName =
    FieldName::element(super::GEDCOMX, "gedcomx", "gedcomx");

  pub const FIELDS: &[FieldName] = &[TYPE, GEDCOMX];
}

// ─── Links ───────────────────────────────────────────────────────────────────

pub mod link {
  use super::*;

  pub const REL: FieldName = FieldName::attribute("", "rel", "rel");
  pub const HREF: FieldName = FieldName::attribute("", "href", "href");
  pub const TEMPLATE: FieldName =
    FieldName::attribute("", "template", "template");
  pub const TYPE: FieldName = FieldName::attribute("", "type", "type");
  pub const TITLE: FieldName = FieldName::attribute("", "title", "title");

  pub const FIELDS: &[FieldName] = &[REL, HREF, TEMPLATE, TYPE, TITLE];
}

// ─── Document root ───────────────────────────────────────────────────────────

pub mod gedcomx {
  use super::*;

  pub const ROOT: XmlName = XmlName::new(GEDCOMX, "gedcomx");

  pub const ID: FieldName = FieldName::attribute("", "id", "id");
  pub const LINKS: FieldName = FieldName::element(GEDCOMX, "link", "links");
  pub const CONCLUSIONS: FieldName = FieldName::polymorphic("conclusions");

  pub const FIELDS: &[FieldName] = &[ID, LINKS, CONCLUSIONS];
}

// ─── Conclusions ─────────────────────────────────────────────────────────────

pub mod name {
  use super::*;

  pub const ID: FieldName = FieldName::attribute("", "id", "id");
  pub const TYPE: FieldName = FieldName::attribute(COMMON, "type", "type");
  pub const PRIMARY_FORM: FieldName =
    FieldName::element(CONCLUSION, "primaryForm", "primaryForm");
  pub const ALTERNATE_FORMS: FieldName =
    FieldName::element(CONCLUSION, "alternateForm", "alternateForms");

  pub const FIELDS: &[FieldName] = &[ID, TYPE, PRIMARY_FORM, ALTERNATE_FORMS];
}

pub mod name_form {
  use super::*;

  pub const LANG: FieldName = FieldName::attribute(XML, "lang", "lang");
  pub const FULL_TEXT: FieldName =
    FieldName::element(CONCLUSION, "fullText", "fullText");
  pub const PARTS: FieldName = FieldName::element(CONCLUSION, "part", "parts");

  pub const FIELDS: &[FieldName] = &[LANG, FULL_TEXT, PARTS];
}

pub mod name_part {
  use super::*;

  pub const TYPE: FieldName = FieldName::attribute(COMMON, "type", "type");
  pub const VALUE: FieldName = FieldName::attribute("", "value", "value");

  pub const FIELDS: &[FieldName] = &[TYPE, VALUE];
}

pub mod gender {
  use super::*;

  pub const ID: FieldName = FieldName::attribute("", "id", "id");
  pub const TYPE: FieldName = FieldName::attribute(COMMON, "type", "type");

  pub const FIELDS: &[FieldName] = &[ID, TYPE];
}

pub mod fact {
  use super::*;

  pub const ID: FieldName = FieldName::attribute("", "id", "id");
  pub const TYPE: FieldName = FieldName::attribute(COMMON, "type", "type");
  pub const DATE: FieldName = FieldName::element(CONCLUSION, "date", "date");
  pub const PLACE: FieldName = FieldName::element(CONCLUSION, "place", "place");
  pub const VALUE: FieldName = FieldName::element(CONCLUSION, "value", "value");

  pub const FIELDS: &[FieldName] = &[ID, TYPE, DATE, PLACE, VALUE];
}
