//! Hypermedia links and the per-entity link relation index.

use serde::{Deserialize, Serialize};

use crate::common::Uri;

/// A `(relation, target)` pair. The target is either a literal `href` or a
/// URI `template`; the two are exclusive in practice but not enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
  pub rel:        String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub href:       Option<Uri>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub template:   Option<String>,
  /// Media type of the target, if advertised.
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub media_type: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title:      Option<String>,
}

impl Link {
  pub fn new(rel: impl Into<String>, href: impl Into<Uri>) -> Self {
    Self {
      rel: rel.into(),
      href: Some(href.into()),
      ..Self::default()
    }
  }

  pub fn templated(rel: impl Into<String>, template: impl Into<String>) -> Self {
    Self {
      rel: rel.into(),
      template: Some(template.into()),
      ..Self::default()
    }
  }
}

/// Relation-based access to an entity's links.
///
/// Implementors only expose their backing storage; the list stays `None`
/// until the first link is added, so "never set" remains distinguishable from
/// "set to empty" on the wire.
pub trait HasLinks {
  fn links(&self) -> Option<&Vec<Link>>;

  fn links_mut(&mut self) -> &mut Option<Vec<Link>>;

  /// Append `link`. Multiple links with the same relation are kept.
  fn add_link(&mut self, link: Link) {
    self.links_mut().get_or_insert_with(Vec::new).push(link);
  }

  fn add_link_href(&mut self, rel: impl Into<String>, href: impl Into<Uri>)
  where
    Self: Sized,
  {
    self.add_link(Link::new(rel, href));
  }

  fn add_templated_link(
    &mut self,
    rel: impl Into<String>,
    template: impl Into<String>,
  ) where
    Self: Sized,
  {
    self.add_link(Link::templated(rel, template));
  }

  /// The first link with relation `rel`, in insertion order.
  fn link(&self, rel: &str) -> Option<&Link> {
    self.links().into_iter().flatten().find(|link| link.rel == rel)
  }

  /// Every link with relation `rel`, in insertion order. Empty when none
  /// match or when no links were ever set.
  fn links_by_rel(&self, rel: &str) -> Vec<&Link> {
    self
      .links()
      .into_iter()
      .flatten()
      .filter(|link| link.rel == rel)
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Default)]
  struct Holder {
    links: Option<Vec<Link>>,
  }

  impl HasLinks for Holder {
    fn links(&self) -> Option<&Vec<Link>> { self.links.as_ref() }

    fn links_mut(&mut self) -> &mut Option<Vec<Link>> { &mut self.links }
  }

  #[test]
  fn add_then_get_by_rel() {
    let mut h = Holder::default();
    h.add_link_href("self", "https://example.org/1");
    let link = h.link("self").expect("self link");
    assert_eq!(link.href.as_ref().unwrap(), "https://example.org/1");
    assert!(link.template.is_none());
  }

  #[test]
  fn links_by_rel_preserves_order_and_duplicates() {
    let mut h = Holder::default();
    h.add_link_href("self", "https://example.org/a");
    h.add_link_href("next", "https://example.org/n");
    h.add_link_href("self", "https://example.org/b");
    h.add_link_href("self", "https://example.org/c");

    let selves: Vec<_> = h
      .links_by_rel("self")
      .into_iter()
      .map(|l| l.href.as_ref().unwrap().as_str())
      .collect();
    assert_eq!(selves, [
      "https://example.org/a",
      "https://example.org/b",
      "https://example.org/c",
    ]);
    assert_eq!(
      h.link("self").unwrap().href.as_ref().unwrap(),
      "https://example.org/a"
    );
  }

  #[test]
  fn missing_rel_is_empty_not_error() {
    let untouched = Holder::default();
    assert!(untouched.links.is_none());
    assert!(untouched.links_by_rel("missing").is_empty());
    assert!(untouched.link("missing").is_none());
    // Lookups never initialise the backing list.
    assert!(untouched.links.is_none());

    let mut h = Holder::default();
    h.add_link_href("self", "https://example.org/1");
    assert!(h.links_by_rel("missing").is_empty());
  }

  #[test]
  fn templated_link() {
    let mut h = Holder::default();
    h.add_templated_link("search", "https://example.org/search{?q}");
    let link = h.link("search").unwrap();
    assert!(link.href.is_none());
    assert_eq!(
      link.template.as_deref(),
      Some("https://example.org/search{?q}")
    );
  }

  #[test]
  fn first_add_creates_backing_list() {
    let mut h = Holder::default();
    h.add_link(Link::new("self", "urn:x"));
    assert_eq!(h.links.as_ref().map(Vec::len), Some(1));
  }

  #[test]
  fn json_omits_absent_targets() {
    let link = Link::new("self", "https://example.org/1");
    let json = serde_json::to_string(&link).unwrap();
    assert_eq!(json, r#"{"rel":"self","href":"https://example.org/1"}"#);
  }
}
