//! The GEDCOM X document root.

use serde::{Deserialize, Serialize};

use crate::{
  conclusion::AnyConclusion,
  links::{HasLinks, Link},
};

/// A document holding a polymorphic list of conclusions; the body exchanged
/// with conclusion resources and embedded in Atom entry content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gedcomx {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id:          Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub links:       Option<Vec<Link>>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none",
    with = "crate::json::conclusions"
  )]
  pub conclusions: Option<Vec<Box<dyn AnyConclusion>>>,
}

impl Gedcomx {
  pub fn add_conclusion(&mut self, conclusion: impl AnyConclusion + 'static) {
    self
      .conclusions
      .get_or_insert_with(Vec::new)
      .push(Box::new(conclusion));
  }

  /// Conclusions of subtype `T`, in document order.
  pub fn conclusions_of<T: crate::conclusion::Conclusion>(&self) -> Vec<&T> {
    self
      .conclusions
      .iter()
      .flatten()
      .filter_map(|c| c.downcast_ref::<T>())
      .collect()
  }
}

impl HasLinks for Gedcomx {
  fn links(&self) -> Option<&Vec<Link>> { self.links.as_ref() }

  fn links_mut(&mut self) -> &mut Option<Vec<Link>> { &mut self.links }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::conclusion::{Fact, Gender, Name, NameForm};

  #[test]
  fn conclusions_of_filters_by_subtype() {
    let mut doc = Gedcomx::default();
    doc.add_conclusion(Name {
      primary_form: Some(NameForm::with_full_text("Jane Doe")),
      ..Name::default()
    });
    doc.add_conclusion(Gender::default());
    doc.add_conclusion(Name::default());

    assert_eq!(doc.conclusions_of::<Name>().len(), 2);
    assert_eq!(doc.conclusions_of::<Gender>().len(), 1);
    assert!(doc.conclusions_of::<Fact>().is_empty());
  }

  #[test]
  fn gedcomx_links() {
    let mut doc = Gedcomx::default();
    assert!(doc.link("self").is_none());
    doc.add_link_href("self", "https://example.org/conclusions");
    assert!(doc.link("self").is_some());
  }
}
