//! Conclusions: genealogical assertions about a person.
//!
//! Conclusions are polymorphic on the wire: wherever a list of them appears,
//! each value carries a type marker (JSON `@type`, XML element name) that is
//! resolved through the [`crate::registry`]. Concrete subtypes implement
//! [`Conclusion`]; containers hold them as `Box<dyn AnyConclusion>`.

use std::{any::Any, fmt};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
  Result,
  common::Uri,
  names::CONCLUSION,
  registry::TypeMarker,
  types::{FactType, GenderType, NamePartType, NameType, Typed},
  xml::{Element, XmlCodec},
};

// ─── Traits ──────────────────────────────────────────────────────────────────

/// A concrete conclusion subtype that can be registered with a
/// [`crate::registry::TypeRegistry`].
pub trait Conclusion:
  fmt::Debug
  + Clone
  + PartialEq
  + Serialize
  + DeserializeOwned
  + XmlCodec
  + Send
  + Sync
  + 'static
{
  const MARKER: &'static TypeMarker;

  fn id(&self) -> Option<&str>;
}

/// Object-safe view of a [`Conclusion`], implemented for every subtype.
pub trait AnyConclusion: fmt::Debug + Send + Sync {
  fn marker(&self) -> &'static TypeMarker;

  fn id(&self) -> Option<&str>;

  /// JSON object for this value, without the `@type` marker.
  fn to_json_value(&self) -> Result<serde_json::Value>;

  /// XML element named after this value's marker.
  fn to_xml_element(&self) -> Result<Element>;

  fn as_any(&self) -> &dyn Any;

  fn as_any_mut(&mut self) -> &mut dyn Any;

  fn clone_box(&self) -> Box<dyn AnyConclusion>;

  fn dyn_eq(&self, other: &dyn AnyConclusion) -> bool;
}

impl<T: Conclusion> AnyConclusion for T {
  fn marker(&self) -> &'static TypeMarker { T::MARKER }

  fn id(&self) -> Option<&str> { Conclusion::id(self) }

  fn to_json_value(&self) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(self)?)
  }

  fn to_xml_element(&self) -> Result<Element> {
    self.to_xml(T::MARKER.element_name())
  }

  fn as_any(&self) -> &dyn Any { self }

  fn as_any_mut(&mut self) -> &mut dyn Any { self }

  fn clone_box(&self) -> Box<dyn AnyConclusion> { Box::new(self.clone()) }

  fn dyn_eq(&self, other: &dyn AnyConclusion) -> bool {
    other.as_any().downcast_ref::<T>() == Some(self)
  }
}

impl dyn AnyConclusion {
  pub fn is<T: Conclusion>(&self) -> bool { self.as_any().is::<T>() }

  pub fn downcast_ref<T: Conclusion>(&self) -> Option<&T> {
    self.as_any().downcast_ref()
  }

  pub fn downcast_mut<T: Conclusion>(&mut self) -> Option<&mut T> {
    self.as_any_mut().downcast_mut()
  }
}

impl Clone for Box<dyn AnyConclusion> {
  fn clone(&self) -> Self { self.clone_box() }
}

impl PartialEq for dyn AnyConclusion {
  fn eq(&self, other: &Self) -> bool { self.dyn_eq(other) }
}

// ─── Markers ─────────────────────────────────────────────────────────────────

pub const NAME_MARKER: TypeMarker = TypeMarker::new(CONCLUSION, "Name", "name");
pub const GENDER_MARKER: TypeMarker =
  TypeMarker::new(CONCLUSION, "Gender", "gender");
pub const FACT_MARKER: TypeMarker = TypeMarker::new(CONCLUSION, "Fact", "fact");

// ─── Name ────────────────────────────────────────────────────────────────────

/// A name conclusion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Name {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id:              Option<String>,
  /// Always a URI, even when it maps to a [`NameType`].
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub kind:            Option<Uri>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub primary_form:    Option<NameForm>,
  /// Alternate forms, such as the romanized form of a non-latin name.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub alternate_forms: Option<Vec<NameForm>>,
}

impl Name {
  pub fn add_alternate_form(&mut self, form: NameForm) {
    self.alternate_forms.get_or_insert_with(Vec::new).push(form);
  }
}

impl Typed for Name {
  type Known = NameType;

  fn type_uri(&self) -> Option<&Uri> { self.kind.as_ref() }

  fn set_type_uri(&mut self, uri: Option<Uri>) { self.kind = uri; }
}

impl Conclusion for Name {
  const MARKER: &'static TypeMarker = &NAME_MARKER;

  fn id(&self) -> Option<&str> { self.id.as_deref() }
}

/// One rendering of a name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameForm {
  /// BCP 47 language tag (`xml:lang`).
  #[serde(skip_serializing_if = "Option::is_none")]
  pub lang:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub full_text: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub parts:     Option<Vec<NamePart>>,
}

impl NameForm {
  pub fn with_full_text(full_text: impl Into<String>) -> Self {
    Self {
      full_text: Some(full_text.into()),
      ..Self::default()
    }
  }

  pub fn add_part(&mut self, part: NamePart) {
    self.parts.get_or_insert_with(Vec::new).push(part);
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamePart {
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub kind:  Option<Uri>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub value: Option<String>,
}

impl NamePart {
  pub fn new(known: NamePartType, value: impl Into<String>) -> Self {
    let mut part = Self {
      value: Some(value.into()),
      ..Self::default()
    };
    part.set_known_type(known);
    part
  }
}

impl Typed for NamePart {
  type Known = NamePartType;

  fn type_uri(&self) -> Option<&Uri> { self.kind.as_ref() }

  fn set_type_uri(&mut self, uri: Option<Uri>) { self.kind = uri; }
}

// ─── Gender ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gender {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id:   Option<String>,
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub kind: Option<Uri>,
}

impl Typed for Gender {
  type Known = GenderType;

  fn type_uri(&self) -> Option<&Uri> { self.kind.as_ref() }

  fn set_type_uri(&mut self, uri: Option<Uri>) { self.kind = uri; }
}

impl Conclusion for Gender {
  const MARKER: &'static TypeMarker = &GENDER_MARKER;

  fn id(&self) -> Option<&str> { self.id.as_deref() }
}

// ─── Fact ────────────────────────────────────────────────────────────────────

/// An event or characteristic, e.g. a birth or an occupation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fact {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id:    Option<String>,
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub kind:  Option<Uri>,
  /// Date as originally recorded.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub date:  Option<String>,
  /// Place as originally recorded.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub place: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub value: Option<String>,
}

impl Typed for Fact {
  type Known = FactType;

  fn type_uri(&self) -> Option<&Uri> { self.kind.as_ref() }

  fn set_type_uri(&mut self, uri: Option<Uri>) { self.kind = uri; }
}

impl Conclusion for Fact {
  const MARKER: &'static TypeMarker = &FACT_MARKER;

  fn id(&self) -> Option<&str> { self.id.as_deref() }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::KnownType;

  #[test]
  fn name_known_type_round_trip() {
    let mut name = Name::default();
    name.set_known_type(NameType::MarriedName);
    assert_eq!(
      name.kind.as_ref().unwrap(),
      "http://gedcomx.org/types/v1/MarriedName"
    );
    assert_eq!(name.known_type(), Some(NameType::MarriedName));
  }

  #[test]
  fn name_with_custom_type_keeps_uri() {
    let name = Name {
      kind: Some("http://example.org/types/StageName".into()),
      ..Name::default()
    };
    assert_eq!(name.known_type(), Some(NameType::Other));
    assert_eq!(
      name.type_uri().unwrap(),
      "http://example.org/types/StageName"
    );
  }

  #[test]
  fn name_part_constructor_sets_canonical_type() {
    let part = NamePart::new(NamePartType::Surname, "Doe");
    assert_eq!(part.kind, NamePartType::Surname.to_uri());
    assert_eq!(part.value.as_deref(), Some("Doe"));
  }

  #[test]
  fn dyn_equality_and_downcast() {
    let a: Box<dyn AnyConclusion> = Box::new(Gender {
      id:   Some("g1".to_string()),
      kind: GenderType::Female.to_uri(),
    });
    let b = a.clone();
    assert!(*a == *b);
    assert!(a.is::<Gender>());
    assert!(!a.is::<Name>());
    assert_eq!(a.downcast_ref::<Gender>().unwrap().id.as_deref(), Some("g1"));
    assert_eq!(a.id(), Some("g1"));

    let other: Box<dyn AnyConclusion> = Box::new(Name::default());
    assert!(*a != *other);
  }

  #[test]
  fn json_uses_type_property_for_kind() {
    let gender = Gender {
      id:   None,
      kind: GenderType::Male.to_uri(),
    };
    let json = serde_json::to_value(&gender).unwrap();
    assert_eq!(json["type"], "http://gedcomx.org/types/v1/Male");
    assert!(json.get("id").is_none());
  }
}
