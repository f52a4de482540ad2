//! XML encoding.
//!
//! Documents are parsed into a namespace-resolved [`Element`] tree and each
//! entity reads itself from that tree through [`XmlCodec`]. All element and
//! attribute names come from [`crate::names`]. Unrecognised children of an
//! Atom entry or feed are kept as extension elements; in polymorphic
//! positions every child must resolve through the [`crate::registry`].
//!
//! Character data is preserved exactly. Only whitespace between child
//! elements is discarded, so indented and compact output read back the same.

mod atom;
mod conclusion;
mod document;
mod links;
mod tree;

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
pub use tree::{Attribute, Element, parse, write};

use crate::{
  Error,
  Result,
  conclusion::AnyConclusion,
  names::{FieldName, XmlName},
  registry,
};

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Conversion between an entity and an element of a given name.
///
/// The element name is supplied by the container, so the same entity can
/// appear under different names (an Atom `author` and `contributor` are both
/// persons).
///
/// Encoding fails for values the wire format cannot carry, such as a
/// non-finite score.
pub trait XmlCodec: Sized {
  fn to_xml(&self, name: XmlName) -> Result<Element>;

  fn from_xml(element: &Element) -> Result<Self>;
}

/// An entity that can be the document element of a standalone XML document.
pub trait XmlRoot: XmlCodec {
  const ROOT: XmlName;
}

// ─── Documents ───────────────────────────────────────────────────────────────

pub fn to_string<T: XmlRoot>(value: &T) -> Result<String> {
  write(&value.to_xml(T::ROOT)?, false)
}

pub fn to_string_pretty<T: XmlRoot>(value: &T) -> Result<String> {
  write(&value.to_xml(T::ROOT)?, true)
}

/// Parse a document whose root element must be `T::ROOT`.
pub fn from_str<T: XmlRoot>(input: &str) -> Result<T> {
  let root = parse(input)?;
  if !root.has_name(T::ROOT) {
    return Err(Error::UnexpectedRoot {
      expected: T::ROOT.clark(),
      found:    root.clark_name(),
    });
  }
  T::from_xml(&root)
}

/// Encode a single conclusion as a document rooted at its marker element.
pub fn conclusion_to_string(conclusion: &dyn AnyConclusion) -> Result<String> {
  let element = registry::global().to_xml(conclusion)?;
  write(&element, false)
}

/// Decode a document whose root element names a registered conclusion type.
pub fn conclusion_from_str(input: &str) -> Result<Box<dyn AnyConclusion>> {
  registry::global().from_xml(&parse(input)?)
}

// ─── Field helpers ───────────────────────────────────────────────────────────

pub(crate) fn set_attr(element: &mut Element, field: FieldName, value: Option<&str>) {
  if let Some(value) = value {
    element.set_attribute(field.xml, value);
  }
}

pub(crate) fn attr(element: &Element, field: FieldName) -> Option<String> {
  element.attribute(field.xml).map(str::to_string)
}

pub(crate) fn push_text(element: &mut Element, field: FieldName, value: Option<&str>) {
  if let Some(value) = value {
    element.push_child(Element::with_text(field.xml, value));
  }
}

pub(crate) fn text(element: &Element, field: FieldName) -> Option<String> {
  element.child_text(field.xml).map(str::to_string)
}

pub(crate) fn push_one<T: XmlCodec>(
  element: &mut Element,
  field: FieldName,
  value: &Option<T>,
) -> Result<()> {
  if let Some(value) = value {
    element.push_child(value.to_xml(field.xml)?);
  }
  Ok(())
}

pub(crate) fn read_one<T: XmlCodec>(element: &Element, field: FieldName) -> Result<Option<T>> {
  element.child(field.xml).map(T::from_xml).transpose()
}

/// Repeated child elements. `Some(empty)` writes nothing, so it reads back as
/// `None`; XML cannot distinguish the two.
pub(crate) fn push_list<T: XmlCodec>(
  element: &mut Element,
  field: FieldName,
  values: &Option<Vec<T>>,
) -> Result<()> {
  for value in values.iter().flatten() {
    element.push_child(value.to_xml(field.xml)?);
  }
  Ok(())
}

pub(crate) fn read_list<T: XmlCodec>(
  element: &Element,
  field: FieldName,
) -> Result<Option<Vec<T>>> {
  let values = element
    .children_named(field.xml)
    .map(T::from_xml)
    .collect::<Result<Vec<_>>>()?;
  Ok((!values.is_empty()).then_some(values))
}

/// Children whose names are not in `fields`, in document order.
pub(crate) fn read_extensions(
  element: &Element,
  fields: &[FieldName],
) -> Option<Vec<Element>> {
  let extensions = element
    .children
    .iter()
    .filter(|child| !fields.iter().any(|f| child.has_name(f.xml)))
    .cloned()
    .collect::<Vec<_>>();
  (!extensions.is_empty()).then_some(extensions)
}

pub(crate) fn push_extensions(element: &mut Element, extensions: &Option<Vec<Element>>) {
  for extension in extensions.iter().flatten() {
    element.push_child(extension.clone());
  }
}

pub(crate) fn read_parsed<T: FromStr>(
  element: &Element,
  field: FieldName,
) -> Result<Option<T>> {
  let Some(raw) = element.child_text(field.xml) else {
    return Ok(None);
  };
  raw.trim().parse().map(Some).map_err(|_| Error::InvalidValue {
    field: field.json,
    value: raw.to_string(),
  })
}

pub(crate) fn push_date(
  element: &mut Element,
  field: FieldName,
  value: Option<&DateTime<Utc>>,
) {
  let formatted = value.map(|d| d.to_rfc3339_opts(SecondsFormat::AutoSi, true));
  push_text(element, field, formatted.as_deref());
}

pub(crate) fn read_date(
  element: &Element,
  field: FieldName,
) -> Result<Option<DateTime<Utc>>> {
  let Some(raw) = element.child_text(field.xml) else {
    return Ok(None);
  };
  DateTime::parse_from_rfc3339(raw.trim())
    .map(|d| Some(d.with_timezone(&Utc)))
    .map_err(|_| Error::InvalidValue {
      field: field.json,
      value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    atom::{Entry, Feed},
    conclusion::{Fact, Gender, Name},
    document::Gedcomx,
    links::{HasLinks, Link},
    names::{self, CONCLUSION},
    test_helpers::{full_document, full_entry, sample_entry},
    types::{KnownType, NameType, ResultConfidence, Typed},
  };

  #[test]
  fn example_entry_round_trips() {
    let entry = sample_entry();
    let xml = to_string(&entry).unwrap();
    assert!(xml.contains("<atom:entry"));
    assert!(xml.contains(r#"<atom:link rel="self" href="https://example.org/1"/>"#));
    let back: Entry = from_str(&xml).unwrap();
    assert_eq!(back, entry);
    assert_eq!(back.link("self"), entry.link("self"));
  }

  #[test]
  fn full_entry_round_trips() {
    let entry = full_entry();
    let xml = to_string_pretty(&entry).unwrap();
    let back: Entry = from_str(&xml).unwrap();
    assert_eq!(back, entry);
  }

  #[test]
  fn feed_round_trips() {
    let mut feed = Feed {
      id: Some("urn:feed:1".into()),
      title: Some("Search results".to_string()),
      total_results: Some(2),
      ..Feed::default()
    };
    feed.add_link_href("next", "https://example.org/search?page=2");
    feed.add_entry(sample_entry());
    feed.add_entry(full_entry());

    let xml = to_string(&feed).unwrap();
    assert!(xml.contains("<gx:totalResults>2</gx:totalResults>"));
    let back: Feed = from_str(&xml).unwrap();
    assert_eq!(back, feed);
  }

  #[test]
  fn document_round_trips_with_subtypes() {
    let doc = full_document();
    let xml = to_string(&doc).unwrap();
    assert!(xml.contains("<gxc:name"));
    assert!(xml.contains("<gxc:gender"));
    assert!(xml.contains("<gxc:fact"));
    assert!(xml.contains(r#"xml:lang="en""#));

    let back: Gedcomx = from_str(&xml).unwrap();
    assert_eq!(back, doc);
    assert_eq!(back.conclusions_of::<Name>().len(), 1);
    assert_eq!(back.conclusions_of::<Gender>().len(), 1);
    assert_eq!(back.conclusions_of::<Fact>().len(), 1);
  }

  #[test]
  fn wrong_root_is_rejected() {
    let xml = to_string(&sample_entry()).unwrap();
    assert!(matches!(
      from_str::<Feed>(&xml),
      Err(Error::UnexpectedRoot { .. })
    ));
  }

  #[test]
  fn unknown_conclusion_element_is_an_error() {
    let xml = r#"<gx:gedcomx xmlns:gx="http://gedcomx.org/v1/"
      xmlns:gxc="http://gedcomx.org/conclusion/v1/">
      <gxc:unicorn id="u1"/>
    </gx:gedcomx>"#;
    assert!(matches!(
      from_str::<Gedcomx>(xml),
      Err(Error::UnknownType(name)) if name == format!("{{{CONCLUSION}}}unicorn")
    ));
  }

  #[test]
  fn unknown_entry_children_are_kept_as_extensions() {
    let xml = r#"<entry xmlns="http://www.w3.org/2005/Atom">
      <title>Jane</title>
      <summary>kept</summary>
      <x:extra xmlns:x="urn:ext" x:level="2"><x:note>deep</x:note></x:extra>
    </entry>"#;
    let entry: Entry = from_str(xml).unwrap();
    assert_eq!(entry.title.as_deref(), Some("Jane"));

    let extensions = entry.extension_elements.as_ref().unwrap();
    assert_eq!(extensions.len(), 2);
    assert!(extensions[0].has_name(XmlName::new(names::ATOM, "summary")));
    assert_eq!(extensions[0].text.as_deref(), Some("kept"));
    let extra = &extensions[1];
    assert!(extra.has_name(XmlName::new("urn:ext", "extra")));
    assert_eq!(extra.attribute(XmlName::new("urn:ext", "level")), Some("2"));
    assert_eq!(extra.child_text(XmlName::new("urn:ext", "note")), Some("deep"));

    for pretty in [false, true] {
      let out = if pretty {
        to_string_pretty(&entry).unwrap()
      } else {
        to_string(&entry).unwrap()
      };
      assert_eq!(from_str::<Entry>(&out).unwrap(), entry, "{out}");
    }

    let json = crate::json::to_string(&entry).unwrap();
    assert!(json.contains("\"extensionElements\""), "{json}");
    let via_json: Entry = crate::json::from_str(&json).unwrap();
    assert_eq!(via_json, entry);
    let back: Entry = from_str(&to_string(&via_json).unwrap()).unwrap();
    assert_eq!(back, entry);
  }

  #[test]
  fn feed_keeps_extensions() {
    let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
      <subtitle>page one</subtitle>
      <entry><title>Jane</title></entry>
    </feed>"#;
    let feed: Feed = from_str(xml).unwrap();
    assert_eq!(feed.entries.as_ref().map(Vec::len), Some(1));
    let extensions = feed.extension_elements.as_ref().unwrap();
    assert_eq!(extensions.len(), 1);
    assert!(extensions[0].has_name(XmlName::new(names::ATOM, "subtitle")));
    assert_eq!(from_str::<Feed>(&to_string(&feed).unwrap()).unwrap(), feed);
  }

  #[test]
  fn text_values_keep_surrounding_whitespace() {
    let entry = Entry {
      title: Some("  Jane Doe ".to_string()),
      rights: Some(" ".to_string()),
      id: Some("\n".into()),
      ..Entry::default()
    };
    let mut doc = Gedcomx::default();
    doc.add_conclusion(Fact {
      value: Some("\n".to_string()),
      place: Some(" Jane ".to_string()),
      date: Some(String::new()),
      ..Fact::default()
    });

    for pretty in [false, true] {
      let (entry_xml, doc_xml) = if pretty {
        (to_string_pretty(&entry).unwrap(), to_string_pretty(&doc).unwrap())
      } else {
        (to_string(&entry).unwrap(), to_string(&doc).unwrap())
      };
      assert_eq!(from_str::<Entry>(&entry_xml).unwrap(), entry, "{entry_xml}");
      assert_eq!(from_str::<Gedcomx>(&doc_xml).unwrap(), doc, "{doc_xml}");
    }
  }

  #[test]
  fn non_finite_scores_are_rejected() {
    for score in [f32::INFINITY, f32::NEG_INFINITY, f32::NAN] {
      let entry = Entry {
        score: Some(score),
        ..Entry::default()
      };
      assert!(matches!(
        to_string(&entry),
        Err(Error::InvalidValue { field: "score", .. })
      ));
    }

    let xml = r#"<entry xmlns="http://www.w3.org/2005/Atom"
      xmlns:gx="http://gedcomx.org/v1/"><gx:score>inf</gx:score></entry>"#;
    assert!(matches!(
      from_str::<Entry>(xml),
      Err(Error::InvalidValue { field: "score", .. })
    ));
  }

  #[test]
  fn other_confidence_cannot_be_written() {
    let entry = Entry {
      confidence: Some(ResultConfidence::Other),
      ..Entry::default()
    };
    assert!(matches!(
      to_string(&entry),
      Err(Error::InvalidValue { field: "confidence", .. })
    ));
    assert!(crate::json::to_string(&entry).is_err());
  }

  #[test]
  fn unknown_type_uri_is_preserved() {
    let name = Name {
      kind: Some("http://example.org/types/StageName".into()),
      ..Name::default()
    };
    let xml = conclusion_to_string(&name).unwrap();
    let back = conclusion_from_str(&xml).unwrap();
    let back = back.downcast_ref::<Name>().unwrap();
    assert_eq!(back.kind, name.kind);
    assert_eq!(back.known_type(), Some(NameType::Other));
  }

  #[test]
  fn link_without_rel_is_rejected() {
    let xml = r#"<entry xmlns="http://www.w3.org/2005/Atom">
      <link href="https://example.org/1"/>
    </entry>"#;
    assert!(matches!(
      from_str::<Entry>(xml),
      Err(Error::MissingField { field: "rel", .. })
    ));
  }

  #[test]
  fn invalid_scalars_are_rejected() {
    let xml = r#"<entry xmlns="http://www.w3.org/2005/Atom"
      xmlns:gx="http://gedcomx.org/v1/"><gx:score>high</gx:score></entry>"#;
    assert!(matches!(
      from_str::<Entry>(xml),
      Err(Error::InvalidValue { field: "score", .. })
    ));

    let xml = r#"<entry xmlns="http://www.w3.org/2005/Atom"
      xmlns:gx="http://gedcomx.org/v1/">
      <gx:confidence>http://gedcomx.org/search/v1/Eleven</gx:confidence>
    </entry>"#;
    assert!(matches!(
      from_str::<Entry>(xml),
      Err(Error::InvalidValue { field: "confidence", .. })
    ));

    let xml = r#"<entry xmlns="http://www.w3.org/2005/Atom">
      <updated>yesterday</updated></entry>"#;
    assert!(from_str::<Entry>(xml).is_err());
  }

  #[test]
  fn confidence_is_written_as_uri() {
    let entry = Entry {
      confidence: Some(ResultConfidence::Five),
      ..Entry::default()
    };
    let xml = to_string(&entry).unwrap();
    assert!(xml.contains(
      "<gx:confidence>http://gedcomx.org/search/v1/Five</gx:confidence>"
    ));
  }

  #[test]
  fn empty_lists_read_back_absent() {
    let entry = Entry {
      links: Some(Vec::<Link>::new()),
      ..Entry::default()
    };
    let back: Entry = from_str(&to_string(&entry).unwrap()).unwrap();
    assert_eq!(back.links, None);
  }

  #[test]
  fn element_names_follow_name_table() {
    let element = full_entry().to_xml(names::entry::ROOT).unwrap();
    for child in &element.children {
      assert!(
        names::entry::FIELDS.iter().any(|f| child.has_name(f.xml)),
        "{} is not in the name table",
        child.clark_name()
      );
    }
  }

  #[test]
  fn canonical_type_is_a_common_attribute() {
    let mut name = Name::default();
    name.set_known_type(NameType::BirthName);
    let element = name
      .to_xml(crate::conclusion::NAME_MARKER.element_name())
      .unwrap();
    assert_eq!(
      element.attribute(names::name::TYPE.xml),
      NameType::BirthName.to_uri().as_ref().map(|u| u.as_str())
    );
  }
}
