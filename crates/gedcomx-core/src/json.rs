//! JSON encoding.
//!
//! Entity records derive their JSON form with serde (property names as in
//! [`crate::names`], absent fields omitted). Polymorphic conclusion lists go
//! through the process-wide [`crate::registry`] so every value carries an
//! `@type` marker.

use serde::{Serialize, de::DeserializeOwned};

use crate::{Result, conclusion::AnyConclusion, registry};

pub fn to_string<T: Serialize>(value: &T) -> Result<String> {
  Ok(serde_json::to_string(value)?)
}

pub fn to_string_pretty<T: Serialize>(value: &T) -> Result<String> {
  Ok(serde_json::to_string_pretty(value)?)
}

pub fn from_str<T: DeserializeOwned>(input: &str) -> Result<T> {
  Ok(serde_json::from_str(input)?)
}

/// Encode a single conclusion with its `@type` marker.
pub fn conclusion_to_string(conclusion: &dyn AnyConclusion) -> Result<String> {
  let value = registry::global().to_json(conclusion)?;
  Ok(serde_json::to_string(&value)?)
}

/// Decode a single conclusion, choosing the subtype from its `@type` marker.
pub fn conclusion_from_str(input: &str) -> Result<Box<dyn AnyConclusion>> {
  let value: serde_json::Value = serde_json::from_str(input)?;
  registry::global().from_json(value)
}

/// `serde(with)` adapter for `Option<Vec<Box<dyn AnyConclusion>>>`.
pub(crate) mod conclusions {
  use serde::{
    Deserialize, Deserializer, Serializer, de, ser, ser::SerializeSeq,
  };
  use serde_json::Value;

  use crate::{conclusion::AnyConclusion, registry};

  pub fn serialize<S: Serializer>(
    value: &Option<Vec<Box<dyn AnyConclusion>>>,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    let Some(list) = value else {
      return serializer.serialize_none();
    };
    let registry = registry::global();
    let mut seq = serializer.serialize_seq(Some(list.len()))?;
    for conclusion in list {
      let tagged = registry
        .to_json(&**conclusion)
        .map_err(ser::Error::custom)?;
      seq.serialize_element(&tagged)?;
    }
    seq.end()
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<Option<Vec<Box<dyn AnyConclusion>>>, D::Error> {
    let Some(values) = Option::<Vec<Value>>::deserialize(deserializer)? else {
      return Ok(None);
    };
    let registry = registry::global();
    values
      .into_iter()
      .map(|value| registry.from_json(value).map_err(de::Error::custom))
      .collect::<Result<Vec<_>, _>>()
      .map(Some)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::{Value, json};

  use super::*;
  use crate::{
    atom::{Entry, Feed},
    conclusion::{Fact, Name},
    document::Gedcomx,
    links::{HasLinks, Link},
    names::{self, FieldName},
    test_helpers::{full_document, full_entry, sample_entry},
    types::{FactType, KnownType, NameType, Typed},
  };

  fn assert_keys_in_table(value: &Value, table: &[FieldName]) {
    let object = value.as_object().expect("json object");
    for key in object.keys() {
      if key == crate::registry::TYPE_PROPERTY {
        continue;
      }
      assert!(
        table.iter().any(|f| f.json == key),
        "{key:?} is not in the name table"
      );
    }
  }

  #[test]
  fn example_entry_round_trips() {
    let entry = sample_entry();
    let json = to_string(&entry).unwrap();
    let back: Entry = from_str(&json).unwrap();
    assert_eq!(back.id, entry.id);
    assert_eq!(back.title, entry.title);
    assert_eq!(back.links.as_ref().map(Vec::len), Some(1));
    assert_eq!(back.link("self"), entry.link("self"));
    assert_eq!(back, entry);
  }

  #[test]
  fn full_entry_round_trips() {
    let entry = full_entry();
    let json = to_string_pretty(&entry).unwrap();
    let back: Entry = from_str(&json).unwrap();
    assert_eq!(back, entry);
  }

  #[test]
  fn property_names_follow_name_table() {
    let value = serde_json::to_value(full_entry()).unwrap();
    assert_keys_in_table(&value, names::entry::FIELDS);
    for field in names::entry::FIELDS {
      assert!(value.get(field.json).is_some(), "missing {}", field.json);
    }
    assert_keys_in_table(&value["authors"][0], names::person::FIELDS);
    assert_keys_in_table(&value["categories"][0], names::category::FIELDS);
    assert_keys_in_table(&value["links"][0], names::link::FIELDS);
    assert_keys_in_table(&value["content"], names::content::FIELDS);

    let doc = &value["content"]["gedcomx"];
    assert_keys_in_table(doc, names::gedcomx::FIELDS);
    let name = &doc["conclusions"][0];
    assert_keys_in_table(name, names::name::FIELDS);
    assert_keys_in_table(&name["primaryForm"], names::name_form::FIELDS);
    assert_keys_in_table(&name["primaryForm"]["parts"][0], names::name_part::FIELDS);
    assert_keys_in_table(&doc["conclusions"][1], names::gender::FIELDS);
    assert_keys_in_table(&doc["conclusions"][2], names::fact::FIELDS);

    let mut feed = Feed {
      total_results: Some(12),
      ..Feed::default()
    };
    feed.add_entry(Entry::default());
    let feed = serde_json::to_value(&feed).unwrap();
    assert_keys_in_table(&feed, names::feed::FIELDS);
    assert_eq!(feed["totalResults"], 12);
  }

  #[test]
  fn conclusions_carry_type_marker() {
    let value = serde_json::to_value(full_document()).unwrap();
    let markers: Vec<_> = value["conclusions"]
      .as_array()
      .unwrap()
      .iter()
      .map(|c| c["@type"].as_str().unwrap().to_string())
      .collect();
    assert_eq!(markers, [
      "http://gedcomx.org/conclusion/v1/Name",
      "http://gedcomx.org/conclusion/v1/Gender",
      "http://gedcomx.org/conclusion/v1/Fact",
    ]);
  }

  #[test]
  fn document_round_trips() {
    let doc = full_document();
    let back: Gedcomx = from_str(&to_string(&doc).unwrap()).unwrap();
    assert_eq!(back, doc);
    assert!(back.conclusions.as_ref().unwrap()[0].is::<Name>());
  }

  #[test]
  fn unknown_type_marker_is_an_error() {
    let input = json!({
      "conclusions": [{ "@type": "http://gedcomx.org/conclusion/v1/Unicorn" }]
    })
    .to_string();
    let err = from_str::<Gedcomx>(&input).unwrap_err();
    assert!(err.to_string().contains("unknown type marker"), "{err}");

    let missing = json!({ "conclusions": [{ "id": "n1" }] }).to_string();
    assert!(from_str::<Gedcomx>(&missing).is_err());
  }

  #[test]
  fn single_conclusion_round_trip() {
    let fact = Fact {
      kind: FactType::Occupation.to_uri(),
      value: Some("Carpenter".to_string()),
      ..Fact::default()
    };
    let json = conclusion_to_string(&fact).unwrap();
    assert!(json.starts_with(r#"{"@type":"http://gedcomx.org/conclusion/v1/Fact""#));
    let back = conclusion_from_str(&json).unwrap();
    assert_eq!(back.downcast_ref::<Fact>(), Some(&fact));
  }

  #[test]
  fn unknown_name_type_survives_round_trip() {
    let name = Name {
      kind: Some("http://example.org/types/StageName".into()),
      ..Name::default()
    };
    let back: Name = from_str(&to_string(&name).unwrap()).unwrap();
    assert_eq!(back.known_type(), Some(NameType::Other));
    assert_eq!(back.kind, name.kind);
  }

  #[test]
  fn absent_and_empty_lists_are_distinct() {
    let absent = Entry::default();
    assert_eq!(to_string(&absent).unwrap(), "{}");

    let empty = Entry {
      links: Some(Vec::new()),
      ..Entry::default()
    };
    let json = to_string(&empty).unwrap();
    assert_eq!(json, r#"{"links":[]}"#);
    let back: Entry = from_str(&json).unwrap();
    assert_eq!(back.links, Some(Vec::<Link>::new()));
  }

  #[test]
  fn non_finite_score_is_an_error() {
    for score in [f32::INFINITY, f32::NAN] {
      let entry = Entry {
        score: Some(score),
        ..Entry::default()
      };
      let err = to_string(&entry).unwrap_err();
      assert!(err.to_string().contains("not a finite number"), "{err}");
    }

    let entry = Entry {
      score: Some(0.5),
      ..Entry::default()
    };
    assert_eq!(to_string(&entry).unwrap(), r#"{"score":0.5}"#);
  }

  #[test]
  fn unknown_confidence_is_rejected() {
    let input = r#"{"confidence":"http://gedcomx.org/search/v1/Eleven"}"#;
    assert!(from_str::<Entry>(input).is_err());
  }
}
