//! Typed enumerations and their canonical URIs.
//!
//! Each enumeration is closed and versioned: a member maps to exactly one
//! absolute URI (`<namespace><LocalName>`), and any URI outside that set
//! decodes to the `Other` sentinel. The raw URI is never stored inside the
//! enumeration; entities keep it in their own `type` field so unknown values
//! survive a round trip.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser};

use crate::{
  common::Uri,
  names::{SEARCH, TYPES},
};

// ─── Codec ───────────────────────────────────────────────────────────────────

/// A closed enumeration with a canonical URI per member.
pub trait KnownType: Copy + Eq + fmt::Debug + 'static {
  /// Namespace every canonical URI starts with.
  const NAMESPACE: &'static str;
  /// Sentinel for URIs outside the canonical set. Has no URI of its own.
  const OTHER: Self;
  /// Every defined member with its local name. `OTHER` is not listed.
  const MEMBERS: &'static [(Self, &'static str)];

  fn local_name(self) -> Option<&'static str> {
    Self::MEMBERS
      .iter()
      .find(|(member, _)| *member == self)
      .map(|(_, local)| *local)
  }

  /// The canonical URI of a defined member; `None` for `OTHER`.
  fn to_uri(self) -> Option<Uri> {
    self
      .local_name()
      .map(|local| Uri::new(format!("{}{local}", Self::NAMESPACE)))
  }

  /// Look `uri` up in the canonical set. Never fails.
  fn from_uri(uri: &str) -> Self {
    uri
      .strip_prefix(Self::NAMESPACE)
      .and_then(|local| Self::MEMBERS.iter().find(|(_, name)| *name == local))
      .map(|(member, _)| *member)
      .unwrap_or(Self::OTHER)
  }

  fn members() -> impl Iterator<Item = Self> {
    Self::MEMBERS.iter().map(|(member, _)| *member)
  }
}

/// An entity whose `type` field carries a [`KnownType`] URI.
///
/// The URI is what gets stored and serialized; the enumeration value is
/// derived on demand.
pub trait Typed {
  type Known: KnownType;

  fn type_uri(&self) -> Option<&Uri>;

  fn set_type_uri(&mut self, uri: Option<Uri>);

  /// `None` when no type is set, `Some(OTHER)` when the type is not one of
  /// the canonical URIs.
  fn known_type(&self) -> Option<Self::Known> {
    self
      .type_uri()
      .map(|uri| Self::Known::from_uri(uri.as_str()))
  }

  /// Replace the type with the canonical URI of `known`.
  ///
  /// A non-canonical URI already present is discarded (and logged).
  /// Setting `OTHER` leaves the stored URI untouched since `OTHER` has no
  /// URI of its own.
  fn set_known_type(&mut self, known: Self::Known) {
    let Some(canonical) = known.to_uri() else {
      return;
    };
    if let Some(previous) = self.type_uri()
      && *previous != canonical
      && Self::Known::from_uri(previous.as_str()) == Self::Known::OTHER
    {
      tracing::debug!(
        discarded = %previous,
        replacement = %canonical,
        "overwriting non-canonical type URI"
      );
    }
    self.set_type_uri(Some(canonical));
  }
}

// ─── Name types ──────────────────────────────────────────────────────────────

/// Known kinds of names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameType {
  BirthName,
  MarriedName,
  AlsoKnownAs,
  Nickname,
  AdoptiveName,
  FormalName,
  ReligiousName,
  Other,
}

impl KnownType for NameType {
  const NAMESPACE: &'static str = TYPES;
  const OTHER: Self = Self::Other;
  const MEMBERS: &'static [(Self, &'static str)] = &[
    (Self::BirthName, "BirthName"),
    (Self::MarriedName, "MarriedName"),
    (Self::AlsoKnownAs, "AlsoKnownAs"),
    (Self::Nickname, "Nickname"),
    (Self::AdoptiveName, "AdoptiveName"),
    (Self::FormalName, "FormalName"),
    (Self::ReligiousName, "ReligiousName"),
  ];
}

/// Known parts of a name form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamePartType {
  Prefix,
  Suffix,
  Given,
  Surname,
  Other,
}

impl KnownType for NamePartType {
  const NAMESPACE: &'static str = TYPES;
  const OTHER: Self = Self::Other;
  const MEMBERS: &'static [(Self, &'static str)] = &[
    (Self::Prefix, "Prefix"),
    (Self::Suffix, "Suffix"),
    (Self::Given, "Given"),
    (Self::Surname, "Surname"),
  ];
}

// ─── Gender ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenderType {
  Male,
  Female,
  /// The gender is recorded as unknown. Distinct from [`GenderType::Other`],
  /// which means the URI itself is not recognised.
  Unknown,
  Other,
}

impl KnownType for GenderType {
  const NAMESPACE: &'static str = TYPES;
  const OTHER: Self = Self::Other;
  const MEMBERS: &'static [(Self, &'static str)] = &[
    (Self::Male, "Male"),
    (Self::Female, "Female"),
    (Self::Unknown, "Unknown"),
  ];
}

// ─── Facts ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactType {
  Birth,
  Christening,
  Death,
  Burial,
  Marriage,
  Divorce,
  Residence,
  Occupation,
  Immigration,
  Emigration,
  Census,
  Other,
}

impl KnownType for FactType {
  const NAMESPACE: &'static str = TYPES;
  const OTHER: Self = Self::Other;
  const MEMBERS: &'static [(Self, &'static str)] = &[
    (Self::Birth, "Birth"),
    (Self::Christening, "Christening"),
    (Self::Death, "Death"),
    (Self::Burial, "Burial"),
    (Self::Marriage, "Marriage"),
    (Self::Divorce, "Divorce"),
    (Self::Residence, "Residence"),
    (Self::Occupation, "Occupation"),
    (Self::Immigration, "Immigration"),
    (Self::Emigration, "Emigration"),
    (Self::Census, "Census"),
  ];
}

// ─── Search ──────────────────────────────────────────────────────────────────

/// Confidence of a search result, one (lowest) to five (highest).
///
/// Carried directly as an element value rather than through a `type` field,
/// so there is nowhere to keep an unrecognised URI: encoding `Other` and
/// decoding an unknown URI are both errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResultConfidence {
  One,
  Two,
  Three,
  Four,
  Five,
  Other,
}

impl KnownType for ResultConfidence {
  const NAMESPACE: &'static str = SEARCH;
  const OTHER: Self = Self::Other;
  const MEMBERS: &'static [(Self, &'static str)] = &[
    (Self::One, "One"),
    (Self::Two, "Two"),
    (Self::Three, "Three"),
    (Self::Four, "Four"),
    (Self::Five, "Five"),
  ];
}

impl ResultConfidence {
  /// Strict decoding used by the wire codecs.
  pub fn parse_uri(uri: &str) -> Option<Self> {
    match Self::from_uri(uri) {
      Self::Other => None,
      known => Some(known),
    }
  }
}

impl Serialize for ResultConfidence {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self.to_uri() {
      Some(uri) => serializer.serialize_str(uri.as_str()),
      None => Err(ser::Error::custom("result confidence Other has no URI")),
    }
  }
}

impl<'de> Deserialize<'de> for ResultConfidence {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let uri = String::deserialize(deserializer)?;
    Self::parse_uri(&uri).ok_or_else(|| {
      de::Error::custom(format!("unknown result confidence {uri:?}"))
    })
  }
}
