//! Polymorphic type discriminator.
//!
//! A [`TypeRegistry`] maps wire-level type markers to factories for concrete
//! [`Conclusion`] subtypes. JSON carries the marker as an `@type` property
//! (`namespace + type name`); XML carries it as the qualified element name.
//! Both resolve through the same registration.
//!
//! Resolution is exact. An unrecognised marker is a format error, unlike the
//! lenient `Other` fallback of [`crate::types::KnownType`].
//!
//! The process-wide registry is populated once, either explicitly through
//! [`install`] at start-up or implicitly with the builtin subtypes on first
//! use, and is immutable afterwards.

use std::{collections::HashMap, sync::OnceLock};

use serde_json::Value;

use crate::{
  Error,
  Result,
  conclusion::{AnyConclusion, Conclusion, Fact, Gender, Name},
  names::{XmlName, clark},
  xml::Element,
};

/// JSON property carrying the type marker.
pub const TYPE_PROPERTY: &str = "@type";

// ─── Markers ─────────────────────────────────────────────────────────────────

/// Static description of a conclusion subtype's wire identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeMarker {
  pub namespace: &'static str,
  /// Type name used in the JSON marker, e.g. `Name`.
  pub type_name: &'static str,
  /// Local XML element name, e.g. `name`.
  pub element:   &'static str,
}

impl TypeMarker {
  pub const fn new(
    namespace: &'static str,
    type_name: &'static str,
    element: &'static str,
  ) -> Self {
    Self {
      namespace,
      type_name,
      element,
    }
  }

  /// The `@type` value, e.g. `http://gedcomx.org/conclusion/v1/Name`.
  pub fn json_marker(&self) -> String {
    format!("{}{}", self.namespace, self.type_name)
  }

  pub const fn element_name(&self) -> XmlName {
    XmlName::new(self.namespace, self.element)
  }
}

// ─── Registrations ───────────────────────────────────────────────────────────

pub type JsonFactory = fn(Value) -> Result<Box<dyn AnyConclusion>>;
pub type XmlFactory = fn(&Element) -> Result<Box<dyn AnyConclusion>>;

/// A subtype's marker together with one factory per wire format.
#[derive(Clone, Copy)]
pub struct Registration {
  pub marker:    &'static TypeMarker,
  pub from_json: JsonFactory,
  pub from_xml:  XmlFactory,
}

impl Registration {
  pub fn of<T: Conclusion>() -> Self {
    Self {
      marker:    T::MARKER,
      from_json: conclusion_from_json::<T>,
      from_xml:  conclusion_from_xml::<T>,
    }
  }
}

impl std::fmt::Debug for Registration {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Registration")
      .field("marker", self.marker)
      .finish_non_exhaustive()
  }
}

fn conclusion_from_json<T: Conclusion>(
  value: Value,
) -> Result<Box<dyn AnyConclusion>> {
  let conclusion: T = serde_json::from_value(value)?;
  Ok(Box::new(conclusion))
}

fn conclusion_from_xml<T: Conclusion>(
  element: &Element,
) -> Result<Box<dyn AnyConclusion>> {
  Ok(Box::new(T::from_xml(element)?))
}

// ─── Registry ────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct TypeRegistry {
  /// Keyed by JSON marker.
  by_json:    HashMap<String, Registration>,
  /// Clark-notation element name → JSON marker.
  by_element: HashMap<String, String>,
}

impl TypeRegistry {
  /// An empty registry.
  pub fn new() -> Self { Self::default() }

  /// A registry holding `Name`, `Gender` and `Fact`.
  pub fn with_builtins() -> Self {
    let mut registry = Self::new();
    registry.insert(Registration::of::<Name>());
    registry.insert(Registration::of::<Gender>());
    registry.insert(Registration::of::<Fact>());
    registry
  }

  /// Register `T`. Fails if its JSON marker or element name is taken;
  /// existing registrations are never replaced.
  pub fn register<T: Conclusion>(&mut self) -> Result<()> {
    self.register_entry(Registration::of::<T>())
  }

  pub fn register_entry(&mut self, registration: Registration) -> Result<()> {
    let json = registration.marker.json_marker();
    let element = registration.marker.element_name().clark();
    if self.by_json.contains_key(&json) {
      return Err(Error::DuplicateType(json));
    }
    if self.by_element.contains_key(&element) {
      return Err(Error::DuplicateType(element));
    }
    self.insert(registration);
    Ok(())
  }

  fn insert(&mut self, registration: Registration) {
    let json = registration.marker.json_marker();
    tracing::debug!(marker = %json, "registering conclusion type");
    self
      .by_element
      .insert(registration.marker.element_name().clark(), json.clone());
    self.by_json.insert(json, registration);
  }

  pub fn len(&self) -> usize { self.by_json.len() }

  pub fn is_empty(&self) -> bool { self.by_json.is_empty() }

  pub fn markers(&self) -> impl Iterator<Item = &'static TypeMarker> + '_ {
    self.by_json.values().map(|r| r.marker)
  }

  pub fn resolve_json(&self, marker: &str) -> Result<&Registration> {
    self
      .by_json
      .get(marker)
      .ok_or_else(|| Error::UnknownType(marker.to_string()))
  }

  pub fn resolve_element(
    &self,
    namespace: Option<&str>,
    local: &str,
  ) -> Result<&Registration> {
    let key = clark(namespace.unwrap_or(""), local);
    self
      .by_element
      .get(&key)
      .and_then(|json| self.by_json.get(json))
      .ok_or(Error::UnknownType(key))
  }

  /// Instantiate the subtype named by the object's `@type` property.
  pub fn from_json(&self, value: Value) -> Result<Box<dyn AnyConclusion>> {
    let Value::Object(mut object) = value else {
      return Err(Error::MissingTypeMarker);
    };
    let marker = match object.remove(TYPE_PROPERTY) {
      Some(Value::String(marker)) => marker,
      Some(other) => return Err(Error::UnknownType(other.to_string())),
      None => return Err(Error::MissingTypeMarker),
    };
    let registration = self.resolve_json(&marker)?;
    tracing::trace!(%marker, "decoding polymorphic json value");
    (registration.from_json)(Value::Object(object))
  }

  /// Instantiate the subtype named by the element's qualified name.
  pub fn from_xml(&self, element: &Element) -> Result<Box<dyn AnyConclusion>> {
    let registration =
      self.resolve_element(element.namespace.as_deref(), &element.name)?;
    tracing::trace!(element = %element.clark_name(), "decoding polymorphic xml element");
    (registration.from_xml)(element)
  }

  /// JSON object for `conclusion` with its `@type` marker first.
  pub fn to_json(&self, conclusion: &dyn AnyConclusion) -> Result<Value> {
    let marker = conclusion.marker().json_marker();
    self.resolve_json(&marker)?;
    let mut tagged = serde_json::Map::new();
    tagged.insert(TYPE_PROPERTY.to_string(), Value::String(marker));
    match conclusion.to_json_value()? {
      Value::Object(fields) => tagged.extend(fields),
      other => {
        return Err(Error::InvalidValue {
          field: "conclusion",
          value: other.to_string(),
        });
      }
    }
    Ok(Value::Object(tagged))
  }

  /// XML element for `conclusion`, named after its registered marker.
  pub fn to_xml(&self, conclusion: &dyn AnyConclusion) -> Result<Element> {
    self.resolve_json(&conclusion.marker().json_marker())?;
    conclusion.to_xml_element()
  }
}

// ─── Process-wide registry ───────────────────────────────────────────────────

static GLOBAL: OnceLock<TypeRegistry> = OnceLock::new();

/// Install `registry` as the process-wide registry. Must happen before the
/// first call to [`global`]; afterwards the registry is fixed.
pub fn install(registry: TypeRegistry) -> Result<()> {
  GLOBAL.set(registry).map_err(|_| Error::RegistryInitialised)
}

/// The process-wide registry; the builtin subtypes unless [`install`] ran
/// first.
pub fn global() -> &'static TypeRegistry {
  GLOBAL.get_or_init(TypeRegistry::with_builtins)
}
