//! A minimal namespace-resolved element tree.
//!
//! Reading uses `quick-xml`'s namespace-aware reader so prefixes are resolved
//! to namespace URIs before any entity codec sees them. Writing uses the
//! `quick-xml` writer and declares every namespace in use on the root element
//! with the conventional prefixes from [`crate::names::PREFIXES`].

use std::collections::BTreeMap;

use quick_xml::{
  NsReader,
  Writer,
  events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
  name::{Namespace, QName, ResolveResult},
};

use crate::{
  Error,
  Result,
  names::{PREFIXES, XML, XmlName, clark},
};
use serde::{Deserialize, Serialize};

// ─── Tree ────────────────────────────────────────────────────────────────────

/// An element with resolved names. The serde form is what carries extension
/// elements through JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub namespace:  Option<String>,
  pub name:       String,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub attributes: Vec<Attribute>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub children:   Vec<Element>,
  /// Concatenated character data directly inside this element.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub text:       Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub namespace: Option<String>,
  pub name:      String,
  pub value:     String,
}

fn namespace_of(name: XmlName) -> Option<String> {
  (!name.namespace.is_empty()).then(|| name.namespace.to_string())
}

fn matches(namespace: &Option<String>, local: &str, name: XmlName) -> bool {
  local == name.local && namespace.as_deref().unwrap_or("") == name.namespace
}

impl Element {
  pub fn new(name: XmlName) -> Self {
    Self {
      namespace: namespace_of(name),
      name: name.local.to_string(),
      ..Self::default()
    }
  }

  pub fn with_text(name: XmlName, text: impl Into<String>) -> Self {
    Self {
      text: Some(text.into()),
      ..Self::new(name)
    }
  }

  pub fn has_name(&self, name: XmlName) -> bool {
    matches(&self.namespace, &self.name, name)
  }

  pub fn clark_name(&self) -> String {
    clark(self.namespace.as_deref().unwrap_or(""), &self.name)
  }

  pub fn attribute(&self, name: XmlName) -> Option<&str> {
    self
      .attributes
      .iter()
      .find(|a| matches(&a.namespace, &a.name, name))
      .map(|a| a.value.as_str())
  }

  pub fn set_attribute(&mut self, name: XmlName, value: impl Into<String>) {
    let value = value.into();
    match self
      .attributes
      .iter_mut()
      .find(|a| matches(&a.namespace, &a.name, name))
    {
      Some(existing) => existing.value = value,
      None => self.attributes.push(Attribute {
        namespace: namespace_of(name),
        name: name.local.to_string(),
        value,
      }),
    }
  }

  pub fn child(&self, name: XmlName) -> Option<&Element> {
    self.children.iter().find(|c| c.has_name(name))
  }

  pub fn children_named(
    &self,
    name: XmlName,
  ) -> impl Iterator<Item = &Element> + '_ {
    self.children.iter().filter(move |c| c.has_name(name))
  }

  pub fn child_text(&self, name: XmlName) -> Option<&str> {
    self.child(name).map(|c| c.text.as_deref().unwrap_or(""))
  }

  pub fn push_child(&mut self, child: Element) { self.children.push(child); }
}

// ─── Reading ─────────────────────────────────────────────────────────────────

fn xml_error(e: impl std::fmt::Display) -> Error { Error::Xml(e.to_string()) }

fn resolved_namespace(
  result: ResolveResult<'_>,
  qname: QName<'_>,
) -> Result<Option<String>> {
  match result {
    ResolveResult::Bound(Namespace(ns)) => {
      Ok(Some(String::from_utf8_lossy(ns).into_owned()))
    }
    ResolveResult::Unbound => Ok(None),
    // `xml:` is bound by definition and needs no declaration.
    ResolveResult::Unknown(prefix) if prefix == b"xml" => Ok(Some(XML.to_string())),
    ResolveResult::Unknown(prefix) => Err(Error::Xml(format!(
      "undeclared namespace prefix {:?} on {:?}",
      String::from_utf8_lossy(&prefix),
      String::from_utf8_lossy(qname.as_ref()),
    ))),
  }
}

fn element_namespace(
  result: ResolveResult<'_>,
  event: &Event<'_>,
) -> Result<Option<String>> {
  match event {
    Event::Start(e) | Event::Empty(e) => resolved_namespace(result, e.name()),
    _ => Ok(None),
  }
}

fn open_element(
  reader: &NsReader<&[u8]>,
  namespace: Option<String>,
  start: &BytesStart<'_>,
) -> Result<Element> {
  let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

  let mut attributes = Vec::new();
  for attr in start.attributes() {
    let attr = attr.map_err(xml_error)?;
    if attr.key.as_namespace_binding().is_some() {
      continue;
    }
    let (result, local) = reader.resolve_attribute(attr.key);
    attributes.push(Attribute {
      namespace: resolved_namespace(result, attr.key)?,
      name:      String::from_utf8_lossy(local.as_ref()).into_owned(),
      value:     attr.unescape_value().map_err(xml_error)?.into_owned(),
    });
  }

  Ok(Element {
    namespace,
    name,
    attributes,
    ..Element::default()
  })
}

fn append_text(stack: &mut [Element], text: &str) {
  if let Some(top) = stack.last_mut() {
    top.text.get_or_insert_with(String::new).push_str(text);
  }
}

/// Parse `input` into an element tree rooted at the document element.
pub fn parse(input: &str) -> Result<Element> {
  let mut reader = NsReader::from_str(input);

  let mut stack: Vec<Element> = Vec::new();
  let mut root: Option<Element> = None;

  loop {
    let (result, event) = reader.read_resolved_event().map_err(xml_error)?;
    // `result` borrows the reader, so resolve it before reading attributes.
    let namespace = element_namespace(result, &event)?;
    match event {
      Event::Start(ref e) => {
        let element = open_element(&reader, namespace, e)?;
        stack.push(element);
      }
      Event::Empty(ref e) => {
        let element = open_element(&reader, namespace, e)?;
        close_element(&mut stack, &mut root, element)?;
      }
      Event::End(_) => {
        let element = stack
          .pop()
          .ok_or_else(|| Error::Xml("unbalanced end tag".into()))?;
        close_element(&mut stack, &mut root, element)?;
      }
      Event::Text(ref e) => {
        let text = e.unescape().map_err(xml_error)?;
        append_text(&mut stack, &text);
      }
      Event::CData(ref e) => {
        let text = String::from_utf8_lossy(e.as_ref()).into_owned();
        append_text(&mut stack, &text);
      }
      Event::Eof => break,
      _ => {}
    }
  }

  if !stack.is_empty() {
    return Err(Error::Xml("unexpected end of document".into()));
  }
  root.ok_or_else(|| Error::Xml("document has no root element".into()))
}

/// Character data is kept as read, except whitespace-only runs between child
/// elements, which are layout.
fn close_element(
  stack: &mut [Element],
  root: &mut Option<Element>,
  mut element: Element,
) -> Result<()> {
  if !element.children.is_empty()
    && element.text.as_deref().is_some_and(|t| t.trim().is_empty())
  {
    element.text = None;
  }
  match stack.last_mut() {
    Some(parent) => parent.children.push(element),
    None if root.is_none() => *root = Some(element),
    None => return Err(Error::Xml("more than one root element".into())),
  }
  Ok(())
}

// ─── Writing ─────────────────────────────────────────────────────────────────

/// Namespace URI → prefix for one document.
struct Prefixes(BTreeMap<String, String>);

impl Prefixes {
  fn collect(root: &Element) -> Self {
    let mut used = Vec::new();
    gather_namespaces(root, &mut used);

    let mut map = BTreeMap::new();
    let mut generated = 0usize;
    for ns in used {
      if ns == XML || map.contains_key(&ns) {
        continue;
      }
      let prefix = match PREFIXES.iter().find(|(uri, _)| *uri == ns) {
        Some((_, prefix)) => prefix.to_string(),
        None => {
          let prefix = format!("ns{generated}");
          generated += 1;
          prefix
        }
      };
      map.insert(ns, prefix);
    }
    Self(map)
  }

  fn qualify(&self, namespace: Option<&str>, local: &str) -> String {
    match namespace {
      None => local.to_string(),
      Some(XML) => format!("xml:{local}"),
      Some(ns) => match self.0.get(ns) {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
      },
    }
  }
}

fn gather_namespaces(element: &Element, used: &mut Vec<String>) {
  if let Some(ns) = &element.namespace {
    used.push(ns.clone());
  }
  for attr in &element.attributes {
    if let Some(ns) = &attr.namespace {
      used.push(ns.clone());
    }
  }
  for child in &element.children {
    gather_namespaces(child, used);
  }
}

fn write_element(
  w: &mut Writer<Vec<u8>>,
  element: &Element,
  prefixes: &Prefixes,
  is_root: bool,
) -> Result<()> {
  let tag = prefixes.qualify(element.namespace.as_deref(), &element.name);
  let mut start = BytesStart::new(tag.as_str());

  if is_root {
    for (ns, prefix) in &prefixes.0 {
      start.push_attribute((format!("xmlns:{prefix}").as_str(), ns.as_str()));
    }
  }
  for attr in &element.attributes {
    let key = prefixes.qualify(attr.namespace.as_deref(), &attr.name);
    start.push_attribute((key.as_str(), attr.value.as_str()));
  }

  if element.children.is_empty() && element.text.is_none() {
    w.write_event(Event::Empty(start)).map_err(xml_error)?;
    return Ok(());
  }

  w.write_event(Event::Start(start)).map_err(xml_error)?;
  if let Some(text) = &element.text {
    w.write_event(Event::Text(BytesText::new(text)))
      .map_err(xml_error)?;
  }
  for child in &element.children {
    write_element(w, child, prefixes, false)?;
  }
  w.write_event(Event::End(BytesEnd::new(tag.as_str())))
    .map_err(xml_error)?;
  Ok(())
}

/// Serialize `root` as a standalone UTF-8 document.
pub fn write(root: &Element, pretty: bool) -> Result<String> {
  let prefixes = Prefixes::collect(root);
  let mut writer = if pretty {
    Writer::new_with_indent(Vec::new(), b' ', 2)
  } else {
    Writer::new(Vec::new())
  };

  writer
    .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    .map_err(xml_error)?;
  write_element(&mut writer, root, &prefixes, true)?;

  String::from_utf8(writer.into_inner()).map_err(xml_error)
}
