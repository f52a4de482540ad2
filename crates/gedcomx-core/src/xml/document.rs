use super::{Element, XmlCodec, XmlRoot, attr, push_list, read_list, set_attr};
use crate::{
  Result,
  document::Gedcomx,
  names::{XmlName, gedcomx},
  registry,
};

impl XmlCodec for Gedcomx {
  fn to_xml(&self, name: XmlName) -> Result<Element> {
    let mut element = Element::new(name);
    set_attr(&mut element, gedcomx::ID, self.id.as_deref());
    push_list(&mut element, gedcomx::LINKS, &self.links)?;
    for conclusion in self.conclusions.iter().flatten() {
      element.push_child(conclusion.to_xml_element()?);
    }
    Ok(element)
  }

  /// Children other than links are conclusions; each one must name a
  /// registered subtype.
  fn from_xml(element: &Element) -> Result<Self> {
    let registry = registry::global();
    let conclusions = element
      .children
      .iter()
      .filter(|child| !child.has_name(gedcomx::LINKS.xml))
      .map(|child| registry.from_xml(child))
      .collect::<Result<Vec<_>>>()?;

    Ok(Self {
      id:          attr(element, gedcomx::ID),
      links:       read_list(element, gedcomx::LINKS)?,
      conclusions: (!conclusions.is_empty()).then_some(conclusions),
    })
  }
}

impl XmlRoot for Gedcomx {
  const ROOT: XmlName = gedcomx::ROOT;
}
