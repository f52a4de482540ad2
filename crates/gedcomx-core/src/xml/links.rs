use super::{Element, XmlCodec, attr, set_attr};
use crate::{
  Error,
  Result,
  links::Link,
  names::{XmlName, link},
};

impl XmlCodec for Link {
  fn to_xml(&self, name: XmlName) -> Result<Element> {
    let mut element = Element::new(name);
    element.set_attribute(link::REL.xml, self.rel.as_str());
    set_attr(&mut element, link::HREF, self.href.as_ref().map(|u| u.as_str()));
    set_attr(&mut element, link::TEMPLATE, self.template.as_deref());
    set_attr(&mut element, link::TYPE, self.media_type.as_deref());
    set_attr(&mut element, link::TITLE, self.title.as_deref());
    Ok(element)
  }

  fn from_xml(element: &Element) -> Result<Self> {
    let rel = attr(element, link::REL).ok_or_else(|| Error::MissingField {
      element: element.clark_name(),
      field:   link::REL.json,
    })?;
    Ok(Self {
      rel,
      href: attr(element, link::HREF).map(Into::into),
      template: attr(element, link::TEMPLATE),
      media_type: attr(element, link::TYPE),
      title: attr(element, link::TITLE),
    })
  }
}
