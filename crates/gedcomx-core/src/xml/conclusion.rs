use super::{
  Element,
  XmlCodec,
  XmlRoot,
  attr,
  push_list,
  push_one,
  push_text,
  read_list,
  read_one,
  set_attr,
  text,
};
use crate::{
  Result,
  conclusion::{
    FACT_MARKER,
    Fact,
    GENDER_MARKER,
    Gender,
    NAME_MARKER,
    Name,
    NameForm,
    NamePart,
  },
  names::{XmlName, fact, gender, name, name_form, name_part},
};

impl XmlCodec for Name {
  fn to_xml(&self, element_name: XmlName) -> Result<Element> {
    let mut element = Element::new(element_name);
    set_attr(&mut element, name::ID, self.id.as_deref());
    set_attr(&mut element, name::TYPE, self.kind.as_ref().map(|u| u.as_str()));
    push_one(&mut element, name::PRIMARY_FORM, &self.primary_form)?;
    push_list(&mut element, name::ALTERNATE_FORMS, &self.alternate_forms)?;
    Ok(element)
  }

  fn from_xml(element: &Element) -> Result<Self> {
    Ok(Self {
      id:              attr(element, name::ID),
      kind:            attr(element, name::TYPE).map(Into::into),
      primary_form:    read_one(element, name::PRIMARY_FORM)?,
      alternate_forms: read_list(element, name::ALTERNATE_FORMS)?,
    })
  }
}

impl XmlRoot for Name {
  const ROOT: XmlName = NAME_MARKER.element_name();
}

impl XmlCodec for NameForm {
  fn to_xml(&self, element_name: XmlName) -> Result<Element> {
    let mut element = Element::new(element_name);
    set_attr(&mut element, name_form::LANG, self.lang.as_deref());
    push_text(&mut element, name_form::FULL_TEXT, self.full_text.as_deref());
    push_list(&mut element, name_form::PARTS, &self.parts)?;
    Ok(element)
  }

  fn from_xml(element: &Element) -> Result<Self> {
    Ok(Self {
      lang:      attr(element, name_form::LANG),
      full_text: text(element, name_form::FULL_TEXT),
      parts:     read_list(element, name_form::PARTS)?,
    })
  }
}

impl XmlCodec for NamePart {
  fn to_xml(&self, element_name: XmlName) -> Result<Element> {
    let mut element = Element::new(element_name);
    set_attr(
      &mut element,
      name_part::TYPE,
      self.kind.as_ref().map(|u| u.as_str()),
    );
    set_attr(&mut element, name_part::VALUE, self.value.as_deref());
    Ok(element)
  }

  fn from_xml(element: &Element) -> Result<Self> {
    Ok(Self {
      kind:  attr(element, name_part::TYPE).map(Into::into),
      value: attr(element, name_part::VALUE),
    })
  }
}

impl XmlCodec for Gender {
  fn to_xml(&self, element_name: XmlName) -> Result<Element> {
    let mut element = Element::new(element_name);
    set_attr(&mut element, gender::ID, self.id.as_deref());
    set_attr(&mut element, gender::TYPE, self.kind.as_ref().map(|u| u.as_str()));
    Ok(element)
  }

  fn from_xml(element: &Element) -> Result<Self> {
    Ok(Self {
      id:   attr(element, gender::ID),
      kind: attr(element, gender::TYPE).map(Into::into),
    })
  }
}

impl XmlRoot for Gender {
  const ROOT: XmlName = GENDER_MARKER.element_name();
}

impl XmlCodec for Fact {
  fn to_xml(&self, element_name: XmlName) -> Result<Element> {
    let mut element = Element::new(element_name);
    set_attr(&mut element, fact::ID, self.id.as_deref());
    set_attr(&mut element, fact::TYPE, self.kind.as_ref().map(|u| u.as_str()));
    push_text(&mut element, fact::DATE, self.date.as_deref());
    push_text(&mut element, fact::PLACE, self.place.as_deref());
    push_text(&mut element, fact::VALUE, self.value.as_deref());
    Ok(element)
  }

  fn from_xml(element: &Element) -> Result<Self> {
    Ok(Self {
      id:    attr(element, fact::ID),
      kind:  attr(element, fact::TYPE).map(Into::into),
      date:  text(element, fact::DATE),
      place: text(element, fact::PLACE),
      value: text(element, fact::VALUE),
    })
  }
}

impl XmlRoot for Fact {
  const ROOT: XmlName = FACT_MARKER.element_name();
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    names::CONCLUSION,
    types::{FactType, KnownType, NamePartType},
    xml::{from_str, parse, to_string},
  };

  #[test]
  fn fact_reads_from_foreign_prefixes() {
    let xml = r#"<c:fact xmlns:c="http://gedcomx.org/conclusion/v1/"
      xmlns:t="http://gedcomx.org/common/v1/"
      id="f1" t:type="http://gedcomx.org/types/v1/Birth">
      <c:date>1 Jan 1900</c:date>
      <c:place>Boston</c:place>
    </c:fact>"#;
    let fact: Fact = from_str(xml).unwrap();
    assert_eq!(fact.id.as_deref(), Some("f1"));
    assert_eq!(fact.kind, FactType::Birth.to_uri());
    assert_eq!(fact.date.as_deref(), Some("1 Jan 1900"));
    assert_eq!(fact.place.as_deref(), Some("Boston"));
    assert_eq!(fact.value, None);
  }

  #[test]
  fn name_parts_are_attributes() {
    let mut form = NameForm::with_full_text("Jane Doe");
    form.add_part(NamePart::new(NamePartType::Given, "Jane"));
    let name = Name {
      primary_form: Some(form),
      ..Name::default()
    };
    let root = parse(&to_string(&name).unwrap()).unwrap();
    assert!(root.has_name(XmlName::new(CONCLUSION, "name")));
    let part = root
      .child(name::PRIMARY_FORM.xml)
      .and_then(|f| f.child(name_form::PARTS.xml))
      .unwrap();
    assert_eq!(part.attribute(name_part::VALUE.xml), Some("Jane"));
    assert_eq!(
      part.attribute(name_part::TYPE.xml),
      Some("http://gedcomx.org/types/v1/Given")
    );
  }
}
