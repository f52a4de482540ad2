use super::{
  Element,
  XmlCodec,
  XmlRoot,
  attr,
  push_date,
  push_extensions,
  push_list,
  push_one,
  push_text,
  read_date,
  read_extensions,
  read_list,
  read_one,
  read_parsed,
  set_attr,
  text,
};
use crate::{
  Error,
  Result,
  atom::{Category, Content, Entry, Feed, Person},
  names::{XmlName, category, content, entry, feed, person},
  types::{KnownType, ResultConfidence},
};

// ─── Entry ───────────────────────────────────────────────────────────────────

fn push_score(element: &mut Element, value: Option<f32>) -> Result<()> {
  let Some(score) = value else { return Ok(()) };
  if !score.is_finite() {
    return Err(Error::InvalidValue {
      field: entry::SCORE.json,
      value: score.to_string(),
    });
  }
  push_text(element, entry::SCORE, Some(&score.to_string()));
  Ok(())
}

/// `inf` and `NaN` parse as `f32` but are not scores.
fn read_score(element: &Element) -> Result<Option<f32>> {
  match read_parsed::<f32>(element, entry::SCORE)? {
    Some(score) if !score.is_finite() => Err(Error::InvalidValue {
      field: entry::SCORE.json,
      value: score.to_string(),
    }),
    score => Ok(score),
  }
}

fn push_confidence(
  element: &mut Element,
  value: Option<ResultConfidence>,
) -> Result<()> {
  let Some(confidence) = value else { return Ok(()) };
  let uri = confidence.to_uri().ok_or_else(|| Error::InvalidValue {
    field: entry::CONFIDENCE.json,
    value: format!("{confidence:?}"),
  })?;
  push_text(element, entry::CONFIDENCE, Some(uri.as_str()));
  Ok(())
}

fn read_confidence(element: &Element) -> Result<Option<ResultConfidence>> {
  let Some(raw) = element.child_text(entry::CONFIDENCE.xml) else {
    return Ok(None);
  };
  ResultConfidence::parse_uri(raw.trim())
    .map(Some)
    .ok_or_else(|| Error::InvalidValue {
      field: entry::CONFIDENCE.json,
      value: raw.to_string(),
    })
}

impl XmlCodec for Entry {
  fn to_xml(&self, name: XmlName) -> Result<Element> {
    let mut element = Element::new(name);
    push_list(&mut element, entry::AUTHORS, &self.authors)?;
    push_list(&mut element, entry::CATEGORIES, &self.categories)?;
    push_one(&mut element, entry::CONTENT, &self.content)?;
    push_list(&mut element, entry::CONTRIBUTORS, &self.contributors)?;
    push_text(&mut element, entry::ID, self.id.as_ref().map(|u| u.as_str()));
    push_score(&mut element, self.score)?;
    push_confidence(&mut element, self.confidence)?;
    push_list(&mut element, entry::LINKS, &self.links)?;
    push_date(&mut element, entry::PUBLISHED, self.published.as_ref());
    push_text(&mut element, entry::RIGHTS, self.rights.as_deref());
    push_text(&mut element, entry::TITLE, self.title.as_deref());
    push_date(&mut element, entry::UPDATED, self.updated.as_ref());
    push_extensions(&mut element, &self.extension_elements);
    Ok(element)
  }

  fn from_xml(element: &Element) -> Result<Self> {
    Ok(Self {
      authors:            read_list(element, entry::AUTHORS)?,
      categories:         read_list(element, entry::CATEGORIES)?,
      content:            read_one(element, entry::CONTENT)?,
      contributors:       read_list(element, entry::CONTRIBUTORS)?,
      id:                 text(element, entry::ID).map(Into::into),
      score:              read_score(element)?,
      confidence:         read_confidence(element)?,
      links:              read_list(element, entry::LINKS)?,
      published:          read_date(element, entry::PUBLISHED)?,
      rights:             text(element, entry::RIGHTS),
      title:              text(element, entry::TITLE),
      updated:            read_date(element, entry::UPDATED)?,
      extension_elements: read_extensions(element, entry::FIELDS),
    })
  }
}

impl XmlRoot for Entry {
  const ROOT: XmlName = entry::ROOT;
}

// ─── Feed ────────────────────────────────────────────────────────────────────

impl XmlCodec for Feed {
  fn to_xml(&self, name: XmlName) -> Result<Element> {
    let mut element = Element::new(name);
    push_text(&mut element, feed::ID, self.id.as_ref().map(|u| u.as_str()));
    push_text(&mut element, feed::TITLE, self.title.as_deref());
    push_date(&mut element, feed::UPDATED, self.updated.as_ref());
    push_list(&mut element, feed::AUTHORS, &self.authors)?;
    push_list(&mut element, feed::LINKS, &self.links)?;
    push_text(
      &mut element,
      feed::TOTAL_RESULTS,
      self.total_results.map(|n| n.to_string()).as_deref(),
    );
    push_list(&mut element, feed::ENTRIES, &self.entries)?;
    push_extensions(&mut element, &self.extension_elements);
    Ok(element)
  }

  fn from_xml(element: &Element) -> Result<Self> {
    Ok(Self {
      id:                 text(element, feed::ID).map(Into::into),
      title:              text(element, feed::TITLE),
      updated:            read_date(element, feed::UPDATED)?,
      authors:            read_list(element, feed::AUTHORS)?,
      links:              read_list(element, feed::LINKS)?,
      entries:            read_list(element, feed::ENTRIES)?,
      total_results:      read_parsed(element, feed::TOTAL_RESULTS)?,
      extension_elements: read_extensions(element, feed::FIELDS),
    })
  }
}

impl XmlRoot for Feed {
  const ROOT: XmlName = feed::ROOT;
}

// ─── Supporting constructs ───────────────────────────────────────────────────

impl XmlCodec for Person {
  fn to_xml(&self, name: XmlName) -> Result<Element> {
    let mut element = Element::new(name);
    push_text(&mut element, person::NAME, self.name.as_deref());
    push_text(&mut element, person::URI, self.uri.as_ref().map(|u| u.as_str()));
    push_text(&mut element, person::EMAIL, self.email.as_deref());
    Ok(element)
  }

  fn from_xml(element: &Element) -> Result<Self> {
    Ok(Self {
      name:  text(element, person::NAME),
      uri:   text(element, person::URI).map(Into::into),
      email: text(element, person::EMAIL),
    })
  }
}

impl XmlCodec for Category {
  fn to_xml(&self, name: XmlName) -> Result<Element> {
    let mut element = Element::new(name);
    set_attr(
      &mut element,
      category::SCHEME,
      self.scheme.as_ref().map(|u| u.as_str()),
    );
    set_attr(&mut element, category::TERM, self.term.as_deref());
    set_attr(&mut element, category::LABEL, self.label.as_deref());
    Ok(element)
  }

  fn from_xml(element: &Element) -> Result<Self> {
    Ok(Self {
      scheme: attr(element, category::SCHEME).map(Into::into),
      term:   attr(element, category::TERM),
      label:  attr(element, category::LABEL),
    })
  }
}

impl XmlCodec for Content {
  fn to_xml(&self, name: XmlName) -> Result<Element> {
    let mut element = Element::new(name);
    set_attr(&mut element, content::TYPE, self.content_type.as_deref());
    push_one(&mut element, content::GEDCOMX, &self.gedcomx)?;
    Ok(element)
  }

  fn from_xml(element: &Element) -> Result<Self> {
    Ok(Self {
      content_type: attr(element, content::TYPE),
      gedcomx:      read_one(element, content::GEDCOMX)?,
    })
  }
}
