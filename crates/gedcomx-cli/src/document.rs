//! The document kinds the CLI understands and their wire formats.

use std::path::Path;

use anyhow::{Context as _, bail};
use clap::ValueEnum;
use gedcomx_core::{
  atom::{Entry, Feed},
  document::Gedcomx,
  links::{HasLinks, Link},
};
pub use gedcomx_rs::media::Format;
use gedcomx_rs::media::MediaType;

/// Guess a format from a file extension: `.xml` / `.atom` or `.json`.
pub fn format_from_path(path: &Path) -> Option<Format> {
  let ext = path.extension()?.to_str()?.to_ascii_lowercase();
  match ext.as_str() {
    "xml" | "atom" => Some(Format::Xml),
    "json" => Some(Format::Json),
    _ => None,
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
  /// An Atom entry.
  Entry,
  /// An Atom feed of entries.
  Feed,
  /// A GEDCOM X document of conclusions.
  Gedcomx,
}

impl Kind {
  pub fn media_type(self, format: Format) -> MediaType {
    match (self, format) {
      (Kind::Entry | Kind::Feed, Format::Xml) => MediaType::AtomXml,
      (Kind::Entry | Kind::Feed, Format::Json) => MediaType::AtomJson,
      (Kind::Gedcomx, Format::Xml) => MediaType::GedcomxXml,
      (Kind::Gedcomx, Format::Json) => MediaType::GedcomxJson,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Document {
  Entry(Entry),
  Feed(Feed),
  Gedcomx(Gedcomx),
}

impl Document {
  pub fn decode(kind: Kind, format: Format, input: &[u8]) -> anyhow::Result<Self> {
    let media = kind.media_type(format);
    let document = match kind {
      Kind::Entry => Document::Entry(media.decode_body(input)?),
      Kind::Feed => Document::Feed(media.decode_body(input)?),
      Kind::Gedcomx => Document::Gedcomx(media.decode_body(input)?),
    };
    Ok(document)
  }

  pub fn kind(&self) -> Kind {
    match self {
      Document::Entry(_) => Kind::Entry,
      Document::Feed(_) => Kind::Feed,
      Document::Gedcomx(_) => Kind::Gedcomx,
    }
  }

  pub fn encode(&self, format: Format, pretty: bool) -> anyhow::Result<Vec<u8>> {
    let media = self.kind().media_type(format);
    let body = match (self, pretty) {
      (Document::Entry(e), false) => media.encode_body(e),
      (Document::Entry(e), true) => media.encode_body_pretty(e),
      (Document::Feed(f), false) => media.encode_body(f),
      (Document::Feed(f), true) => media.encode_body_pretty(f),
      (Document::Gedcomx(g), false) => media.encode_body(g),
      (Document::Gedcomx(g), true) => media.encode_body_pretty(g),
    };
    body.with_context(|| format!("failed to encode as {media}"))
  }

  /// Top-level links, optionally restricted to one relation.
  pub fn links(&self, rel: Option<&str>) -> Vec<&Link> {
    let holder: &dyn HasLinks = match self {
      Document::Entry(e) => e,
      Document::Feed(f) => f,
      Document::Gedcomx(g) => g,
    };
    match rel {
      Some(rel) => holder.links_by_rel(rel),
      None => holder.links().map(|l| l.iter().collect()).unwrap_or_default(),
    }
  }
}

/// Resolve the input format from an explicit flag or the file extension.
pub fn input_format(explicit: Option<Format>, path: &Path) -> anyhow::Result<Format> {
  if let Some(format) = explicit {
    return Ok(format);
  }
  match format_from_path(path) {
    Some(format) => Ok(format),
    None => bail!(
      "cannot infer the format of {}; pass --from xml|json",
      path.display()
    ),
  }
}
