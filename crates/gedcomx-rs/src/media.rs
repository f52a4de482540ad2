//! Media types and body encoding.

use std::{fmt, str::FromStr};

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use gedcomx_core::{json, xml, xml::XmlRoot};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{Error, Result};

/// Wire format family, named `xml` or `json` in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
  Xml,
  Json,
}

impl Format {
  pub fn as_str(self) -> &'static str {
    match self {
      Format::Xml => "xml",
      Format::Json => "json",
    }
  }
}

impl fmt::Display for Format {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Format {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "xml" => Ok(Format::Xml),
      "json" => Ok(Format::Json),
      _ => Err(Error::UnsupportedMediaType(s.to_string())),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
  GedcomxXml,
  GedcomxJson,
  AtomXml,
  AtomJson,
}

impl MediaType {
  pub const ALL: [MediaType; 4] = [
    MediaType::GedcomxXml,
    MediaType::GedcomxJson,
    MediaType::AtomXml,
    MediaType::AtomJson,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      MediaType::GedcomxXml => "application/x-gedcomx-v1+xml",
      MediaType::GedcomxJson => "application/x-gedcomx-v1+json",
      MediaType::AtomXml => "application/atom+xml",
      MediaType::AtomJson => "application/x-gedcomx-atom+json",
    }
  }

  pub fn format(self) -> Format {
    match self {
      MediaType::GedcomxXml | MediaType::AtomXml => Format::Xml,
      MediaType::GedcomxJson | MediaType::AtomJson => Format::Json,
    }
  }

  /// Parse a single header value such as `Content-Type`. Parameters are
  /// ignored, and generic XML and JSON types map to the GEDCOM X ones.
  pub fn parse(value: &str) -> Result<Self> {
    let essence = value
      .split(';')
      .next()
      .unwrap_or_default()
      .trim()
      .to_ascii_lowercase();
    if let Some(known) = Self::ALL.into_iter().find(|m| m.as_str() == essence) {
      return Ok(known);
    }
    match essence.as_str() {
      "application/xml" | "text/xml" => Ok(MediaType::GedcomxXml),
      "application/json" => Ok(MediaType::GedcomxJson),
      _ => Err(Error::UnsupportedMediaType(value.to_string())),
    }
  }

  /// Choose a response type from an `Accept` value: the supported type with
  /// the highest quality, earliest listed on ties. A wildcard selects
  /// `default`.
  pub fn negotiate(accept: &str, default: MediaType) -> Result<Self> {
    let mut best: Option<(f32, MediaType)> = None;
    for range in accept.split(',') {
      let mut params = range.split(';');
      let essence = params.next().unwrap_or_default().trim();
      let quality = params
        .filter_map(|p| p.trim().strip_prefix("q="))
        .find_map(|q| q.parse::<f32>().ok())
        .unwrap_or(1.0);
      if quality <= 0.0 {
        continue;
      }
      let candidate = match essence {
        "*/*" | "application/*" => Some(default),
        other => Self::parse(other).ok(),
      };
      if let Some(candidate) = candidate
        && best.is_none_or(|(q, _)| quality > q)
      {
        best = Some((quality, candidate));
      }
    }
    best
      .map(|(_, media)| media)
      .ok_or_else(|| Error::UnsupportedMediaType(accept.to_string()))
  }

  /// Read `name` from `headers`. A missing header yields `default`.
  pub fn from_headers(
    headers: &HeaderMap,
    name: HeaderName,
    default: MediaType,
  ) -> Result<Self> {
    let Some(value) = headers.get(&name) else {
      return Ok(default);
    };
    let value = value
      .to_str()
      .map_err(|_| Error::UnsupportedMediaType(format!("{value:?}")))?;
    if name == axum::http::header::ACCEPT {
      Self::negotiate(value, default)
    } else {
      Self::parse(value)
    }
  }

  pub fn header_value(self) -> HeaderValue {
    HeaderValue::from_static(self.as_str())
  }

  pub fn encode_body<T: XmlRoot + Serialize>(self, value: &T) -> Result<Vec<u8>> {
    let text = match self.format() {
      Format::Xml => xml::to_string(value)?,
      Format::Json => json::to_string(value)?,
    };
    Ok(text.into_bytes())
  }

  pub fn encode_body_pretty<T: XmlRoot + Serialize>(
    self,
    value: &T,
  ) -> Result<Vec<u8>> {
    let text = match self.format() {
      Format::Xml => xml::to_string_pretty(value)?,
      Format::Json => json::to_string_pretty(value)?,
    };
    Ok(text.into_bytes())
  }

  pub fn decode_body<T: XmlRoot + DeserializeOwned>(self, body: &[u8]) -> Result<T> {
    let text =
      std::str::from_utf8(body).map_err(|e| Error::Body(e.to_string()))?;
    let value = match self.format() {
      Format::Xml => xml::from_str(text)?,
      Format::Json => json::from_str(text)?,
    };
    Ok(value)
  }
}

impl fmt::Display for MediaType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for MediaType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}
