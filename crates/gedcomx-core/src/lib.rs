//! Core types and wire codecs for the GEDCOM X data model.
//!
//! This crate is deliberately free of HTTP and I/O. It holds the entity
//! records, the typed-enumeration codec, the link relation index, the
//! polymorphic type registry, and the XML and JSON encodings of all of them.
//!
//! # Quick start
//!
//! ```no_run
//! use gedcomx_core::{atom::Entry, links::HasLinks, json, xml};
//!
//! let mut entry = Entry::default();
//! entry.id = Some("urn:entry:1".into());
//! entry.title = Some("Jane Doe".to_string());
//! entry.add_link_href("self", "https://example.org/1");
//!
//! let as_xml = xml::to_string(&entry).unwrap();
//! let as_json = json::to_string(&entry).unwrap();
//! assert_eq!(xml::from_str::<Entry>(&as_xml).unwrap(), entry);
//! assert_eq!(json::from_str::<Entry>(&as_json).unwrap(), entry);
//! ```

pub mod atom;
pub mod common;
pub mod conclusion;
pub mod document;
pub mod error;
pub mod json;
pub mod links;
pub mod names;
pub mod registry;
pub mod types;
pub mod xml;

pub use error::{Error, Result};

// ─── Shared test helpers ──────────────────────────────────────────────────────
