//! Settings shared by every subcommand.
//!
//! Loaded from an optional TOML file and `GEDCOMX_*` environment variables;
//! command-line flags take precedence over both.

use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;

use crate::document::Format;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CliConfig {
  /// Output format when `--to` is not given.
  #[serde(default)]
  pub format: Option<Format>,
  /// Indent output.
  #[serde(default)]
  pub pretty: bool,
}

impl CliConfig {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("GEDCOMX"))
      .build()
      .with_context(|| format!("failed to read config {}", path.display()))?;

    settings
      .try_deserialize()
      .context("failed to deserialise CliConfig")
  }
}
