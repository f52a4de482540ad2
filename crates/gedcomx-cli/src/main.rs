//! `gedcomx`: convert GEDCOM X and Atom documents between XML and JSON.
//!
//! # Usage
//!
//! ```text
//! gedcomx convert person.xml --kind gedcomx --to json --pretty
//! gedcomx convert results.json --kind feed --to xml --output results.xml
//! gedcomx links entry.xml --kind entry --rel self
//! ```

mod document;
mod settings;

use std::{
  io::{self, Read, Write},
  path::{Path, PathBuf},
};

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use document::{Document, Format, Kind, input_format};
use settings::CliConfig;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "gedcomx", version, about = "GEDCOM X document tool")]
struct Cli {
  /// Path to a TOML config file (format, pretty).
  #[arg(short, long, value_name = "FILE", default_value = "gedcomx.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Re-encode a document in another format.
  Convert {
    /// Input file, or `-` for stdin.
    input:  PathBuf,
    #[arg(long, value_enum)]
    kind:   Kind,
    /// Input format (`xml` or `json`); inferred from the extension when
    /// omitted.
    #[arg(long)]
    from:   Option<Format>,
    /// Output format; falls back to the config file, then JSON.
    #[arg(long)]
    to:     Option<Format>,
    /// Write here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    #[arg(long)]
    pretty: bool,
  },
  /// List a document's links.
  Links {
    /// Input file, or `-` for stdin.
    input: PathBuf,
    #[arg(long, value_enum)]
    kind:  Kind,
    #[arg(long)]
    from:  Option<Format>,
    /// Only links with this relation.
    #[arg(long)]
    rel:   Option<String>,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
  // Logs go to stderr so converted documents can be piped.
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let config = CliConfig::load(&cli.config)?;

  match cli.command {
    Command::Convert {
      input,
      kind,
      from,
      to,
      output,
      pretty,
    } => {
      let document = read_document(&input, kind, from)?;
      let to = to.or(config.format).unwrap_or(Format::Json);
      let body = document.encode(to, pretty || config.pretty)?;
      write_output(output.as_deref(), &body)?;
      tracing::debug!(?kind, ?to, bytes = body.len(), "converted");
    }
    Command::Links {
      input,
      kind,
      from,
      rel,
    } => {
      let document = read_document(&input, kind, from)?;
      let mut stdout = io::stdout().lock();
      for link in document.links(rel.as_deref()) {
        let target = link
          .href
          .as_ref()
          .map(|h| h.as_str())
          .or(link.template.as_deref())
          .unwrap_or("");
        writeln!(stdout, "{}\t{target}", link.rel)?;
      }
    }
  }

  Ok(())
}

fn read_document(
  input: &Path,
  kind: Kind,
  from: Option<Format>,
) -> anyhow::Result<Document> {
  let bytes = if input == Path::new("-") {
    if from.is_none() {
      bail!("reading stdin requires --from xml|json");
    }
    let mut buf = Vec::new();
    io::stdin().read_to_end(&mut buf).context("failed to read stdin")?;
    buf
  } else {
    std::fs::read(input)
      .with_context(|| format!("failed to read {}", input.display()))?
  };
  let format = input_format(from, input)?;

  tracing::info!(input = %input.display(), ?kind, ?format, "decoding");
  Document::decode(kind, format, &bytes)
    .with_context(|| format!("failed to decode {}", input.display()))
}

fn write_output(output: Option<&Path>, body: &[u8]) -> anyhow::Result<()> {
  match output {
    Some(path) => std::fs::write(path, body)
      .with_context(|| format!("failed to write {}", path.display())),
    None => {
      let mut stdout = io::stdout().lock();
      stdout.write_all(body)?;
      stdout.write_all(b"\n")?;
      Ok(())
    }
  }
}
