//! CLI argument definitions for the `embload` binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use embload_core::types::Corpus;

/// Default config file, looked up in the working directory.
const DEFAULT_CONFIG_FILE: &str = "embload.toml";

/// Embload — load precomputed document embeddings and labels and report their shapes.
#[derive(Parser, Debug)]
#[command(name = "embload", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Directory holding the embedding artifacts.
    #[arg(short = 'd', long = "dir")]
    pub dir: Option<PathBuf>,

    /// Corpus to load: title, text or concat.
    #[arg(long = "corpus", default_value = "concat", value_parser = parse_corpus)]
    pub corpus: Corpus,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Print the summary as JSON.
    #[arg(long = "json")]
    pub json: bool,

    /// Print the artifact paths that would be read, without reading them.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

fn parse_corpus(s: &str) -> Result<Corpus, String> {
    s.parse().map_err(|e: embload_core::LoaderError| e.to_string())
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > EMBLOAD_CONFIG env var > ./embload.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("EMBLOAD_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Resolve the artifact directory.
    ///
    /// Priority: --dir flag > config file value.
    pub fn resolve_dir(&self, config_dir: &std::path::Path) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| config_dir.to_path_buf())
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}
