//! Embload binary - demonstrates the embedding repository.
//!
//! 1. Load configuration from TOML
//! 2. Open the artifact directory
//! 3. Load doc2vec, naive doc2vec and one-hot embeddings for the selected
//!    corpus (concat by default), plus the label vector
//! 4. Print one summary line per artifact

mod cli;

use clap::Parser;
use serde::Serialize;

use embload_core::config::LoaderConfig;
use embload_core::types::{Corpus, Embedding, EmbeddingRequest};
use embload_store::EmbeddingRepository;

use cli::CliArgs;

/// Shape report for one loaded artifact.
#[derive(Debug, Serialize)]
struct ArtifactSummary {
    artifact: &'static str,
    corpus: Option<Corpus>,
    rows: usize,
    cols: Option<usize>,
    /// Stored entries, for sparse matrices only.
    nnz: Option<usize>,
}

impl ArtifactSummary {
    fn new(request: &EmbeddingRequest, embedding: &Embedding) -> Self {
        let nnz = match embedding {
            Embedding::Sparse(m) => Some(m.nnz()),
            _ => None,
        };
        Self {
            artifact: request.kind().as_str(),
            corpus: request.corpus(),
            rows: embedding.rows(),
            cols: embedding.cols(),
            nnz,
        }
    }
}

impl std::fmt::Display for ArtifactSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let corpus = self.corpus.map_or("-", |c| c.as_str());
        match self.cols {
            Some(cols) => write!(
                f,
                "{:<6} {:<7} {} x {}",
                self.artifact, corpus, self.rows, cols
            )?,
            None => write!(f, "{:<6} {:<7} {}", self.artifact, corpus, self.rows)?,
        }
        if let Some(nnz) = self.nnz {
            write!(f, " ({} stored)", nnz)?;
        }
        Ok(())
    }
}

/// The demo set: every embedding kind for `corpus` with configured
/// parameters, then the labels.
fn build_requests(
    config: &LoaderConfig,
    corpus: Corpus,
) -> embload_core::Result<Vec<EmbeddingRequest>> {
    Ok(vec![
        EmbeddingRequest::Doc2Vec(corpus, config.doc2vec.to_params()),
        EmbeddingRequest::NaiveDoc2Vec(corpus, config.naive_doc2vec.to_params()?),
        EmbeddingRequest::OneHot(corpus, config.onehot.to_params()?),
        EmbeddingRequest::Labels,
    ])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let mut config = if config_file.exists() {
        LoaderConfig::load(&config_file)?
    } else {
        LoaderConfig::default()
    };
    config.storage.base_dir = args.resolve_dir(&config.storage.base_dir);
    let log_level = args.resolve_log_level(&config.general.log_level);

    // Tracing.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    tracing::info!("Starting embload v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!(path = %config_file.display(), "Configuration resolved");

    // Validate every parameter before touching the artifact directory.
    let requests = build_requests(&config, args.corpus)?;

    let repo = match EmbeddingRepository::from_config(&config) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(
                dir = %config.storage.base_dir.display(),
                error = %e,
                "Cannot open artifact directory"
            );
            return Err(e.into());
        }
    };

    if args.dry_run {
        for request in &requests {
            for path in repo.artifact_paths(request) {
                println!("{}", path.display());
            }
        }
        return Ok(());
    }

    let mut summaries = Vec::with_capacity(requests.len());
    for request in &requests {
        let embedding = repo.load(request)?;
        let summary = ArtifactSummary::new(request, &embedding);
        tracing::info!(summary = %summary, "Loaded");
        summaries.push(summary);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        for summary in &summaries {
            println!("{}", summary);
        }
    }

    Ok(())
}
