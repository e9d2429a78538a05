//! Read-only access to a directory of embedding artifacts.

use std::path::{Path, PathBuf};

use tracing::debug;

use embload_core::config::LoaderConfig;
use embload_core::error::{LoaderError, Result};
use embload_core::types::{
    Corpus, CsrMatrix, DenseMatrix, Doc2VecParams, Embedding, EmbeddingRequest, LabelVector,
    NaiveDoc2VecParams, OneHotParams,
};

use crate::artifact::{read_artifact, Artifact};
use crate::combine::{concatenate, hstack};
use crate::keys::{doc2vec_filename, naive_doc2vec_filename, onehot_filename, LABEL_FILENAME};

/// Resolves embedding requests to files under one base directory.
///
/// Holds nothing but the directory path. Every call reads from disk, so
/// repeated calls against an unchanged directory return equal values.
#[derive(Debug, Clone)]
pub struct EmbeddingRepository {
    base_dir: PathBuf,
}

impl EmbeddingRepository {
    /// Open a repository rooted at `base_dir`.
    ///
    /// Fails with a configuration error if the path is not an existing
    /// directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        if !base_dir.is_dir() {
            return Err(LoaderError::Config(format!(
                "{} is not a valid directory",
                base_dir.display()
            )));
        }
        debug!(base_dir = %base_dir.display(), "Embedding repository opened");
        Ok(Self { base_dir })
    }

    pub fn from_config(config: &LoaderConfig) -> Result<Self> {
        Self::new(config.storage.base_dir.clone())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Files a request would read, in read order.
    ///
    /// One path for stored corpora and labels, two (title then text) for
    /// concat. Touches nothing on disk.
    pub fn artifact_paths(&self, request: &EmbeddingRequest) -> Vec<PathBuf> {
        let corpora: Vec<Corpus> = match request.corpus() {
            Some(Corpus::Concat) => Corpus::parts().to_vec(),
            Some(corpus) => vec![corpus],
            None => return vec![self.base_dir.join(LABEL_FILENAME)],
        };
        corpora
            .into_iter()
            .map(|corpus| {
                let filename = match request {
                    EmbeddingRequest::OneHot(_, p) => onehot_filename(corpus, p),
                    EmbeddingRequest::Doc2Vec(_, p) => doc2vec_filename(corpus, p),
                    EmbeddingRequest::NaiveDoc2Vec(_, p) => naive_doc2vec_filename(corpus, p),
                    EmbeddingRequest::Labels => LABEL_FILENAME.to_string(),
                };
                self.base_dir.join(filename)
            })
            .collect()
    }

    /// Load a one-hot (bag-of-words) matrix.
    ///
    /// For `Concat` the title and text matrices are stacked side by side,
    /// staying sparse.
    pub fn load_onehot(&self, corpus: Corpus, params: &OneHotParams) -> Result<CsrMatrix> {
        match corpus {
            Corpus::Concat => {
                let [title, text] = Corpus::parts();
                let title = self.load_onehot(title, params)?;
                let text = self.load_onehot(text, params)?;
                debug!(
                    title = ?title.shape(),
                    text = ?text.shape(),
                    "Stacking one-hot matrices"
                );
                hstack(&title, &text)
            }
            stored => self.read(&onehot_filename(stored, params))?.into_sparse(),
        }
    }

    /// Load a doc2vec matrix.
    pub fn load_doc2vec(&self, corpus: Corpus, params: &Doc2VecParams) -> Result<DenseMatrix> {
        match corpus {
            Corpus::Concat => {
                let [title, text] = Corpus::parts();
                let title = self.load_doc2vec(title, params)?;
                let text = self.load_doc2vec(text, params)?;
                debug!(
                    title = ?title.dim(),
                    text = ?text.dim(),
                    "Concatenating doc2vec matrices"
                );
                concatenate(&title, &text)
            }
            stored => self.read(&doc2vec_filename(stored, params))?.into_dense(),
        }
    }

    /// Load a naive (averaged) doc2vec matrix.
    pub fn load_naive_doc2vec(
        &self,
        corpus: Corpus,
        params: &NaiveDoc2VecParams,
    ) -> Result<DenseMatrix> {
        match corpus {
            Corpus::Concat => {
                let [title, text] = Corpus::parts();
                let title = self.load_naive_doc2vec(title, params)?;
                let text = self.load_naive_doc2vec(text, params)?;
                debug!(
                    title = ?title.dim(),
                    text = ?text.dim(),
                    "Concatenating naive doc2vec matrices"
                );
                concatenate(&title, &text)
            }
            stored => self.read(&naive_doc2vec_filename(stored, params))?.into_dense(),
        }
    }

    /// Load the label vector (0 = real, 1 = fake).
    pub fn load_labels(&self) -> Result<LabelVector> {
        self.read(LABEL_FILENAME)?.into_labels()
    }

    /// Load whatever `request` names.
    pub fn load(&self, request: &EmbeddingRequest) -> Result<Embedding> {
        match request {
            EmbeddingRequest::OneHot(corpus, params) => {
                self.load_onehot(*corpus, params).map(Embedding::Sparse)
            }
            EmbeddingRequest::Doc2Vec(corpus, params) => {
                self.load_doc2vec(*corpus, params).map(Embedding::Dense)
            }
            EmbeddingRequest::NaiveDoc2Vec(corpus, params) => {
                self.load_naive_doc2vec(*corpus, params).map(Embedding::Dense)
            }
            EmbeddingRequest::Labels => self.load_labels().map(Embedding::Labels),
        }
    }

    fn read(&self, filename: &str) -> Result<Artifact> {
        let path = self.base_dir.join(filename);
        debug!(path = %path.display(), "Reading artifact");
        read_artifact(&path)
    }
}
