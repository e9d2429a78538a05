use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{LoaderError, Result};

/// Dense document-by-feature matrix (doc2vec and naive doc2vec artifacts).
pub type DenseMatrix = Array2<f32>;

/// One label per document: 0 for real, 1 for fake.
pub type LabelVector = Array1<u8>;

// =============================================================================
// Enums
// =============================================================================

/// Which textual field an embedding was computed over.
///
/// `Concat` never exists on disk; it is always assembled from `Title` and
/// `Text` under identical parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corpus {
    Title,
    Text,
    Concat,
}

impl Corpus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Corpus::Title => "title",
            Corpus::Text => "text",
            Corpus::Concat => "concat",
        }
    }

    /// The stored corpora a concat is assembled from, in column order.
    pub fn parts() -> [Corpus; 2] {
        [Corpus::Title, Corpus::Text]
    }
}

impl fmt::Display for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Corpus {
    type Err = LoaderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "title" => Ok(Corpus::Title),
            "text" => Ok(Corpus::Text),
            "concat" => Ok(Corpus::Concat),
            other => Err(LoaderError::validation(
                "corpus",
                other,
                "'title', 'text' or 'concat'",
            )),
        }
    }
}

/// Term weighting used for one-hot artifacts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scorer {
    #[default]
    Count,
    Tfidf,
}

impl Scorer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scorer::Count => "count",
            Scorer::Tfidf => "tfidf",
        }
    }
}

impl fmt::Display for Scorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scorer {
    type Err = LoaderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "count" => Ok(Scorer::Count),
            "tfidf" => Ok(Scorer::Tfidf),
            other => Err(LoaderError::validation(
                "scorer",
                other,
                "'count' or 'tfidf'",
            )),
        }
    }
}

/// Row normalization applied to naive doc2vec artifacts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalizer {
    L2,
    Mean,
}

impl Normalizer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Normalizer::L2 => "l2",
            Normalizer::Mean => "mean",
        }
    }
}

impl fmt::Display for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Normalizer {
    type Err = LoaderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "l2" => Ok(Normalizer::L2),
            "mean" => Ok(Normalizer::Mean),
            other => Err(LoaderError::validation(
                "normalizer",
                other,
                "'l2', 'mean' or none",
            )),
        }
    }
}

/// Parse a normalizer that may be absent.
///
/// `"none"`, `"None"` and the empty string mean no normalizer.
pub fn parse_optional_normalizer(s: &str) -> Result<Option<Normalizer>> {
    match s {
        "" | "none" | "None" => Ok(None),
        other => other.parse().map(Some),
    }
}

/// The four artifact families that live in an embeddings directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    OneHot,
    Doc2Vec,
    NaiveDoc2Vec,
    Labels,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::OneHot => "onehot",
            ArtifactKind::Doc2Vec => "d2v",
            ArtifactKind::NaiveDoc2Vec => "nd2v",
            ArtifactKind::Labels => "label",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Parameter records
// =============================================================================

/// Parameters that select a one-hot artifact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneHotParams {
    pub scorer: Scorer,
    pub normalize: bool,
}

/// Parameters that select a doc2vec artifact.
///
/// `dm` only changes the filename label; loading is identical for both
/// training modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doc2VecParams {
    pub vec_size: u32,
    pub win_size: u32,
    pub min_count: u32,
    pub dm: bool,
    pub epochs: u32,
}

impl Doc2VecParams {
    /// `"dm"` for distributed memory, `"dbow"` for distributed bag of words.
    pub fn mode_label(&self) -> &'static str {
        if self.dm {
            "dm"
        } else {
            "dbow"
        }
    }
}

impl Default for Doc2VecParams {
    fn default() -> Self {
        Self {
            vec_size: 300,
            win_size: 13,
            min_count: 5,
            dm: false,
            epochs: 100,
        }
    }
}

/// Parameters that select a naive doc2vec artifact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaiveDoc2VecParams {
    pub normalizer: Option<Normalizer>,
}

/// A fully specified load, used for generic dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmbeddingRequest {
    OneHot(Corpus, OneHotParams),
    Doc2Vec(Corpus, Doc2VecParams),
    NaiveDoc2Vec(Corpus, NaiveDoc2VecParams),
    Labels,
}

impl EmbeddingRequest {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            EmbeddingRequest::OneHot(..) => ArtifactKind::OneHot,
            EmbeddingRequest::Doc2Vec(..) => ArtifactKind::Doc2Vec,
            EmbeddingRequest::NaiveDoc2Vec(..) => ArtifactKind::NaiveDoc2Vec,
            EmbeddingRequest::Labels => ArtifactKind::Labels,
        }
    }

    pub fn corpus(&self) -> Option<Corpus> {
        match self {
            EmbeddingRequest::OneHot(c, _)
            | EmbeddingRequest::Doc2Vec(c, _)
            | EmbeddingRequest::NaiveDoc2Vec(c, _) => Some(*c),
            EmbeddingRequest::Labels => None,
        }
    }
}

// =============================================================================
// Sparse matrix
// =============================================================================

/// Compressed sparse row matrix of `f32` weights.
///
/// Row `i` owns `indices[indptr[i]..indptr[i + 1]]` and the matching slice
/// of `data`. Values deserialized from disk must be passed through
/// [`CsrMatrix::validate`] before use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CsrMatrix {
    nrows: usize,
    ncols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f32>,
}

impl CsrMatrix {
    /// Build a matrix from raw CSR buffers, checking every structural invariant.
    pub fn new(
        nrows: usize,
        ncols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<f32>,
    ) -> Result<Self> {
        let matrix = Self {
            nrows,
            ncols,
            indptr,
            indices,
            data,
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// An all-zero matrix with the given shape.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            indptr: vec![0; nrows + 1],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Build a CSR matrix from a dense array, dropping zero entries.
    pub fn from_dense(dense: ArrayView2<'_, f32>) -> Self {
        let (nrows, ncols) = dense.dim();
        let mut indptr = Vec::with_capacity(nrows + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);
        for row in dense.rows() {
            for (col, &value) in row.iter().enumerate() {
                if value != 0.0 {
                    indices.push(col);
                    data.push(value);
                }
            }
            indptr.push(indices.len());
        }
        Self {
            nrows,
            ncols,
            indptr,
            indices,
            data,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let corrupt = |msg: String| Err(LoaderError::Deserialization(msg));

        if self.indptr.len().checked_sub(1) != Some(self.nrows) {
            return corrupt(format!(
                "CSR indptr has {} entries for {} rows",
                self.indptr.len(),
                self.nrows
            ));
        }
        if self.indices.len() != self.data.len() {
            return corrupt(format!(
                "CSR indices ({}) and data ({}) lengths differ",
                self.indices.len(),
                self.data.len()
            ));
        }
        if self.indptr[0] != 0 || self.indptr[self.nrows] != self.data.len() {
            return corrupt("CSR indptr does not span the stored entries".to_string());
        }
        if self.indptr.windows(2).any(|w| w[0] > w[1]) {
            return corrupt("CSR indptr is not monotone".to_string());
        }
        if let Some(&col) = self.indices.iter().find(|&&c| c >= self.ncols) {
            return corrupt(format!(
                "CSR column index {} out of range for {} columns",
                col, self.ncols
            ));
        }
        Ok(())
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Column indices and values stored for row `i`.
    ///
    /// Panics if `i >= nrows`.
    pub fn row(&self, i: usize) -> (&[usize], &[f32]) {
        let span = self.indptr[i]..self.indptr[i + 1];
        (&self.indices[span.clone()], &self.data[span])
    }

    pub fn to_dense(&self) -> DenseMatrix {
        let mut dense = Array2::zeros((self.nrows, self.ncols));
        for i in 0..self.nrows {
            let (cols, values) = self.row(i);
            for (&col, &value) in cols.iter().zip(values) {
                dense[[i, col]] += value;
            }
        }
        dense
    }
}

// =============================================================================
// Loaded values
// =============================================================================

/// Anything the repository can hand back.
#[derive(Clone, Debug, PartialEq)]
pub enum Embedding {
    Sparse(CsrMatrix),
    Dense(DenseMatrix),
    Labels(LabelVector),
}

impl Embedding {
    /// Number of documents (rows, or label entries).
    pub fn rows(&self) -> usize {
        match self {
            Embedding::Sparse(m) => m.nrows(),
            Embedding::Dense(m) => m.nrows(),
            Embedding::Labels(v) => v.len(),
        }
    }

    /// Feature count; `None` for label vectors.
    pub fn cols(&self) -> Option<usize> {
        match self {
            Embedding::Sparse(m) => Some(m.ncols()),
            Embedding::Dense(m) => Some(m.ncols()),
            Embedding::Labels(_) => None,
        }
    }
}
