//! On-disk artifact codec.
//!
//! Every artifact file is a bincode-encoded [`ArtifactHeader`] followed by a
//! bincode-encoded [`Artifact`]. The `.pkl` extension in the filenames is
//! kept for compatibility with the producer's naming scheme only.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use embload_core::error::{LoaderError, Result};
use embload_core::types::{CsrMatrix, DenseMatrix, LabelVector};

/// File signature written at the start of every artifact.
pub const ARTIFACT_MAGIC: [u8; 4] = *b"EMBL";

/// Current format revision.
pub const ARTIFACT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct ArtifactHeader {
    magic: [u8; 4],
    version: u32,
}

/// The payload of one artifact file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Artifact {
    /// One-hot matrix.
    Sparse(CsrMatrix),
    /// Doc2vec or naive doc2vec matrix.
    Dense(DenseMatrix),
    Labels(LabelVector),
}

impl Artifact {
    fn describe(&self) -> &'static str {
        match self {
            Artifact::Sparse(_) => "sparse matrix",
            Artifact::Dense(_) => "dense matrix",
            Artifact::Labels(_) => "label vector",
        }
    }

    fn wrong_kind(self, expected: &str) -> LoaderError {
        LoaderError::Deserialization(format!(
            "expected {}, found {}",
            expected,
            self.describe()
        ))
    }

    pub fn into_sparse(self) -> Result<CsrMatrix> {
        match self {
            Artifact::Sparse(m) => Ok(m),
            other => Err(other.wrong_kind("sparse matrix")),
        }
    }

    pub fn into_dense(self) -> Result<DenseMatrix> {
        match self {
            Artifact::Dense(m) => Ok(m),
            other => Err(other.wrong_kind("dense matrix")),
        }
    }

    pub fn into_labels(self) -> Result<LabelVector> {
        match self {
            Artifact::Labels(v) => Ok(v),
            other => Err(other.wrong_kind("label vector")),
        }
    }
}

/// Read and decode the artifact at `path`.
///
/// A missing file becomes [`LoaderError::NotFound`] after a diagnostic
/// warning; anything that fails to decode becomes
/// [`LoaderError::Deserialization`].
pub fn read_artifact(path: &Path) -> Result<Artifact> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(
                path = %path.display(),
                error = %e,
                "Unable to load artifact; double check that the file is saved at this path"
            );
            return Err(LoaderError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };
    let mut reader = BufReader::new(file);

    let header: ArtifactHeader = bincode::deserialize_from(&mut reader)?;
    if header.magic != ARTIFACT_MAGIC {
        return Err(LoaderError::Deserialization(format!(
            "{} is not an embedding artifact",
            path.display()
        )));
    }
    if header.version != ARTIFACT_VERSION {
        return Err(LoaderError::Deserialization(format!(
            "{} has unsupported artifact version {}",
            path.display(),
            header.version
        )));
    }

    let artifact: Artifact = bincode::deserialize_from(&mut reader)?;
    if let Artifact::Sparse(ref m) = artifact {
        m.validate()?;
    }

    debug!(path = %path.display(), kind = artifact.describe(), "Artifact loaded");
    Ok(artifact)
}

/// Encode `artifact` to `path`, replacing any existing file.
///
/// Used by producers and fixtures; the repository never writes.
pub fn write_artifact(path: &Path, artifact: &Artifact) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let header = ArtifactHeader {
        magic: ARTIFACT_MAGIC,
        version: ARTIFACT_VERSION,
    };
    bincode::serialize_into(&mut writer, &header)?;
    bincode::serialize_into(&mut writer, artifact)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_write_then_read_dense() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("title-nd2v(normalizer=None).pkl");
        let matrix = array![[0.5f32, -1.0], [2.0, 0.25]];

        write_artifact(&path, &Artifact::Dense(matrix.clone())).unwrap();
        let loaded = read_artifact(&path).unwrap().into_dense().unwrap();
        assert_eq!(loaded, matrix);
    }

    #[test]
    fn test_write_then_read_sparse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.pkl");
        let matrix = CsrMatrix::new(2, 3, vec![0, 1, 3], vec![2, 0, 1], vec![1.0, 2.0, 3.0]).unwrap();

        write_artifact(&path, &Artifact::Sparse(matrix.clone())).unwrap();
        let loaded = read_artifact(&path).unwrap().into_sparse().unwrap();
        assert_eq!(loaded, matrix);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label.pkl");
        match read_artifact(&path) {
            Err(LoaderError::NotFound { path: p }) => assert_eq!(p, path),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_file_is_deserialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label.pkl");
        std::fs::write(&path, b"\x80\x04\x95 not ours").unwrap();
        assert!(matches!(
            read_artifact(&path),
            Err(LoaderError::Deserialization(_))
        ));
    }

    #[test]
    fn test_truncated_file_is_deserialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label.pkl");
        write_artifact(&path, &Artifact::Labels(array![0u8, 1, 1, 0])).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 2]).unwrap();
        assert!(matches!(
            read_artifact(&path),
            Err(LoaderError::Deserialization(_))
        ));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label.pkl");
        let mut bytes = bincode::serialize(&ArtifactHeader {
            magic: ARTIFACT_MAGIC,
            version: 99,
        })
        .unwrap();
        bytes.extend(bincode::serialize(&Artifact::Labels(array![1u8])).unwrap());
        std::fs::write(&path, bytes).unwrap();

        let err = read_artifact(&path).unwrap_err();
        assert!(err.to_string().contains("version 99"));
    }

    /// Mirror of `CsrMatrix` so invalid layouts can bypass `CsrMatrix::new`.
    #[derive(Serialize)]
    struct RawCsr {
        nrows: usize,
        ncols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<f32>,
    }

    #[derive(Serialize)]
    enum RawArtifact {
        Sparse(RawCsr),
    }

    fn write_raw_csr(path: &Path, raw: RawCsr) {
        let mut bytes = bincode::serialize(&ArtifactHeader {
            magic: ARTIFACT_MAGIC,
            version: ARTIFACT_VERSION,
        })
        .unwrap();
        bytes.extend(bincode::serialize(&RawArtifact::Sparse(raw)).unwrap());
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_corrupt_csr_rejected_after_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.pkl");
        write_raw_csr(
            &path,
            RawCsr {
                nrows: 1,
                ncols: 2,
                indptr: vec![0, 1],
                indices: vec![9],
                data: vec![1.0],
            },
        );

        let err = read_artifact(&path).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_csr_with_overflowing_row_count_is_deserialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.pkl");
        write_raw_csr(
            &path,
            RawCsr {
                nrows: usize::MAX,
                ncols: 1,
                indptr: vec![],
                indices: vec![],
                data: vec![],
            },
        );

        assert!(matches!(
            read_artifact(&path),
            Err(LoaderError::Deserialization(_))
        ));
    }

    #[test]
    fn test_wrong_kind_extraction() {
        let err = Artifact::Labels(array![0u8]).into_dense().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Deserialization error: expected dense matrix, found label vector"
        );
        assert!(Artifact::Dense(array![[1.0f32]]).into_sparse().is_err());
    }
}
