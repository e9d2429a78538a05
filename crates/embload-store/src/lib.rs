//! Embload Store crate - artifact filenames, on-disk codec, combine
//! operations and the embedding repository.
//!
//! Artifacts are produced out of band by a training pipeline and are only
//! ever read here. `concat` requests are assembled from the `title` and
//! `text` artifacts under identical parameters.

pub mod artifact;
pub mod combine;
pub mod keys;
pub mod repository;

pub use artifact::{read_artifact, write_artifact, Artifact};
pub use combine::{concatenate, hstack};
pub use keys::{doc2vec_filename, naive_doc2vec_filename, onehot_filename, LABEL_FILENAME};
pub use repository::EmbeddingRepository;
