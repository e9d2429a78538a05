//! Artifact filenames.
//!
//! These strings are the contract with the training pipeline that writes
//! the artifacts, so the format must not drift.

use embload_core::types::{Corpus, Doc2VecParams, NaiveDoc2VecParams, OneHotParams};

/// The label vector has a fixed, unparameterized name.
pub const LABEL_FILENAME: &str = "label.pkl";

/// `{corpus}-onehot(scorer={scorer}[, normalized]).pkl`
pub fn onehot_filename(corpus: Corpus, params: &OneHotParams) -> String {
    format!(
        "{}-onehot(scorer={}{}).pkl",
        corpus,
        params.scorer,
        if params.normalize { ", normalized" } else { "" }
    )
}

/// `{corpus}-d2v(vecsize=.., winsize=.., mincount=.., dm|dbow, epochs=..).pkl`
pub fn doc2vec_filename(corpus: Corpus, params: &Doc2VecParams) -> String {
    format!(
        "{}-d2v(vecsize={}, winsize={}, mincount={}, {}, epochs={}).pkl",
        corpus,
        params.vec_size,
        params.win_size,
        params.min_count,
        params.mode_label(),
        params.epochs
    )
}

/// `{corpus}-nd2v(normalizer={l2|mean|None}).pkl`
pub fn naive_doc2vec_filename(corpus: Corpus, params: &NaiveDoc2VecParams) -> String {
    let normalizer = params.normalizer.map_or("None", |n| n.as_str());
    format!("{}-nd2v(normalizer={}).pkl", corpus, normalizer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use embload_core::types::{Normalizer, Scorer};

    #[test]
    fn test_onehot_filename() {
        let count = OneHotParams::default();
        assert_eq!(
            onehot_filename(Corpus::Title, &count),
            "title-onehot(scorer=count).pkl"
        );

        let tfidf = OneHotParams {
            scorer: Scorer::Tfidf,
            normalize: true,
        };
        assert_eq!(
            onehot_filename(Corpus::Title, &tfidf),
            "title-onehot(scorer=tfidf, normalized).pkl"
        );
        assert_eq!(
            onehot_filename(Corpus::Text, &tfidf),
            "text-onehot(scorer=tfidf, normalized).pkl"
        );
    }

    #[test]
    fn test_doc2vec_filename() {
        let params = Doc2VecParams::default();
        assert_eq!(
            doc2vec_filename(Corpus::Text, &params),
            "text-d2v(vecsize=300, winsize=13, mincount=5, dbow, epochs=100).pkl"
        );

        let dm = Doc2VecParams {
            dm: true,
            min_count: 25,
            ..params
        };
        assert_eq!(
            doc2vec_filename(Corpus::Title, &dm),
            "title-d2v(vecsize=300, winsize=13, mincount=25, dm, epochs=100).pkl"
        );
    }

    #[test]
    fn test_naive_doc2vec_filename() {
        assert_eq!(
            naive_doc2vec_filename(Corpus::Title, &NaiveDoc2VecParams::default()),
            "title-nd2v(normalizer=None).pkl"
        );
        let l2 = NaiveDoc2VecParams {
            normalizer: Some(Normalizer::L2),
        };
        assert_eq!(
            naive_doc2vec_filename(Corpus::Text, &l2),
            "text-nd2v(normalizer=l2).pkl"
        );
        let mean = NaiveDoc2VecParams {
            normalizer: Some(Normalizer::Mean),
        };
        assert_eq!(
            naive_doc2vec_filename(Corpus::Title, &mean),
            "title-nd2v(normalizer=mean).pkl"
        );
    }

    #[test]
    fn test_filenames_are_deterministic() {
        let params = Doc2VecParams::default();
        let first = doc2vec_filename(Corpus::Title, &params);
        for _ in 0..10 {
            assert_eq!(doc2vec_filename(Corpus::Title, &params), first);
        }
    }
}
