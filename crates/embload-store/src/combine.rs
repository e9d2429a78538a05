//! Column-wise combination of title and text matrices.
//!
//! The title matrix always goes on the left. Both functions refuse to run
//! when the two sides disagree on the number of documents.

use ndarray::Axis;

use embload_core::error::{LoaderError, Result};
use embload_core::types::{CsrMatrix, DenseMatrix};

fn check_rows(title_rows: usize, text_rows: usize) -> Result<()> {
    if title_rows != text_rows {
        return Err(LoaderError::ShapeMismatch {
            title_rows,
            text_rows,
        });
    }
    Ok(())
}

/// Horizontally stack two sparse matrices without densifying.
///
/// Column indices from `text` are shifted by `title.ncols()`.
pub fn hstack(title: &CsrMatrix, text: &CsrMatrix) -> Result<CsrMatrix> {
    check_rows(title.nrows(), text.nrows())?;

    let nrows = title.nrows();
    let offset = title.ncols();
    let nnz = title.nnz() + text.nnz();
    let mut indptr = Vec::with_capacity(nrows + 1);
    let mut indices = Vec::with_capacity(nnz);
    let mut data = Vec::with_capacity(nnz);

    indptr.push(0);
    for i in 0..nrows {
        let (cols, values) = title.row(i);
        indices.extend_from_slice(cols);
        data.extend_from_slice(values);

        let (cols, values) = text.row(i);
        indices.extend(cols.iter().map(|c| c + offset));
        data.extend_from_slice(values);

        indptr.push(indices.len());
    }

    let ncols = offset.checked_add(text.ncols()).ok_or_else(|| {
        LoaderError::Deserialization(format!(
            "combined column count overflows: {} + {}",
            offset,
            text.ncols()
        ))
    })?;
    CsrMatrix::new(nrows, ncols, indptr, indices, data)
}

/// Concatenate two dense matrices along the feature axis.
pub fn concatenate(title: &DenseMatrix, text: &DenseMatrix) -> Result<DenseMatrix> {
    check_rows(title.nrows(), text.nrows())?;
    ndarray::concatenate(Axis(1), &[title.view(), text.view()])
        .map_err(|e| LoaderError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_hstack_offsets_text_columns() {
        let title = CsrMatrix::from_dense(array![[1.0f32, 0.0], [0.0, 2.0]].view());
        let text = CsrMatrix::from_dense(array![[0.0f32, 0.0, 3.0], [4.0, 0.0, 0.0]].view());

        let stacked = hstack(&title, &text).unwrap();
        assert_eq!(stacked.shape(), (2, 5));
        assert_eq!(stacked.nnz(), 4);
        assert_eq!(
            stacked.to_dense(),
            array![[1.0f32, 0.0, 0.0, 0.0, 3.0], [0.0, 2.0, 4.0, 0.0, 0.0]]
        );
        assert_eq!(stacked.row(1), (&[1usize, 2][..], &[2.0f32, 4.0][..]));
    }

    #[test]
    fn test_hstack_matches_dense_concatenate() {
        let title_dense = array![[0.0f32, 1.5, 0.0], [0.0, 0.0, 0.0], [2.0, 0.0, 1.0]];
        let text_dense = array![[7.0f32], [0.0], [0.5]];
        let stacked = hstack(
            &CsrMatrix::from_dense(title_dense.view()),
            &CsrMatrix::from_dense(text_dense.view()),
        )
        .unwrap();
        assert_eq!(
            stacked.to_dense(),
            concatenate(&title_dense, &text_dense).unwrap()
        );
    }

    #[test]
    fn test_hstack_with_empty_rows() {
        let title = CsrMatrix::zeros(3, 4);
        let text = CsrMatrix::zeros(3, 6);
        let stacked = hstack(&title, &text).unwrap();
        assert_eq!(stacked.shape(), (3, 10));
        assert_eq!(stacked.nnz(), 0);
    }

    #[test]
    fn test_hstack_rejects_overflowing_column_count() {
        let title = CsrMatrix::zeros(1, usize::MAX);
        let text = CsrMatrix::zeros(1, 2);
        assert!(matches!(
            hstack(&title, &text),
            Err(LoaderError::Deserialization(_))
        ));
    }

    #[test]
    fn test_hstack_row_mismatch() {
        let err = hstack(&CsrMatrix::zeros(3, 2), &CsrMatrix::zeros(4, 2)).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::ShapeMismatch {
                title_rows: 3,
                text_rows: 4
            }
        ));
    }

    #[test]
    fn test_concatenate_dense() {
        let title = array![[1.0f32, 2.0], [3.0, 4.0]];
        let text = array![[5.0f32], [6.0]];
        let combined = concatenate(&title, &text).unwrap();
        assert_eq!(combined, array![[1.0f32, 2.0, 5.0], [3.0, 4.0, 6.0]]);
    }

    #[test]
    fn test_concatenate_row_mismatch() {
        let title: Array2<f32> = Array2::zeros((2, 3));
        let text: Array2<f32> = Array2::zeros((5, 3));
        assert!(matches!(
            concatenate(&title, &text),
            Err(LoaderError::ShapeMismatch {
                title_rows: 2,
                text_rows: 5
            })
        ));
    }
}
