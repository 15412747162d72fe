//! Embedding matrix representations.

use ndarray::{Array1, Array2, ArrayView2, ArrayViewMut2, CowArray, Ix1};

use crate::util::l2_normalize;

/// Embedding matrix storage.
pub trait Storage {
    /// Get the embedding at row `idx`.
    fn embedding(&self, idx: usize) -> CowArray<f32, Ix1>;

    /// Get the shape of the embedding matrix.
    fn shape(&self) -> (usize, usize);
}

/// Storage that provide a view of the embedding matrix.
pub trait StorageView: Storage {
    /// Get a view of the embedding matrix.
    fn view(&self) -> ArrayView2<f32>;
}

/// Storage that provide a mutable view of the embedding matrix.
pub(crate) trait StorageViewMut: Storage {
    /// Get a mutable view of the embedding matrix.
    fn view_mut(&mut self) -> ArrayViewMut2<f32>;

    /// Normalize all rows to unit length, returning the original norms.
    ///
    /// Rows with a zero norm are left as-is.
    fn normalize(&mut self) -> Array1<f32> {
        let mut view = self.view_mut();
        let mut norms = Vec::with_capacity(view.nrows());
        for embedding in view.outer_iter_mut() {
            norms.push(l2_normalize(embedding));
        }

        norms.into()
    }
}

/// In-memory `ndarray` matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct NdArray {
    inner: Array2<f32>,
}

impl NdArray {
    pub fn new(arr: Array2<f32>) -> Self {
        NdArray { inner: arr }
    }
}

impl From<Array2<f32>> for NdArray {
    fn from(arr: Array2<f32>) -> Self {
        NdArray::new(arr)
    }
}

impl From<NdArray> for Array2<f32> {
    fn from(arr: NdArray) -> Self {
        arr.inner
    }
}

impl Storage for NdArray {
    fn embedding(&self, idx: usize) -> CowArray<f32, Ix1> {
        CowArray::from(self.inner.row(idx))
    }

    fn shape(&self) -> (usize, usize) {
        self.inner.dim()
    }
}

impl StorageView for NdArray {
    fn view(&self) -> ArrayView2<f32> {
        self.inner.view()
    }
}

impl StorageViewMut for NdArray {
    fn view_mut(&mut self) -> ArrayViewMut2<f32> {
        self.inner.view_mut()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::{arr2, Array2};

    use super::{NdArray, Storage, StorageView, StorageViewMut};

    const N_ROWS: usize = 10;
    const N_COLS: usize = 5;

    fn test_ndarray() -> NdArray {
        let test_data = Array2::from_shape_fn((N_ROWS, N_COLS), |(r, c)| {
            r as f32 * N_COLS as f32 + c as f32
        });

        NdArray::new(test_data)
    }

    #[test]
    fn embedding_returns_row() {
        let arr = test_ndarray();
        assert_eq!(arr.shape(), (N_ROWS, N_COLS));
        for idx in 0..N_ROWS {
            assert_eq!(arr.embedding(idx), arr.view().row(idx));
        }
    }

    #[test]
    fn normalize_gives_unit_rows() {
        let mut arr = test_ndarray();
        let check = arr.clone();
        let norms = arr.normalize();

        // Row 0 is [0, 1, 2, 3, 4].
        assert_abs_diff_eq!(norms[0], 30f32.sqrt(), epsilon = 1e-5);

        for (idx, row) in arr.view().outer_iter().enumerate() {
            assert_abs_diff_eq!(row.dot(&row), 1.0, epsilon = 1e-5);

            // Multiplying by the norm restores the original row.
            for (&unit, &orig) in row.iter().zip(check.view().row(idx).iter()) {
                assert_abs_diff_eq!(unit * norms[idx], orig, epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn normalize_keeps_zero_rows() {
        let mut arr = NdArray::new(arr2(&[[0f32, 0.], [0., 2.]]));
        let norms = arr.normalize();
        assert_eq!(norms[0], 0.);
        assert_eq!(norms[1], 2.);
        assert_eq!(arr.view(), arr2(&[[0f32, 0.], [0., 1.]]));
    }
}
