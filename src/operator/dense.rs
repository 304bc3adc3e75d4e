//! Dense blocks
use crate::traits::LinearOperator;
use rlst::{rlst_dynamic_array2, DynamicArray, RawAccess, RawAccessMut, RlstScalar, Shape};

/// A dense matrix stored column by column.
pub struct DenseBlock<T: RlstScalar> {
    data: DynamicArray<T, 2>,
}

impl<T: RlstScalar> DenseBlock<T> {
    /// Create a zero block.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: rlst_dynamic_array2!(T, [rows, cols]),
        }
    }

    /// Create a block whose entry (i, j) is `f(i, j)`.
    pub fn from_fn(rows: usize, cols: usize, f: impl Fn(usize, usize) -> T) -> Self {
        let mut block = Self::new(rows, cols);
        for j in 0..cols {
            for i in 0..rows {
                block.set(i, j, f(i, j));
            }
        }
        block
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.shape()[0]
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.shape()[1]
    }

    /// Leading dimension, the distance between the starts of two columns
    pub fn ld(&self) -> usize {
        self.rows()
    }

    /// Entry (i, j)
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data.data()[i + j * self.ld()]
    }

    /// Set entry (i, j)
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        let ld = self.ld();
        self.data.data_mut()[i + j * ld] = value;
    }

    /// Column-major entries
    pub fn data(&self) -> &[T] {
        self.data.data()
    }

    /// Mutable column-major entries
    pub fn data_mut(&mut self) -> &mut [T] {
        self.data.data_mut()
    }

    /// Compute y += alpha * A * x
    pub fn apply_add(&self, alpha: T, x: &[T], y: &mut [T]) {
        check_dims(self.rows(), self.cols(), x, y);
        let ld = self.ld();
        for (j, column) in self.data().chunks_exact(ld.max(1)).take(self.cols()).enumerate() {
            let xj = alpha * x[j];
            for (yi, a) in y.iter_mut().zip(column) {
                *yi += *a * xj;
            }
        }
    }

    /// Compute y += alpha * A^H * x
    pub fn apply_adjoint_add(&self, alpha: T, x: &[T], y: &mut [T]) {
        check_dims(self.cols(), self.rows(), x, y);
        let ld = self.ld();
        for (yj, column) in y.iter_mut().zip(self.data().chunks_exact(ld.max(1))) {
            let mut sum = T::zero();
            for (a, xi) in column.iter().zip(x) {
                sum += a.conj() * *xi;
            }
            *yj += alpha * sum;
        }
    }
}

fn check_dims<T>(rows: usize, cols: usize, x: &[T], y: &[T]) {
    if x.len() != cols || y.len() != rows {
        panic!(
            "Matrix has wrong shape: {rows}x{cols} applied to a vector of length {} into a vector of length {}",
            x.len(),
            y.len()
        );
    }
}

impl<T: RlstScalar> LinearOperator<T> for DenseBlock<T> {
    fn rows(&self) -> usize {
        DenseBlock::rows(self)
    }
    fn cols(&self) -> usize {
        DenseBlock::cols(self)
    }
    fn apply_add(&self, alpha: T, x: &[T], y: &mut [T]) {
        DenseBlock::apply_add(self, alpha, x, y)
    }
}
