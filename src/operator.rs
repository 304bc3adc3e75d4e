//! Operator representations
//!
//! Every representation implements [LinearOperator], which is all the iterative solvers use.
pub mod combination;
pub mod dense;
pub mod hmatrix;
pub mod uniform;

pub use combination::LinearCombination;
pub use dense::DenseBlock;
pub use hmatrix::{HMatrix, HMatrixBlock};
pub use uniform::{ClusterBasis, UniformBlock, UniformHMatrix};

use crate::traits::LinearOperator;
use rlst::RlstScalar;

/// An assembled operator in one of the supported storage formats.
pub enum Operator<T: RlstScalar> {
    /// Dense storage
    Dense(DenseBlock<T>),
    /// Hierarchical matrix with dense and low rank leaves
    Hierarchical(HMatrix<T>),
    /// Uniform hierarchical matrix with shared cluster bases
    CompressedHierarchical(UniformHMatrix<T>),
}

impl<T: RlstScalar> LinearOperator<T> for Operator<T> {
    fn rows(&self) -> usize {
        match self {
            Self::Dense(a) => a.rows(),
            Self::Hierarchical(a) => a.rows(),
            Self::CompressedHierarchical(a) => a.rows(),
        }
    }
    fn cols(&self) -> usize {
        match self {
            Self::Dense(a) => a.cols(),
            Self::Hierarchical(a) => a.cols(),
            Self::CompressedHierarchical(a) => a.cols(),
        }
    }
    fn apply_add(&self, alpha: T, x: &[T], y: &mut [T]) {
        match self {
            Self::Dense(a) => a.apply_add(alpha, x, y),
            Self::Hierarchical(a) => a.apply_add(alpha, x, y),
            Self::CompressedHierarchical(a) => a.apply_add(alpha, x, y),
        }
    }
}

impl<T: RlstScalar> From<DenseBlock<T>> for Operator<T> {
    fn from(a: DenseBlock<T>) -> Self {
        Self::Dense(a)
    }
}

impl<T: RlstScalar> From<HMatrix<T>> for Operator<T> {
    fn from(a: HMatrix<T>) -> Self {
        Self::Hierarchical(a)
    }
}

impl<T: RlstScalar> From<UniformHMatrix<T>> for Operator<T> {
    fn from(a: UniformHMatrix<T>) -> Self {
        Self::CompressedHierarchical(a)
    }
}

#[cfg(test)]
mod test {
    extern crate blas_src;
    extern crate lapack_src;

    use super::*;

    #[test]
    fn test_dispatch() {
        let a = DenseBlock::<f64>::from_fn(3, 2, |i, j| (i * 2 + j) as f64);
        let dense = a.apply(&[1.0, -1.0]);
        let op = Operator::from(a);
        assert_eq!(op.rows(), 3);
        assert_eq!(op.cols(), 2);
        assert_eq!(op.apply(&[1.0, -1.0]), dense);
    }
}
