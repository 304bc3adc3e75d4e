//! Hierarchical matrices
use crate::operator::DenseBlock;
use crate::traits::LinearOperator;
use rlst::RlstScalar;

/// Content of a hierarchical matrix node.
pub enum HMatrixBlock<T: RlstScalar> {
    /// Dense storage
    Full(DenseBlock<T>),
    /// Low rank factorisation a * b^H
    LowRank {
        /// Left factor, one row per row of the node
        a: DenseBlock<T>,
        /// Right factor, one row per column of the node
        b: DenseBlock<T>,
    },
    /// Subdivided into child nodes
    Split(Vec<HMatrix<T>>),
}

/// A node of a hierarchical matrix.
///
/// Each node covers the rows `row_indices` and columns `col_indices` of the global matrix.
/// The children of a split node must cover disjoint parts of their parent.
pub struct HMatrix<T: RlstScalar> {
    row_indices: Vec<usize>,
    col_indices: Vec<usize>,
    block: HMatrixBlock<T>,
}

impl<T: RlstScalar> HMatrix<T> {
    /// Create a node, checking that the block matches the index sets.
    pub fn new(row_indices: Vec<usize>, col_indices: Vec<usize>, block: HMatrixBlock<T>) -> Self {
        let (nrows, ncols) = (row_indices.len(), col_indices.len());
        match &block {
            HMatrixBlock::Full(full) => {
                if full.rows() != nrows || full.cols() != ncols {
                    panic!("Matrix has wrong shape");
                }
            }
            HMatrixBlock::LowRank { a, b } => {
                if a.rows() != nrows || b.rows() != ncols || a.cols() != b.cols() {
                    panic!("Low rank factors have wrong shape");
                }
            }
            HMatrixBlock::Split(_) => {}
        }
        Self {
            row_indices,
            col_indices,
            block,
        }
    }

    /// Create a dense leaf.
    pub fn full(row_indices: Vec<usize>, col_indices: Vec<usize>, block: DenseBlock<T>) -> Self {
        Self::new(row_indices, col_indices, HMatrixBlock::Full(block))
    }

    /// Create a low rank leaf a * b^H.
    pub fn low_rank(
        row_indices: Vec<usize>,
        col_indices: Vec<usize>,
        a: DenseBlock<T>,
        b: DenseBlock<T>,
    ) -> Self {
        Self::new(row_indices, col_indices, HMatrixBlock::LowRank { a, b })
    }

    /// Create a node subdivided into `children`.
    pub fn split(row_indices: Vec<usize>, col_indices: Vec<usize>, children: Vec<Self>) -> Self {
        Self::new(row_indices, col_indices, HMatrixBlock::Split(children))
    }

    /// Global row indices of this node
    pub fn row_indices(&self) -> &[usize] {
        &self.row_indices
    }

    /// Global column indices of this node
    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    /// The content of this node
    pub fn block(&self) -> &HMatrixBlock<T> {
        &self.block
    }

    /// Number of leaves below this node
    pub fn leaf_count(&self) -> usize {
        match &self.block {
            HMatrixBlock::Split(children) => children.iter().map(|c| c.leaf_count()).sum(),
            _ => 1,
        }
    }

    /// Add alpha times this node applied to the global vector `x` to the global vector `y`.
    fn apply_global(&self, alpha: T, x: &[T], y: &mut [T]) {
        match &self.block {
            HMatrixBlock::Split(children) => {
                for child in children {
                    child.apply_global(alpha, x, y);
                }
            }
            HMatrixBlock::Full(full) => {
                let local_x = gather(&self.col_indices, x);
                let mut local_y = vec![T::zero(); self.row_indices.len()];
                full.apply_add(alpha, &local_x, &mut local_y);
                scatter_add(&self.row_indices, &local_y, y);
            }
            HMatrixBlock::LowRank { a, b } => {
                let local_x = gather(&self.col_indices, x);
                let mut coefficients = vec![T::zero(); a.cols()];
                b.apply_adjoint_add(T::one(), &local_x, &mut coefficients);
                let mut local_y = vec![T::zero(); self.row_indices.len()];
                a.apply_add(alpha, &coefficients, &mut local_y);
                scatter_add(&self.row_indices, &local_y, y);
            }
        }
    }
}

pub(crate) fn gather<T: Copy>(indices: &[usize], x: &[T]) -> Vec<T> {
    indices.iter().map(|i| x[*i]).collect()
}

pub(crate) fn scatter_add<T: RlstScalar>(indices: &[usize], local: &[T], y: &mut [T]) {
    for (i, value) in indices.iter().zip(local) {
        y[*i] += *value;
    }
}

impl<T: RlstScalar> LinearOperator<T> for HMatrix<T> {
    fn rows(&self) -> usize {
        self.row_indices.len()
    }
    fn cols(&self) -> usize {
        self.col_indices.len()
    }
    fn apply_add(&self, alpha: T, x: &[T], y: &mut [T]) {
        if x.len() != self.cols() || y.len() != self.rows() {
            panic!("Matrix has wrong shape");
        }
        self.apply_global(alpha, x, y);
    }
}
