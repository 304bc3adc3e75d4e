//! Uniform hierarchical matrices
//!
//! Admissible blocks are stored as `V_s S W_t^H`, where the cluster bases `V_s` and `W_t`
//! are shared by every block in the same block row or block column. Applying the matrix
//! transforms the input into all column cluster bases first, multiplies by the coupling
//! matrices and finally transforms back with the row cluster bases.
use crate::operator::hmatrix::{gather, scatter_add};
use crate::operator::DenseBlock;
use crate::traits::LinearOperator;
use rlst::RlstScalar;

/// Basis for the vectors on a cluster of indices.
pub struct ClusterBasis<T: RlstScalar> {
    indices: Vec<usize>,
    vectors: DenseBlock<T>,
}

impl<T: RlstScalar> ClusterBasis<T> {
    /// Create a basis; `vectors` has one row per index and one column per basis vector.
    pub fn new(indices: Vec<usize>, vectors: DenseBlock<T>) -> Self {
        if vectors.rows() != indices.len() {
            panic!("Cluster basis has wrong shape");
        }
        Self { indices, vectors }
    }

    /// Global indices of the cluster
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of basis vectors
    pub fn rank(&self) -> usize {
        self.vectors.cols()
    }
}

/// A block of a uniform hierarchical matrix.
pub enum UniformBlock<T: RlstScalar> {
    /// Dense near-field block
    Full {
        /// Global row indices
        rows: Vec<usize>,
        /// Global column indices
        cols: Vec<usize>,
        /// Entries
        block: DenseBlock<T>,
    },
    /// Far-field block `V S W^H`
    Coupling {
        /// Index into the row cluster bases
        row_basis: usize,
        /// Index into the column cluster bases
        col_basis: usize,
        /// Coupling matrix S
        coupling: DenseBlock<T>,
    },
}

/// A matrix stored as dense near-field blocks and far-field blocks in shared cluster bases.
pub struct UniformHMatrix<T: RlstScalar> {
    rows: usize,
    cols: usize,
    row_bases: Vec<ClusterBasis<T>>,
    col_bases: Vec<ClusterBasis<T>>,
    blocks: Vec<UniformBlock<T>>,
}

impl<T: RlstScalar> UniformHMatrix<T> {
    /// Create a matrix, checking that every block fits the bases and the matrix dimensions.
    pub fn new(
        rows: usize,
        cols: usize,
        row_bases: Vec<ClusterBasis<T>>,
        col_bases: Vec<ClusterBasis<T>>,
        blocks: Vec<UniformBlock<T>>,
    ) -> Self {
        for basis in &row_bases {
            if basis.indices.iter().any(|i| *i >= rows) {
                panic!("Row cluster index out of range");
            }
        }
        for basis in &col_bases {
            if basis.indices.iter().any(|i| *i >= cols) {
                panic!("Column cluster index out of range");
            }
        }
        for block in &blocks {
            match block {
                UniformBlock::Full {
                    rows: r,
                    cols: c,
                    block,
                } => {
                    if block.rows() != r.len() || block.cols() != c.len() {
                        panic!("Matrix has wrong shape");
                    }
                }
                UniformBlock::Coupling {
                    row_basis,
                    col_basis,
                    coupling,
                } => {
                    if coupling.rows() != row_bases[*row_basis].rank()
                        || coupling.cols() != col_bases[*col_basis].rank()
                    {
                        panic!("Coupling matrix has wrong shape");
                    }
                }
            }
        }
        Self {
            rows,
            cols,
            row_bases,
            col_bases,
            blocks,
        }
    }

    /// Number of far-field blocks
    pub fn coupling_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, UniformBlock::Coupling { .. }))
            .count()
    }
}

impl<T: RlstScalar> LinearOperator<T> for UniformHMatrix<T> {
    fn rows(&self) -> usize {
        self.rows
    }
    fn cols(&self) -> usize {
        self.cols
    }
    fn apply_add(&self, alpha: T, x: &[T], y: &mut [T]) {
        if x.len() != self.cols || y.len() != self.rows {
            panic!("Matrix has wrong shape");
        }

        // Forward transformation
        let xhat = self
            .col_bases
            .iter()
            .map(|basis| {
                let mut coefficients = vec![T::zero(); basis.rank()];
                basis
                    .vectors
                    .apply_adjoint_add(T::one(), &gather(&basis.indices, x), &mut coefficients);
                coefficients
            })
            .collect::<Vec<_>>();

        let mut yhat = self
            .row_bases
            .iter()
            .map(|basis| vec![T::zero(); basis.rank()])
            .collect::<Vec<_>>();

        for block in &self.blocks {
            match block {
                UniformBlock::Full { rows, cols, block } => {
                    let mut local_y = vec![T::zero(); rows.len()];
                    block.apply_add(alpha, &gather(cols, x), &mut local_y);
                    scatter_add(rows, &local_y, y);
                }
                UniformBlock::Coupling {
                    row_basis,
                    col_basis,
                    coupling,
                } => {
                    coupling.apply_add(T::one(), &xhat[*col_basis], &mut yhat[*row_basis]);
                }
            }
        }

        // Backward transformation
        for (basis, coefficients) in self.row_bases.iter().zip(&yhat) {
            let mut local_y = vec![T::zero(); basis.indices.len()];
            basis.vectors.apply_add(alpha, coefficients, &mut local_y);
            scatter_add(&basis.indices, &local_y, y);
        }
    }
}
