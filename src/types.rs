//! Types specific to bempp2d
use crate::quadrature::types::QuadratureError;

/// Error raised while configuring an assembler or building a curve.
#[derive(thiserror::Error, Debug)]
pub enum BemError {
    /// The combination of operator and basis functions has no near-field fill routine.
    #[error("{operator:?} operator with {test:?} test and {trial:?} trial basis is not supported")]
    UnsupportedBasis {
        /// Operator being assembled
        operator: OperatorKind,
        /// Test (row) basis
        test: BasisFunction,
        /// Trial (column) basis
        trial: BasisFunction,
    },
    /// Malformed curve input.
    #[error("invalid curve: {0}")]
    InvalidCurve(String),
    /// Quadrature construction failed.
    #[error("quadrature error: {0}")]
    Quadrature(#[from] QuadratureError),
}

/// Result type used throughout the crate.
pub type BemResult<T> = Result<T, BemError>;

/// Family of basis functions on a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasisFunction {
    /// One piecewise-constant function per panel.
    Constant,
    /// One piecewise-linear hat function per vertex.
    Linear,
}

/// Boundary integral operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    /// Single layer operator V
    SingleLayer,
    /// Double layer operator K
    DoubleLayer,
}

/// Storage order of an assembled block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageOrder {
    /// Entry (i, j) is stored at row i, column j.
    #[default]
    Normal,
    /// Entry (i, j) is stored at row j, column i.
    Transposed,
}

/// Map from the local rows or columns of a block to global degrees of freedom.
#[derive(Debug, Clone, Copy, Default)]
pub enum IndexPermutation<'a> {
    /// Local index i is global index i.
    #[default]
    Identity,
    /// Local index i is global index `indices[i]`.
    Explicit(&'a [usize]),
}

impl<'a> IndexPermutation<'a> {
    /// Global index of the local index `i`.
    pub fn index(&self, i: usize) -> usize {
        match self {
            Self::Identity => i,
            Self::Explicit(indices) => indices[i],
        }
    }

    /// Check that the first `len` local indices map into `0..bound`.
    ///
    /// Panics otherwise.
    pub fn check(&self, len: usize, bound: usize) {
        match self {
            Self::Identity => {
                if len > bound {
                    panic!("Block has {len} entries but only {bound} degrees of freedom exist");
                }
            }
            Self::Explicit(indices) => {
                if indices.len() < len {
                    panic!(
                        "Index permutation has {} entries, block needs {len}",
                        indices.len()
                    );
                }
                if let Some(i) = indices[..len].iter().find(|&&i| i >= bound) {
                    panic!("Index {i} out of range for {bound} degrees of freedom");
                }
            }
        }
    }
}

impl<'a> From<&'a [usize]> for IndexPermutation<'a> {
    fn from(indices: &'a [usize]) -> Self {
        Self::Explicit(indices)
    }
}

impl<'a> From<Option<&'a [usize]>> for IndexPermutation<'a> {
    fn from(indices: Option<&'a [usize]>) -> Self {
        match indices {
            Some(indices) => Self::Explicit(indices),
            None => Self::Identity,
        }
    }
}
