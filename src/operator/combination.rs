//! Linear combinations of operators
use crate::traits::LinearOperator;
use cauchy::c64;
use rlst::RlstScalar;

/// The operator `sum_k c_k A_k` over borrowed operators of equal shape.
pub struct LinearCombination<'a, T: RlstScalar> {
    rows: usize,
    cols: usize,
    terms: Vec<(T, &'a dyn LinearOperator<T>)>,
}

impl<'a, T: RlstScalar> LinearCombination<'a, T> {
    /// Create an empty (zero) combination of the given shape.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            terms: vec![],
        }
    }

    /// Add the term `coefficient * operator`.
    pub fn add_term(mut self, coefficient: T, operator: &'a dyn LinearOperator<T>) -> Self {
        if operator.rows() != self.rows || operator.cols() != self.cols {
            panic!("Matrix has wrong shape");
        }
        self.terms.push((coefficient, operator));
        self
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Check if the combination has no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<'a> LinearCombination<'a, c64> {
    /// The Brakhage-Werner operator `K - i eta V`.
    ///
    /// `double_layer` should include the jump term, so that the exterior Dirichlet problem
    /// with boundary data g reads `(K - i eta V) phi = M g`.
    pub fn brakhage_werner(
        double_layer: &'a dyn LinearOperator<c64>,
        single_layer: &'a dyn LinearOperator<c64>,
        eta: f64,
    ) -> Self {
        Self::new(double_layer.rows(), double_layer.cols())
            .add_term(c64::new(1.0, 0.0), double_layer)
            .add_term(c64::new(0.0, -eta), single_layer)
    }
}

impl<'a, T: RlstScalar> LinearOperator<T> for LinearCombination<'a, T> {
    fn rows(&self) -> usize {
        self.rows
    }
    fn cols(&self) -> usize {
        self.cols
    }
    fn apply_add(&self, alpha: T, x: &[T], y: &mut [T]) {
        for (coefficient, operator) in &self.terms {
            operator.apply_add(alpha * *coefficient, x, y);
        }
    }
}
