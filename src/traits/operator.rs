//! Operators
use rlst::RlstScalar;

pub trait LinearOperator<T: RlstScalar>: Sync {
    //! A linear map that can be applied to vectors
    /// Number of rows
    fn rows(&self) -> usize;

    /// Number of columns
    fn cols(&self) -> usize;

    /// Compute y += alpha * A * x
    fn apply_add(&self, alpha: T, x: &[T], y: &mut [T]);

    /// Compute A * x
    fn apply(&self, x: &[T]) -> Vec<T> {
        let mut y = vec![T::zero(); self.rows()];
        self.apply_add(T::one(), x, &mut y);
        y
    }
}
