//! Restarted GMRES
//!
//! The solver only applies the operator to vectors, so it works for every type implementing
//! [LinearOperator]. The Krylov basis is orthogonalised with modified Gram-Schmidt and the
//! Hessenberg matrix is reduced with Givens rotations as it grows, so the residual norm of
//! the current iterate is known after every step without forming the iterate.
use crate::traits::LinearOperator;
use log::{debug, info, trace};
use rlst::RlstScalar;

/// Relative size of a new Krylov direction below which the Krylov space is invariant
const BREAKDOWN_TOLERANCE: f64 = 1e-14;

/// Options for GMRES
#[derive(Debug, Clone)]
pub struct GmresOptions {
    /// Stop once the residual norm |b - Ax| is at most this
    accuracy: f64,
    /// Maximum dimension of the Krylov space before restarting
    restart: usize,
    /// Maximum total number of steps
    max_steps: usize,
}

impl Default for GmresOptions {
    fn default() -> Self {
        Self {
            accuracy: 1e-10,
            restart: 50,
            max_steps: 1000,
        }
    }
}

impl GmresOptions {
    /// Set the absolute residual norm at which to stop
    pub fn set_accuracy(&mut self, accuracy: f64) {
        self.accuracy = accuracy;
    }

    /// Set the restart length
    pub fn set_restart(&mut self, restart: usize) {
        self.restart = restart.max(1);
    }

    /// Set the maximum number of steps
    pub fn set_max_steps(&mut self, max_steps: usize) {
        self.max_steps = max_steps;
    }

    /// Absolute residual norm at which to stop
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Restart length
    pub fn restart(&self) -> usize {
        self.restart
    }

    /// Maximum number of steps
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }
}

/// How a GMRES run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GmresStatus {
    /// The residual norm reached the accuracy
    Converged,
    /// The step budget ran out first
    Terminated,
}

/// Summary of a GMRES run
#[derive(Debug, Clone, Copy)]
pub struct GmresResult {
    /// How the run ended
    pub status: GmresStatus,
    /// Number of steps, ie. operator applications outside of residual computations
    pub steps: usize,
    /// Number of restarts
    pub restarts: usize,
    /// Norm of b - Ax for the returned x
    pub residual_norm: f64,
}

fn inner<T: RlstScalar<Real = f64>>(a: &[T], b: &[T]) -> T {
    a.iter()
        .zip(b)
        .fold(T::zero(), |acc, (ai, bi)| acc + ai.conj() * *bi)
}

fn norm<T: RlstScalar<Real = f64>>(a: &[T]) -> f64 {
    a.iter()
        .map(|ai| (ai.conj() * *ai).re())
        .sum::<f64>()
        .sqrt()
}

fn axpy<T: RlstScalar<Real = f64>>(alpha: T, x: &[T], y: &mut [T]) {
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += alpha * *xi;
    }
}

/// Krylov space of one restart cycle
struct KrylovState<T: RlstScalar<Real = f64>> {
    /// Orthonormal basis
    basis: Vec<Vec<T>>,
    /// Columns of the triangular factor
    triangular: Vec<Vec<T>>,
    /// Givens rotations
    cosines: Vec<f64>,
    sines: Vec<T>,
    /// Rotated right hand side of the least squares problem
    rhs: Vec<T>,
    /// The basis spans an invariant subspace
    invariant: bool,
}

impl<T: RlstScalar<Real = f64>> KrylovState<T> {
    fn new(residual: Vec<T>) -> Self {
        let beta = norm(&residual);
        let basis = if beta > 0.0 {
            let scale = T::from_real(1.0 / beta);
            vec![residual.iter().map(|r| scale * *r).collect()]
        } else {
            vec![]
        };
        Self {
            basis,
            triangular: vec![],
            cosines: vec![],
            sines: vec![],
            rhs: vec![T::from_real(beta)],
            invariant: beta == 0.0,
        }
    }
}

/// State of a restarted GMRES solve of Ax = b.
pub struct Gmres<'a, T: RlstScalar<Real = f64>, Op: LinearOperator<T> + ?Sized> {
    operator: &'a Op,
    b: &'a [T],
    x: &'a mut [T],
    state: KrylovState<T>,
}

impl<'a, T: RlstScalar<Real = f64>, Op: LinearOperator<T> + ?Sized> Gmres<'a, T, Op> {
    /// Start the solve from the initial guess in `x`.
    pub fn init(operator: &'a Op, b: &'a [T], x: &'a mut [T]) -> Self {
        if operator.rows() != operator.cols() {
            panic!("GMRES needs a square operator");
        }
        if b.len() != operator.rows() || x.len() != operator.cols() {
            panic!("Matrix has wrong shape");
        }
        let state = KrylovState::new(residual(operator, b, x));
        Self {
            operator,
            b,
            x,
            state,
        }
    }

    /// Dimension of the current Krylov space
    pub fn dimension(&self) -> usize {
        self.state.triangular.len()
    }

    /// Whether the Krylov space of the current cycle can no longer grow
    pub fn is_invariant(&self) -> bool {
        self.state.invariant
    }

    /// Norm of the residual of the current iterate
    pub fn residual_norm(&self) -> f64 {
        self.state.rhs.last().map_or(0.0, |r| r.abs())
    }

    /// Extend the Krylov space by one vector.
    ///
    /// Does nothing once the space is invariant under the operator.
    pub fn step(&mut self) {
        let k = self.dimension();
        if self.state.invariant || k >= self.state.basis.len() {
            return;
        }

        let mut w = self.operator.apply(&self.state.basis[k]);
        let scale = norm(&w);

        let mut column = Vec::with_capacity(k + 2);
        for q in &self.state.basis {
            let h = inner(q, &w);
            axpy(-h, q, &mut w);
            column.push(h);
        }
        let mut next = norm(&w);
        if next <= BREAKDOWN_TOLERANCE * scale {
            next = 0.0;
            self.state.invariant = true;
        } else {
            let inv = T::from_real(1.0 / next);
            self.state.basis.push(w.iter().map(|wi| inv * *wi).collect());
        }

        // apply the previous rotations to the new column
        for i in 0..k {
            let c = T::from_real(self.state.cosines[i]);
            let s = self.state.sines[i];
            let (a, b) = (column[i], column[i + 1]);
            column[i] = c * a + s * b;
            column[i + 1] = -s.conj() * a + c * b;
        }

        // new rotation, eliminating the subdiagonal entry
        let a = column[k];
        let r = (a.abs() * a.abs() + next * next).sqrt();
        if r <= BREAKDOWN_TOLERANCE * scale {
            // singular on the Krylov space: keep the last cycle's least squares solution
            self.state.invariant = true;
            return;
        }
        let (c, s) = if a.abs() == 0.0 {
            (0.0, T::one())
        } else {
            (a.abs() / r, a * T::from_real(next / (a.abs() * r)))
        };
        column[k] = T::from_real(c) * a + s * T::from_real(next);
        self.state.cosines.push(c);
        self.state.sines.push(s);
        self.state.triangular.push(column);

        let g = self.state.rhs[k];
        self.state.rhs[k] = T::from_real(c) * g;
        self.state.rhs.push(-s.conj() * g);
    }

    /// Update x with the minimiser over the current Krylov space and start a new cycle.
    pub fn finish(&mut self) {
        let m = self.dimension();
        if m > 0 {
            let mut y = self.state.rhs[..m].to_vec();
            for i in (0..m).rev() {
                for j in i + 1..m {
                    let rij = self.state.triangular[j][i];
                    y[i] = y[i] - rij * y[j];
                }
                y[i] = y[i] / self.state.triangular[i][i];
            }
            for (yj, q) in y.iter().zip(&self.state.basis) {
                axpy(*yj, q, self.x);
            }
        }
        self.state = KrylovState::new(residual(self.operator, self.b, self.x));
    }
}

fn residual<T: RlstScalar<Real = f64>, Op: LinearOperator<T> + ?Sized>(
    operator: &Op,
    b: &[T],
    x: &[T],
) -> Vec<T> {
    let mut r = b.to_vec();
    operator.apply_add(-T::one(), x, &mut r);
    r
}

/// Solve Ax = b with restarted GMRES, starting from the initial guess in `x`.
///
/// Running out of steps is not an error: the best iterate is left in `x` and the result
/// reports [GmresStatus::Terminated] with the residual norm for the caller to inspect. The
/// same happens when the Krylov space stops growing before the accuracy is reached, which
/// means the operator is singular.
pub fn solve_gmres<T: RlstScalar<Real = f64>, Op: LinearOperator<T> + ?Sized>(
    operator: &Op,
    b: &[T],
    x: &mut [T],
    options: &GmresOptions,
) -> GmresResult {
    let mut gmres = Gmres::init(operator, b, x);
    let mut steps = 0;
    let mut restarts = 0;
    loop {
        let residual_norm = gmres.residual_norm();
        if residual_norm <= options.accuracy {
            gmres.finish();
            let residual_norm = gmres.residual_norm();
            info!("GMRES converged after {steps} steps, residual norm {residual_norm:e}");
            return GmresResult {
                status: GmresStatus::Converged,
                steps,
                restarts,
                residual_norm,
            };
        }
        if steps >= options.max_steps || gmres.is_invariant() {
            gmres.finish();
            let residual_norm = gmres.residual_norm();
            info!(
                "GMRES stopped after {steps} steps without converging, residual norm {residual_norm:e}"
            );
            return GmresResult {
                status: GmresStatus::Terminated,
                steps,
                restarts,
                residual_norm,
            };
        }
        if gmres.dimension() >= options.restart {
            gmres.finish();
            restarts += 1;
            debug!(
                "GMRES restart {restarts} after {steps} steps, residual norm {:e}",
                gmres.residual_norm()
            );
            continue;
        }
        gmres.step();
        steps += 1;
        trace!("GMRES step {steps}: residual norm {:e}", gmres.residual_norm());
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::operator::DenseBlock;
    use approx::*;
    use cauchy::c64;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn perturbed_identity(n: usize, size: f64, seed: u64) -> DenseBlock<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut a = DenseBlock::new(n, n);
        for j in 0..n {
            for i in 0..n {
                let e = rng.gen_range(-size..size);
                a.set(i, j, if i == j { 1.0 + e } else { e });
            }
        }
        a
    }

    fn random_vector(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
    }

    #[test]
    fn test_identity_one_step() {
        let identity = DenseBlock::<f64>::from_fn(10, 10, |i, j| if i == j { 1.0 } else { 0.0 });
        let b = random_vector(10, 1);
        let mut x = vec![0.0; 10];
        let result = solve_gmres(&identity, &b, &mut x, &GmresOptions::default());
        assert_eq!(result.status, GmresStatus::Converged);
        assert_eq!(result.steps, 1);
        assert_eq!(result.restarts, 0);
        for (xi, bi) in x.iter().zip(&b) {
            assert_relative_eq!(xi, bi, max_relative = 1e-14, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_zero_right_hand_side() {
        let a = perturbed_identity(5, 0.1, 2);
        let mut x = vec![0.0; 5];
        let result = solve_gmres(&a, &[0.0; 5], &mut x, &GmresOptions::default());
        assert_eq!(result.status, GmresStatus::Converged);
        assert_eq!(result.steps, 0);
        assert_eq!(x, vec![0.0; 5]);
    }

    #[test]
    fn test_restart_consistency() {
        let n = 20;
        let k = 5;
        let a = perturbed_identity(n, 0.01, 3);
        let b = random_vector(n, 4);

        let mut options = GmresOptions::default();
        options.set_accuracy(1e-10);
        options.set_restart(n);
        let mut x_full = vec![0.0; n];
        let full = solve_gmres(&a, &b, &mut x_full, &options);
        assert_eq!(full.status, GmresStatus::Converged);
        assert_eq!(full.restarts, 0);

        options.set_restart(k);
        options.set_max_steps(3 * k);
        let mut x_restarted = vec![0.0; n];
        let restarted = solve_gmres(&a, &b, &mut x_restarted, &options);
        assert_eq!(restarted.status, GmresStatus::Converged);
        assert!(restarted.restarts >= 1);
        assert!(restarted.steps <= 3 * k);

        for (u, v) in x_full.iter().zip(&x_restarted) {
            assert!((u - v).abs() < 1e-9);
        }
        let r = residual(&a, &b, &x_restarted);
        assert!(norm(&r) <= 1e-9);
    }

    #[test]
    fn test_terminates_without_error() {
        let a = DenseBlock::<f64>::from_fn(20, 20, |i, j| {
            if i == j {
                (i + 1) as f64
            } else {
                0.0
            }
        });
        let b = vec![1.0; 20];
        let mut options = GmresOptions::default();
        options.set_accuracy(1e-14);
        options.set_max_steps(3);
        let mut x = vec![0.0; 20];
        let result = solve_gmres(&a, &b, &mut x, &options);
        assert_eq!(result.status, GmresStatus::Terminated);
        assert_eq!(result.steps, 3);
        assert!(result.residual_norm > 1e-14);
        assert!(result.residual_norm < norm(&b));
        assert_relative_eq!(
            result.residual_norm,
            norm(&residual(&a, &b, &x)),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_zero_operator_terminates() {
        let a = DenseBlock::<f64>::new(3, 3);
        let b = [1.0, 2.0, 3.0];
        let mut x = vec![0.0; 3];
        let result = solve_gmres(&a, &b, &mut x, &GmresOptions::default());
        assert_eq!(result.status, GmresStatus::Terminated);
        assert_eq!(x, vec![0.0; 3]);
        assert_relative_eq!(result.residual_norm, norm(&b), max_relative = 1e-14);
    }

    #[test]
    fn test_nilpotent_operator_terminates() {
        let a = DenseBlock::<f64>::from_fn(2, 2, |i, j| if i == 0 && j == 1 { 1.0 } else { 0.0 });
        let b = [1.0, 0.0];
        let mut x = vec![0.0; 2];
        let result = solve_gmres(&a, &b, &mut x, &GmresOptions::default());
        assert_eq!(result.status, GmresStatus::Terminated);
        assert!(x.iter().all(|xi| xi.is_finite()));
        assert_relative_eq!(result.residual_norm, 1.0, max_relative = 1e-14);
    }

    #[test]
    fn test_singular_operator_keeps_least_squares_iterate() {
        // the best x in the Krylov space is [1, 1], leaving the residual [0, 1]
        let a = DenseBlock::<f64>::from_fn(2, 2, |i, j| if i == 0 && j == 0 { 1.0 } else { 0.0 });
        let b = [1.0, 1.0];
        let mut x = vec![0.0; 2];
        let result = solve_gmres(&a, &b, &mut x, &GmresOptions::default());
        assert_eq!(result.status, GmresStatus::Terminated);
        assert_relative_eq!(x[0], 1.0, max_relative = 1e-12);
        assert_relative_eq!(x[1], 1.0, max_relative = 1e-12);
        assert_relative_eq!(result.residual_norm, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_krylov_basis_orthonormal() {
        let a = perturbed_identity(12, 0.5, 5);
        let b = random_vector(12, 6);
        let mut x = vec![0.0; 12];
        let mut gmres = Gmres::init(&a, &b, &mut x);
        for _ in 0..6 {
            gmres.step();
        }
        let basis = &gmres.state.basis;
        for (i, qi) in basis.iter().enumerate() {
            for (j, qj) in basis.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(inner(qi, qj), expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_complex_system() {
        let n = 8;
        let a = DenseBlock::<c64>::from_fn(n, n, |i, j| {
            if i == j {
                c64::new(2.0, 1.0 + i as f64 * 0.1)
            } else {
                c64::new(0.1 / (1 + i + j) as f64, -0.05)
            }
        });
        let b = (0..n)
            .map(|i| c64::new(1.0, i as f64))
            .collect::<Vec<_>>();
        let mut x = vec![c64::new(0.0, 0.0); n];
        let mut options = GmresOptions::default();
        options.set_accuracy(1e-12);
        let result = solve_gmres(&a, &b, &mut x, &options);
        assert_eq!(result.status, GmresStatus::Converged);
        assert!(result.steps <= n);
        assert!(norm(&residual(&a, &b, &x)) < 1e-11);
    }
}
