//! Evaluation of layer potentials away from the curve
use crate::assembly::common::shape_values;
use crate::assembly::kernels::{laplace_dny_kernel, laplace_kernel};
use crate::grid::Curve2d;
use crate::quadrature::{gauss_legendre::gauss_legendre_rule, types::NumericalQuadratureDefinition};
use crate::types::{BasisFunction, BemResult};
use cauchy::c64;
use rayon::prelude::*;
use rlst::RlstScalar;

/// Evaluator for single and double layer potentials of a density on a curve.
///
/// Points must lie away from the curve: the panel integrals use a plain Gauss-Legendre rule.
pub struct PotentialEvaluator<'a> {
    curve: &'a Curve2d,
    basis: BasisFunction,
    rule: NumericalQuadratureDefinition,
}

impl<'a> PotentialEvaluator<'a> {
    /// Create new
    pub fn new(curve: &'a Curve2d, basis: BasisFunction, order: usize) -> BemResult<Self> {
        Ok(Self {
            curve,
            basis,
            rule: gauss_legendre_rule(order)?,
        })
    }

    /// The basis of the densities
    pub fn basis(&self) -> BasisFunction {
        self.basis
    }

    /// Evaluate `dlp_weight * D[density](x) + slp_weight * S[density](x)`.
    pub fn combined<T: RlstScalar<Real = f64>>(
        &self,
        x: [f64; 2],
        density: &[T],
        dlp_weight: T,
        slp_weight: T,
    ) -> T {
        if density.len() != self.curve.dof_count(self.basis) {
            panic!(
                "Density has {} entries but the basis has {} functions",
                density.len(),
                self.curve.dof_count(self.basis)
            );
        }
        let panel_kernel = |panel: usize, u: f64| {
            let y = self.curve.panel_point(panel, u);
            dlp_weight * T::from_real(laplace_dny_kernel(x, y, self.curve.panel(panel).normal))
                + slp_weight * T::from_real(laplace_kernel(x, y))
        };
        match self.basis {
            BasisFunction::Constant => {
                let mut sum = T::zero();
                for (panel, d) in density.iter().enumerate() {
                    let mut integral = T::zero();
                    for (u, w) in self.rule.points.iter().zip(&self.rule.weights) {
                        integral += panel_kernel(panel, *u) * T::from_real(*w);
                    }
                    sum += integral * T::from_real(self.curve.panel(panel).measure) * *d;
                }
                sum
            }
            BasisFunction::Linear => {
                let mut vertex_values = vec![T::zero(); self.curve.vertex_count()];
                for (panel, p) in self.curve.panels().iter().enumerate() {
                    for (u, w) in self.rule.points.iter().zip(&self.rule.weights) {
                        let k = panel_kernel(panel, *u) * T::from_real(w * p.measure);
                        for (v, phi) in p.vertices.iter().zip(shape_values(self.basis, *u)) {
                            vertex_values[*v] += k * T::from_real(phi);
                        }
                    }
                }
                vertex_values
                    .iter()
                    .zip(density)
                    .fold(T::zero(), |acc, (v, d)| acc + *v * *d)
            }
        }
    }

    /// Single layer potential S[density](x)
    pub fn single_layer<T: RlstScalar<Real = f64>>(&self, x: [f64; 2], density: &[T]) -> T {
        self.combined(x, density, T::zero(), T::one())
    }

    /// Double layer potential D[density](x)
    pub fn double_layer<T: RlstScalar<Real = f64>>(&self, x: [f64; 2], density: &[T]) -> T {
        self.combined(x, density, T::one(), T::zero())
    }

    /// Brakhage-Werner potential D[density](x) - i eta S[density](x)
    pub fn brakhage_werner(&self, x: [f64; 2], density: &[c64], eta: f64) -> c64 {
        self.combined(x, density, c64::new(1.0, 0.0), c64::new(0.0, -eta))
    }

    /// Evaluate the combined potential at many points in parallel.
    pub fn evaluate<T: RlstScalar<Real = f64>>(
        &self,
        points: &[[f64; 2]],
        density: &[T],
        dlp_weight: T,
        slp_weight: T,
    ) -> Vec<T> {
        points
            .par_iter()
            .map(|x| self.combined(*x, density, dlp_weight, slp_weight))
            .collect()
    }
}

/// Largest pointwise relative error `|computed - reference| / |reference|`.
///
/// A NaN anywhere makes the result NaN, so it fails every threshold comparison.
pub fn max_relative_error<T: RlstScalar<Real = f64>>(computed: &[T], reference: &[T]) -> f64 {
    assert_eq!(computed.len(), reference.len());
    computed
        .iter()
        .zip(reference)
        .map(|(c, r)| (*c - *r).abs() / r.abs())
        .fold(0.0, |acc, e| if e.is_nan() || e > acc { e } else { acc })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shapes::circle;
    use approx::*;

    #[test]
    fn test_double_layer_of_one() {
        let curve = circle(40, 1.0).unwrap();
        for basis in [BasisFunction::Constant, BasisFunction::Linear] {
            let evaluator = PotentialEvaluator::new(&curve, basis, 6).unwrap();
            let ones = vec![1.0; curve.dof_count(basis)];
            assert_relative_eq!(evaluator.double_layer([0.2, 0.1], &ones), -1.0, epsilon = 1e-9);
            assert_relative_eq!(evaluator.double_layer([2.0, -1.0], &ones), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_single_layer_of_one_outside() {
        // S[1](x) = -|curve| log|x| / (2 pi) far away
        let curve = circle(64, 1.0).unwrap();
        let evaluator = PotentialEvaluator::new(&curve, BasisFunction::Constant, 4).unwrap();
        let perimeter = curve.panels().iter().map(|p| p.measure).sum::<f64>();
        let x = [30.0, 40.0];
        let expected = -perimeter * 50f64.ln() / (2.0 * std::f64::consts::PI);
        assert_relative_eq!(
            evaluator.single_layer(x, &vec![1.0; 64]),
            expected,
            max_relative = 1e-6
        );
    }

    #[test]
    fn test_evaluate_matches_pointwise() {
        let curve = circle(16, 1.0).unwrap();
        let evaluator = PotentialEvaluator::new(&curve, BasisFunction::Linear, 4).unwrap();
        let density = (0..16)
            .map(|i| c64::new(i as f64, 1.0))
            .collect::<Vec<_>>();
        let points = [[2.0, 0.0], [0.0, -3.0], [1.5, 1.5]];
        let values = evaluator.evaluate(&points, &density, c64::new(1.0, 0.0), c64::new(0.0, -2.0));
        for (x, value) in points.iter().zip(&values) {
            let expected = evaluator.brakhage_werner(*x, &density, 2.0);
            assert_eq!(*value, expected);
        }
    }

    #[test]
    fn test_max_relative_error() {
        let e = max_relative_error(&[1.0, 2.2, -3.0], &[1.0, 2.0, -2.0]);
        assert_relative_eq!(e, 0.5, max_relative = 1e-14);
    }

    #[test]
    fn test_max_relative_error_propagates_nan() {
        for computed in [[f64::NAN, 1.0], [1.0, f64::NAN]] {
            let e = max_relative_error(&computed, &[1.0, 1.0]);
            assert!(e.is_nan());
        }
        let e = max_relative_error(&[c64::new(f64::INFINITY, 0.0)], &[c64::new(1.0, 0.0)]);
        assert!(e.is_infinite());
    }
}
