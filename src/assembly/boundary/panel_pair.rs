//! Integration over pairs of panels
use crate::assembly::common::{
    diff, dot, reference_mass, shape_count, shape_integrals, shape_values,
};
use crate::assembly::kernels::{KERNEL_CONST, KERNEL_CONST_LOG};
use crate::grid::Curve2d;
use crate::quadrature::{SingularQuadrature, TopologyCase};
use crate::types::{BasisFunction, OperatorKind};
use itertools::izip;

/// Local matrix of a panel pair, indexed by the local shape functions of the test and the
/// trial panel. Entries beyond the number of shape functions of a basis are zero.
pub(crate) type LocalMatrix = [[f64; 2]; 2];

/// Integrator for the interaction of a test panel with a trial panel.
pub(crate) struct PanelPairIntegrator<'a> {
    curve: &'a Curve2d,
    quadrature: &'a SingularQuadrature,
    kind: OperatorKind,
    test_basis: BasisFunction,
    trial_basis: BasisFunction,
    alpha: f64,
}

impl<'a> PanelPairIntegrator<'a> {
    pub(crate) fn new(
        curve: &'a Curve2d,
        quadrature: &'a SingularQuadrature,
        kind: OperatorKind,
        test_basis: BasisFunction,
        trial_basis: BasisFunction,
        alpha: f64,
    ) -> Self {
        Self {
            curve,
            quadrature,
            kind,
            test_basis,
            trial_basis,
            alpha,
        }
    }

    /// Integrate the kernel against all pairs of shape functions on the two panels.
    pub(crate) fn integrate(&self, test: usize, trial: usize) -> LocalMatrix {
        let test_panel = self.curve.panel(test);
        let trial_panel = self.curve.panel(trial);
        let pair = self
            .quadrature
            .select(test_panel.vertices, trial_panel.vertices);

        let mass = reference_mass(self.test_basis, self.trial_basis);
        if self.kind == OperatorKind::DoubleLayer && pair.case == TopologyCase::Identical {
            // jump relation
            let scale = self.alpha * test_panel.measure;
            return mass.map(|row| row.map(|m| scale * m));
        }

        let [at, bt] = pair
            .test_order
            .map(|local| self.curve.vertex(test_panel.vertices[local]));
        let [as_, bs] = pair
            .trial_order
            .map(|local| self.curve.vertex(trial_panel.vertices[local]));
        let dt = diff(bt, at);
        let ds = diff(bs, as_);
        let ntest = shape_count(self.test_basis);
        let ntrial = shape_count(self.trial_basis);

        let mut local = [[0.0; 2]; 2];
        let rule = pair.rule;
        for (u, v, w) in izip!(&rule.test_points, &rule.trial_points, &rule.weights) {
            let x = [at[0] + u * dt[0], at[1] + u * dt[1]];
            let y = [as_[0] + v * ds[0], as_[1] + v * ds[1]];
            let d = diff(x, y);
            let r2 = dot(d, d);
            let k = match self.kind {
                OperatorKind::SingleLayer => r2.ln(),
                OperatorKind::DoubleLayer => dot(trial_panel.normal, d) / r2,
            };
            let test_values = shape_values(self.test_basis, *u);
            let trial_values = shape_values(self.trial_basis, *v);
            for (a, ta) in test_values.iter().take(ntest).enumerate() {
                for (b, tb) in trial_values.iter().take(ntrial).enumerate() {
                    local[a][b] += w * k * ta * tb;
                }
            }
        }

        let constant = match self.kind {
            OperatorKind::SingleLayer => {
                if let Some(base) = rule.base {
                    let test_integrals = shape_integrals(self.test_basis);
                    let trial_integrals = shape_integrals(self.trial_basis);
                    for a in 0..ntest {
                        for b in 0..ntrial {
                            local[a][b] += 2.0 * base * test_integrals[a] * trial_integrals[b];
                        }
                    }
                }
                KERNEL_CONST_LOG
            }
            OperatorKind::DoubleLayer => KERNEL_CONST,
        };
        let scale = test_panel.measure * trial_panel.measure * constant;

        // Back to the panels' own vertex numbering
        let test_reorder = match self.test_basis {
            BasisFunction::Constant => [0, 1],
            BasisFunction::Linear => pair.test_order,
        };
        let trial_reorder = match self.trial_basis {
            BasisFunction::Constant => [0, 1],
            BasisFunction::Linear => pair.trial_order,
        };
        let mut result = [[0.0; 2]; 2];
        for a in 0..ntest {
            for b in 0..ntrial {
                result[test_reorder[a]][trial_reorder[b]] = local[a][b] * scale;
            }
        }
        result
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shapes::circle;
    use approx::*;

    #[test]
    fn test_identical_constant_single_layer() {
        // the graded rule plus base integrates log|x - y|^2 exactly on a straight panel
        let curve = circle(64, 1.0).unwrap();
        let quadrature = SingularQuadrature::new(4).unwrap();
        let integrator = PanelPairIntegrator::new(
            &curve,
            &quadrature,
            OperatorKind::SingleLayer,
            BasisFunction::Constant,
            BasisFunction::Constant,
            0.5,
        );
        let g = curve.panel(3).measure;
        let expected = g * g * (2.0 * g.ln() - 3.0) * KERNEL_CONST_LOG;
        assert_relative_eq!(integrator.integrate(3, 3)[0][0], expected, max_relative = 1e-12);
    }

    #[test]
    fn test_linear_sums_to_constant() {
        let curve = circle(12, 1.0).unwrap();
        let quadrature = SingularQuadrature::new(5).unwrap();
        for kind in [OperatorKind::SingleLayer, OperatorKind::DoubleLayer] {
            let constant = PanelPairIntegrator::new(
                &curve,
                &quadrature,
                kind,
                BasisFunction::Constant,
                BasisFunction::Constant,
                0.5,
            );
            let linear = PanelPairIntegrator::new(
                &curve,
                &quadrature,
                kind,
                BasisFunction::Linear,
                BasisFunction::Linear,
                0.5,
            );
            for (t, s) in [(0, 0), (0, 1), (1, 0), (11, 0), (0, 5)] {
                let c = constant.integrate(t, s)[0][0];
                let l = linear.integrate(t, s);
                let sum = l.iter().flatten().sum::<f64>();
                assert_relative_eq!(sum, c, max_relative = 1e-12);
            }
        }
    }
}
