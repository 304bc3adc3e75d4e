//! Right hand sides and projections of boundary data
use crate::assembly::common::{local_dof, reference_mass, shape_count, shape_values};
use crate::grid::Curve2d;
use crate::operator::DenseBlock;
use crate::quadrature::gauss_legendre::gauss_legendre_rule;
use crate::solvers::{solve_gmres, GmresOptions, GmresStatus};
use crate::types::{BasisFunction, BemResult};
use log::warn;
use rayon::prelude::*;
use rlst::RlstScalar;

/// Compute `b_i = integral of phi_i(x) f(x, n(x))` over the curve.
///
/// `f` receives a point on the curve and the unit normal of its panel. Each panel is
/// integrated with a Gauss-Legendre rule with `order` points.
pub fn integrate_function<T, F>(
    curve: &Curve2d,
    basis: BasisFunction,
    order: usize,
    f: F,
) -> BemResult<Vec<T>>
where
    T: RlstScalar<Real = f64>,
    F: Fn([f64; 2], [f64; 2]) -> T + Sync,
{
    let rule = gauss_legendre_rule(order)?;
    let panel_integral = |panel: usize| {
        let p = curve.panel(panel);
        let mut values = [T::zero(); 2];
        for (u, w) in rule.points.iter().zip(&rule.weights) {
            let fx = f(curve.panel_point(panel, *u), p.normal) * T::from_real(w * p.measure);
            for (value, phi) in values.iter_mut().zip(shape_values(basis, *u)) {
                *value += fx * T::from_real(phi);
            }
        }
        values
    };

    match basis {
        BasisFunction::Constant => Ok((0..curve.panel_count())
            .into_par_iter()
            .map(|panel| panel_integral(panel)[0])
            .collect()),
        BasisFunction::Linear => {
            let local = (0..curve.panel_count())
                .into_par_iter()
                .map(panel_integral)
                .collect::<Vec<_>>();
            let mut b = vec![T::zero(); curve.vertex_count()];
            for (panel, values) in local.iter().enumerate() {
                for (v, value) in curve.panel(panel).vertices.iter().zip(values) {
                    b[*v] += *value;
                }
            }
            Ok(b)
        }
    }
}

/// Assemble the Gram matrix of the test and trial basis.
pub fn assemble_mass<T: RlstScalar<Real = f64>>(
    curve: &Curve2d,
    test_basis: BasisFunction,
    trial_basis: BasisFunction,
) -> DenseBlock<T> {
    let mut mass = DenseBlock::new(curve.dof_count(test_basis), curve.dof_count(trial_basis));
    let reference = reference_mass(test_basis, trial_basis);
    for (index, panel) in curve.panels().iter().enumerate() {
        for (a, row) in reference.iter().take(shape_count(test_basis)).enumerate() {
            for (b, m) in row.iter().take(shape_count(trial_basis)).enumerate() {
                let i = local_dof(curve, test_basis, index, a);
                let j = local_dof(curve, trial_basis, index, b);
                let value = mass.get(i, j) + T::from_real(m * panel.measure);
                mass.set(i, j, value);
            }
        }
    }
    mass
}

/// L2 projection of boundary data onto a basis.
///
/// The mass matrix is diagonal for the constant basis. For the linear basis the Gram system
/// is solved with GMRES; a warning is logged if it does not reach the requested accuracy.
pub fn project_l2<T, F>(
    curve: &Curve2d,
    basis: BasisFunction,
    order: usize,
    f: F,
    options: &GmresOptions,
) -> BemResult<Vec<T>>
where
    T: RlstScalar<Real = f64>,
    F: Fn([f64; 2], [f64; 2]) -> T + Sync,
{
    let b = integrate_function(curve, basis, order, f)?;
    match basis {
        BasisFunction::Constant => Ok(b
            .iter()
            .zip(curve.panels())
            .map(|(bi, panel)| *bi / T::from_real(panel.measure))
            .collect()),
        BasisFunction::Linear => {
            let mass = assemble_mass::<T>(curve, basis, basis);
            let mut x = vec![T::zero(); b.len()];
            let result = solve_gmres(&mass, &b, &mut x, options);
            if result.status != GmresStatus::Converged {
                warn!(
                    "L2 projection stopped after {} steps with residual norm {:e}",
                    result.steps, result.residual_norm
                );
            }
            Ok(x)
        }
    }
}
