extern crate blas_src;
extern crate lapack_src;

use bempp2d::assembly::projection::{integrate_function, project_l2};
use bempp2d::assembly::BoundaryAssemblerOptions;
use bempp2d::laplace::assembler::{double_layer, single_layer};
use bempp2d::operator::LinearCombination;
use bempp2d::potential::{max_relative_error, PotentialEvaluator};
use bempp2d::shapes::circle;
use bempp2d::solvers::{solve_gmres, GmresOptions, GmresStatus};
use bempp2d::traits::LinearOperator;
use bempp2d::types::BasisFunction;
use cauchy::c64;
use std::f64::consts::PI;

/// Points outside the unit disk, away from the line x0 = x1 where the exact solution vanishes
fn exterior_points() -> Vec<[f64; 2]> {
    let mut points = vec![];
    for r in [1.5, 2.0, 3.0] {
        for k in 0..16 {
            let angle = 2.0 * PI * (k as f64 + 0.5) / 16.0;
            points.push([r * angle.cos(), r * angle.sin()]);
        }
    }
    points
}

/// Harmonic outside the unit disk, decaying at infinity, equal to x0 - x1 on the unit circle
fn linear_exterior_solution(x: [f64; 2]) -> f64 {
    (x[0] - x[1]) / (x[0] * x[0] + x[1] * x[1])
}

/// Harmonic outside the unit disk, decaying at infinity, equal to x0^2 - x1^2 on the unit
/// circle
fn quadratic_exterior_solution(x: [f64; 2]) -> f64 {
    let r2 = x[0] * x[0] + x[1] * x[1];
    (x[0] * x[0] - x[1] * x[1]) / (r2 * r2)
}

fn solver_options() -> GmresOptions {
    let mut options = GmresOptions::default();
    options.set_accuracy(1e-12);
    options.set_restart(128);
    options
}

/// Largest entry, NaN if any entry is NaN
fn max_entry(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |acc, e| if e.is_nan() || e > acc { e } else { acc })
}

/// Solve the exterior Dirichlet problem on the unit circle with the direct method
/// `V t = (K - M / 2) g` and return the relative errors of the Neumann data at the vertices
/// and of the potential at the exterior points.
fn solve_exterior_direct(
    dirichlet: impl Fn([f64; 2]) -> f64 + Sync,
    neumann: impl Fn([f64; 2], [f64; 2]) -> f64,
    solution: impl Fn([f64; 2]) -> f64,
) -> (f64, f64) {
    let curve = circle(64, 1.0).unwrap();
    let basis = BasisFunction::Linear;

    let v = single_layer(&curve, basis, &BoundaryAssemblerOptions::default())
        .unwrap()
        .assemble_operator::<f64>();
    let mut options = BoundaryAssemblerOptions::default();
    options.set_alpha(-0.5);
    let k = double_layer(&curve, basis, basis, &options)
        .unwrap()
        .assemble_operator::<f64>();

    let g: Vec<f64> =
        project_l2(&curve, basis, 4, |x, _| dirichlet(x), &solver_options()).unwrap();
    let rhs = k.apply(&g);
    let mut t = vec![0.0; curve.dof_count(basis)];
    let result = solve_gmres(&v, &rhs, &mut t, &solver_options());
    assert_eq!(result.status, GmresStatus::Converged);

    let exact = (0..curve.vertex_count())
        .map(|i| neumann(curve.vertex(i), curve.vertex_normal(i)))
        .collect::<Vec<_>>();
    let neumann_error = max_entry(t.iter().zip(&exact).map(|(a, b)| (a - b).abs()))
        / max_entry(exact.iter().map(|e| e.abs()));

    let evaluator = PotentialEvaluator::new(&curve, basis, 4).unwrap();
    let points = exterior_points();
    let computed = points
        .iter()
        .map(|x| evaluator.double_layer(*x, &g) - evaluator.single_layer(*x, &t))
        .collect::<Vec<_>>();
    let reference = points.iter().map(|x| solution(*x)).collect::<Vec<_>>();
    (neumann_error, max_relative_error(&computed, &reference))
}

#[test]
fn test_exterior_dirichlet_to_neumann() {
    let (neumann_error, potential_error) = solve_exterior_direct(
        |x| x[0] - x[1],
        |_, n| -(n[0] - n[1]),
        linear_exterior_solution,
    );
    assert!(neumann_error < 1e-2, "Neumann data error {neumann_error}");
    assert!(potential_error < 1e-2, "maximum relative error {potential_error}");
}

#[test]
fn test_exterior_dirichlet_to_neumann_quadratic() {
    let (neumann_error, potential_error) = solve_exterior_direct(
        |x| x[0] * x[0] - x[1] * x[1],
        |x, n| -2.0 * (n[0] * x[0] - n[1] * x[1]),
        quadratic_exterior_solution,
    );
    assert!(neumann_error < 1e-2, "Neumann data error {neumann_error}");
    assert!(potential_error < 1e-2, "maximum relative error {potential_error}");
}

#[test]
fn test_max_entry_propagates_nan() {
    assert!(max_entry([0.5, f64::NAN, 0.1].into_iter()).is_nan());
    assert_eq!(max_entry([0.5, 2.0, 0.1].into_iter()), 2.0);
}

#[test]
fn test_brakhage_werner_exterior_dirichlet() {
    let curve = circle(64, 1.0).unwrap();
    let basis = BasisFunction::Constant;
    let eta = 1.0;
    let assembler_options = BoundaryAssemblerOptions::default();

    let k = double_layer(&curve, basis, basis, &assembler_options)
        .unwrap()
        .assemble_operator::<c64>();
    let v = single_layer(&curve, basis, &assembler_options)
        .unwrap()
        .assemble_operator::<c64>();
    let operator = LinearCombination::brakhage_werner(&k, &v, eta);

    let rhs = integrate_function(&curve, basis, 4, |x, _| c64::new(x[0] - x[1], 0.0)).unwrap();
    let mut density = vec![c64::new(0.0, 0.0); operator.cols()];
    let result = solve_gmres(&operator, &rhs, &mut density, &solver_options());
    assert_eq!(result.status, GmresStatus::Converged);

    let evaluator = PotentialEvaluator::new(&curve, basis, 4).unwrap();
    let points = exterior_points();
    let computed = evaluator.evaluate(
        &points,
        &density,
        c64::new(1.0, 0.0),
        c64::new(0.0, -eta),
    );
    let reference = points
        .iter()
        .map(|x| c64::new(linear_exterior_solution(*x), 0.0))
        .collect::<Vec<_>>();
    let error = max_relative_error(&computed, &reference);
    assert!(error < 1e-2, "maximum relative error {error}");
}
