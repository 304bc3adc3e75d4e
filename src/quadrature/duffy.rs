//! Duffy-type rules for pairs of intervals.
//!
//! All rules live on the unit square of local coordinates (u, v), u on the test panel and
//! v on the trial panel.
use crate::quadrature::types::{
    NumericalQuadratureDefinition, TestTrialNumericalQuadratureDefinition,
};
use itertools::izip;

/// Exponent of the polynomial grading towards the singular point.
const GRADING: i32 = 3;

/// Graded coordinate s = sigma^p together with ds / dsigma.
fn graded(sigma: f64) -> (f64, f64) {
    (
        sigma.powi(GRADING),
        GRADING as f64 * sigma.powi(GRADING - 1),
    )
}

/// Tensor product rule for panels that do not touch.
pub fn disjoint_intervals(
    interval_rule: &NumericalQuadratureDefinition,
) -> TestTrialNumericalQuadratureDefinition {
    let NumericalQuadratureDefinition {
        npoints,
        weights,
        points,
        ..
    } = interval_rule;

    let n_output_points = npoints * npoints;
    let mut test_output_points = Vec::<f64>::with_capacity(n_output_points);
    let mut trial_output_points = Vec::<f64>::with_capacity(n_output_points);
    let mut output_weights = Vec::<f64>::with_capacity(n_output_points);

    for (u, wu) in points.iter().zip(weights) {
        for (v, wv) in points.iter().zip(weights) {
            test_output_points.push(*u);
            trial_output_points.push(*v);
            output_weights.push(wu * wv);
        }
    }

    TestTrialNumericalQuadratureDefinition {
        npoints: n_output_points,
        weights: output_weights,
        test_points: test_output_points,
        trial_points: trial_output_points,
        base: None,
    }
}

/// Rule for panels sharing the vertex u = 0, v = 0.
///
/// The square is split along its diagonal and each half is mapped from a square with the
/// coordinates (s, t) -> (s, s t), so the Jacobian s cancels a 1/r singularity at the origin.
pub fn vertex_adjacent_intervals(
    interval_rule: &NumericalQuadratureDefinition,
) -> TestTrialNumericalQuadratureDefinition {
    let NumericalQuadratureDefinition {
        npoints,
        weights,
        points,
        ..
    } = interval_rule;

    let n_output_points = 2 * npoints * npoints;
    let mut test_output_points = Vec::<f64>::with_capacity(n_output_points);
    let mut trial_output_points = Vec::<f64>::with_capacity(n_output_points);
    let mut output_weights = Vec::<f64>::with_capacity(n_output_points);

    for (sigma, ws) in points.iter().zip(weights) {
        let (s, jacobian) = graded(*sigma);
        for (t, wt) in points.iter().zip(weights) {
            let weight = ws * wt * jacobian * s;

            // First part
            test_output_points.push(s);
            trial_output_points.push(s * t);
            output_weights.push(weight);

            // Second part
            test_output_points.push(s * t);
            trial_output_points.push(s);
            output_weights.push(weight);
        }
    }

    TestTrialNumericalQuadratureDefinition {
        npoints: n_output_points,
        weights: output_weights,
        test_points: test_output_points,
        trial_points: trial_output_points,
        base: None,
    }
}

/// Rule for a panel integrated against itself.
///
/// The triangles u > v and u < v are parametrised by their distance z = |u - v| from the
/// diagonal, graded towards z = 0. The returned base satisfies
/// `2 * base + sum(w * log|u - v|^2) = integral of log|u - v|^2 = -3`.
pub fn identical_intervals(
    interval_rule: &NumericalQuadratureDefinition,
) -> TestTrialNumericalQuadratureDefinition {
    let NumericalQuadratureDefinition {
        npoints,
        weights,
        points,
        ..
    } = interval_rule;

    let n_output_points = 2 * npoints * npoints;
    let mut test_output_points = Vec::<f64>::with_capacity(n_output_points);
    let mut trial_output_points = Vec::<f64>::with_capacity(n_output_points);
    let mut output_weights = Vec::<f64>::with_capacity(n_output_points);

    for (sigma, ws) in points.iter().zip(weights) {
        let (z, jacobian) = graded(*sigma);
        for (t, wt) in points.iter().zip(weights) {
            let v = (1.0 - z) * t;
            let u = v + z;
            let weight = ws * wt * jacobian * (1.0 - z);

            test_output_points.push(u);
            trial_output_points.push(v);
            output_weights.push(weight);

            test_output_points.push(v);
            trial_output_points.push(u);
            output_weights.push(weight);
        }
    }

    let log_sum = izip!(&test_output_points, &trial_output_points, &output_weights)
        .map(|(u, v, w)| w * (u - v).abs().ln())
        .sum::<f64>();

    TestTrialNumericalQuadratureDefinition {
        npoints: n_output_points,
        weights: output_weights,
        test_points: test_output_points,
        trial_points: trial_output_points,
        base: Some(-1.5 - log_sum),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::quadrature::gauss_legendre::gauss_legendre_rule;
    use approx::*;
    use paste::paste;

    fn integrate(
        rule: &TestTrialNumericalQuadratureDefinition,
        f: impl Fn(f64, f64) -> f64,
    ) -> f64 {
        izip!(&rule.test_points, &rule.trial_points, &rule.weights)
            .map(|(u, v, w)| w * f(*u, *v))
            .sum::<f64>()
    }

    macro_rules! test_unit_area {
        ($($rule:ident),+) => {
            $(
                paste! {
                    #[test]
                    fn [<test_ $rule _unit_area>]() {
                        let rule = $rule(&gauss_legendre_rule(5).unwrap());
                        assert_eq!(rule.weights.len(), rule.npoints);
                        assert_relative_eq!(rule.weights.iter().sum::<f64>(), 1.0, max_relative = 1e-12);
                        for (u, v) in rule.test_points.iter().zip(&rule.trial_points) {
                            assert!((0.0..=1.0).contains(u));
                            assert!((0.0..=1.0).contains(v));
                        }
                    }
                }
            )*
        };
    }

    test_unit_area!(disjoint_intervals, vertex_adjacent_intervals, identical_intervals);

    #[test]
    fn test_identical_base_is_exact() {
        let rule = identical_intervals(&gauss_legendre_rule(4).unwrap());
        let base = rule.base.unwrap();
        let integral = 2.0 * base + integrate(&rule, |u, v| ((u - v) * (u - v)).ln());
        assert_relative_eq!(integral, -3.0, max_relative = 1e-13);
    }

    #[test]
    fn test_adjacent_log_singularity() {
        // two unit panels meeting at a right angle
        let rule = vertex_adjacent_intervals(&gauss_legendre_rule(6).unwrap());
        let integral = integrate(&rule, |u, v| (u * u + v * v).ln());
        let exact = 2f64.ln() - 3.0 + std::f64::consts::FRAC_PI_2;
        assert_relative_eq!(integral, exact, max_relative = 1e-5);
    }
}
