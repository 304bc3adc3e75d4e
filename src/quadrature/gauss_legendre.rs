//! Gauss-Legendre rules on the unit interval.
use crate::quadrature::types::{NumericalQuadratureDefinition, QuadratureError};
use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::Mutex;

lazy_static! {
    static ref GAUSS_LEGENDRE_RULES: Mutex<HashMap<usize, NumericalQuadratureDefinition>> =
        Mutex::new(HashMap::new());
}

fn compute_rule(npoints: usize) -> NumericalQuadratureDefinition {
    let mut points = Vec::with_capacity(npoints);
    let mut weights = Vec::with_capacity(npoints);
    let n = npoints as f64;
    for i in 0..npoints {
        let mut z = (PI * (i as f64 + 0.75) / (n + 0.5)).cos();
        let mut dp = 1.0;
        for _ in 0..100 {
            // Legendre recurrence for P_n(z) and P_{n-1}(z)
            let mut p1 = 1.0;
            let mut p2 = 0.0;
            for j in 0..npoints {
                let p3 = p2;
                p2 = p1;
                p1 = ((2 * j + 1) as f64 * z * p2 - j as f64 * p3) / (j + 1) as f64;
            }
            dp = n * (z * p1 - p2) / (z * z - 1.0);
            let dz = p1 / dp;
            z -= dz;
            if dz.abs() < 1e-15 {
                break;
            }
        }
        points.push(0.5 * (1.0 - z));
        weights.push(1.0 / ((1.0 - z * z) * dp * dp));
    }
    NumericalQuadratureDefinition {
        order: 2 * npoints - 1,
        npoints,
        weights,
        points,
    }
}

/// Return the Gauss-Legendre rule with `npoints` points on [0, 1].
///
/// The rule integrates polynomials of degree `2 * npoints - 1` exactly. Rules are cached after
/// their first use.
pub fn gauss_legendre_rule(
    npoints: usize,
) -> Result<NumericalQuadratureDefinition, QuadratureError> {
    if npoints == 0 {
        return Err(QuadratureError::InvalidOrder);
    }
    let mut rules = GAUSS_LEGENDRE_RULES
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    Ok(rules
        .entry(npoints)
        .or_insert_with(|| compute_rule(npoints))
        .clone())
}
