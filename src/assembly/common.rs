//! Common utility functions
use crate::grid::Curve2d;
use crate::types::BasisFunction;

/// Values of the local shape functions at the local coordinate `u`.
///
/// Only the first [shape_count] entries are meaningful.
pub(crate) fn shape_values(basis: BasisFunction, u: f64) -> [f64; 2] {
    match basis {
        BasisFunction::Constant => [1.0, 0.0],
        BasisFunction::Linear => [1.0 - u, u],
    }
}

/// Number of shape functions on one panel
pub(crate) fn shape_count(basis: BasisFunction) -> usize {
    match basis {
        BasisFunction::Constant => 1,
        BasisFunction::Linear => 2,
    }
}

/// Integrals of the local shape functions over [0, 1]
pub(crate) fn shape_integrals(basis: BasisFunction) -> [f64; 2] {
    match basis {
        BasisFunction::Constant => [1.0, 0.0],
        BasisFunction::Linear => [0.5, 0.5],
    }
}

/// Mass matrix of the local shape functions on [0, 1]
pub(crate) fn reference_mass(test: BasisFunction, trial: BasisFunction) -> [[f64; 2]; 2] {
    match (test, trial) {
        (BasisFunction::Constant, BasisFunction::Constant) => [[1.0, 0.0], [0.0, 0.0]],
        (BasisFunction::Constant, BasisFunction::Linear) => [[0.5, 0.5], [0.0, 0.0]],
        (BasisFunction::Linear, BasisFunction::Constant) => [[0.5, 0.0], [0.5, 0.0]],
        (BasisFunction::Linear, BasisFunction::Linear) => {
            [[1.0 / 3.0, 1.0 / 6.0], [1.0 / 6.0, 1.0 / 3.0]]
        }
    }
}

/// Degree of freedom of the local shape function `local` on `panel`
pub(crate) fn local_dof(
    curve: &Curve2d,
    basis: BasisFunction,
    panel: usize,
    local: usize,
) -> usize {
    match basis {
        BasisFunction::Constant => panel,
        BasisFunction::Linear => curve.panel(panel).vertices[local],
    }
}

/// For every degree of freedom, the (panel, local shape function) pairs making up its support.
pub(crate) fn dof_supports(curve: &Curve2d, basis: BasisFunction) -> Vec<Vec<(usize, usize)>> {
    match basis {
        BasisFunction::Constant => (0..curve.panel_count()).map(|p| vec![(p, 0)]).collect(),
        BasisFunction::Linear => (0..curve.vertex_count())
            .map(|v| curve.incident_panels(v).to_vec())
            .collect(),
    }
}

#[inline]
pub(crate) fn dot(a: [f64; 2], b: [f64; 2]) -> f64 {
    a[0] * b[0] + a[1] * b[1]
}

#[inline]
pub(crate) fn diff(a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    [a[0] - b[0], a[1] - b[1]]
}
