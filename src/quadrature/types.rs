//! Type definitions.

/// Quadrature error
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadratureError {
    /// A rule with no points was requested
    #[error("a quadrature rule needs at least one point")]
    InvalidOrder,
}

/// Definition of a numerical quadrature rule on the interval [0, 1].
#[derive(Debug, Clone)]
pub struct NumericalQuadratureDefinition {
    /// The order of the quadrature rule.
    pub order: usize,

    /// The number of points of the quadrature rule.
    pub npoints: usize,

    /// The weights of the quadrature rule.
    pub weights: Vec<f64>,

    /// The points of the quadrature rule.
    pub points: Vec<f64>,
}

/// Definition of a quadrature rule for double integrals over a test and a trial panel.
///
/// The point with index i is (`test_points[i]`, `trial_points[i]`) in the local coordinates
/// of the two panels. When `base` is present, `2 * base` must be added to the weighted sum of
/// `log|u - v|^2`; it carries the part of the logarithmic singularity that is integrated in
/// closed form.
#[derive(Debug, Clone)]
pub struct TestTrialNumericalQuadratureDefinition {
    /// The number of points of the quadrature rule.
    pub npoints: usize,

    /// The weights of the quadrature rule.
    pub weights: Vec<f64>,

    /// Local coordinates on the test panel.
    pub test_points: Vec<f64>,

    /// Local coordinates on the trial panel.
    pub trial_points: Vec<f64>,

    /// Closed-form singular contribution.
    pub base: Option<f64>,
}

/// How a test and a trial panel touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopologyCase {
    /// No shared vertex
    Disjoint,
    /// Exactly one shared vertex
    Adjacent,
    /// The same panel
    Identical,
}
