//! Definition of various test shapes.
use crate::grid::Curve2d;
use crate::types::{BemError, BemResult};
use std::f64::consts::PI;

/// Create a regular polygon approximating a circle.
///
/// The `npanels` vertices lie on the circle of the given radius around the origin, running
/// counter-clockwise from (radius, 0), so the panel normals point outwards.
pub fn circle(npanels: usize, radius: f64) -> BemResult<Curve2d> {
    if npanels < 3 {
        return Err(BemError::InvalidCurve(format!(
            "a circle needs at least 3 panels, {npanels} requested"
        )));
    }
    let vertices = (0..npanels)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / npanels as f64;
            [radius * angle.cos(), radius * angle.sin()]
        })
        .collect::<Vec<_>>();
    polygon(vertices)
}

/// Create a closed polygon through the given points in order.
pub fn polygon(points: Vec<[f64; 2]>) -> BemResult<Curve2d> {
    let n = points.len();
    Curve2d::new(points, (0..n).map(|i| [i, (i + 1) % n]).collect())
}
