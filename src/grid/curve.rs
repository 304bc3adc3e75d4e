//! Polygonal curves in the plane
use crate::types::{BasisFunction, BemError, BemResult};
use log::warn;

/// A straight edge of a curve.
#[derive(Debug, Clone)]
pub struct Panel {
    /// Start and end vertex
    pub vertices: [usize; 2],
    /// Length of the edge
    pub measure: f64,
    /// Unit normal, pointing to the right of the direction of travel
    pub normal: [f64; 2],
}

/// A polygonal curve made of straight panels.
///
/// The normal of the panel from `a` to `b` is `(b - a)` rotated clockwise, so a curve whose
/// panels run counter-clockwise has outward normals.
#[derive(Debug, Clone)]
pub struct Curve2d {
    vertices: Vec<[f64; 2]>,
    panels: Vec<Panel>,
    vertex_panels: Vec<Vec<(usize, usize)>>,
}

impl Curve2d {
    /// Create a curve from vertex coordinates and panels given as pairs of vertex indices.
    pub fn new(vertices: Vec<[f64; 2]>, edges: Vec<[usize; 2]>) -> BemResult<Self> {
        let mut vertex_panels: Vec<Vec<(usize, usize)>> = vec![vec![]; vertices.len()];
        let mut panels: Vec<Panel> = Vec::with_capacity(edges.len());
        for (index, edge) in edges.iter().enumerate() {
            if let Some(v) = edge.iter().find(|&&v| v >= vertices.len()) {
                return Err(BemError::InvalidCurve(format!(
                    "panel {index} refers to vertex {v} but the curve has {} vertices",
                    vertices.len()
                )));
            }
            if edge[0] == edge[1] {
                return Err(BemError::InvalidCurve(format!(
                    "panel {index} starts and ends at vertex {}",
                    edge[0]
                )));
            }
            if let Some((other, _)) = vertex_panels[edge[0]]
                .iter()
                .find(|(p, _)| panels[*p].vertices.contains(&edge[1]))
            {
                return Err(BemError::InvalidCurve(format!(
                    "panels {other} and {index} both join vertices {} and {}",
                    edge[0], edge[1]
                )));
            }
            let a = vertices[edge[0]];
            let b = vertices[edge[1]];
            let d = [b[0] - a[0], b[1] - a[1]];
            let measure = d[0].hypot(d[1]);
            if measure == 0.0 {
                return Err(BemError::InvalidCurve(format!("panel {index} has zero length")));
            }
            for (local, v) in edge.iter().enumerate() {
                vertex_panels[*v].push((index, local));
            }
            panels.push(Panel {
                vertices: *edge,
                measure,
                normal: [d[1] / measure, -d[0] / measure],
            });
        }
        if let Some(v) = vertex_panels.iter().position(|p| p.len() != 2) {
            warn!(
                "Vertex {v} is adjacent to {} panels, the curve is not closed",
                vertex_panels[v].len()
            );
        }
        Ok(Self {
            vertices,
            panels,
            vertex_panels,
        })
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of panels
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Coordinates of a vertex
    pub fn vertex(&self, index: usize) -> [f64; 2] {
        self.vertices[index]
    }

    /// All vertices
    pub fn vertices(&self) -> &[[f64; 2]] {
        &self.vertices
    }

    /// A panel
    pub fn panel(&self, index: usize) -> &Panel {
        &self.panels[index]
    }

    /// All panels
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Panels touching a vertex, as (panel index, local vertex index) pairs.
    pub fn incident_panels(&self, vertex: usize) -> &[(usize, usize)] {
        &self.vertex_panels[vertex]
    }

    /// Number of degrees of freedom of a basis on this curve.
    pub fn dof_count(&self, basis: BasisFunction) -> usize {
        match basis {
            BasisFunction::Constant => self.panel_count(),
            BasisFunction::Linear => self.vertex_count(),
        }
    }

    /// The point at local coordinate `u` in [0, 1] along a panel.
    pub fn panel_point(&self, panel: usize, u: f64) -> [f64; 2] {
        let [a, b] = self.panels[panel].vertices.map(|v| self.vertices[v]);
        [a[0] + u * (b[0] - a[0]), a[1] + u * (b[1] - a[1])]
    }

    /// Normalised average of the normals of the panels touching a vertex.
    pub fn vertex_normal(&self, vertex: usize) -> [f64; 2] {
        let mut n = [0.0, 0.0];
        for (panel, _) in &self.vertex_panels[vertex] {
            n[0] += self.panels[*panel].normal[0];
            n[1] += self.panels[*panel].normal[1];
        }
        let norm = n[0].hypot(n[1]);
        [n[0] / norm, n[1] / norm]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::*;

    fn square() -> Curve2d {
        Curve2d::new(
            vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            vec![[0, 1], [1, 2], [2, 3], [3, 0]],
        )
        .unwrap()
    }

    #[test]
    fn test_square_geometry() {
        let curve = square();
        assert_eq!(curve.panel_count(), 4);
        assert_eq!(curve.dof_count(BasisFunction::Linear), 4);
        for panel in curve.panels() {
            assert_relative_eq!(panel.measure, 1.0, epsilon = 1e-14);
        }
        // counter-clockwise, so the bottom edge points down
        assert_relative_eq!(curve.panel(0).normal[0], 0.0, epsilon = 1e-14);
        assert_relative_eq!(curve.panel(0).normal[1], -1.0, epsilon = 1e-14);
        assert_relative_eq!(curve.panel(1).normal[0], 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_incidence() {
        let curve = square();
        assert_eq!(curve.incident_panels(0), &[(0, 0), (3, 1)]);
        assert_eq!(curve.incident_panels(2), &[(1, 1), (2, 0)]);
        let n = curve.vertex_normal(1);
        assert_relative_eq!(n[0], 0.5f64.sqrt(), epsilon = 1e-14);
        assert_relative_eq!(n[1], -(0.5f64.sqrt()), epsilon = 1e-14);
    }

    #[test]
    fn test_panel_point() {
        let curve = square();
        let p = curve.panel_point(2, 0.25);
        assert_relative_eq!(p[0], 0.75, epsilon = 1e-14);
        assert_relative_eq!(p[1], 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_invalid_curves() {
        assert!(Curve2d::new(vec![[0.0, 0.0], [1.0, 0.0]], vec![[0, 2]]).is_err());
        assert!(Curve2d::new(vec![[0.0, 0.0], [1.0, 0.0]], vec![[1, 1]]).is_err());
        assert!(Curve2d::new(vec![[1.0, 0.0], [1.0, 0.0]], vec![[0, 1]]).is_err());
    }

    #[test]
    fn test_panels_sharing_both_vertices() {
        let points = vec![[0.0, 0.0], [1.0, 0.0]];
        for edges in [vec![[0, 1], [1, 0]], vec![[0, 1], [0, 1]]] {
            assert!(matches!(
                Curve2d::new(points.clone(), edges),
                Err(BemError::InvalidCurve(_))
            ));
        }
        assert!(matches!(
            crate::shapes::polygon(points),
            Err(BemError::InvalidCurve(_))
        ));
    }
}
