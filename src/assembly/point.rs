//! Integrals of basis functions against kernels centred at evaluation points
use crate::assembly::common::{dof_supports, shape_values};
use crate::assembly::kernels::{
    laplace_dnx_dny_kernel, laplace_dnx_kernel, laplace_dny_kernel, laplace_kernel,
};
use crate::grid::Curve2d;
use crate::operator::DenseBlock;
use crate::quadrature::types::NumericalQuadratureDefinition;
use crate::types::{BasisFunction, IndexPermutation};
use rayon::prelude::*;
use rlst::RlstScalar;

/// Kernel between an evaluation point z and a point y on the curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointKernel {
    /// G(z, y)
    Fundamental,
    /// Derivative of G(z, y) in the normal direction at z
    DnzFundamental,
    /// Derivative of G(z, y) in the normal direction of the curve at y
    DnyFundamental,
    /// Mixed derivative of G(z, y) in both normal directions
    DnzDnyFundamental,
}

impl PointKernel {
    /// Whether the kernel needs normals at the evaluation points
    pub fn needs_normals(&self) -> bool {
        matches!(self, Self::DnzFundamental | Self::DnzDnyFundamental)
    }

    fn evaluate(&self, z: [f64; 2], nz: [f64; 2], y: [f64; 2], ny: [f64; 2]) -> f64 {
        match self {
            Self::Fundamental => laplace_kernel(z, y),
            Self::DnzFundamental => laplace_dnx_kernel(z, nz, y),
            Self::DnyFundamental => laplace_dny_kernel(z, y, ny),
            Self::DnzDnyFundamental => laplace_dnx_dny_kernel(z, nz, y, ny),
        }
    }
}

/// Assembler for matrices coupling basis functions with evaluation points.
///
/// Evaluation points must lie away from the curve; no singular quadrature is used.
pub struct PointKernelAssembler<'a> {
    curve: &'a Curve2d,
    basis: BasisFunction,
    rule: &'a NumericalQuadratureDefinition,
    kernel: PointKernel,
}

impl<'a> PointKernelAssembler<'a> {
    /// Create new
    pub fn new(
        curve: &'a Curve2d,
        basis: BasisFunction,
        rule: &'a NumericalQuadratureDefinition,
        kernel: PointKernel,
    ) -> Self {
        Self {
            curve,
            basis,
            rule,
            kernel,
        }
    }

    /// Fill `output[i, j]` with the integral of basis function `dofs.index(i)` times the
    /// kernel centred at `points[j]`.
    ///
    /// `normals` holds the normals at the evaluation points and may be empty for kernels that
    /// do not need them.
    pub fn fill<T: RlstScalar<Real = f64>>(
        &self,
        dofs: IndexPermutation,
        points: &[[f64; 2]],
        normals: &[[f64; 2]],
        output: &mut DenseBlock<T>,
    ) {
        if output.cols() != points.len() {
            panic!("Matrix has wrong shape");
        }
        if self.kernel.needs_normals() && normals.len() != points.len() {
            panic!(
                "{:?} needs one normal per evaluation point, got {} for {} points",
                self.kernel,
                normals.len(),
                points.len()
            );
        }
        dofs.check(output.rows(), self.curve.dof_count(self.basis));
        let ld = output.ld();
        if ld == 0 {
            return;
        }
        let supports = dof_supports(self.curve, self.basis);

        output
            .data_mut()
            .par_chunks_mut(ld)
            .enumerate()
            .for_each(|(j, column)| {
                let z = points[j];
                let nz = normals.get(j).copied().unwrap_or([0.0, 0.0]);
                for (i, entry) in column.iter_mut().enumerate() {
                    let mut sum = 0.0;
                    for (panel, local) in &supports[dofs.index(i)] {
                        let p = self.curve.panel(*panel);
                        let mut panel_sum = 0.0;
                        for (u, w) in self.rule.points.iter().zip(&self.rule.weights) {
                            let y = self.curve.panel_point(*panel, *u);
                            panel_sum += w
                                * shape_values(self.basis, *u)[*local]
                                * self.kernel.evaluate(z, nz, y, p.normal);
                        }
                        sum += panel_sum * p.measure;
                    }
                    *entry = T::from_real(sum);
                }
            });
    }
}
