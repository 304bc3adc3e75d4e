//! Laplace Green's function kernels in two dimensions
//!
//! The fundamental solution is `G(x, y) = -log|x - y| / (2 pi)`.
use crate::assembly::common::{diff, dot};
use crate::operator::DenseBlock;
use rayon::prelude::*;
use rlst::RlstScalar;

/// 1 / (2 pi), the factor of the normal derivatives
pub const KERNEL_CONST: f64 = 0.159_154_943_091_895_35;

/// -1 / (4 pi), the factor of `log|x - y|^2`
pub const KERNEL_CONST_LOG: f64 = -0.079_577_471_545_947_67;

/// G(x, y)
pub fn laplace_kernel(x: [f64; 2], y: [f64; 2]) -> f64 {
    let d = diff(x, y);
    KERNEL_CONST_LOG * dot(d, d).ln()
}

/// Derivative of G(x, y) in the direction `nx` at x
pub fn laplace_dnx_kernel(x: [f64; 2], nx: [f64; 2], y: [f64; 2]) -> f64 {
    let d = diff(x, y);
    -KERNEL_CONST * dot(nx, d) / dot(d, d)
}

/// Derivative of G(x, y) in the direction `ny` at y
pub fn laplace_dny_kernel(x: [f64; 2], y: [f64; 2], ny: [f64; 2]) -> f64 {
    let d = diff(x, y);
    KERNEL_CONST * dot(ny, d) / dot(d, d)
}

/// Mixed second derivative of G(x, y) in the directions `nx` at x and `ny` at y
pub fn laplace_dnx_dny_kernel(x: [f64; 2], nx: [f64; 2], y: [f64; 2], ny: [f64; 2]) -> f64 {
    let d = diff(x, y);
    let r2 = dot(d, d);
    KERNEL_CONST * (dot(nx, ny) / r2 - 2.0 * dot(nx, d) * dot(ny, d) / (r2 * r2))
}

fn fill_point_pairs<T: RlstScalar<Real = f64>>(
    rows: usize,
    cols: usize,
    output: &mut DenseBlock<T>,
    kernel: impl Fn(usize, usize) -> f64 + Sync,
) {
    if output.rows() != rows || output.cols() != cols {
        panic!("Matrix has wrong shape");
    }
    if rows == 0 {
        return;
    }
    output
        .data_mut()
        .par_chunks_mut(rows)
        .enumerate()
        .for_each(|(j, column)| {
            for (i, entry) in column.iter_mut().enumerate() {
                *entry = T::from_real(kernel(i, j));
            }
        });
}

/// Fill `output[i, j] = G(targets[i], sources[j])`.
pub fn fill_fundamental<T: RlstScalar<Real = f64>>(
    targets: &[[f64; 2]],
    sources: &[[f64; 2]],
    output: &mut DenseBlock<T>,
) {
    fill_point_pairs(targets.len(), sources.len(), output, |i, j| {
        laplace_kernel(targets[i], sources[j])
    });
}

/// Fill `output[i, j]` with the derivative of `G(targets[i], sources[j])` in the direction
/// `source_normals[j]`.
pub fn fill_dny_fundamental<T: RlstScalar<Real = f64>>(
    targets: &[[f64; 2]],
    sources: &[[f64; 2]],
    source_normals: &[[f64; 2]],
    output: &mut DenseBlock<T>,
) {
    assert_eq!(sources.len(), source_normals.len());
    fill_point_pairs(targets.len(), sources.len(), output, |i, j| {
        laplace_dny_kernel(targets[i], sources[j], source_normals[j])
    });
}

/// Fill `output[i, j]` with the mixed derivative of `G(targets[i], sources[j])` in the
/// directions `target_normals[i]` and `source_normals[j]`.
pub fn fill_dnx_dny_fundamental<T: RlstScalar<Real = f64>>(
    targets: &[[f64; 2]],
    target_normals: &[[f64; 2]],
    sources: &[[f64; 2]],
    source_normals: &[[f64; 2]],
    output: &mut DenseBlock<T>,
) {
    assert_eq!(targets.len(), target_normals.len());
    assert_eq!(sources.len(), source_normals.len());
    fill_point_pairs(targets.len(), sources.len(), output, |i, j| {
        laplace_dnx_dny_kernel(targets[i], target_normals[i], sources[j], source_normals[j])
    });
}
