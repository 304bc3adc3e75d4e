//! Boundary operator assembly
pub mod boundary;
pub(crate) mod common;
pub mod kernels;
pub mod point;
pub mod projection;

pub use boundary::{BoundaryAssembler, BoundaryAssemblerOptions};

#[cfg(test)]
mod test {
    extern crate blas_src;
    extern crate lapack_src;
}
