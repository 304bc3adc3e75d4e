//! Curve storage

pub mod curve;

pub use curve::{Curve2d, Panel};

#[cfg(test)]
mod test {
    extern crate blas_src;
    extern crate lapack_src;
}
