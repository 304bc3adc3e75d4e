//! Bempp2d
//!
//! Boundary element methods for the Laplace equation on polygonal curves in the plane.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

#[macro_use]
extern crate lazy_static;

pub mod assembly;
pub mod grid;
pub mod laplace;
pub mod operator;
pub mod potential;
pub mod quadrature;
pub mod shapes;
pub mod solvers;
pub mod traits;
pub mod types;
