//! Iterative solvers
pub mod gmres;

pub use gmres::{solve_gmres, Gmres, GmresOptions, GmresResult, GmresStatus};
