//! Quadrature
pub mod duffy;
pub mod gauss_legendre;
pub mod selector;
pub mod types;

pub use selector::{PanelPairRule, SingularQuadrature};
pub use types::TopologyCase;
