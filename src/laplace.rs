//! Laplace operators

/// Assemblers for Laplace problems.
pub mod assembler {
    use crate::assembly::boundary::{BoundaryAssembler, BoundaryAssemblerOptions};
    use crate::grid::Curve2d;
    use crate::types::{BasisFunction, BemResult, OperatorKind};

    /// Assembler for the Laplace single layer operator.
    pub fn single_layer<'a>(
        curve: &'a Curve2d,
        basis: BasisFunction,
        options: &BoundaryAssemblerOptions,
    ) -> BemResult<BoundaryAssembler<'a>> {
        BoundaryAssembler::new(curve, OperatorKind::SingleLayer, basis, basis, options)
    }

    /// Assembler for the Laplace double layer operator.
    ///
    /// Rows belong to `neumann_basis` and columns to `dirichlet_basis`. The identical panel
    /// contributions are `alpha` times the mass matrix, where `alpha` is set in `options`.
    pub fn double_layer<'a>(
        curve: &'a Curve2d,
        neumann_basis: BasisFunction,
        dirichlet_basis: BasisFunction,
        options: &BoundaryAssemblerOptions,
    ) -> BemResult<BoundaryAssembler<'a>> {
        BoundaryAssembler::new(
            curve,
            OperatorKind::DoubleLayer,
            neumann_basis,
            dirichlet_basis,
            options,
        )
    }
}
