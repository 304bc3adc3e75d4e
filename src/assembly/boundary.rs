//! Assembly of boundary operators
mod panel_pair;

use crate::assembly::common::dof_supports;
use crate::assembly::point::{PointKernel, PointKernelAssembler};
use crate::grid::Curve2d;
use crate::operator::{DenseBlock, Operator};
use crate::quadrature::SingularQuadrature;
use crate::types::{
    BasisFunction, BemError, BemResult, IndexPermutation, OperatorKind, StorageOrder,
};
use log::debug;
use panel_pair::{LocalMatrix, PanelPairIntegrator};
use rayon::prelude::*;
use rlst::RlstScalar;
use std::collections::HashMap;

/// Number of output columns sharing one cache of panel pair integrals
const COLUMN_BATCH: usize = 16;

/// Options for a boundary assembler
#[derive(Debug, Clone)]
pub struct BoundaryAssemblerOptions {
    /// Number of Gauss points per direction on each panel
    quadrature_order: usize,
    /// Factor of the mass matrix on the diagonal of the double layer operator
    alpha: f64,
}

impl Default for BoundaryAssemblerOptions {
    fn default() -> Self {
        Self {
            quadrature_order: 4,
            alpha: 0.5,
        }
    }
}

impl BoundaryAssemblerOptions {
    /// Set the number of Gauss points per direction
    pub fn set_quadrature_order(&mut self, order: usize) {
        self.quadrature_order = order;
    }

    /// Set the jump term factor of the double layer operator
    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    /// Number of Gauss points per direction
    pub fn quadrature_order(&self) -> usize {
        self.quadrature_order
    }

    /// Jump term factor of the double layer operator
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

/// Near-field fill routine, chosen when the assembler is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NearfieldFill {
    SingleLayerConstant,
    SingleLayerLinear,
    DoubleLayerConstantConstant,
    DoubleLayerConstantLinear,
    DoubleLayerLinearLinear,
}

impl NearfieldFill {
    fn new(kind: OperatorKind, test: BasisFunction, trial: BasisFunction) -> BemResult<Self> {
        use BasisFunction::{Constant, Linear};
        match (kind, test, trial) {
            (OperatorKind::SingleLayer, Constant, Constant) => Ok(Self::SingleLayerConstant),
            (OperatorKind::SingleLayer, Linear, Linear) => Ok(Self::SingleLayerLinear),
            (OperatorKind::DoubleLayer, Constant, Constant) => {
                Ok(Self::DoubleLayerConstantConstant)
            }
            (OperatorKind::DoubleLayer, Constant, Linear) => Ok(Self::DoubleLayerConstantLinear),
            (OperatorKind::DoubleLayer, Linear, Linear) => Ok(Self::DoubleLayerLinearLinear),
            _ => Err(BemError::UnsupportedBasis {
                operator: kind,
                test,
                trial,
            }),
        }
    }

    fn kind(&self) -> OperatorKind {
        match self {
            Self::SingleLayerConstant | Self::SingleLayerLinear => OperatorKind::SingleLayer,
            _ => OperatorKind::DoubleLayer,
        }
    }

    fn test_basis(&self) -> BasisFunction {
        match self {
            Self::SingleLayerLinear | Self::DoubleLayerLinearLinear => BasisFunction::Linear,
            _ => BasisFunction::Constant,
        }
    }

    fn trial_basis(&self) -> BasisFunction {
        match self {
            Self::SingleLayerConstant | Self::DoubleLayerConstantConstant => {
                BasisFunction::Constant
            }
            _ => BasisFunction::Linear,
        }
    }
}

/// Boundary assembler
///
/// Assembles the Laplace single and double layer operators on a curve. Rows belong to the
/// test basis and columns to the trial basis. For the double layer operator the test basis
/// discretises the Neumann data and the trial basis the Dirichlet data.
pub struct BoundaryAssembler<'a> {
    curve: &'a Curve2d,
    fill: NearfieldFill,
    alpha: f64,
    quadrature: SingularQuadrature,
    test_supports: Vec<Vec<(usize, usize)>>,
    trial_supports: Vec<Vec<(usize, usize)>>,
}

impl<'a> BoundaryAssembler<'a> {
    /// Create new
    ///
    /// Returns [BemError::UnsupportedBasis] for basis combinations without a fill routine.
    pub fn new(
        curve: &'a Curve2d,
        kind: OperatorKind,
        test_basis: BasisFunction,
        trial_basis: BasisFunction,
        options: &BoundaryAssemblerOptions,
    ) -> BemResult<Self> {
        let fill = NearfieldFill::new(kind, test_basis, trial_basis)?;
        let quadrature = SingularQuadrature::new(options.quadrature_order)?;
        Ok(Self {
            curve,
            fill,
            alpha: options.alpha,
            quadrature,
            test_supports: dof_supports(curve, test_basis),
            trial_supports: dof_supports(curve, trial_basis),
        })
    }

    /// The curve
    pub fn curve(&self) -> &Curve2d {
        self.curve
    }

    /// The operator being assembled
    pub fn kind(&self) -> OperatorKind {
        self.fill.kind()
    }

    /// Basis of the rows
    pub fn test_basis(&self) -> BasisFunction {
        self.fill.test_basis()
    }

    /// Basis of the columns
    pub fn trial_basis(&self) -> BasisFunction {
        self.fill.trial_basis()
    }

    /// Number of rows of the full operator
    pub fn test_dofs(&self) -> usize {
        self.test_supports.len()
    }

    /// Number of columns of the full operator
    pub fn trial_dofs(&self) -> usize {
        self.trial_supports.len()
    }

    /// The quadrature rules in use
    pub fn quadrature(&self) -> &SingularQuadrature {
        &self.quadrature
    }

    fn integrator(&self) -> PanelPairIntegrator<'_> {
        PanelPairIntegrator::new(
            self.curve,
            &self.quadrature,
            self.kind(),
            self.test_basis(),
            self.trial_basis(),
            self.alpha,
        )
    }

    /// Entry (test dof, trial dof) of the full operator
    ///
    /// Local matrices of panel pairs are looked up in `cache` and computed on first use.
    fn entry(
        &self,
        integrator: &PanelPairIntegrator,
        cache: &mut HashMap<(usize, usize), LocalMatrix>,
        test_dof: usize,
        trial_dof: usize,
    ) -> f64 {
        let mut sum = 0.0;
        for (test_panel, a) in &self.test_supports[test_dof] {
            for (trial_panel, b) in &self.trial_supports[trial_dof] {
                let local = cache
                    .entry((*test_panel, *trial_panel))
                    .or_insert_with(|| integrator.integrate(*test_panel, *trial_panel));
                sum += local[*a][*b];
            }
        }
        sum
    }

    /// Assemble a block of the operator.
    ///
    /// Local row i of the block is test dof `rows.index(i)` and local column j is trial dof
    /// `cols.index(j)`. With [StorageOrder::Transposed] the entry for (i, j) is written to
    /// `output[j, i]`.
    pub fn assemble_nearfield<T: RlstScalar<Real = f64>>(
        &self,
        rows: IndexPermutation,
        cols: IndexPermutation,
        order: StorageOrder,
        output: &mut DenseBlock<T>,
    ) {
        let (nrows, ncols) = match order {
            StorageOrder::Normal => (output.rows(), output.cols()),
            StorageOrder::Transposed => (output.cols(), output.rows()),
        };
        rows.check(nrows, self.test_dofs());
        cols.check(ncols, self.trial_dofs());
        debug!(
            "Assembling {nrows}x{ncols} block of the {:?} operator ({:?})",
            self.kind(),
            self.fill
        );

        let ld = output.ld();
        if ld == 0 {
            return;
        }
        let integrator = self.integrator();
        output
            .data_mut()
            .par_chunks_mut(ld * COLUMN_BATCH)
            .enumerate()
            .for_each(|(batch, columns)| {
                let mut cache = HashMap::new();
                for (offset, column) in columns.chunks_mut(ld).enumerate() {
                    let c = batch * COLUMN_BATCH + offset;
                    for (r, entry) in column.iter_mut().enumerate() {
                        let (i, j) = match order {
                            StorageOrder::Normal => (r, c),
                            StorageOrder::Transposed => (c, r),
                        };
                        *entry = T::from_real(self.entry(
                            &integrator,
                            &mut cache,
                            rows.index(i),
                            cols.index(j),
                        ));
                    }
                }
            });
    }

    /// Assemble the full operator into a dense matrix.
    pub fn assemble<T: RlstScalar<Real = f64>>(&self) -> DenseBlock<T> {
        let mut output = DenseBlock::new(self.test_dofs(), self.trial_dofs());
        self.assemble_nearfield(
            IndexPermutation::Identity,
            IndexPermutation::Identity,
            StorageOrder::Normal,
            &mut output,
        );
        output
    }

    /// Assemble the full operator as a dense [Operator].
    pub fn assemble_operator<T: RlstScalar<Real = f64>>(&self) -> Operator<T> {
        Operator::Dense(self.assemble())
    }

    /// Fill `output[i, j]` with the integral of test basis function `rows.index(i)` times
    /// `G(points[j], y)`.
    pub fn fill_kernel_row<T: RlstScalar<Real = f64>>(
        &self,
        rows: IndexPermutation,
        points: &[[f64; 2]],
        output: &mut DenseBlock<T>,
    ) {
        PointKernelAssembler::new(
            self.curve,
            self.test_basis(),
            self.quadrature.interval_rule(),
            PointKernel::Fundamental,
        )
        .fill(rows, points, &[], output);
    }

    /// Fill `output[i, j]` with the integral of trial basis function `cols.index(i)` times
    /// the kernel of the operator with its source at the basis function.
    pub fn fill_kernel_col<T: RlstScalar<Real = f64>>(
        &self,
        cols: IndexPermutation,
        points: &[[f64; 2]],
        output: &mut DenseBlock<T>,
    ) {
        let kernel = match self.kind() {
            OperatorKind::SingleLayer => PointKernel::Fundamental,
            OperatorKind::DoubleLayer => PointKernel::DnyFundamental,
        };
        PointKernelAssembler::new(
            self.curve,
            self.trial_basis(),
            self.quadrature.interval_rule(),
            kernel,
        )
        .fill(cols, points, &[], output);
    }

    /// As [Self::fill_kernel_row], differentiated in the direction `normals[j]` at `points[j]`.
    pub fn fill_dnz_kernel_row<T: RlstScalar<Real = f64>>(
        &self,
        rows: IndexPermutation,
        points: &[[f64; 2]],
        normals: &[[f64; 2]],
        output: &mut DenseBlock<T>,
    ) {
        PointKernelAssembler::new(
            self.curve,
            self.test_basis(),
            self.quadrature.interval_rule(),
            PointKernel::DnzFundamental,
        )
        .fill(rows, points, normals, output);
    }

    /// As [Self::fill_kernel_col], differentiated in the direction `normals[j]` at `points[j]`.
    pub fn fill_dnz_kernel_col<T: RlstScalar<Real = f64>>(
        &self,
        cols: IndexPermutation,
        points: &[[f64; 2]],
        normals: &[[f64; 2]],
        output: &mut DenseBlock<T>,
    ) {
        let kernel = match self.kind() {
            OperatorKind::SingleLayer => PointKernel::DnzFundamental,
            OperatorKind::DoubleLayer => PointKernel::DnzDnyFundamental,
        };
        PointKernelAssembler::new(
            self.curve,
            self.trial_basis(),
            self.quadrature.interval_rule(),
            kernel,
        )
        .fill(cols, points, normals, output);
    }
}
