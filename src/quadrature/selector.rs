//! Selection of panel pair quadrature rules.
use crate::quadrature::{
    duffy::{disjoint_intervals, identical_intervals, vertex_adjacent_intervals},
    gauss_legendre::gauss_legendre_rule,
    types::{
        NumericalQuadratureDefinition, QuadratureError, TestTrialNumericalQuadratureDefinition,
        TopologyCase,
    },
};

/// Quadrature rule chosen for a pair of panels.
///
/// `test_order` and `trial_order` give the local vertex numbering under which the rule is
/// valid: local coordinate 0 of the test panel is its vertex `test_order[0]`, and likewise for
/// the trial panel. In the adjacent case the shared vertex comes first on both panels.
#[derive(Debug, Clone, Copy)]
pub struct PanelPairRule<'a> {
    /// How the panels touch
    pub case: TopologyCase,
    /// Local vertex order on the test panel
    pub test_order: [usize; 2],
    /// Local vertex order on the trial panel
    pub trial_order: [usize; 2],
    /// The rule
    pub rule: &'a TestTrialNumericalQuadratureDefinition,
}

/// Singular quadrature rules of one order for all topology cases.
#[derive(Debug, Clone)]
pub struct SingularQuadrature {
    interval: NumericalQuadratureDefinition,
    disjoint: TestTrialNumericalQuadratureDefinition,
    adjacent: TestTrialNumericalQuadratureDefinition,
    identical: TestTrialNumericalQuadratureDefinition,
}

impl SingularQuadrature {
    /// Create rules based on a Gauss-Legendre rule with `order` points.
    pub fn new(order: usize) -> Result<Self, QuadratureError> {
        let interval = gauss_legendre_rule(order)?;
        Ok(Self {
            disjoint: disjoint_intervals(&interval),
            adjacent: vertex_adjacent_intervals(&interval),
            identical: identical_intervals(&interval),
            interval,
        })
    }

    /// The one dimensional rule the pair rules are built from.
    pub fn interval_rule(&self) -> &NumericalQuadratureDefinition {
        &self.interval
    }

    /// Rule for the given topology case.
    pub fn rule(&self, case: TopologyCase) -> &TestTrialNumericalQuadratureDefinition {
        match case {
            TopologyCase::Disjoint => &self.disjoint,
            TopologyCase::Adjacent => &self.adjacent,
            TopologyCase::Identical => &self.identical,
        }
    }

    /// Classify a pair of panels by their vertices and return the matching rule.
    ///
    /// Panics if the panels share both vertices in opposite order or share a vertex more than
    /// once, as neither can happen on a valid curve.
    pub fn select(
        &self,
        test_vertices: [usize; 2],
        trial_vertices: [usize; 2],
    ) -> PanelPairRule<'_> {
        let (case, test_order, trial_order) = classify(test_vertices, trial_vertices);
        PanelPairRule {
            case,
            test_order,
            trial_order,
            rule: self.rule(case),
        }
    }
}

fn classify(test: [usize; 2], trial: [usize; 2]) -> (TopologyCase, [usize; 2], [usize; 2]) {
    if test == trial {
        return (TopologyCase::Identical, [0, 1], [0, 1]);
    }
    let mut shared = vec![];
    for i in 0..2 {
        for j in 0..2 {
            if test[i] == trial[j] {
                shared.push((i, j));
            }
        }
    }
    match shared[..] {
        [] => (TopologyCase::Disjoint, [0, 1], [0, 1]),
        [(i, j)] => (TopologyCase::Adjacent, [i, 1 - i], [j, 1 - j]),
        _ => panic!(
            "Inconsistent panel pair: test panel {test:?} and trial panel {trial:?} share more than one vertex"
        ),
    }
}
