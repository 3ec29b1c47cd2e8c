//! engine::distance
//!
//! Role distances: instead of deciding whether one node's ties match
//! another's, price how far they are from matching.
//!
//! # Costs
//!
//! For a tie `x` of the left node and `y` of the right node:
//!
//! - `0` if the pair is compatible (target rule and comparator agree)
//! - `subst_cost(x, y)` if the target rule holds but the comparator
//!   rejects the pair
//! - no substitution otherwise
//!
//! An unmatched tie `x` costs `fail_cost(x)`.
//!
//! # Matching
//!
//! - set presets: every tie independently takes its cheapest option
//! - multiset presets: minimum-cost assignment, each tie used once
//! - class-set presets: ties grouped by the class of their target, then a
//!   minimum-cost assignment between groups; a group pairs at the cheapest
//!   cost of any of its ties and is dropped at the cheapest fail cost
//!
//! Equivalence distances also charge the right node's unmatched ties, so
//! they are symmetric. Ranking and relation distances only charge the left
//! side.
//!
//! # Example
//!
//! ```
//! use rolework::core::lattice::Partition;
//! use rolework::core::network::{Direction, Network};
//! use rolework::engine::distance;
//!
//! // 0 -> 1, 0 -> 2, 3 -> 1
//! let net = Network::from_bits(
//!     &[[0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 1, 0, 0]],
//!     true,
//! )
//! .unwrap();
//! let op = distance::EQUIVALENCE
//!     .strong_structural()
//!     .of(net.view(Direction::Outgoing))
//!     .make()
//!     .unwrap();
//!
//! let d = op.apply(&Partition::discrete(4));
//! assert_eq!(d.get(0, 3), 1.0);
//! assert_eq!(d.get(1, 2), 0.0);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::Config;
use crate::core::lattice::{
    BinaryRelation, BoolMatrix, Lattice, LatticeError, LatticeKind, Partition, Ranking,
};
use crate::core::network::{NetworkView, Tie, TransposableNetworkView};

use super::assignment::min_cost_assignment;
use super::builder::{operator_views, single_comparison, Preset};
use super::compare::{Comparison, PartialComparison, Predicate};
use super::matching::{group_by_class, Matching};
use super::refine::{ComparisonView, Directed, Refinement, Transposed};
use super::OperatorError;

/// Distance operators between partition-relative roles.
pub const EQUIVALENCE: DistanceOperators<Partition> = DistanceOperators::new();

/// Distance operators between ranking-relative roles.
pub const RANKING: DistanceOperators<Ranking> = DistanceOperators::new();

/// Distance operators between relation-relative roles.
pub const BINARYRELATION: DistanceOperators<BinaryRelation> = DistanceOperators::new();

type FailCost<'a> = Box<dyn Fn(&Tie) -> f64 + Send + Sync + 'a>;
type SubstCost<'a> = Box<dyn Fn(&Tie, &Tie) -> f64 + Send + Sync + 'a>;

/// Pairwise distances between nodes.
///
/// Serializes as a list of rows; deserializing rejects ragged rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct DistanceMatrix {
    size: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut values = Vec::with_capacity(size * size);
        for i in 0..size {
            for j in 0..size {
                values.push(f(i, j));
            }
        }
        Self { size, values }
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Distance from `i` to `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.size && j < self.size, "({i}, {j}) out of range");
        self.values[i * self.size + j]
    }

    /// The matrix as rows.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.values.chunks(self.size.max(1)).map(<[f64]>::to_vec).collect()
    }

    /// Pairs at distance at most `threshold`.
    pub fn within(&self, threshold: f64) -> BinaryRelation {
        BinaryRelation::from_matrix(BoolMatrix::from_fn(self.size, |i, j| {
            self.get(i, j) <= threshold
        }))
    }
}

impl TryFrom<Vec<Vec<f64>>> for DistanceMatrix {
    type Error = LatticeError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        let size = rows.len();
        let mut values = Vec::with_capacity(size * size);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(LatticeError::NotSquare {
                    row: index,
                    len: row.len(),
                    expected: size,
                });
            }
            values.extend(row);
        }
        Ok(Self { size, values })
    }
}

impl From<DistanceMatrix> for Vec<Vec<f64>> {
    fn from(matrix: DistanceMatrix) -> Self {
        matrix.rows()
    }
}

impl fmt::Display for DistanceMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.values.chunks(self.size.max(1)) {
            let cells: Vec<String> = row.iter().map(|v| format!("{v}")).collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

/// Entry point for distance operators over lattice `L`.
pub struct DistanceOperators<L> {
    _lattice: PhantomData<fn() -> L>,
}

impl<L> DistanceOperators<L> {
    pub const fn new() -> Self {
        Self {
            _lattice: PhantomData,
        }
    }
}

impl<L: Lattice> DistanceOperators<L> {
    pub fn generic(&self) -> DistancePresetBuilder<L> {
        DistancePresetBuilder::new(Preset::Generic)
    }

    pub fn weak(&self) -> DistancePresetBuilder<L> {
        DistancePresetBuilder::new(Preset::Weak)
    }

    pub fn regular(&self) -> DistancePresetBuilder<L> {
        DistancePresetBuilder::new(Preset::Regular)
    }

    pub fn equitable(&self) -> DistancePresetBuilder<L> {
        DistancePresetBuilder::new(Preset::Equitable)
    }

    pub fn weakly_equitable(&self) -> DistancePresetBuilder<L> {
        DistancePresetBuilder::new(Preset::WeaklyEquitable)
    }

    pub fn strong_structural(&self) -> DistancePresetBuilder<L> {
        DistancePresetBuilder::new(Preset::StrongStructural)
    }

    pub fn weak_structural(&self) -> DistancePresetBuilder<L> {
        DistancePresetBuilder::new(Preset::WeakStructural)
    }
}

/// A distance preset waiting for its view.
#[must_use]
pub struct DistancePresetBuilder<L> {
    preset: Preset,
    _lattice: PhantomData<fn() -> L>,
}

impl<L: Lattice> DistancePresetBuilder<L> {
    fn new(preset: Preset) -> Self {
        Self {
            preset,
            _lattice: PhantomData,
        }
    }

    /// Read ties through a plain view.
    pub fn of<'a, V>(self, view: V) -> DistanceBuilder<'a, L>
    where
        V: NetworkView + Send + Sync + 'a,
    {
        DistanceBuilder::new(self.preset, Box::new(Directed(view)))
    }

    /// Read ties through a swap-aware view.
    pub fn of_transposable<'a, V>(self, view: V) -> DistanceBuilder<'a, L>
    where
        V: TransposableNetworkView + Send + Sync + 'a,
    {
        DistanceBuilder::new(self.preset, Box::new(Transposed(view)))
    }
}

/// Optional settings for a distance operator.
#[must_use]
pub struct DistanceBuilder<'a, L> {
    preset: Preset,
    primary: Box<dyn ComparisonView + 'a>,
    secondary: Option<Box<dyn ComparisonView + 'a>>,
    comparisons: Vec<Comparison<'a>>,
    fail: Option<FailCost<'a>>,
    subst: Option<SubstCost<'a>>,
    default_fail: f64,
    default_subst: Option<f64>,
    _lattice: PhantomData<fn() -> L>,
}

impl<'a, L: Lattice> DistanceBuilder<'a, L> {
    fn new(preset: Preset, primary: Box<dyn ComparisonView + 'a>) -> Self {
        Self {
            preset,
            primary,
            secondary: None,
            comparisons: Vec::new(),
            fail: None,
            subst: None,
            default_fail: 1.0,
            default_subst: None,
            _lattice: PhantomData,
        }
    }

    pub fn comp_weak<F>(mut self, cmp: F) -> Self
    where
        F: Fn(&Tie, &Tie) -> Ordering + Send + Sync + 'a,
    {
        self.comparisons.push(Comparison::Weak(Box::new(cmp)));
        self
    }

    pub fn comp_partial<F>(mut self, cmp: F) -> Self
    where
        F: Fn(&Tie, &Tie) -> PartialComparison + Send + Sync + 'a,
    {
        self.comparisons.push(Comparison::Partial(Box::new(cmp)));
        self
    }

    pub fn comp_predicate<F>(mut self, pred: F) -> Self
    where
        F: Fn(&Tie, &Tie) -> bool + Send + Sync + 'a,
    {
        self.comparisons
            .push(Comparison::Predicate(Predicate::Plain(Box::new(pred))));
        self
    }

    pub fn comp_pair_predicate<F>(mut self, pred: F) -> Self
    where
        F: Fn(usize, usize, &Tie, &Tie) -> bool + Send + Sync + 'a,
    {
        self.comparisons
            .push(Comparison::Predicate(Predicate::PairAware(Box::new(pred))));
        self
    }

    /// Cost of leaving a tie unmatched.
    pub fn fail_cost<F>(mut self, cost: F) -> Self
    where
        F: Fn(&Tie) -> f64 + Send + Sync + 'a,
    {
        self.fail = Some(Box::new(cost));
        self
    }

    /// Cost of pairing two ties the comparator rejected.
    pub fn subst_cost<F>(mut self, cost: F) -> Self
    where
        F: Fn(&Tie, &Tie) -> f64 + Send + Sync + 'a,
    {
        self.subst = Some(Box::new(cost));
        self
    }

    /// Merge the ties of a second plain view (weak structural only).
    pub fn paired_with<V>(mut self, view: V) -> Self
    where
        V: NetworkView + Send + Sync + 'a,
    {
        self.secondary = Some(Box::new(Directed(view)));
        self
    }

    /// Merge the ties of a second swap-aware view (weak structural only).
    pub fn paired_with_transposable<V>(mut self, view: V) -> Self
    where
        V: TransposableNetworkView + Send + Sync + 'a,
    {
        self.secondary = Some(Box::new(Transposed(view)));
        self
    }

    /// Take default fail and substitution costs from `config`.
    ///
    /// Cost functions set on the builder still win.
    pub fn config(mut self, config: &Config) -> Self {
        self.default_fail = config.fail_cost();
        self.default_subst = config.subst_cost();
        self
    }

    /// Validate the settings and build the operator.
    ///
    /// # Errors
    ///
    /// Returns `OperatorError::UnsupportedConfiguration` and
    /// `OperatorError::ViewSizeMismatch` for the same configurations the
    /// role operator builder rejects.
    pub fn make(self) -> Result<DistanceOperator<'a, L>, OperatorError> {
        let transposable = self.primary.is_transposable()
            || self.secondary.as_ref().is_some_and(|s| s.is_transposable());
        let comparison = single_comparison(L::KIND, self.comparisons, transposable)?;
        let views = operator_views(self.preset, self.primary, self.secondary)?;

        let default_fail = self.default_fail;
        let fail = self
            .fail
            .unwrap_or_else(|| Box::new(move |_: &Tie| default_fail) as FailCost<'a>);
        let subst = match (self.subst, self.default_subst) {
            (Some(f), _) => Some(f),
            (None, Some(c)) => Some(Box::new(move |_: &Tie, _: &Tie| c) as SubstCost<'a>),
            (None, None) => None,
        };

        let refinement = Refinement {
            kind: L::KIND,
            rule: self.preset.target_rule(),
            matching: self.preset.matching(),
            strictness: 0,
            views,
            comparison,
        };
        debug!(
            kind = %L::KIND,
            preset = %self.preset,
            nodes = refinement.node_count(),
            substitution = subst.is_some(),
            "distance operator built"
        );

        Ok(DistanceOperator {
            preset: self.preset,
            refinement,
            fail,
            subst,
            _lattice: PhantomData,
        })
    }
}

/// A configured distance operator over lattice `L`.
pub struct DistanceOperator<'a, L: Lattice> {
    preset: Preset,
    refinement: Refinement<'a>,
    fail: FailCost<'a>,
    subst: Option<SubstCost<'a>>,
    _lattice: PhantomData<fn() -> L>,
}

impl<L: Lattice> DistanceOperator<'_, L> {
    /// Distances between all node pairs relative to `value`.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not defined on the operator's node count.
    pub fn apply(&self, value: &L) -> DistanceMatrix {
        let n = self.node_count();
        assert_eq!(
            value.domain_size(),
            n,
            "{} distance over {} nodes applied to a value on {} nodes",
            L::KIND,
            n,
            value.domain_size()
        );
        let classes = self.classes(value);
        DistanceMatrix::from_fn(n, |i, j| self.measure(value, classes.as_ref(), i, j))
    }

    /// Distance from `i` to `j` relative to `value`.
    pub fn distance(&self, value: &L, i: usize, j: usize) -> f64 {
        self.measure(value, self.classes(value).as_ref(), i, j)
    }

    /// Number of nodes of the underlying view.
    pub fn node_count(&self) -> usize {
        self.refinement.node_count()
    }

    /// The preset this operator was built from.
    pub fn preset(&self) -> Preset {
        self.preset
    }

    fn classes(&self, value: &L) -> Option<Partition> {
        (self.refinement.matching == Matching::ClassSet).then(|| value.eq_classes())
    }

    fn measure(&self, value: &L, classes: Option<&Partition>, i: usize, j: usize) -> f64 {
        match L::KIND {
            LatticeKind::Equivalence if self.refinement.matching == Matching::Set => {
                self.one_way(value, classes, i, j) + self.one_way(value, classes, j, i)
            }
            _ => self.one_way(value, classes, i, j),
        }
    }

    fn pair_cost(&self, value: &L, lhs: usize, rhs: usize, x: &Tie, y: &Tie) -> Option<f64> {
        if !self.refinement.targets_fit(value, x, y) {
            return None;
        }
        if self.refinement.comparator_accepts(lhs, rhs, x, y) {
            return Some(0.0);
        }
        self.subst.as_ref().map(|s| s(x, y))
    }

    /// Cost of an unmatched right-side item: only equivalences charge it.
    fn right_fail(&self, cost: f64) -> f64 {
        match L::KIND {
            LatticeKind::Equivalence => cost,
            LatticeKind::Ranking | LatticeKind::Relation => 0.0,
        }
    }

    fn one_way(&self, value: &L, classes: Option<&Partition>, lhs: usize, rhs: usize) -> f64 {
        let left = self.refinement.ties_for(lhs, rhs, lhs);
        let right = self.refinement.ties_for(lhs, rhs, rhs);

        match (self.refinement.matching, classes) {
            (Matching::Set, _) => left
                .iter()
                .map(|x| {
                    right
                        .iter()
                        .filter_map(|y| self.pair_cost(value, lhs, rhs, x, y))
                        .fold((self.fail)(x), f64::min)
                })
                .sum(),
            (Matching::ClassSet, Some(classes)) => {
                let class_of = |target: usize| classes.class_of(target);
                let left = group_by_class(&left, &class_of);
                let right = group_by_class(&right, &class_of);
                let cheapest_fail = |group: &[&Tie]| {
                    group
                        .iter()
                        .map(|t| (self.fail)(t))
                        .fold(f64::INFINITY, f64::min)
                };
                edit_cost(
                    left.len(),
                    right.len(),
                    |r, c| {
                        left[r]
                            .iter()
                            .flat_map(|x| right[c].iter().map(move |y| (x, y)))
                            .filter_map(|(x, y)| self.pair_cost(value, lhs, rhs, x, y))
                            .reduce(f64::min)
                    },
                    |r| cheapest_fail(&left[r]),
                    |c| self.right_fail(cheapest_fail(&right[c])),
                )
            }
            (Matching::Multiset | Matching::ClassSet, _) => edit_cost(
                left.len(),
                right.len(),
                |r, c| self.pair_cost(value, lhs, rhs, &left[r], &right[c]),
                |r| (self.fail)(&left[r]),
                |c| self.right_fail((self.fail)(&right[c])),
            ),
        }
    }
}

/// Edit-style assignment between `a` left and `b` right items.
///
/// Rows are left items then right dummies, columns are right items then
/// left dummies. A pair costs at most dropping both of its items.
fn edit_cost(
    a: usize,
    b: usize,
    pair: impl Fn(usize, usize) -> Option<f64>,
    fail_left: impl Fn(usize) -> f64,
    fail_right: impl Fn(usize) -> f64,
) -> f64 {
    if a + b == 0 {
        return 0.0;
    }
    let left: Vec<f64> = (0..a).map(&fail_left).collect();
    let right: Vec<f64> = (0..b).map(&fail_right).collect();

    let size = a + b;
    let mut cost = vec![vec![0.0; size]; size];
    for r in 0..a {
        for c in 0..b {
            let give_up = left[r] + right[c];
            cost[r][c] = pair(r, c).map_or(give_up, |p| p.min(give_up));
        }
        for cell in &mut cost[r][b..] {
            *cell = left[r];
        }
    }
    for (c, &fail) in right.iter().enumerate() {
        for row in &mut cost[a..] {
            row[c] = fail;
        }
    }

    min_cost_assignment(&cost).0
}

impl<L: Lattice> fmt::Debug for DistanceOperator<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistanceOperator")
            .field("kind", &L::KIND)
            .field("preset", &self.preset)
            .field("comparison", &self.refinement.comparison)
            .field("substitution", &self.subst.is_some())
            .finish()
    }
}
