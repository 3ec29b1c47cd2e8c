//! engine::refine
//!
//! One refinement step: compare every ordered node pair by matching their
//! ties and assemble the result as a lattice value.
//!
//! # Compatibility
//!
//! A tie `x` of the left node fits a tie `y` of the right node when the
//! [`TargetRule`] holds for their targets and the configured comparator
//! (if any) accepts the pair.
//!
//! # Output
//!
//! - Partition: `i ~ j` iff each dominates the other
//! - Ranking: `i ≤ j` iff `i` is dominated by `j`, then closed
//! - Relation: the domination relation itself

use std::borrow::Cow;

use crate::core::lattice::{Lattice, LatticeKind, Partition};
use crate::core::network::{NetworkView, Tie, TransposableNetworkView};

use super::compare::Comparison;
use super::matching::{self, Matching};

/// How tie targets must relate for two ties to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetRule {
    /// Targets are not inspected.
    Ignore,
    /// Targets must be the same node.
    Identity,
    /// Targets must be related by the current value.
    Value,
}

/// Object-safe view used inside operators.
///
/// Unifies plain and transposable views: `target_for` is the ternary
/// accessor for transposable views and the plain one otherwise.
pub(crate) trait ComparisonView: Send + Sync {
    fn node_count(&self) -> usize;

    fn ties(&self, node: usize) -> &[Tie];

    fn target_for(&self, lhs: usize, rhs: usize, node: usize, tie: &Tie) -> usize;

    fn is_transposable(&self) -> bool;
}

/// Adapter for a plain [`NetworkView`].
pub(crate) struct Directed<V>(pub V);

/// Adapter for a [`TransposableNetworkView`].
pub(crate) struct Transposed<V>(pub V);

impl<V: NetworkView + Send + Sync> ComparisonView for Directed<V> {
    fn node_count(&self) -> usize {
        self.0.node_count()
    }

    fn ties(&self, node: usize) -> &[Tie] {
        self.0.ties(node)
    }

    fn target_for(&self, _lhs: usize, _rhs: usize, node: usize, tie: &Tie) -> usize {
        self.0.tie_target(node, tie)
    }

    fn is_transposable(&self) -> bool {
        false
    }
}

impl<V: TransposableNetworkView + Send + Sync> ComparisonView for Transposed<V> {
    fn node_count(&self) -> usize {
        self.0.node_count()
    }

    fn ties(&self, node: usize) -> &[Tie] {
        self.0.ties(node)
    }

    fn target_for(&self, lhs: usize, rhs: usize, node: usize, tie: &Tie) -> usize {
        self.0.tie_target_for(lhs, rhs, node, tie)
    }

    fn is_transposable(&self) -> bool {
        true
    }
}

/// Everything one refinement step needs, minus the input value.
pub(crate) struct Refinement<'a> {
    pub(crate) kind: LatticeKind,
    pub(crate) rule: TargetRule,
    pub(crate) matching: Matching,
    pub(crate) strictness: usize,
    pub(crate) views: Vec<Box<dyn ComparisonView + 'a>>,
    pub(crate) comparison: Option<Comparison<'a>>,
}

impl Refinement<'_> {
    /// Number of nodes the views cover.
    pub(crate) fn node_count(&self) -> usize {
        self.views.first().map_or(0, |v| v.node_count())
    }

    /// Ties of `node` while comparing `lhs` against `rhs`, targets
    /// re-expressed for the pair and merged over all views.
    pub(crate) fn ties_for(&self, lhs: usize, rhs: usize, node: usize) -> Cow<'_, [Tie]> {
        if let [view] = self.views.as_slice() {
            if !view.is_transposable() {
                return Cow::Borrowed(view.ties(node));
            }
        }
        Cow::Owned(
            self.views
                .iter()
                .flat_map(|view| {
                    view.ties(node).iter().map(move |tie| Tie {
                        target: view.target_for(lhs, rhs, node, tie),
                        ..*tie
                    })
                })
                .collect(),
        )
    }

    /// Whether the targets of `x` and `y` satisfy the target rule.
    pub(crate) fn targets_fit<L: Lattice>(&self, value: &L, x: &Tie, y: &Tie) -> bool {
        match self.rule {
            TargetRule::Ignore => true,
            TargetRule::Identity => x.target == y.target,
            TargetRule::Value => value.contains(x.target, y.target),
        }
    }

    /// Whether the comparator (if any) accepts `x` against `y`.
    pub(crate) fn comparator_accepts(&self, lhs: usize, rhs: usize, x: &Tie, y: &Tie) -> bool {
        self.comparison
            .as_ref()
            .map_or(true, |c| c.accepts(self.kind, lhs, rhs, x, y))
    }

    /// Whether `lhs` is dominated by `rhs` under `value`.
    fn dominated<L: Lattice>(
        &self,
        value: &L,
        classes: Option<&Partition>,
        lhs: usize,
        rhs: usize,
    ) -> bool {
        let left = self.ties_for(lhs, rhs, lhs);
        let right = self.ties_for(lhs, rhs, rhs);
        let failures = matching::unmatched(
            self.matching,
            &left,
            &right,
            |target| classes.map_or(target, |c| c.class_of(target)),
            |x, y| self.targets_fit(value, x, y) && self.comparator_accepts(lhs, rhs, x, y),
            self.strictness,
        );
        failures <= self.strictness
    }

    /// One refinement step relative to `value`.
    pub(crate) fn step<L: Lattice>(&self, value: &L) -> L {
        let classes = (self.matching == Matching::ClassSet).then(|| value.eq_classes());
        let classes = classes.as_ref();
        L::from_pairwise(self.node_count(), |i, j| match L::KIND {
            LatticeKind::Equivalence => {
                self.dominated(value, classes, i, j) && self.dominated(value, classes, j, i)
            }
            LatticeKind::Ranking | LatticeKind::Relation => self.dominated(value, classes, i, j),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lattice::{BinaryRelation, Ranking};
    use crate::core::network::{Direction, Network};

    fn refinement<'n>(
        net: &'n Network,
        kind: LatticeKind,
        rule: TargetRule,
        matching: Matching,
    ) -> Refinement<'n> {
        Refinement {
            kind,
            rule,
            matching,
            strictness: 0,
            views: vec![Box::new(Directed(net.view(Direction::Outgoing)))],
            comparison: None,
        }
    }

    #[test]
    fn ignore_rule_only_sees_tie_presence() {
        let net = Network::from_bits(&[[0, 1, 0], [0, 0, 0], [1, 1, 0]], true).unwrap();
        let r = refinement(&net, LatticeKind::Equivalence, TargetRule::Ignore, Matching::Set);
        let out: Partition = r.step(&Partition::discrete(3));
        assert_eq!(out, Partition::new(&[0, 1, 0]));
    }

    #[test]
    fn identity_rule_compares_neighborhoods() {
        // 0 -> {1}, 1 -> {}, 2 -> {0, 1}
        let net = Network::from_bits(&[[0, 1, 0], [0, 0, 0], [1, 1, 0]], true).unwrap();
        let r = refinement(&net, LatticeKind::Ranking, TargetRule::Identity, Matching::Set);
        let out: Ranking = r.step(&Ranking::identity(3));
        assert!(out.le(1, 0) && out.le(0, 2) && out.le(1, 2));
        assert!(!out.le(0, 1) && !out.le(2, 0));
    }

    #[test]
    fn value_rule_reads_current_partition() {
        // 0 -> 2, 1 -> 3; 2 and 3 share a class
        let net = Network::from_bits(
            &[[0, 0, 1, 0], [0, 0, 0, 1], [0, 0, 0, 0], [0, 0, 0, 0]],
            true,
        )
        .unwrap();
        let r = refinement(&net, LatticeKind::Equivalence, TargetRule::Value, Matching::Set);
        let out: Partition = r.step(&Partition::new(&[0, 0, 1, 1]));
        assert_eq!(out, Partition::new(&[0, 0, 1, 1]));
        let split: Partition = r.step(&Partition::new(&[0, 0, 1, 2]));
        assert_eq!(split, Partition::new(&[0, 1, 2, 2]));
    }

    #[test]
    fn strictness_tolerates_failures() {
        // 0 -> {1, 2}, 1 -> {}, 2 -> {1}
        let net = Network::from_bits(&[[0, 1, 1], [0, 0, 0], [0, 1, 0]], true).unwrap();
        let mut r = refinement(&net, LatticeKind::Relation, TargetRule::Identity, Matching::Set);
        let strict: BinaryRelation = r.step(&BinaryRelation::full(3));
        assert!(!strict.related(0, 2));
        assert!(!strict.related(2, 1));
        r.strictness = 1;
        let loose: BinaryRelation = r.step(&BinaryRelation::full(3));
        assert!(loose.related(0, 2));
        assert!(loose.related(2, 1));
        // two failures exceed the budget
        assert!(!loose.related(0, 1));
    }

    #[test]
    fn transposed_view_rereads_unreturned_dyad() {
        // 0 -> 1, 1 -> 2; 0 and 2 share a class
        let net = Network::from_bits(&[[0, 1, 0], [0, 0, 1], [0, 0, 0]], true).unwrap();
        let value = BinaryRelation::from_partition(&Partition::new(&[0, 1, 0]));
        let mut r = refinement(&net, LatticeKind::Relation, TargetRule::Value, Matching::Set);
        let plain: BinaryRelation = r.step(&value);
        assert!(!plain.related(0, 1));

        // comparing 0 against 1, the tie 0 -> 1 reads as 0 -> 0, which 1's tie to 2 fits
        r.views = vec![Box::new(Transposed(net.transposable_view(Direction::Outgoing)))];
        let swapped: BinaryRelation = r.step(&value);
        assert!(swapped.related(0, 1));
    }

    #[test]
    fn transposed_view_leaves_reciprocated_dyad() {
        let net = Network::from_bits(&[[0, 1], [1, 0]], false).unwrap();
        let mut r = refinement(&net, LatticeKind::Ranking, TargetRule::Identity, Matching::Set);
        let plain: Ranking = r.step(&Ranking::identity(2));
        assert!(!plain.le(0, 1));
        r.views = vec![Box::new(Transposed(net.transposable_view(Direction::Both)))];
        let swapped: Ranking = r.step(&Ranking::identity(2));
        assert_eq!(swapped, plain);
    }
}
