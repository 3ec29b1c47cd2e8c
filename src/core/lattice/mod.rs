//! core::lattice
//!
//! The three lattice value types role operators work on.
//!
//! # Types
//!
//! - [`Partition`] - Equivalence of nodes (class labels)
//! - [`Ranking`] - Preorder of nodes ("ranks at or below")
//! - [`BinaryRelation`] - Any relation over nodes
//!
//! # Order
//!
//! All three are ordered by inclusion of their pair sets: `a ≤ b` iff every
//! pair related by `a` is related by `b`. For partitions this means `a` is
//! finer than `b`. [`Lattice::infimum`] and [`Lattice::supremum`] are meet
//! and join under that order.
//!
//! # Invariants
//!
//! - Values are immutable once built
//! - A `Partition` labels every node with exactly one class
//! - A `Ranking` is reflexive and transitive

mod matrix;
mod partition;
mod ranking;
mod relation;

pub use matrix::BoolMatrix;
pub use partition::Partition;
pub use ranking::Ranking;
pub use relation::BinaryRelation;

use std::fmt;

use thiserror::Error;

/// Errors from building lattice values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LatticeError {
    #[error("matrix row {row} has length {len}, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("ranking is not reflexive at node {0}")]
    NotReflexive(usize),

    #[error("ranking is not transitive: {i} <= {j} <= {k} but not {i} <= {k}")]
    NotTransitive { i: usize, j: usize, k: usize },
}

/// Which of the three lattices a value type belongs to.
///
/// Refinement algorithms branch on this to decide how a pairwise test is
/// turned into a lattice value and which comparator results count as a
/// match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LatticeKind {
    /// Partitions: symmetric, transitive.
    Equivalence,
    /// Preorders: reflexive, transitive.
    Ranking,
    /// Unconstrained relations.
    Relation,
}

impl LatticeKind {
    /// Whether values of this kind carry ordering information.
    pub fn is_ordered(self) -> bool {
        matches!(self, LatticeKind::Ranking | LatticeKind::Relation)
    }
}

impl fmt::Display for LatticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LatticeKind::Equivalence => "equivalence",
            LatticeKind::Ranking => "ranking",
            LatticeKind::Relation => "binary relation",
        })
    }
}

/// Capability shared by the lattice value types.
///
/// Algorithms are written once against this trait and instantiated per
/// value type.
pub trait Lattice: Clone + PartialEq + fmt::Debug + Send + Sync {
    /// The lattice this type belongs to.
    const KIND: LatticeKind;

    /// Number of nodes the value is defined on.
    fn domain_size(&self) -> usize;

    /// Whether `i` is related to `j`.
    ///
    /// Same class for partitions, "i at or below j" for rankings.
    fn contains(&self, i: usize, j: usize) -> bool;

    /// Meet: the greatest value below both.
    ///
    /// # Panics
    ///
    /// Panics if the domain sizes differ.
    fn infimum(&self, other: &Self) -> Self;

    /// Join: the least value above both.
    ///
    /// # Panics
    ///
    /// Panics if the domain sizes differ.
    fn supremum(&self, other: &Self) -> Self;

    /// The least element on `n` nodes.
    fn bottom(n: usize) -> Self;

    /// The greatest element on `n` nodes.
    fn top(n: usize) -> Self;

    /// Build a value from a pairwise test.
    ///
    /// The test is interpreted per kind: for partitions it must be an
    /// equivalence and is queried against class representatives only; for
    /// rankings the result is closed reflexively and transitively; for
    /// relations it is taken as is.
    fn from_pairwise(n: usize, related: impl FnMut(usize, usize) -> bool) -> Self;

    /// Equivalence classes induced by the value.
    ///
    /// The partition itself, the symmetric core of a ranking, or the
    /// strongly connected components of a relation.
    fn eq_classes(&self) -> Partition;

    /// Lattice order: every pair related by `self` is related by `other`.
    fn is_below(&self, other: &Self) -> bool {
        let n = self.domain_size();
        n == other.domain_size()
            && (0..n).all(|i| (0..n).all(|j| !self.contains(i, j) || other.contains(i, j)))
    }

    /// The value as a relation matrix.
    fn to_matrix(&self) -> BoolMatrix {
        BoolMatrix::from_fn(self.domain_size(), |i, j| self.contains(i, j))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_bounds<L: Lattice>(value: &L) {
        let n = value.domain_size();
        assert!(L::bottom(n).is_below(value));
        assert!(value.is_below(&L::top(n)));
        assert_eq!(value.infimum(&L::top(n)), *value);
        assert_eq!(value.supremum(&L::bottom(n)), *value);
    }

    #[test]
    fn bounds_hold_for_every_kind() {
        let p = Partition::new(&[0, 1, 0, 2]);
        check_bounds(&p);
        check_bounds(&Ranking::from_partition(&p));
        check_bounds(&BinaryRelation::from_partition(&p));
    }

    #[test]
    fn only_orderings_are_ordered() {
        assert!(!LatticeKind::Equivalence.is_ordered());
        assert!(LatticeKind::Ranking.is_ordered());
        assert!(LatticeKind::Relation.is_ordered());
        assert_eq!(LatticeKind::Relation.to_string(), "binary relation");
    }

    #[test]
    fn to_matrix_matches_contains() {
        let p = Partition::new(&[0, 1, 0]);
        assert_eq!(
            p.to_matrix(),
            BoolMatrix::from_bits(&[[1, 0, 1], [0, 1, 0], [1, 0, 1]]).unwrap()
        );
    }
}
