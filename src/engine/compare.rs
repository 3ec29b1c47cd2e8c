//! engine::compare
//!
//! Comparator protocol for ties.
//!
//! # Strategies
//!
//! - **Weak**: a total preorder on ties (`Ordering`)
//! - **Partial**: a partial order with four outcomes ([`PartialComparison`])
//! - **Predicate**: a boolean equivalence test, plain or aware of the
//!   compared pair
//!
//! A comparator only looks at tie attributes. Whether the tie *targets*
//! fit is decided separately by the operator's target rule; a tie pair is
//! compatible when both agree.

use std::cmp::Ordering;
use std::fmt;

use crate::core::lattice::LatticeKind;
use crate::core::network::Tie;

/// Outcome of a partial comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartialComparison {
    Less,
    Equal,
    Greater,
    Incomparable,
}

impl PartialComparison {
    /// Lift a `partial_cmp` result.
    pub fn from_ordering(ordering: Option<Ordering>) -> Self {
        match ordering {
            Some(Ordering::Less) => PartialComparison::Less,
            Some(Ordering::Equal) => PartialComparison::Equal,
            Some(Ordering::Greater) => PartialComparison::Greater,
            None => PartialComparison::Incomparable,
        }
    }
}

impl From<Ordering> for PartialComparison {
    fn from(ordering: Ordering) -> Self {
        Self::from_ordering(Some(ordering))
    }
}

/// Boxed total comparator.
pub type WeakComparator<'a> = Box<dyn Fn(&Tie, &Tie) -> Ordering + Send + Sync + 'a>;

/// Boxed partial comparator.
pub type PartialComparator<'a> = Box<dyn Fn(&Tie, &Tie) -> PartialComparison + Send + Sync + 'a>;

/// Boolean tie predicates.
pub enum Predicate<'a> {
    /// `pred(x, y)`.
    Plain(Box<dyn Fn(&Tie, &Tie) -> bool + Send + Sync + 'a>),
    /// `pred(lhs, rhs, x, y)`: also told which ordered node pair is compared.
    PairAware(Box<dyn Fn(usize, usize, &Tie, &Tie) -> bool + Send + Sync + 'a>),
}

/// The configured comparator strategy.
pub enum Comparison<'a> {
    Weak(WeakComparator<'a>),
    Partial(PartialComparator<'a>),
    Predicate(Predicate<'a>),
}

impl Comparison<'_> {
    /// Whether tie `x` of `lhs` may be matched with tie `y` of `rhs`.
    ///
    /// For equivalences only equal ties match; for orderings `x` must not
    /// exceed `y`.
    pub fn accepts(&self, kind: LatticeKind, lhs: usize, rhs: usize, x: &Tie, y: &Tie) -> bool {
        match self {
            Comparison::Weak(cmp) if kind.is_ordered() => cmp(x, y) != Ordering::Greater,
            Comparison::Weak(cmp) => cmp(x, y) == Ordering::Equal,
            Comparison::Partial(cmp) => match cmp(x, y) {
                PartialComparison::Equal => true,
                PartialComparison::Less => kind.is_ordered(),
                PartialComparison::Greater | PartialComparison::Incomparable => false,
            },
            Comparison::Predicate(Predicate::Plain(pred)) => pred(x, y),
            Comparison::Predicate(Predicate::PairAware(pred)) => pred(lhs, rhs, x, y),
        }
    }

    /// Whether this is a predicate strategy.
    pub fn is_predicate(&self) -> bool {
        matches!(self, Comparison::Predicate(_))
    }

    /// Whether this is a plain predicate that cannot tell the compared
    /// pair apart.
    pub fn is_plain_predicate(&self) -> bool {
        matches!(self, Comparison::Predicate(Predicate::Plain(_)))
    }
}

impl fmt::Debug for Comparison<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Comparison::Weak(_) => "Comparison::Weak",
            Comparison::Partial(_) => "Comparison::Partial",
            Comparison::Predicate(Predicate::Plain(_)) => "Comparison::Predicate",
            Comparison::Predicate(Predicate::PairAware(_)) => "Comparison::PairAwarePredicate",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tie(index: usize) -> Tie {
        Tie {
            index,
            node: 0,
            target: 0,
        }
    }

    #[test]
    fn weak_comparator_per_kind() {
        let by_index = Comparison::Weak(Box::new(|x: &Tie, y: &Tie| x.index.cmp(&y.index)));
        assert!(by_index.accepts(LatticeKind::Ranking, 0, 1, &tie(1), &tie(2)));
        assert!(!by_index.accepts(LatticeKind::Ranking, 0, 1, &tie(2), &tie(1)));
        assert!(!by_index.accepts(LatticeKind::Equivalence, 0, 1, &tie(1), &tie(2)));
        assert!(by_index.accepts(LatticeKind::Equivalence, 0, 1, &tie(2), &tie(2)));
    }

    #[test]
    fn partial_comparator_per_kind() {
        // even indices are comparable among themselves, odd ones never
        let cmp = Comparison::Partial(Box::new(|x: &Tie, y: &Tie| {
            if x.index % 2 == 1 || y.index % 2 == 1 {
                PartialComparison::Incomparable
            } else {
                PartialComparison::from(x.index.cmp(&y.index))
            }
        }));
        assert!(cmp.accepts(LatticeKind::Relation, 0, 1, &tie(0), &tie(2)));
        assert!(!cmp.accepts(LatticeKind::Relation, 0, 1, &tie(2), &tie(0)));
        assert!(!cmp.accepts(LatticeKind::Relation, 0, 1, &tie(1), &tie(1)));
        assert!(!cmp.accepts(LatticeKind::Equivalence, 0, 1, &tie(0), &tie(2)));
    }

    #[test]
    fn pair_aware_predicate_sees_pair() {
        let pred = Comparison::Predicate(Predicate::PairAware(Box::new(
            |lhs: usize, rhs: usize, _: &Tie, _: &Tie| lhs < rhs,
        )));
        assert!(pred.accepts(LatticeKind::Relation, 0, 1, &tie(0), &tie(0)));
        assert!(!pred.accepts(LatticeKind::Relation, 1, 0, &tie(0), &tie(0)));
        assert!(pred.is_predicate());
        assert!(!pred.is_plain_predicate());
    }

    #[test]
    fn missing_ordering_is_incomparable() {
        assert_eq!(
            PartialComparison::from(Ordering::Less),
            PartialComparison::Less
        );
        assert_eq!(
            PartialComparison::from_ordering(None),
            PartialComparison::Incomparable
        );
    }
}
