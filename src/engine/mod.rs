//! engine
//!
//! Role operators: functions from a lattice value to a lattice value,
//! computed by comparing the ties of every node pair of a network.
//!
//! # Architecture
//!
//! ```text
//! Operators<L> -> PresetBuilder<L> -> OperatorBuilder<'a, L> -> RoleOperator<'a, L>
//! ```
//!
//! - [`builder`] - entry points, presets and validation
//! - `refine` - one refinement step (tie matching + lattice assembly)
//! - `fixpoint` - interior/closure iteration
//! - [`compare`] - the comparator protocol
//! - [`distance`] - pairwise dissimilarities instead of relations
//!
//! # Invariants
//!
//! - Operators are immutable and never mutate the network they read
//! - An operator only accepts values on exactly as many nodes as its views
//! - Declared traits are taken on trust; `core::verify` can check them
//!
//! # Example
//!
//! ```
//! use rolework::core::lattice::Partition;
//! use rolework::core::network::{Direction, Network};
//! use rolework::engine::EQUIVALENCE;
//!
//! let net = Network::from_bits(&[[0, 1, 1], [0, 0, 0], [0, 0, 0]], true).unwrap();
//! let regular = EQUIVALENCE
//!     .regular()
//!     .of(net.view(Direction::Outgoing))
//!     .make()
//!     .unwrap();
//!
//! let roles = regular.apply(&Partition::indiscrete(3));
//! assert_eq!(roles, Partition::new(&[0, 1, 1]));
//! ```

mod assignment;
pub mod builder;
pub mod compare;
pub mod distance;
mod fixpoint;
mod matching;
mod refine;

pub use builder::{
    OperatorBuilder, Operators, Preset, PresetBuilder, BINARYRELATION, EQUIVALENCE, RANKING,
};
pub use compare::{Comparison, PartialComparison, Predicate};
pub use matching::Matching;
pub use refine::TargetRule;

pub use crate::core::verify::OperatorTraits;

use std::fmt;
use std::marker::PhantomData;

use thiserror::Error;

use crate::core::lattice::Lattice;

use fixpoint::RoundPolicy;
use refine::Refinement;

/// Errors from building operators.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OperatorError {
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    #[error("views disagree on node count: primary has {primary}, second has {secondary}")]
    ViewSizeMismatch { primary: usize, secondary: usize },
}

/// What [`RoleOperator::apply`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Application {
    /// One refinement step.
    Relative,
    /// Greatest fixpoint below the input.
    Interior,
    /// Least fixpoint above the input.
    Closure,
}

/// A configured role operator over lattice `L`.
///
/// Built by [`OperatorBuilder::make`]. Borrows the network its views read
/// for `'a`.
pub struct RoleOperator<'a, L: Lattice> {
    preset: Preset,
    refinement: Refinement<'a>,
    traits: OperatorTraits,
    application: Application,
    rounds: RoundPolicy,
    _lattice: PhantomData<fn() -> L>,
}

impl<'a, L: Lattice> RoleOperator<'a, L> {
    pub(crate) fn new(
        preset: Preset,
        refinement: Refinement<'a>,
        traits: OperatorTraits,
        application: Application,
        rounds: RoundPolicy,
    ) -> Self {
        Self {
            preset,
            refinement,
            traits,
            application,
            rounds,
            _lattice: PhantomData,
        }
    }

    /// Apply the operator in its configured mode.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not defined on [`node_count`](Self::node_count)
    /// nodes, or if a fixpoint does not stabilize within the round cap.
    pub fn apply(&self, value: &L) -> L {
        match self.application {
            Application::Relative => self.relative(value),
            Application::Interior => self.interior(value),
            Application::Closure => self.closure(value),
        }
    }

    /// One refinement step relative to `value`.
    ///
    /// # Panics
    ///
    /// Panics on a node count mismatch.
    pub fn relative(&self, value: &L) -> L {
        self.check_size(value);
        self.refinement.step(value)
    }

    /// Greatest fixpoint of `x ↦ x ∧ relative(x)` below `value`.
    ///
    /// # Panics
    ///
    /// Panics on a node count mismatch, or if the round cap is exceeded.
    pub fn interior(&self, value: &L) -> L {
        self.check_size(value);
        fixpoint::converge(value, fixpoint::Direction::Down, self.rounds, |v| {
            self.refinement.step(v)
        })
    }

    /// Least fixpoint of `x ↦ x ∨ relative(x)` above `value`.
    ///
    /// # Panics
    ///
    /// Panics on a node count mismatch, or if the round cap is exceeded.
    pub fn closure(&self, value: &L) -> L {
        self.check_size(value);
        fixpoint::converge(value, fixpoint::Direction::Up, self.rounds, |v| {
            self.refinement.step(v)
        })
    }

    fn check_size(&self, value: &L) {
        assert_eq!(
            value.domain_size(),
            self.node_count(),
            "{} operator over {} nodes applied to a value on {} nodes",
            L::KIND,
            self.node_count(),
            value.domain_size()
        );
    }

    /// Number of nodes of the underlying views.
    pub fn node_count(&self) -> usize {
        self.refinement.node_count()
    }

    /// The preset this operator was built from.
    pub fn preset(&self) -> Preset {
        self.preset
    }

    /// What `apply` does.
    pub fn application(&self) -> Application {
        self.application
    }

    /// Declared traits.
    pub fn traits(&self) -> OperatorTraits {
        self.traits
    }

    pub fn is_isotone(&self) -> bool {
        self.traits.isotone
    }

    pub fn is_constant(&self) -> bool {
        self.traits.constant
    }

    pub fn is_nonincreasing(&self) -> bool {
        self.traits.nonincreasing
    }

    pub fn is_nondecreasing(&self) -> bool {
        self.traits.nondecreasing
    }
}

impl<L: Lattice> fmt::Debug for RoleOperator<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoleOperator")
            .field("kind", &L::KIND)
            .field("preset", &self.preset)
            .field("matching", &self.refinement.matching)
            .field("strictness", &self.refinement.strictness)
            .field("comparison", &self.refinement.comparison)
            .field("traits", &self.traits)
            .field("application", &self.application)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = OperatorError::ViewSizeMismatch {
            primary: 3,
            secondary: 4,
        };
        assert_eq!(
            err.to_string(),
            "views disagree on node count: primary has 3, second has 4"
        );
    }
}
