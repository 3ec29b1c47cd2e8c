//! engine::builder
//!
//! Entry points and staged builders for role operators.
//!
//! # Stages
//!
//! 1. [`Operators<L>`] picks the lattice (`EQUIVALENCE`, `RANKING`,
//!    `BINARYRELATION`) and a [`Preset`]
//! 2. [`PresetBuilder<L>`] only accepts a view (`of` / `of_transposable`),
//!    so an operator without a network cannot be expressed
//! 3. [`OperatorBuilder`] takes the optional settings and validates them in
//!    [`make`](OperatorBuilder::make)
//!
//! # Rejected configurations
//!
//! - more than one comparator
//! - a predicate comparator for rankings (predicates carry no order)
//! - a plain predicate for relations over a transposable view (the
//!   predicate cannot tell which side of the pair a tie belongs to)
//! - a second view for any preset but weak structural
//! - views of different sizes

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use tracing::debug;

use crate::core::config::Config;
use crate::core::lattice::{BinaryRelation, Lattice, LatticeKind, Partition, Ranking};
use crate::core::network::{NetworkView, Tie, TransposableNetworkView};

use super::compare::{Comparison, PartialComparison, Predicate};
use super::fixpoint::RoundPolicy;
use super::matching::Matching;
use super::refine::{ComparisonView, Directed, Refinement, TargetRule, Transposed};
use super::{Application, OperatorError, OperatorTraits, RoleOperator};

/// Role operators producing partitions.
pub const EQUIVALENCE: Operators<Partition> = Operators::new();

/// Role operators producing rankings.
pub const RANKING: Operators<Ranking> = Operators::new();

/// Role operators producing binary relations.
pub const BINARYRELATION: Operators<BinaryRelation> = Operators::new();

/// Named operator families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Value-relative, set matching, fully configurable.
    Generic,
    /// Only the presence of compatible ties counts.
    Weak,
    /// Regular equivalence and its ordered variants.
    Regular,
    /// Equitable: neighbor multiplicities must match.
    Equitable,
    /// Equitable up to multiplicity within a class.
    WeaklyEquitable,
    /// Structural: neighbors must be the same nodes.
    StrongStructural,
    /// Structural over the ties of two views merged.
    WeakStructural,
}

impl Preset {
    /// How tie targets must relate.
    pub fn target_rule(self) -> TargetRule {
        match self {
            Preset::Weak => TargetRule::Ignore,
            Preset::StrongStructural | Preset::WeakStructural => TargetRule::Identity,
            Preset::Generic | Preset::Regular | Preset::Equitable | Preset::WeaklyEquitable => {
                TargetRule::Value
            }
        }
    }

    /// How ties are matched.
    pub fn matching(self) -> Matching {
        match self {
            Preset::Equitable => Matching::Multiset,
            Preset::WeaklyEquitable => Matching::ClassSet,
            _ => Matching::Set,
        }
    }

    /// Traits declared unless overridden.
    pub fn default_traits(self) -> OperatorTraits {
        match self {
            Preset::Generic => OperatorTraits::NONE,
            Preset::Weak | Preset::StrongStructural | Preset::WeakStructural => {
                OperatorTraits::NONE.isotone().constant()
            }
            Preset::Regular | Preset::Equitable | Preset::WeaklyEquitable => {
                OperatorTraits::NONE.isotone().nonincreasing()
            }
        }
    }

    /// What `apply` does given the declared traits.
    pub fn application(self, traits: OperatorTraits) -> Application {
        match self {
            Preset::Generic if traits.nonincreasing => Application::Interior,
            Preset::Generic if traits.nondecreasing => Application::Closure,
            Preset::Generic => Application::Relative,
            Preset::Weak | Preset::StrongStructural | Preset::WeakStructural => {
                Application::Relative
            }
            Preset::Regular | Preset::Equitable | Preset::WeaklyEquitable => {
                if traits.nondecreasing && !traits.nonincreasing {
                    Application::Closure
                } else {
                    Application::Interior
                }
            }
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Preset::Generic => "generic",
            Preset::Weak => "weak",
            Preset::Regular => "regular",
            Preset::Equitable => "equitable",
            Preset::WeaklyEquitable => "weakly equitable",
            Preset::StrongStructural => "strong structural",
            Preset::WeakStructural => "weak structural",
        })
    }
}

/// Entry point for operators over lattice `L`.
pub struct Operators<L> {
    _lattice: PhantomData<fn() -> L>,
}

impl<L> Operators<L> {
    pub const fn new() -> Self {
        Self {
            _lattice: PhantomData,
        }
    }
}

impl<L: Lattice> Operators<L> {
    pub fn generic(&self) -> PresetBuilder<L> {
        PresetBuilder::new(Preset::Generic)
    }

    pub fn weak(&self) -> PresetBuilder<L> {
        PresetBuilder::new(Preset::Weak)
    }

    pub fn regular(&self) -> PresetBuilder<L> {
        PresetBuilder::new(Preset::Regular)
    }

    pub fn equitable(&self) -> PresetBuilder<L> {
        PresetBuilder::new(Preset::Equitable)
    }

    pub fn weakly_equitable(&self) -> PresetBuilder<L> {
        PresetBuilder::new(Preset::WeaklyEquitable)
    }

    pub fn strong_structural(&self) -> PresetBuilder<L> {
        PresetBuilder::new(Preset::StrongStructural)
    }

    pub fn weak_structural(&self) -> PresetBuilder<L> {
        PresetBuilder::new(Preset::WeakStructural)
    }
}

/// A preset waiting for its view.
#[must_use]
pub struct PresetBuilder<L> {
    preset: Preset,
    _lattice: PhantomData<fn() -> L>,
}

impl<L: Lattice> PresetBuilder<L> {
    fn new(preset: Preset) -> Self {
        Self {
            preset,
            _lattice: PhantomData,
        }
    }

    /// Read ties through a plain view.
    pub fn of<'a, V>(self, view: V) -> OperatorBuilder<'a, L>
    where
        V: NetworkView + Send + Sync + 'a,
    {
        OperatorBuilder::new(self.preset, Box::new(Directed(view)))
    }

    /// Read ties through a swap-aware view.
    pub fn of_transposable<'a, V>(self, view: V) -> OperatorBuilder<'a, L>
    where
        V: TransposableNetworkView + Send + Sync + 'a,
    {
        OperatorBuilder::new(self.preset, Box::new(Transposed(view)))
    }
}

/// Optional settings for an operator.
#[must_use]
pub struct OperatorBuilder<'a, L> {
    preset: Preset,
    primary: Box<dyn ComparisonView + 'a>,
    secondary: Option<Box<dyn ComparisonView + 'a>>,
    comparisons: Vec<Comparison<'a>>,
    traits: Option<OperatorTraits>,
    strictness: usize,
    rounds: RoundPolicy,
    _lattice: PhantomData<fn() -> L>,
}

impl<'a, L: Lattice> OperatorBuilder<'a, L> {
    fn new(preset: Preset, primary: Box<dyn ComparisonView + 'a>) -> Self {
        Self {
            preset,
            primary,
            secondary: None,
            comparisons: Vec::new(),
            traits: None,
            strictness: 0,
            rounds: RoundPolicy::default(),
            _lattice: PhantomData,
        }
    }

    /// Compare tie attributes with a total preorder.
    pub fn comp_weak<F>(mut self, cmp: F) -> Self
    where
        F: Fn(&Tie, &Tie) -> Ordering + Send + Sync + 'a,
    {
        self.comparisons.push(Comparison::Weak(Box::new(cmp)));
        self
    }

    /// Compare tie attributes with a partial order.
    pub fn comp_partial<F>(mut self, cmp: F) -> Self
    where
        F: Fn(&Tie, &Tie) -> PartialComparison + Send + Sync + 'a,
    {
        self.comparisons.push(Comparison::Partial(Box::new(cmp)));
        self
    }

    /// Accept tie pairs for which `pred(x, y)` holds.
    pub fn comp_predicate<F>(mut self, pred: F) -> Self
    where
        F: Fn(&Tie, &Tie) -> bool + Send + Sync + 'a,
    {
        self.comparisons
            .push(Comparison::Predicate(Predicate::Plain(Box::new(pred))));
        self
    }

    /// Accept tie pairs for which `pred(lhs, rhs, x, y)` holds, where
    /// `(lhs, rhs)` is the ordered node pair under comparison.
    pub fn comp_pair_predicate<F>(mut self, pred: F) -> Self
    where
        F: Fn(usize, usize, &Tie, &Tie) -> bool + Send + Sync + 'a,
    {
        self.comparisons
            .push(Comparison::Predicate(Predicate::PairAware(Box::new(pred))));
        self
    }

    /// Override the preset's declared traits.
    pub fn traits(mut self, traits: OperatorTraits) -> Self {
        self.traits = Some(traits);
        self
    }

    /// Take the fixpoint round cap and round logging from `config`.
    pub fn config(mut self, config: &Config) -> Self {
        self.rounds = RoundPolicy::from_config(config);
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

    /// Validate the settings and build the operator.
    ///
    /// # Errors
    ///
    /// Returns `OperatorError::UnsupportedConfiguration` for the
    /// combinations listed in the module docs and
    /// `OperatorError::ViewSizeMismatch` when two views differ in size.
    pub fn make(self) -> Result<RoleOperator<'a, L>, OperatorError> {
        let transposable = self.primary.is_transposable()
            || self.secondary.as_ref().is_some_and(|s| s.is_transposable());
        let comparison = single_comparison(L::KIND, self.comparisons, transposable)?;

        let views = operator_views(self.preset, self.primary, self.secondary)?;

        let traits = self.traits.unwrap_or_else(|| self.preset.default_traits());
        let application = self.preset.application(traits);
        let refinement = Refinement {
            kind: L::KIND,
            rule: self.preset.target_rule(),
            matching: self.preset.matching(),
            strictness: self.strictness,
            views,
            comparison,
        };

        debug!(
            kind = %L::KIND,
            preset = %self.preset,
            nodes = refinement.node_count(),
            ?application,
            strictness = self.strictness,
            "role operator built"
        );

        Ok(RoleOperator::new(
            self.preset,
            refinement,
            traits,
            application,
            self.rounds,
        ))
    }
}

/// Collect the views an operator reads, checking the second one.
pub(crate) fn operator_views<'a>(
    preset: Preset,
    primary: Box<dyn ComparisonView + 'a>,
    secondary: Option<Box<dyn ComparisonView + 'a>>,
) -> Result<Vec<Box<dyn ComparisonView + 'a>>, OperatorError> {
    let Some(secondary) = secondary else {
        return Ok(vec![primary]);
    };
    if preset != Preset::WeakStructural {
        return Err(OperatorError::UnsupportedConfiguration(format!(
            "the {preset} preset reads a single view"
        )));
    }
    if secondary.node_count() != primary.node_count() {
        return Err(OperatorError::ViewSizeMismatch {
            primary: primary.node_count(),
            secondary: secondary.node_count(),
        });
    }
    Ok(vec![primary, secondary])
}

/// Check the configured comparators and return the one in effect.
pub(crate) fn single_comparison(
    kind: LatticeKind,
    mut comparisons: Vec<Comparison<'_>>,
    transposable: bool,
) -> Result<Option<Comparison<'_>>, OperatorError> {
    if comparisons.len() > 1 {
        return Err(OperatorError::UnsupportedConfiguration(format!(
            "at most one comparator may be configured, got {}",
            comparisons.len()
        )));
    }
    let comparison = comparisons.pop();

    if let Some(c) = &comparison {
        if c.is_predicate() && kind == LatticeKind::Ranking {
            return Err(OperatorError::UnsupportedConfiguration(
                "a predicate comparator cannot order ties for a ranking".to_string(),
            ));
        }
        if c.is_plain_predicate() && kind == LatticeKind::Relation && transposable {
            return Err(OperatorError::UnsupportedConfiguration(
                "a binary relation over a transposable view needs a pair-aware predicate"
                    .to_string(),
            ));
        }
    }
    Ok(comparison)
}

impl<'a> OperatorBuilder<'a, BinaryRelation> {
    /// Tolerate up to `k` unmatched ties per comparison.
    pub fn strictness(mut self, k: usize) -> Self {
        self.strictness = k;
        self
    }
}
