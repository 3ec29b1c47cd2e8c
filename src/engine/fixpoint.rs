//! engine::fixpoint
//!
//! Iterate a refinement step until the value stops changing.
//!
//! # Invariants
//!
//! The combined sequence `x, x ∧ f(x), ...` (or `∨` for closures) is
//! monotone in a finite lattice, so it stabilizes within the lattice
//! height. The default cap `n² + 2` is above the height of every lattice
//! used here; hitting it means the step function is broken.

use tracing::{debug, trace};

use crate::core::config::Config;
use crate::core::lattice::Lattice;

/// Round cap and logging for fixpoint iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RoundPolicy {
    pub(crate) max_rounds: Option<usize>,
    pub(crate) log_rounds: bool,
}

impl RoundPolicy {
    pub(crate) fn from_config(config: &Config) -> Self {
        Self {
            max_rounds: config.max_rounds(),
            log_rounds: config.log_rounds(),
        }
    }

    /// Cap for a domain of `n` nodes.
    pub(crate) fn cap(&self, n: usize) -> usize {
        self.max_rounds.unwrap_or(n * n + 2)
    }
}

/// Which way a fixpoint is approached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Combine with the meet: greatest fixpoint below the input.
    Down,
    /// Combine with the join: least fixpoint above the input.
    Up,
}

impl Direction {
    fn label(self) -> &'static str {
        match self {
            Direction::Down => "interior",
            Direction::Up => "closure",
        }
    }
}

/// Iterate `prev ⊙ step(prev)` from `input` until it is stable.
///
/// # Panics
///
/// Panics if the value has not stabilized after the policy's cap.
pub(crate) fn converge<L: Lattice>(
    input: &L,
    direction: Direction,
    policy: RoundPolicy,
    step: impl Fn(&L) -> L,
) -> L {
    let cap = policy.cap(input.domain_size());
    let mut current = input.clone();

    for round in 1..=cap {
        let refined = step(&current);
        let next = match direction {
            Direction::Down => current.infimum(&refined),
            Direction::Up => current.supremum(&refined),
        };
        if next == current {
            debug!(kind = %L::KIND, mode = direction.label(), rounds = round, "fixpoint reached");
            return current;
        }
        if policy.log_rounds {
            debug!(kind = %L::KIND, mode = direction.label(), round, "value changed");
        } else {
            trace!(kind = %L::KIND, mode = direction.label(), round, "value changed");
        }
        current = next;
    }

    panic!(
        "{} of {} on {} nodes did not stabilize within {} rounds",
        direction.label(),
        L::KIND,
        input.domain_size(),
        cap
    );
}
