//! core::verify
//!
//! Checks of lattice invariants and of declared operator properties.
//!
//! # Modes
//!
//! - **Value verify**: a lattice value satisfies the axioms of its kind
//!   (reflexive and transitive for rankings, additionally symmetric for
//!   partitions)
//! - **Operator verify**: declared [`OperatorTraits`] hold on a set of
//!   sample inputs
//!
//! Operator verification is empirical: a passing result only says no
//! counterexample was found among the samples.
//!
//! # Invariants
//!
//! - Never mutates its inputs
//! - Must be deterministic

use thiserror::Error;

use super::lattice::{Lattice, LatticeKind};

/// Errors from verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("value is not reflexive at node {0}")]
    NotReflexive(usize),

    #[error("value is not transitive: {i} -> {j} -> {k} but not {i} -> {k}")]
    NotTransitive { i: usize, j: usize, k: usize },

    #[error("partition is not symmetric at ({0}, {1})")]
    NotSymmetric(usize, usize),

    #[error("operator declared {property} but sample {sample} violates it")]
    TraitViolated {
        property: &'static str,
        sample: usize,
    },

    #[error("operator declared isotone but samples {lower} <= {upper} map out of order")]
    NotIsotone { lower: usize, upper: usize },
}

/// Result of verification.
#[derive(Debug)]
pub struct VerifyResult {
    /// Whether verification passed
    pub ok: bool,
    /// Errors found during verification
    pub errors: Vec<VerifyError>,
}

impl VerifyResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: vec![],
        }
    }

    /// Create a failed result with errors.
    pub fn failure(errors: Vec<VerifyError>) -> Self {
        Self { ok: false, errors }
    }

    fn from_errors(errors: Vec<VerifyError>) -> Self {
        if errors.is_empty() {
            Self::success()
        } else {
            Self::failure(errors)
        }
    }
}

/// Declared algebraic properties of an operator `f` on a lattice.
///
/// These are promises made by whoever configured the operator; nothing
/// computes them. [`verify_operator`] can look for counterexamples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OperatorTraits {
    /// `x ≤ y` implies `f(x) ≤ f(y)`.
    pub isotone: bool,
    /// `f(x)` does not depend on `x`.
    pub constant: bool,
    /// `f(x) ≤ x`.
    pub nonincreasing: bool,
    /// `x ≤ f(x)`.
    pub nondecreasing: bool,
}

impl OperatorTraits {
    /// No declared property.
    pub const NONE: Self = Self {
        isotone: false,
        constant: false,
        nonincreasing: false,
        nondecreasing: false,
    };

    pub const fn isotone(self) -> Self {
        Self {
            isotone: true,
            ..self
        }
    }

    pub const fn constant(self) -> Self {
        Self {
            constant: true,
            ..self
        }
    }

    pub const fn nonincreasing(self) -> Self {
        Self {
            nonincreasing: true,
            ..self
        }
    }

    pub const fn nondecreasing(self) -> Self {
        Self {
            nondecreasing: true,
            ..self
        }
    }
}

/// Verify that a value satisfies the axioms of its lattice kind.
///
/// Relations have no axioms and always pass.
pub fn verify_value<L: Lattice>(value: &L) -> VerifyResult {
    let mut errors = Vec::new();
    if L::KIND == LatticeKind::Relation {
        return VerifyResult::success();
    }

    let matrix = value.to_matrix();
    if let Some(i) = matrix.first_irreflexive() {
        errors.push(VerifyError::NotReflexive(i));
    }
    if let Some((i, j, k)) = matrix.first_intransitive() {
        errors.push(VerifyError::NotTransitive { i, j, k });
    }
    if L::KIND == LatticeKind::Equivalence {
        let n = matrix.size();
        let asymmetric = (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .find(|&(i, j)| matrix.get(i, j) != matrix.get(j, i));
        if let Some((i, j)) = asymmetric {
            errors.push(VerifyError::NotSymmetric(i, j));
        }
    }

    VerifyResult::from_errors(errors)
}

/// Look for counterexamples to `declared` among `samples`.
///
/// Reports the first violation per property.
pub fn verify_operator<L: Lattice>(
    declared: OperatorTraits,
    apply: impl Fn(&L) -> L,
    samples: &[L],
) -> VerifyResult {
    let images: Vec<L> = samples.iter().map(&apply).collect();
    let mut errors = Vec::new();

    if declared.constant {
        if let Some(sample) = images.iter().position(|img| *img != images[0]) {
            errors.push(VerifyError::TraitViolated {
                property: "constant",
                sample,
            });
        }
    }

    if declared.nonincreasing {
        if let Some(sample) = (0..samples.len()).find(|&s| !images[s].is_below(&samples[s])) {
            errors.push(VerifyError::TraitViolated {
                property: "nonincreasing",
                sample,
            });
        }
    }

    if declared.nondecreasing {
        if let Some(sample) = (0..samples.len()).find(|&s| !samples[s].is_below(&images[s])) {
            errors.push(VerifyError::TraitViolated {
                property: "nondecreasing",
                sample,
            });
        }
    }

    if declared.isotone {
        let n = samples.len();
        let violation = (0..n)
            .flat_map(|a| (0..n).map(move |b| (a, b)))
            .find(|&(a, b)| samples[a].is_below(&samples[b]) && !images[a].is_below(&images[b]));
        if let Some((lower, upper)) = violation {
            errors.push(VerifyError::NotIsotone { lower, upper });
        }
    }

    VerifyResult::from_errors(errors)
}
