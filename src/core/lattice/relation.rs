//! core::lattice::relation
//!
//! Unconstrained binary relations over nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{BoolMatrix, Lattice, LatticeError, LatticeKind, Partition, Ranking};

/// Any relation over nodes; the most general lattice value.
///
/// Used where refinement does not preserve transitivity or symmetry, e.g.
/// approximate matching with a strictness threshold.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<bool>>", into = "Vec<Vec<bool>>")]
pub struct BinaryRelation {
    matrix: BoolMatrix,
}

impl BinaryRelation {
    /// Wrap a matrix.
    pub fn from_matrix(matrix: BoolMatrix) -> Self {
        Self { matrix }
    }

    /// Relate nodes sharing a class.
    pub fn from_partition(partition: &Partition) -> Self {
        Self {
            matrix: BoolMatrix::from_fn(partition.size(), |i, j| partition.contains(i, j)),
        }
    }

    /// The relation of a ranking.
    pub fn from_ranking(ranking: &Ranking) -> Self {
        Self {
            matrix: ranking.matrix().clone(),
        }
    }

    /// No pair related.
    pub fn empty(n: usize) -> Self {
        Self {
            matrix: BoolMatrix::new(n),
        }
    }

    /// Every pair related.
    pub fn full(n: usize) -> Self {
        Self {
            matrix: BoolMatrix::full(n),
        }
    }

    /// Only reflexive pairs.
    pub fn identity(n: usize) -> Self {
        Self {
            matrix: BoolMatrix::identity(n),
        }
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.matrix.size()
    }

    /// Whether `i` is related to `j`.
    pub fn related(&self, i: usize, j: usize) -> bool {
        self.matrix.get(i, j)
    }

    /// The converse relation.
    pub fn invert(&self) -> Self {
        Self {
            matrix: self.matrix.transpose(),
        }
    }

    /// Strongly connected components as a partition.
    pub fn strong_components(&self) -> Partition {
        Partition::new(&self.matrix.strong_components())
    }

    /// Whether the relation is a preorder.
    pub fn is_preorder(&self) -> bool {
        self.matrix.first_irreflexive().is_none() && self.matrix.first_intransitive().is_none()
    }

    /// Underlying matrix.
    pub fn matrix(&self) -> &BoolMatrix {
        &self.matrix
    }
}

impl Lattice for BinaryRelation {
    const KIND: LatticeKind = LatticeKind::Relation;

    fn domain_size(&self) -> usize {
        self.matrix.size()
    }

    fn contains(&self, i: usize, j: usize) -> bool {
        self.matrix.get(i, j)
    }

    fn infimum(&self, other: &Self) -> Self {
        Self {
            matrix: self.matrix.and(&other.matrix),
        }
    }

    fn supremum(&self, other: &Self) -> Self {
        Self {
            matrix: self.matrix.or(&other.matrix),
        }
    }

    fn bottom(n: usize) -> Self {
        Self::empty(n)
    }

    fn top(n: usize) -> Self {
        Self::full(n)
    }

    fn from_pairwise(n: usize, related: impl FnMut(usize, usize) -> bool) -> Self {
        Self {
            matrix: BoolMatrix::from_fn(n, related),
        }
    }

    fn eq_classes(&self) -> Partition {
        self.strong_components()
    }

    fn is_below(&self, other: &Self) -> bool {
        self.matrix.is_subset_of(&other.matrix)
    }

    fn to_matrix(&self) -> BoolMatrix {
        self.matrix.clone()
    }
}

impl TryFrom<Vec<Vec<bool>>> for BinaryRelation {
    type Error = LatticeError;

    fn try_from(rows: Vec<Vec<bool>>) -> Result<Self, Self::Error> {
        Ok(Self::from_matrix(BoolMatrix::from_rows(&rows)?))
    }
}

impl From<BinaryRelation> for Vec<Vec<bool>> {
    fn from(relation: BinaryRelation) -> Self {
        relation.matrix.rows()
    }
}

impl fmt::Debug for BinaryRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BinaryRelation({})\n{}", self.size(), self.matrix)
    }
}

impl fmt::Display for BinaryRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.matrix, f)
    }
}
