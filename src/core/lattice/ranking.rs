//! core::lattice::ranking
//!
//! Node preorders ("ranks at or below").

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{BoolMatrix, Lattice, LatticeError, LatticeKind, Partition};

/// A reflexive, transitive relation over nodes.
///
/// `contains(i, j)` reads "i ranks at or below j".
///
/// # Example
///
/// ```
/// use rolework::core::lattice::{BoolMatrix, Lattice, Ranking};
///
/// // 0 <= 1 <= 2, written without the implied cells
/// let chain = BoolMatrix::from_bits(&[[0, 1, 0], [0, 0, 1], [0, 0, 0]]).unwrap();
/// let ranking = Ranking::closure_of(&chain);
/// assert!(ranking.contains(0, 2));
/// assert!(!ranking.contains(2, 0));
///
/// // Validated construction rejects the raw chain
/// assert!(Ranking::try_from_matrix(chain).is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<bool>>", into = "Vec<Vec<bool>>")]
pub struct Ranking {
    matrix: BoolMatrix,
}

impl Ranking {
    /// Create a ranking from a matrix that already is a preorder.
    ///
    /// # Errors
    ///
    /// Returns `LatticeError::NotReflexive` or `LatticeError::NotTransitive`
    /// naming the first violating node(s).
    pub fn try_from_matrix(matrix: BoolMatrix) -> Result<Self, LatticeError> {
        if let Some(node) = matrix.first_irreflexive() {
            return Err(LatticeError::NotReflexive(node));
        }
        if let Some((i, j, k)) = matrix.first_intransitive() {
            return Err(LatticeError::NotTransitive { i, j, k });
        }
        Ok(Self { matrix })
    }

    /// The smallest ranking containing every cell of `matrix`.
    pub fn closure_of(matrix: &BoolMatrix) -> Self {
        Self {
            matrix: matrix.reflexive_transitive_closure(),
        }
    }

    /// The ranking in which nodes are related iff they share a class.
    pub fn from_partition(partition: &Partition) -> Self {
        Self {
            matrix: BoolMatrix::from_fn(partition.size(), |i, j| partition.contains(i, j)),
        }
    }

    /// Only reflexive pairs.
    pub fn identity(n: usize) -> Self {
        Self {
            matrix: BoolMatrix::identity(n),
        }
    }

    /// Every pair related.
    pub fn full(n: usize) -> Self {
        Self {
            matrix: BoolMatrix::full(n),
        }
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.matrix.size()
    }

    /// Whether `i` ranks at or below `j`.
    pub fn le(&self, i: usize, j: usize) -> bool {
        self.matrix.get(i, j)
    }

    /// Whether `i` ranks strictly below `j`.
    pub fn lt(&self, i: usize, j: usize) -> bool {
        self.le(i, j) && !self.le(j, i)
    }

    /// The reversed ranking.
    pub fn invert(&self) -> Self {
        Self {
            matrix: self.matrix.transpose(),
        }
    }

    /// The symmetric core: nodes ranking at or below each other.
    pub fn equivalence(&self) -> Partition {
        Partition::from_pairwise(self.size(), |i, j| self.le(i, j) && self.le(j, i))
    }

    /// Underlying matrix.
    pub fn matrix(&self) -> &BoolMatrix {
        &self.matrix
    }
}

impl Lattice for Ranking {
    const KIND: LatticeKind = LatticeKind::Ranking;

    fn domain_size(&self) -> usize {
        self.matrix.size()
    }

    fn contains(&self, i: usize, j: usize) -> bool {
        self.matrix.get(i, j)
    }

    fn infimum(&self, other: &Self) -> Self {
        // Intersections of preorders are preorders.
        Self {
            matrix: self.matrix.and(&other.matrix),
        }
    }

    fn supremum(&self, other: &Self) -> Self {
        let mut matrix = self.matrix.or(&other.matrix);
        matrix.close_transitively();
        Self { matrix }
    }

    fn bottom(n: usize) -> Self {
        Self::identity(n)
    }

    fn top(n: usize) -> Self {
        Self::full(n)
    }

    fn from_pairwise(n: usize, related: impl FnMut(usize, usize) -> bool) -> Self {
        Self::closure_of(&BoolMatrix::from_fn(n, related))
    }

    fn eq_classes(&self) -> Partition {
        self.equivalence()
    }

    fn is_below(&self, other: &Self) -> bool {
        self.matrix.is_subset_of(&other.matrix)
    }

    fn to_matrix(&self) -> BoolMatrix {
        self.matrix.clone()
    }
}

impl TryFrom<Vec<Vec<bool>>> for Ranking {
    type Error = LatticeError;

    fn try_from(rows: Vec<Vec<bool>>) -> Result<Self, Self::Error> {
        Self::try_from_matrix(BoolMatrix::from_rows(&rows)?)
    }
}

impl From<Ranking> for Vec<Vec<bool>> {
    fn from(ranking: Ranking) -> Self {
        ranking.matrix.rows()
    }
}

impl fmt::Debug for Ranking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ranking({})\n{}", self.size(), self.matrix)
    }
}

impl fmt::Display for Ranking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.matrix, f)
    }
}
