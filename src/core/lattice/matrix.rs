//! core::lattice::matrix
//!
//! Dense square boolean matrix shared by [`Ranking`](super::Ranking) and
//! [`BinaryRelation`](super::BinaryRelation).
//!
//! Cell `(i, j)` set means "i is related to j". The matrix is the only
//! storage format of the ordering lattices; everything else is a view
//! over it.

use std::fmt;

use super::LatticeError;

/// A dense `n × n` boolean matrix in row-major order.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BoolMatrix {
    size: usize,
    cells: Vec<bool>,
}

impl BoolMatrix {
    /// Create an empty matrix (no cell set).
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![false; size * size],
        }
    }

    /// Create the identity matrix.
    pub fn identity(size: usize) -> Self {
        Self::from_fn(size, |i, j| i == j)
    }

    /// Create a matrix with every cell set.
    pub fn full(size: usize) -> Self {
        Self {
            size,
            cells: vec![true; size * size],
        }
    }

    /// Create a matrix by evaluating `f` on every cell.
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for i in 0..size {
            for j in 0..size {
                cells.push(f(i, j));
            }
        }
        Self { size, cells }
    }

    /// Create a matrix from rows.
    ///
    /// # Errors
    ///
    /// Returns `LatticeError::NotSquare` if any row length differs from
    /// the number of rows.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self, LatticeError> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != size {
                return Err(LatticeError::NotSquare {
                    row: index,
                    len: row.len(),
                    expected: size,
                });
            }
            cells.extend_from_slice(row);
        }
        Ok(Self { size, cells })
    }

    /// Create a matrix from `0`/non-zero integer rows.
    ///
    /// Convenient for writing fixtures as literal tables.
    ///
    /// # Errors
    ///
    /// Returns `LatticeError::NotSquare` for ragged input.
    pub fn from_bits<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, LatticeError> {
        let rows: Vec<Vec<bool>> = rows
            .iter()
            .map(|r| r.as_ref().iter().map(|&b| b != 0).collect())
            .collect();
        Self::from_rows(&rows)
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Read cell `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of range.
    pub fn get(&self, i: usize, j: usize) -> bool {
        assert!(i < self.size && j < self.size, "cell ({i}, {j}) out of range");
        self.cells[i * self.size + j]
    }

    /// Write cell `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of range.
    pub fn set(&mut self, i: usize, j: usize, value: bool) {
        assert!(i < self.size && j < self.size, "cell ({i}, {j}) out of range");
        self.cells[i * self.size + j] = value;
    }

    /// Copy the matrix out as rows.
    pub fn rows(&self) -> Vec<Vec<bool>> {
        if self.size == 0 {
            return Vec::new();
        }
        self.cells.chunks(self.size).map(|r| r.to_vec()).collect()
    }

    /// Number of set cells.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Cellwise conjunction.
    ///
    /// # Panics
    ///
    /// Panics if the sizes differ.
    pub fn and(&self, other: &Self) -> Self {
        self.zip(other, |a, b| a && b)
    }

    /// Cellwise disjunction.
    ///
    /// # Panics
    ///
    /// Panics if the sizes differ.
    pub fn or(&self, other: &Self) -> Self {
        self.zip(other, |a, b| a || b)
    }

    fn zip(&self, other: &Self, f: impl Fn(bool, bool) -> bool) -> Self {
        assert_eq!(self.size, other.size, "matrix sizes differ");
        Self {
            size: self.size,
            cells: self
                .cells
                .iter()
                .zip(&other.cells)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }

    /// The transposed matrix.
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.size, |i, j| self.get(j, i))
    }

    /// Check whether every set cell of `self` is also set in `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.size == other.size && self.cells.iter().zip(&other.cells).all(|(&a, &b)| !a || b)
    }

    /// Find a diagonal cell that is not set.
    pub fn first_irreflexive(&self) -> Option<usize> {
        (0..self.size).find(|&i| !self.get(i, i))
    }

    /// Find a triple `(i, j, k)` with `i→j`, `j→k` but not `i→k`.
    pub fn first_intransitive(&self) -> Option<(usize, usize, usize)> {
        for i in 0..self.size {
            for j in 0..self.size {
                if !self.get(i, j) {
                    continue;
                }
                for k in 0..self.size {
                    if self.get(j, k) && !self.get(i, k) {
                        return Some((i, j, k));
                    }
                }
            }
        }
        None
    }

    /// Check whether the matrix is symmetric.
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| (i + 1..self.size).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// Reflexive-transitive closure (Warshall).
    pub fn reflexive_transitive_closure(&self) -> Self {
        let mut closed = self.clone();
        for i in 0..self.size {
            closed.set(i, i, true);
        }
        closed.close_transitively();
        closed
    }

    /// Transitive closure in place (Warshall).
    pub fn close_transitively(&mut self) {
        let n = self.size;
        for k in 0..n {
            for i in 0..n {
                if !self.cells[i * n + k] {
                    continue;
                }
                for j in 0..n {
                    if self.cells[k * n + j] {
                        self.cells[i * n + j] = true;
                    }
                }
            }
        }
    }

    /// Label nodes by strongly connected component.
    ///
    /// Labels are assigned in order of first occurrence by node index, so
    /// the result is directly usable as a normalized partition labeling.
    pub fn strong_components(&self) -> Vec<usize> {
        let reach = self.reflexive_transitive_closure();
        let mut labels = vec![usize::MAX; self.size];
        let mut next = 0;
        for i in 0..self.size {
            if labels[i] != usize::MAX {
                continue;
            }
            for j in i..self.size {
                if labels[j] == usize::MAX && reach.get(i, j) && reach.get(j, i) {
                    labels[j] = next;
                }
            }
            next += 1;
        }
        labels
    }
}

impl fmt::Debug for BoolMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoolMatrix({})", self.size)?;
        if self.size > 0 {
            writeln!(f)?;
            fmt::Display::fmt(self, f)?;
        }
        Ok(())
    }
}

/// Renders one row per line as `0`/`1` characters.
impl fmt::Display for BoolMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.size {
            if i > 0 {
                writeln!(f)?;
            }
            for j in 0..self.size {
                f.write_str(if self.get(i, j) { "1" } else { "0" })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_rows_rejected() {
        let err = BoolMatrix::from_bits(&[vec![1, 0], vec![1]]).unwrap_err();
        assert_eq!(
            err,
            LatticeError::NotSquare {
                row: 1,
                len: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn closure_adds_reflexive_and_transitive_cells() {
        let chain = BoolMatrix::from_bits(&[[0, 1, 0], [0, 0, 1], [0, 0, 0]]).unwrap();
        let closed = chain.reflexive_transitive_closure();
        assert_eq!(
            closed,
            BoolMatrix::from_bits(&[[1, 1, 1], [0, 1, 1], [0, 0, 1]]).unwrap()
        );
        assert!(closed.first_irreflexive().is_none());
        assert!(closed.first_intransitive().is_none());
        assert_eq!(chain.first_intransitive(), Some((0, 1, 2)));
    }

    #[test]
    fn strong_components_follow_cycles() {
        // 0 <-> 1, 1 -> 2, 3 alone
        let m = BoolMatrix::from_bits(&[
            [0, 1, 0, 0],
            [1, 0, 1, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ])
        .unwrap();
        assert_eq!(m.strong_components(), vec![0, 0, 1, 2]);
    }

    #[test]
    fn subset_and_transpose() {
        let a = BoolMatrix::from_bits(&[[1, 1], [0, 1]]).unwrap();
        assert!(BoolMatrix::identity(2).is_subset_of(&a));
        assert!(!a.is_subset_of(&BoolMatrix::identity(2)));
        assert_eq!(a.transpose(), BoolMatrix::from_bits(&[[1, 0], [1, 1]]).unwrap());
        assert!(!a.is_symmetric());
        assert!(a.or(&a.transpose()).is_symmetric());
        assert_eq!(a.and(&a.transpose()), BoolMatrix::identity(2));
    }

    #[test]
    fn display_renders_rows() {
        let a = BoolMatrix::from_bits(&[[1, 1], [0, 1]]).unwrap();
        insta::assert_snapshot!(a.to_string(), @r"
        11
        01
        ");
    }
}
