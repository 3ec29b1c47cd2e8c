//! core::lattice::partition
//!
//! Node partitions (equivalences).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Lattice, LatticeKind};

/// A partition of the nodes `0..n` into classes.
///
/// Class labels are normalized so that classes are numbered in order of
/// their first member. Two partitions with the same classes are therefore
/// equal regardless of the labels they were built from.
///
/// # Example
///
/// ```
/// use rolework::core::lattice::{Lattice, Partition};
///
/// let p = Partition::new(&[7, 7, 3, 7]);
/// assert_eq!(p.labels(), &[0, 0, 1, 0]);
/// assert_eq!(p.class_count(), 2);
/// assert!(p.contains(0, 3));
/// assert!(!p.contains(0, 2));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<usize>", into = "Vec<usize>")]
pub struct Partition {
    labels: Vec<usize>,
    classes: usize,
}

impl Partition {
    /// Create a partition from a raw labeling.
    ///
    /// Any `usize` values may be used as labels; only equality matters.
    pub fn new(labels: &[usize]) -> Self {
        let mut renumber = HashMap::new();
        let labels: Vec<usize> = labels
            .iter()
            .map(|label| {
                let next = renumber.len();
                *renumber.entry(*label).or_insert(next)
            })
            .collect();
        Self {
            classes: renumber.len(),
            labels,
        }
    }

    /// The finest partition: every node alone.
    pub fn discrete(n: usize) -> Self {
        Self {
            labels: (0..n).collect(),
            classes: n,
        }
    }

    /// The coarsest partition: one class (none for `n == 0`).
    pub fn indiscrete(n: usize) -> Self {
        Self {
            labels: vec![0; n],
            classes: usize::from(n > 0),
        }
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    /// Number of classes.
    pub fn class_count(&self) -> usize {
        self.classes
    }

    /// Normalized class label of a node.
    pub fn class_of(&self, node: usize) -> usize {
        self.labels[node]
    }

    /// All normalized labels, indexed by node.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Members of each class, classes in label order.
    pub fn classes(&self) -> Vec<Vec<usize>> {
        let mut classes = vec![Vec::new(); self.classes];
        for (node, &label) in self.labels.iter().enumerate() {
            classes[label].push(node);
        }
        classes
    }

    /// Whether every class of `self` lies inside a class of `other`.
    pub fn is_finer_than(&self, other: &Self) -> bool {
        self.is_below(other)
    }

    /// Group nodes with representatives: a node joins the first class whose
    /// representative it is related to, or opens a new class.
    fn group_by_representative(n: usize, mut related: impl FnMut(usize, usize) -> bool) -> Self {
        let mut representatives: Vec<usize> = Vec::new();
        let mut labels = Vec::with_capacity(n);
        for node in 0..n {
            match representatives.iter().position(|&rep| related(rep, node)) {
                Some(class) => labels.push(class),
                None => {
                    labels.push(representatives.len());
                    representatives.push(node);
                }
            }
        }
        Self {
            classes: representatives.len(),
            labels,
        }
    }
}

impl Lattice for Partition {
    const KIND: LatticeKind = LatticeKind::Equivalence;

    fn domain_size(&self) -> usize {
        self.labels.len()
    }

    fn contains(&self, i: usize, j: usize) -> bool {
        self.labels[i] == self.labels[j]
    }

    fn infimum(&self, other: &Self) -> Self {
        assert_eq!(self.size(), other.size(), "partition sizes differ");
        let pairs: Vec<usize> = self
            .labels
            .iter()
            .zip(&other.labels)
            .map(|(&a, &b)| a * other.classes.max(1) + b)
            .collect();
        Self::new(&pairs)
    }

    fn supremum(&self, other: &Self) -> Self {
        assert_eq!(self.size(), other.size(), "partition sizes differ");
        let mut sets = DisjointSets::new(self.size());
        for labels in [&self.labels, &other.labels] {
            let mut first: HashMap<usize, usize> = HashMap::new();
            for (node, label) in labels.iter().enumerate() {
                let rep = *first.entry(*label).or_insert(node);
                sets.union(rep, node);
            }
        }
        let roots: Vec<usize> = (0..self.size()).map(|node| sets.find(node)).collect();
        Self::new(&roots)
    }

    fn bottom(n: usize) -> Self {
        Self::discrete(n)
    }

    fn top(n: usize) -> Self {
        Self::indiscrete(n)
    }

    fn from_pairwise(n: usize, related: impl FnMut(usize, usize) -> bool) -> Self {
        Self::group_by_representative(n, related)
    }

    fn eq_classes(&self) -> Partition {
        self.clone()
    }

    fn is_below(&self, other: &Self) -> bool {
        if self.size() != other.size() {
            return false;
        }
        // Finer iff each own class maps to a single class of `other`.
        let mut image = vec![None; self.classes];
        self.labels
            .iter()
            .zip(&other.labels)
            .all(|(&mine, &theirs)| *image[mine].get_or_insert(theirs) == theirs)
    }
}

impl From<Vec<usize>> for Partition {
    fn from(labels: Vec<usize>) -> Self {
        Self::new(&labels)
    }
}

impl From<Partition> for Vec<usize> {
    fn from(partition: Partition) -> Self {
        partition.labels
    }
}

impl fmt::Debug for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Partition{:?}", self.labels)
    }
}

/// Renders classes as `{0 1 3} {2}`.
impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let classes = self.classes();
        for (index, class) in classes.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            let members: Vec<String> = class.iter().map(|n| n.to_string()).collect();
            write!(f, "{{{}}}", members.join(" "))?;
        }
        Ok(())
    }
}

/// Union-find with path halving.
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[rb.max(ra)] = ra.min(rb);
        }
    }
}
