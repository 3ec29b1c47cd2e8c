//! core::network::view
//!
//! Read-only accessors over a network's ties.
//!
//! # Transposition
//!
//! When node `lhs` is compared against node `rhs`, a tie of `lhs` that
//! points at `rhs` describes the dyad between the two compared nodes. A
//! reciprocated dyad already reads the same from both sides: `rhs` holds
//! the mirrored tie pointing at `lhs`. An unreciprocated one does not, so a
//! [`TransposableNetworkView`] re-expresses it through the transposition
//! swapping `lhs` and `rhs`, as a tie of `lhs` into itself.
//!
//! On a symmetric network every dyad is reciprocated and a swapping view
//! reads exactly like the plain view in the same direction.

use super::{Direction, Network, Tie};

/// Ties of each node in a fixed direction.
pub trait NetworkView {
    /// Number of nodes.
    fn node_count(&self) -> usize;

    /// All ties of `node`.
    fn ties(&self, node: usize) -> &[Tie];

    /// Number of ties of `node`.
    fn tie_count(&self, node: usize) -> usize {
        self.ties(node).len()
    }

    /// Target of a tie of `node`.
    fn tie_target(&self, _node: usize, tie: &Tie) -> usize {
        tie.target
    }

    /// Edge id of a tie of `node`.
    fn tie_index(&self, _node: usize, tie: &Tie) -> usize {
        tie.index
    }
}

/// A view that can re-express ties relative to a compared pair.
///
/// All accessors take the ordered pair `(lhs, rhs)` under comparison and
/// the `node` whose ties are read (one of the two).
pub trait TransposableNetworkView: NetworkView {
    /// Target of a tie of `node` while comparing `lhs` against `rhs`.
    fn tie_target_for(&self, lhs: usize, rhs: usize, node: usize, tie: &Tie) -> usize;

    /// Number of ties of `node` while comparing `lhs` against `rhs`.
    fn tie_count_for(&self, _lhs: usize, _rhs: usize, node: usize) -> usize {
        self.tie_count(node)
    }

    /// Edge id of a tie of `node` while comparing `lhs` against `rhs`.
    fn tie_index_for(&self, _lhs: usize, _rhs: usize, node: usize, tie: &Tie) -> usize {
        self.tie_index(node, tie)
    }
}

impl<V: NetworkView + ?Sized> NetworkView for &V {
    fn node_count(&self) -> usize {
        (**self).node_count()
    }

    fn ties(&self, node: usize) -> &[Tie] {
        (**self).ties(node)
    }

    fn tie_target(&self, node: usize, tie: &Tie) -> usize {
        (**self).tie_target(node, tie)
    }

    fn tie_index(&self, node: usize, tie: &Tie) -> usize {
        (**self).tie_index(node, tie)
    }
}

impl<V: TransposableNetworkView + ?Sized> TransposableNetworkView for &V {
    fn tie_target_for(&self, lhs: usize, rhs: usize, node: usize, tie: &Tie) -> usize {
        (**self).tie_target_for(lhs, rhs, node, tie)
    }

    fn tie_count_for(&self, lhs: usize, rhs: usize, node: usize) -> usize {
        (**self).tie_count_for(lhs, rhs, node)
    }

    fn tie_index_for(&self, lhs: usize, rhs: usize, node: usize, tie: &Tie) -> usize {
        (**self).tie_index_for(lhs, rhs, node, tie)
    }
}

/// Plain view over one direction of a network.
#[derive(Debug, Clone, Copy)]
pub struct DirectedView<'n> {
    network: &'n Network,
    direction: Direction,
}

impl<'n> DirectedView<'n> {
    /// Create a view.
    pub fn new(network: &'n Network, direction: Direction) -> Self {
        Self { network, direction }
    }

    /// The direction this view reads.
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl NetworkView for DirectedView<'_> {
    fn node_count(&self) -> usize {
        self.network.node_count()
    }

    fn ties(&self, node: usize) -> &[Tie] {
        self.network.ties(node, self.direction)
    }
}

/// Swap-aware view over one direction of a network.
///
/// A tie of the left node of a comparison that points at the right node,
/// and is not returned by it, reads as a tie into the left node. Every
/// other tie, loops included, keeps its target.
///
/// # Example
///
/// ```
/// use rolework::core::network::{Direction, Network, NetworkView, TransposableNetworkView};
///
/// let net = Network::from_bits(&[[0, 1], [0, 0]], true).unwrap();
/// let view = net.transposable_view(Direction::Outgoing);
/// let tie = view.ties(0)[0];
/// assert_eq!(view.tie_target(0, &tie), 1);
/// // comparing 0 against 1, the unreturned tie to 1 reads as a tie to 0
/// assert_eq!(view.tie_target_for(0, 1, 0, &tie), 0);
///
/// let mutual = Network::from_bits(&[[0, 1], [1, 0]], false).unwrap();
/// let view = mutual.transposable_view(Direction::Both);
/// let tie = view.ties(0)[0];
/// assert_eq!(view.tie_target_for(0, 1, 0, &tie), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SwappingView<'n> {
    inner: DirectedView<'n>,
}

impl<'n> SwappingView<'n> {
    /// Create a view.
    pub fn new(network: &'n Network, direction: Direction) -> Self {
        Self {
            inner: DirectedView::new(network, direction),
        }
    }

    /// The direction this view reads.
    pub fn direction(&self) -> Direction {
        self.inner.direction()
    }
}

impl NetworkView for SwappingView<'_> {
    fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    fn ties(&self, node: usize) -> &[Tie] {
        self.inner.ties(node)
    }
}

impl TransposableNetworkView for SwappingView<'_> {
    fn tie_target_for(&self, lhs: usize, rhs: usize, node: usize, tie: &Tie) -> usize {
        let target = self.tie_target(node, tie);
        let unreturned = node == lhs
            && target == rhs
            && lhs != rhs
            && !self.ties(rhs).iter().any(|t| t.target == lhs);
        if unreturned {
            lhs
        } else {
            target
        }
    }
}
