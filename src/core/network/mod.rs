//! core::network
//!
//! Minimal in-memory network store and the views role operators read.
//!
//! # Architecture
//!
//! A [`Network`] owns nodes `0..n` and weighted edges. Per node it keeps
//! the incident ties for each [`Direction`], so views can hand out slices
//! without allocating.
//!
//! - [`NetworkView`] - ties of a node in one direction
//! - [`TransposableNetworkView`] - additionally re-expresses ties for an
//!   ordered pair of nodes being compared
//!
//! # Invariants
//!
//! - A network is never mutated through a view
//! - Every tie of node `v` has `tie.node == v`
//! - Undirected networks report the same ties for every direction

mod view;

pub use view::{DirectedView, NetworkView, SwappingView, TransposableNetworkView};

use thiserror::Error;

/// Errors from building networks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetworkError {
    #[error("node {node} out of range for network with {size} nodes")]
    NodeOutOfRange { node: usize, size: usize },

    #[error("adjacency row {row} has length {len}, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("adjacency of an undirected network must be symmetric: ({0}, {1}) differs")]
    Asymmetric(usize, usize),
}

/// Which incident ties of a node a view reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Ties leaving the node; targets are successors.
    Outgoing,
    /// Ties entering the node; targets are predecessors.
    Incoming,
    /// Both, outgoing first.
    Both,
}

/// One incident tie as seen from a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tie {
    /// Edge id in the network.
    pub index: usize,
    /// The node whose tie this is.
    pub node: usize,
    /// The other end of the edge, as seen from `node`.
    pub target: usize,
}

/// A network with weighted edges.
///
/// # Example
///
/// ```
/// use rolework::core::network::{Direction, Network, NetworkView};
///
/// let mut net = Network::directed(3);
/// net.add_edge(0, 1).unwrap();
/// let e = net.add_weighted_edge(2, 1, 2.5).unwrap();
///
/// let incoming = net.view(Direction::Incoming);
/// assert_eq!(incoming.tie_count(1), 2);
/// assert_eq!(net.weight(e), 2.5);
/// ```
#[derive(Debug, Clone)]
pub struct Network {
    directed: bool,
    edges: Vec<(usize, usize)>,
    weights: Vec<f64>,
    outgoing: Vec<Vec<Tie>>,
    incoming: Vec<Vec<Tie>>,
    both: Vec<Vec<Tie>>,
}

impl Network {
    /// Create a directed network without edges.
    pub fn directed(nodes: usize) -> Self {
        Self::with_nodes(nodes, true)
    }

    /// Create an undirected network without edges.
    pub fn undirected(nodes: usize) -> Self {
        Self::with_nodes(nodes, false)
    }

    fn with_nodes(nodes: usize, directed: bool) -> Self {
        Self {
            directed,
            edges: Vec::new(),
            weights: Vec::new(),
            outgoing: vec![Vec::new(); nodes],
            incoming: vec![Vec::new(); nodes],
            both: vec![Vec::new(); nodes],
        }
    }

    /// Build a network from an adjacency matrix.
    ///
    /// Every non-zero entry becomes one edge carrying the entry as weight.
    /// For undirected networks the matrix must be symmetric and only the
    /// upper triangle (diagonal included) is read.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::NotSquare` for ragged input and
    /// `NetworkError::Asymmetric` for an asymmetric undirected matrix.
    pub fn from_adjacency<R: AsRef<[f64]>>(rows: &[R], directed: bool) -> Result<Self, NetworkError> {
        let n = rows.len();
        for (row, r) in rows.iter().enumerate() {
            if r.as_ref().len() != n {
                return Err(NetworkError::NotSquare {
                    row,
                    len: r.as_ref().len(),
                    expected: n,
                });
            }
        }

        let mut network = Self::with_nodes(n, directed);
        for i in 0..n {
            for j in 0..n {
                let value = rows[i].as_ref()[j];
                if !directed {
                    if value != rows[j].as_ref()[i] {
                        return Err(NetworkError::Asymmetric(i, j));
                    }
                    if j < i {
                        continue;
                    }
                }
                if value != 0.0 {
                    network.add_weighted_edge(i, j, value)?;
                }
            }
        }
        Ok(network)
    }

    /// Build an unweighted network from `0`/`1` rows.
    ///
    /// # Errors
    ///
    /// See [`Network::from_adjacency`].
    pub fn from_bits<R: AsRef<[u8]>>(rows: &[R], directed: bool) -> Result<Self, NetworkError> {
        let rows: Vec<Vec<f64>> = rows
            .iter()
            .map(|r| r.as_ref().iter().map(|&b| f64::from(b)).collect())
            .collect();
        Self::from_adjacency(&rows, directed)
    }

    /// Add an edge of weight 1 and return its id.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::NodeOutOfRange` for an unknown endpoint.
    pub fn add_edge(&mut self, source: usize, target: usize) -> Result<usize, NetworkError> {
        self.add_weighted_edge(source, target, 1.0)
    }

    /// Add a weighted edge and return its id.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::NodeOutOfRange` for an unknown endpoint.
    pub fn add_weighted_edge(
        &mut self,
        source: usize,
        target: usize,
        weight: f64,
    ) -> Result<usize, NetworkError> {
        let size = self.node_count();
        for node in [source, target] {
            if node >= size {
                return Err(NetworkError::NodeOutOfRange { node, size });
            }
        }

        let index = self.edges.len();
        self.edges.push((source, target));
        self.weights.push(weight);

        let forward = Tie {
            index,
            node: source,
            target,
        };
        let backward = Tie {
            index,
            node: target,
            target: source,
        };

        if self.directed {
            self.outgoing[source].push(forward);
            self.incoming[target].push(backward);
            self.both[source].push(forward);
            self.both[target].push(backward);
        } else {
            self.outgoing[source].push(forward);
            if source != target {
                self.outgoing[target].push(backward);
            }
        }
        Ok(index)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.outgoing.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether edges are directed.
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Endpoints `(source, target)` of an edge.
    pub fn endpoints(&self, edge: usize) -> (usize, usize) {
        self.edges[edge]
    }

    /// Weight of an edge.
    pub fn weight(&self, edge: usize) -> f64 {
        self.weights[edge]
    }

    /// Ties of a node in a direction.
    pub fn ties(&self, node: usize, direction: Direction) -> &[Tie] {
        if !self.directed {
            return &self.outgoing[node];
        }
        match direction {
            Direction::Outgoing => &self.outgoing[node],
            Direction::Incoming => &self.incoming[node],
            Direction::Both => &self.both[node],
        }
    }

    /// Whether every edge is reciprocated (always true when undirected).
    pub fn is_symmetric(&self) -> bool {
        if !self.directed {
            return true;
        }
        self.outgoing.iter().enumerate().all(|(node, ties)| {
            let mut forward: Vec<usize> = ties.iter().map(|t| t.target).collect();
            let mut backward: Vec<usize> = self.incoming[node].iter().map(|t| t.target).collect();
            forward.sort_unstable();
            backward.sort_unstable();
            forward == backward
        })
    }

    /// A plain view over one direction.
    pub fn view(&self, direction: Direction) -> DirectedView<'_> {
        DirectedView::new(self, direction)
    }

    /// A swap-aware view over one direction.
    pub fn transposable_view(&self, direction: Direction) -> SwappingView<'_> {
        SwappingView::new(self, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directed_ties_per_direction() {
        let mut net = Network::directed(3);
        let a = net.add_edge(0, 1).unwrap();
        let b = net.add_edge(1, 2).unwrap();

        assert_eq!(
            net.ties(1, Direction::Outgoing),
            &[Tie {
                index: b,
                node: 1,
                target: 2
            }]
        );
        assert_eq!(
            net.ties(1, Direction::Incoming),
            &[Tie {
                index: a,
                node: 1,
                target: 0
            }]
        );
        assert_eq!(net.ties(1, Direction::Both).len(), 2);
        assert!(!net.is_symmetric());
    }

    #[test]
    fn undirected_ignores_direction() {
        let mut net = Network::undirected(3);
        net.add_edge(0, 1).unwrap();
        net.add_edge(2, 2).unwrap();

        assert_eq!(net.ties(1, Direction::Incoming), net.ties(1, Direction::Outgoing));
        assert_eq!(net.ties(0, Direction::Both)[0].target, 1);
        assert_eq!(net.ties(1, Direction::Both)[0].target, 0);
        // loops appear once
        assert_eq!(net.ties(2, Direction::Both).len(), 1);
        assert!(net.is_symmetric());
    }

    #[test]
    fn out_of_range_endpoint_rejected() {
        let mut net = Network::directed(2);
        assert_eq!(
            net.add_edge(0, 2),
            Err(NetworkError::NodeOutOfRange { node: 2, size: 2 })
        );
        assert_eq!(net.edge_count(), 0);
    }

    #[test]
    fn adjacency_builds_weighted_edges() {
        let net = Network::from_adjacency(&[[0.0, 2.0], [0.0, 0.0]], true).unwrap();
        assert_eq!(net.edge_count(), 1);
        assert_eq!(net.endpoints(0), (0, 1));
        assert_eq!(net.weight(0), 2.0);
    }

    #[test]
    fn undirected_adjacency_must_be_symmetric() {
        assert_eq!(
            Network::from_bits(&[[0, 1], [0, 0]], false).unwrap_err(),
            NetworkError::Asymmetric(0, 1)
        );
        let net = Network::from_bits(&[[0, 1], [1, 0]], false).unwrap();
        assert_eq!(net.edge_count(), 1);
    }

    #[test]
    fn reciprocated_directed_network_is_symmetric() {
        let net = Network::from_bits(&[[0, 1, 0], [1, 0, 1], [0, 1, 0]], true).unwrap();
        assert!(net.is_symmetric());
        assert_eq!(net.edge_count(), 4);
    }
}
