//! Shared fixtures for rolework integration tests.
//!
//! Included by the test crates with `mod integration;`.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rolework::core::lattice::Partition;
use rolework::core::network::Network;

/// Edges of the eleven-node layered network, in id order.
///
/// Sources 0..=3 feed a middle layer 4..=6, which feeds sinks 7..=10:
///
/// ```text
/// 0 -> 4    1 -> 4, 5    2 -> 5, 6    3 -> 6
/// 4 -> 7, 8    5 -> 7, 8    6 -> 9, 10
/// ```
pub const LAYERED_EDGES: [(usize, usize); 12] = [
    (0, 4),
    (1, 4),
    (1, 5),
    (2, 5),
    (2, 6),
    (3, 6),
    (4, 7),
    (5, 7),
    (5, 8),
    (6, 9),
    (6, 10),
    (4, 8),
];

/// The eleven-node layered network.
pub fn layered_network() -> Network {
    let mut net = Network::directed(11);
    for (source, target) in LAYERED_EDGES {
        net.add_edge(source, target).unwrap();
    }
    net
}

/// Partition by layer: sources, middle, sinks.
pub fn layer_partition() -> Partition {
    Partition::new(&[0, 0, 0, 0, 1, 1, 1, 2, 2, 2, 2])
}

/// A random network on `nodes` nodes where each ordered pair is an edge
/// with probability `density`.
pub fn random_network(seed: u64, nodes: usize, density: f64, directed: bool) -> Network {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut net = if directed {
        Network::directed(nodes)
    } else {
        Network::undirected(nodes)
    };
    for source in 0..nodes {
        let first = if directed { 0 } else { source };
        for target in first..nodes {
            if rng.random_bool(density) {
                let weight = f64::from(rng.random_range(1u8..4));
                net.add_weighted_edge(source, target, weight).unwrap();
            }
        }
    }
    net
}

/// A random partition of `nodes` nodes into at most `classes` classes.
pub fn random_partition(seed: u64, nodes: usize, classes: usize) -> Partition {
    let mut rng = StdRng::seed_from_u64(seed);
    let labels: Vec<usize> = (0..nodes).map(|_| rng.random_range(0..classes.max(1))).collect();
    Partition::new(&labels)
}
