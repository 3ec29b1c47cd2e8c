//! rolework - role operators on networks
//!
//! Computes positions and roles of nodes in a network as lattice values:
//! partitions (who plays the same role), rankings (who is dominated by
//! whom) and binary relations. Roles come from *role operators*, functions
//! that refine a lattice value by comparing the ties of every node pair.
//!
//! # Architecture
//!
//! The crate follows a layered architecture:
//!
//! - [`core`] - Lattice values, networks and views, config, verification
//! - [`engine`] - Operator builders, refinement, fixpoints and distances
//!
//! # Correctness Invariants
//!
//! rolework maintains the following invariants:
//!
//! 1. Operators never mutate the network they read
//! 2. Lattice values satisfy their axioms by construction
//! 3. Unsupported operator configurations are rejected when built, not when applied
//! 4. Fixpoint iteration is bounded; exceeding the bound is a bug and panics
//!
//! # Example
//!
//! ```
//! use rolework::core::lattice::Ranking;
//! use rolework::core::network::{Direction, Network};
//! use rolework::engine::RANKING;
//!
//! // 0 -> 1, 0 -> 2, 1 -> 2
//! let net = Network::from_bits(&[[0, 1, 1], [0, 0, 1], [0, 0, 0]], true).unwrap();
//! let structural = RANKING
//!     .strong_structural()
//!     .of(net.view(Direction::Outgoing))
//!     .make()
//!     .unwrap();
//!
//! let r = structural.apply(&Ranking::identity(3));
//! assert!(r.le(2, 1) && r.le(1, 0));
//! assert!(!r.le(0, 1));
//! ```

pub mod core;
pub mod engine;
