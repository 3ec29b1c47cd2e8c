//! core
//!
//! Domain types, configuration and verification for rolework.
//!
//! # Modules
//!
//! - [`lattice`] - Partitions, rankings and binary relations
//! - [`network`] - Network storage and the views operators read
//! - [`verify`] - Lattice axioms and declared operator properties
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Lattice values are immutable and always valid once built
//! - Schemas are strict and self-describing
//! - Nothing here depends on the operator engine

pub mod config;
pub mod lattice;
pub mod network;
pub mod verify;
