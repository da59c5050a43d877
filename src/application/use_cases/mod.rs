//! Use Cases
//!
//! Application-specific rules.
//! Each use case is a single-purpose struct with an execute() method.

pub mod check_connections;

pub use check_connections::{CheckConnectionsUseCase, ProbeReport};
