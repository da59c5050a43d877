//! Infrastructure Layer
//!
//! Contains all external concerns: the environment loader and the driven
//! adapters for the relational and cache stores.

pub mod driven_adapters;
