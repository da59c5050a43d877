//! Store Bootstrap
//!
//! Loads typed configuration from a `.env` file and the process environment,
//! then opens and verifies the MySQL and Redis connections an application
//! depends on. Follows Clean/Hexagonal Architecture principles.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
