//! Task tracking: create, complete, delete, and list tasks.
//!
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Front-end orchestration in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
