//! Tasktrack: a single-entity task tracker backed by `SQLite`.
//!
//! Tasks are created pending, completed at most once, and deleted
//! permanently. The repository layer owns every invariant and ordering
//! guarantee; front ends talk to it through a thin controller.
//!
//! # Architecture
//!
//! Tasktrack follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (`SQLite`, in-memory)
//!
//! # Modules
//!
//! - [`task`]: Task entity, repository contract, adapters, and controller
//! - [`logging`]: Tracing subscriber setup for binaries

pub mod logging;
pub mod task;
