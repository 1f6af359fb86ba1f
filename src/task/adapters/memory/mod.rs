//! In-memory adapters for task tracking tests.

mod task;

pub use task::InMemoryTaskRepository;
