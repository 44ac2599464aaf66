//! In-memory adapters for the task lifecycle.

mod task;

pub use task::InMemoryTaskRepository;
