//! Adapter implementations for the task lifecycle ports.

pub mod memory;
pub mod postgres;
