//! Taskdesk: task assignment between customers and employees.
//!
//! Customers post tasks, employees claim them, and the assignee closes each
//! task with a written report. All lifecycle and authorization decisions are
//! made by pure domain code; services wrap them in fetch, decide, and
//! conditional write.
//!
//! # Architecture
//!
//! Taskdesk follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage
//! - **Adapters**: In-memory and `PostgreSQL` implementations of ports
//!
//! # Modules
//!
//! - [`user`]: Registration, role flags, and user lookup
//! - [`task`]: Task lifecycle, access predicates, and the task store
//! - [`failure`]: Caller-facing failure taxonomy
//! - [`config`], [`persistence`], [`telemetry`]: Runtime wiring

pub mod config;
pub mod failure;
pub mod persistence;
pub mod task;
pub mod telemetry;
pub mod user;
