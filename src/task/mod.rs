//! Task lifecycle for taskdesk.
//!
//! Customers create tasks, employees claim them, and the assignee closes a
//! task with a report. A task moves `WAITING -> IN_PROGRESS -> COMPLETED` and
//! never back. The module follows hexagonal architecture:
//!
//! - Domain types and access predicates in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
