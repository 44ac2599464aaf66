//! User directory for Taskdesk.
//!
//! Registers users with independent customer and employee role flags,
//! validates passwords against the registration policy, and resolves the
//! authenticated user for each request. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
