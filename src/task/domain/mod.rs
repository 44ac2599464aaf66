//! Domain model for the task lifecycle.
//!
//! Every lifecycle decision lives here: who may act on a task, which status
//! transitions are legal, and what a successful action changes. Services only
//! fetch, decide through these types, and write back.

mod access;
mod error;
mod ids;
mod task;

pub use access::{TaskAction, authorize, is_assignee, is_customer, is_employee, is_participant};
pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{TaskId, TaskRevision};
pub use task::{PersistedTaskData, Task, TaskStatus, TaskTitle};
