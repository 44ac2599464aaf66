//! Shared world state for task assignment BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskdesk::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::Task,
    services::{TaskLifecycleError, TaskLifecycleService},
};
use taskdesk::user::{
    adapters::memory::InMemoryUserRepository, domain::User, services::UserDirectoryService,
};

/// Task service type used by the BDD world.
pub type TestTaskService = TaskLifecycleService<InMemoryTaskRepository, DefaultClock>;

/// Directory service type used by the BDD world.
pub type TestDirectory = UserDirectoryService<InMemoryUserRepository, DefaultClock>;

/// Scenario world for task assignment behaviour tests.
pub struct TaskAssignmentWorld {
    pub directory: TestDirectory,
    pub tasks: TestTaskService,
    pub users: HashMap<String, User>,
    pub next_phone_suffix: u32,
    pub current_task: Option<Task>,
    pub last_result: Option<Result<Task, TaskLifecycleError>>,
}

impl TaskAssignmentWorld {
    /// Creates a world with empty stores.
    #[must_use]
    pub fn new() -> Self {
        Self {
            directory: UserDirectoryService::new(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(DefaultClock),
            ),
            tasks: TaskLifecycleService::new(
                Arc::new(InMemoryTaskRepository::new()),
                Arc::new(DefaultClock),
            ),
            users: HashMap::new(),
            next_phone_suffix: 1,
            current_task: None,
            last_result: None,
        }
    }

    /// Looks up a registered scenario user by name.
    ///
    /// # Errors
    ///
    /// Returns an error when no user with that name was registered.
    pub fn user(&self, name: &str) -> Result<User, eyre::Report> {
        self.users
            .get(name)
            .cloned()
            .ok_or_else(|| eyre::eyre!("user {name} was not registered in this scenario"))
    }

    /// Returns the task the scenario is acting on.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.current_task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing current task in scenario world"))
    }

    /// Records an action outcome, tracking the task when it succeeded.
    pub fn record(&mut self, result: Result<Task, TaskLifecycleError>) {
        if let Ok(ref updated) = result {
            self.current_task = Some(updated.clone());
        }
        self.last_result = Some(result);
    }
}

impl Default for TaskAssignmentWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskAssignmentWorld {
    TaskAssignmentWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
