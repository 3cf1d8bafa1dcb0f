//! In-memory [`ComponentRegistry`] for pipeline tests.
//!
//! [`MockRegistry`] stores components per repository, removes them on delete,
//! records every call in order, and can be told to fail specific operations.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tagkeeper_core::{Component, Task};
use tagkeeper_registry::{ComponentRegistry, RegistryError};

/// A call received by the mock registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// Component listing for a repository.
    Fetch(String),
    /// Component deletion by id.
    Delete(String),
    /// Repository listing.
    ListRepositories,
    /// Task listing.
    ListTasks,
    /// Task run request by id.
    Trigger(String),
}

/// How an injected failure manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// The request times out.
    Timeout,
    /// The registry answers with this HTTP status.
    Status(u16),
}

impl Failure {
    fn into_error(self, context: String) -> RegistryError {
        match self {
            Self::Timeout => RegistryError::Timeout { context },
            Self::Status(status) => RegistryError::Upstream {
                context,
                status: Some(status),
                message: format!("status code: {status}"),
            },
        }
    }
}

#[derive(Debug, Default)]
struct State {
    components: HashMap<String, Vec<Component>>,
    repositories: Value,
    tasks: Vec<Task>,
    fetch_failure: Option<Failure>,
    delete_failures: HashMap<String, Failure>,
    trigger_failures: HashMap<String, Failure>,
    calls: Vec<Call>,
}

/// In-memory registry.
///
/// # Examples
///
/// ```rust
/// use tagkeeper_test::{MockComponent, MockRegistry};
///
/// let registry = MockRegistry::new()
///     .with_components("docker-hosted", vec![MockComponent::new("c1").build()])
///     .with_maintenance_tasks();
///
/// assert_eq!(registry.remaining("docker-hosted").len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockRegistry {
    state: Mutex<State>,
}

impl MockRegistry {
    /// Creates an empty registry with no tasks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds components to a repository.
    #[must_use]
    pub fn with_components(self, repository: &str, components: Vec<Component>) -> Self {
        self.state
            .lock()
            .components
            .entry(repository.to_string())
            .or_default()
            .extend(components);
        self
    }

    /// Sets the payload returned by the repository listing.
    #[must_use]
    pub fn with_repositories(self, repositories: Value) -> Self {
        self.state.lock().repositories = repositories;
        self
    }

    /// Sets the task list.
    #[must_use]
    pub fn with_tasks(self, tasks: Vec<Task>) -> Self {
        self.state.lock().tasks = tasks;
        self
    }

    /// Registers both maintenance tasks.
    #[must_use]
    pub fn with_maintenance_tasks(self) -> Self {
        self.with_tasks(crate::fixtures::maintenance_tasks())
    }

    /// Makes every component listing fail.
    #[must_use]
    pub fn fail_fetch(self, failure: Failure) -> Self {
        self.state.lock().fetch_failure = Some(failure);
        self
    }

    /// Makes deletion of one component fail.
    #[must_use]
    pub fn fail_delete(self, component_id: &str, failure: Failure) -> Self {
        self.state
            .lock()
            .delete_failures
            .insert(component_id.to_string(), failure);
        self
    }

    /// Makes running one task fail.
    #[must_use]
    pub fn fail_trigger(self, task_id: &str, failure: Failure) -> Self {
        self.state
            .lock()
            .trigger_failures
            .insert(task_id.to_string(), failure);
        self
    }

    /// Returns every call received, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    /// Returns the ids of deleted components, in order.
    #[must_use]
    pub fn deleted(&self) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Delete(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    /// Returns the ids of triggered tasks, in order.
    #[must_use]
    pub fn triggered(&self) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Trigger(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    /// Returns the components still stored in a repository.
    #[must_use]
    pub fn remaining(&self, repository: &str) -> Vec<Component> {
        self.state
            .lock()
            .components
            .get(repository)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ComponentRegistry for MockRegistry {
    async fn fetch_all_components(
        &self,
        repository: &str,
    ) -> Result<Vec<Component>, RegistryError> {
        let mut state = self.state.lock();
        state.calls.push(Call::Fetch(repository.to_string()));

        if let Some(failure) = state.fetch_failure {
            return Err(failure.into_error(format!("fetching components for {repository}")));
        }

        Ok(state.components.get(repository).cloned().unwrap_or_default())
    }

    async fn delete_component(&self, component_id: &str) -> Result<(), RegistryError> {
        let mut state = self.state.lock();
        state.calls.push(Call::Delete(component_id.to_string()));

        if let Some(failure) = state.delete_failures.get(component_id).copied() {
            return Err(failure.into_error(format!("deleting component {component_id}")));
        }

        let mut found = false;
        for components in state.components.values_mut() {
            let before = components.len();
            components.retain(|c| c.id != component_id);
            found |= components.len() != before;
        }

        if found {
            Ok(())
        } else {
            Err(Failure::Status(404).into_error(format!("deleting component {component_id}")))
        }
    }

    async fn list_repositories(&self) -> Result<Value, RegistryError> {
        let mut state = self.state.lock();
        state.calls.push(Call::ListRepositories);
        Ok(state.repositories.clone())
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, RegistryError> {
        let mut state = self.state.lock();
        state.calls.push(Call::ListTasks);
        Ok(state.tasks.clone())
    }

    async fn trigger_task(&self, task_id: &str) -> Result<(), RegistryError> {
        let mut state = self.state.lock();
        state.calls.push(Call::Trigger(task_id.to_string()));

        if let Some(failure) = state.trigger_failures.get(task_id).copied() {
            return Err(failure.into_error(format!("running task {task_id}")));
        }

        if state.tasks.iter().any(|t| t.id == task_id) {
            Ok(())
        } else {
            Err(Failure::Status(404).into_error(format!("running task {task_id}")))
        }
    }
}
