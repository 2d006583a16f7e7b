//! Persistence ports for users and tasks.
//!
//! Handlers only see these traits. `PgStore` backs them with PostgreSQL and
//! `InMemoryStore` keeps everything in process memory for tests and local runs.
//! Each operation is a single read or write; there are no multi-step transactions.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskInput, User, UserChanges};

pub use memory::InMemoryStore;
pub use postgres::PgStore;

/// Credential store contract.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds the non-deleted user registered under `email`.
    async fn find_active_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Stores a new user.
    ///
    /// Fails with `AppError::Conflict` when an active user already owns the email.
    async fn create_user(&self, user: &User) -> Result<(), AppError>;

    /// Replaces the profile fields of an active user and returns the stored record.
    ///
    /// Returns `None` when the user does not exist or is deleted.
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, AppError>;

    /// Marks an active user as deleted. Returns `false` when there was nothing to delete.
    async fn soft_delete_user(&self, id: Uuid) -> Result<bool, AppError>;
}

/// Task store contract.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(&self, task: &Task) -> Result<(), AppError>;

    /// Returns the non-deleted tasks owned by `owner`, oldest first.
    async fn tasks_for_owner(&self, owner: Uuid) -> Result<Vec<Task>, AppError>;

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, AppError>;

    /// Overwrites all mutable fields of the task if it belongs to `owner`.
    async fn update_task(
        &self,
        id: Uuid,
        owner: Uuid,
        input: &TaskInput,
    ) -> Result<Option<Task>, AppError>;

    /// Removes the task if it belongs to `owner`. Returns `false` when nothing was removed.
    async fn delete_task(&self, id: Uuid, owner: Uuid) -> Result<bool, AppError>;
}
