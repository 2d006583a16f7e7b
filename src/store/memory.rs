use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskInput, User, UserChanges};
use crate::store::{TaskStore, UserStore};

/// Process-local store used by the test suite and when no database is configured.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(users: &HashMap<Uuid, User>, email: &str, except: Option<Uuid>) -> bool {
    users
        .values()
        .any(|user| !user.is_deleted && user.email == email && Some(user.id) != except)
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_active_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| !user.is_deleted && user.email == email)
            .cloned())
    }

    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if email_taken(&users, &user.email, None) {
            return Err(AppError::Conflict("User already exists".into()));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, AppError> {
        let mut users = self.users.write().await;
        let user = match users.get(&id) {
            Some(user) if !user.is_deleted => user.clone(),
            _ => return Ok(None),
        };
        if email_taken(&users, &changes.email, Some(id)) {
            return Err(AppError::Conflict("Email already in use".into()));
        }

        let updated = User {
            firstname: changes.firstname,
            lastname: changes.lastname,
            email: changes.email,
            password_hash: changes.password_hash,
            ..user
        };
        users.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn soft_delete_user(&self, id: Uuid) -> Result<bool, AppError> {
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) if !user.is_deleted => {
                user.is_deleted = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl TaskStore for InMemoryStore {
    async fn create_task(&self, task: &Task) -> Result<(), AppError> {
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(())
    }

    async fn tasks_for_owner(&self, owner: Uuid) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.read().await;
        let mut owned: Vec<Task> = tasks
            .values()
            .filter(|task| task.is_visible_to(owner))
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(owned)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn update_task(
        &self,
        id: Uuid,
        owner: Uuid,
        input: &TaskInput,
    ) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(&id) {
            Some(task) if task.is_visible_to(owner) => {
                task.apply(input);
                Ok(Some(task.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_task(&self, id: Uuid, owner: Uuid) -> Result<bool, AppError> {
        let mut tasks = self.tasks.write().await;
        let owned = tasks.get(&id).map_or(false, |task| task.user_id == owner);
        if owned {
            tasks.remove(&id);
        }
        Ok(owned)
    }
}
