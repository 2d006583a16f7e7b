use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskInput, User, UserChanges};
use crate::store::{TaskStore, UserStore};

const USER_COLUMNS: &str =
    "id, firstname, lastname, email, password_hash, is_deleted, created_at";
const TASK_COLUMNS: &str =
    "id, title, description, due_date, status, priority, is_deleted, user_id, created_at, updated_at";

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies pending migrations from `migrations/`.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Migration failed: {}", e)))
    }
}

/// Maps a unique-constraint violation to `Conflict` with a caller-specific message.
fn conflict_as(message: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |error| match AppError::from(error) {
        AppError::Conflict(_) => AppError::Conflict(message.into()),
        other => other,
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_active_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1 AND is_deleted = FALSE",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO users (id, firstname, lastname, email, password_hash, is_deleted, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user.id)
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_deleted)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(conflict_as("User already exists"))?;
        Ok(())
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET firstname = $1, lastname = $2, email = $3, password_hash = $4
             WHERE id = $5 AND is_deleted = FALSE
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(changes.firstname)
        .bind(changes.lastname)
        .bind(changes.email)
        .bind(changes.password_hash)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(conflict_as("Email already in use"))?;
        Ok(user)
    }

    async fn soft_delete_user(&self, id: Uuid) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE users SET is_deleted = TRUE WHERE id = $1 AND is_deleted = FALSE")
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn create_task(&self, task: &Task) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO tasks (id, title, description, due_date, status, priority, is_deleted, user_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(&task.status)
        .bind(&task.priority)
        .bind(task.is_deleted)
        .bind(task.user_id)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn tasks_for_owner(&self, owner: Uuid) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE user_id = $1 AND is_deleted = FALSE ORDER BY created_at, id",
            TASK_COLUMNS
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn update_task(
        &self,
        id: Uuid,
        owner: Uuid,
        input: &TaskInput,
    ) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks
             SET title = $1, description = $2, due_date = $3, status = $4, priority = $5, updated_at = NOW()
             WHERE id = $6 AND user_id = $7 AND is_deleted = FALSE
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.due_date)
        .bind(&input.status)
        .bind(&input.priority)
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn delete_task(&self, id: Uuid, owner: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
