use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Input structure for creating or updating a task.
///
/// Every field is required. An update replaces all five fields, so callers send the
/// complete record; a missing field is rejected while decoding the body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    #[validate(length(min = 1))]
    pub title: String,

    #[validate(length(min = 1))]
    pub description: String,

    /// RFC 3339 timestamp, or a plain `YYYY-MM-DD` date taken as midnight UTC.
    #[serde(
        rename = "dueDate",
        alias = "due_date",
        deserialize_with = "deserialize_due_date"
    )]
    pub due_date: DateTime<Utc>,

    /// Free-form status label, e.g. "todo" or "done".
    #[validate(length(min = 1))]
    pub status: String,

    /// Free-form priority label, e.g. "low" or "high".
    #[validate(length(min = 1))]
    pub priority: String,
}

/// Parses a due date sent by a client.
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
}

fn deserialize_due_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_due_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid dueDate '{}'", raw)))
}

/// Represents a task entity as stored and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "dueDate")]
    pub due_date: DateTime<Utc>,
    pub status: String,
    pub priority: String,
    pub is_deleted: bool,
    /// Identifier of the user who owns the task.
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new `Task` owned by `user_id`, with a fresh id and timestamps.
    pub fn new(input: TaskInput, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            status: input.status,
            priority: input.priority,
            is_deleted: false,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites every mutable field with `input`.
    pub fn apply(&mut self, input: &TaskInput) {
        self.title = input.title.clone();
        self.description = input.description.clone();
        self.due_date = input.due_date;
        self.status = input.status.clone();
        self.priority = input.priority.clone();
        self.updated_at = Utc::now();
    }

    /// A task may only be read or changed by its owner, and never once deleted.
    pub fn is_visible_to(&self, user_id: Uuid) -> bool {
        !self.is_deleted && self.user_id == user_id
    }
}
