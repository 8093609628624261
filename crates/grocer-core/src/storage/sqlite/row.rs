//! Raw row types for database queries, before parsing into domain types.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{GrocerError, Result};
use crate::storage::types::{Recipe, Schedule, User};

pub(super) fn parse_uuid(value: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| GrocerError::Storage(format!("Invalid {}: {}", what, e)))
}

pub(super) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| GrocerError::Storage(format!("Invalid timestamp: {}", e)))?
        .with_timezone(&Utc))
}

#[derive(Debug)]
pub(super) struct RecipeRow {
    pub id: i64,
    pub name: String,
    pub author: String,
    pub portion: i32,
    pub steps: Option<String>,
    pub created_at: String,
    pub modified_at: String,
}

impl RecipeRow {
    pub const COLUMNS: &'static str = "id, name, author, portion, steps, created_at, modified_at";

    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            author: row.get(2)?,
            portion: row.get(3)?,
            steps: row.get(4)?,
            created_at: row.get(5)?,
            modified_at: row.get(6)?,
        })
    }
}

impl TryFrom<RecipeRow> for Recipe {
    type Error = GrocerError;

    fn try_from(row: RecipeRow) -> Result<Self> {
        Ok(Recipe {
            id: row.id,
            author: parse_uuid(&row.author, "recipe author")?,
            name: row.name,
            portion: row.portion,
            steps: row.steps,
            created_at: parse_timestamp(&row.created_at)?,
            modified_at: parse_timestamp(&row.modified_at)?,
        })
    }
}

#[derive(Debug)]
pub(super) struct ScheduleRow {
    pub id: i64,
    pub author: Option<String>,
    pub created_at: String,
}

impl ScheduleRow {
    pub const COLUMNS: &'static str = "id, author, created_at";

    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            author: row.get(1)?,
            created_at: row.get(2)?,
        })
    }
}

impl TryFrom<ScheduleRow> for Schedule {
    type Error = GrocerError;

    fn try_from(row: ScheduleRow) -> Result<Self> {
        let author = row
            .author
            .as_deref()
            .map(|value| parse_uuid(value, "schedule author"))
            .transpose()?;
        Ok(Schedule {
            id: row.id,
            author,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

#[derive(Debug)]
pub(super) struct UserRow {
    pub id: String,
    pub username: String,
    pub created_at: String,
}

impl UserRow {
    pub const COLUMNS: &'static str = "id, username, created_at";

    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            created_at: row.get(2)?,
        })
    }
}

impl TryFrom<UserRow> for User {
    type Error = GrocerError;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: parse_uuid(&row.id, "user id")?,
            username: row.username,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}
