//! Internal Diesel row structs for the `todos` table.
//!
//! These types never leave the persistence adapter; conversions to and from
//! the domain [`Todo`] live here so every column is mapped in one place.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{Todo, TodoDraft, TodoValidationError};

use super::schema::todos;

/// Row struct for reading from the todos table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = todos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TodoRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating todo records.
///
/// Timestamps are written explicitly so the stored row matches the entity
/// the domain created.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = todos)]
pub(crate) struct NewTodoRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for overwriting the mutable columns of a todo.
///
/// `treat_none_as_null` keeps a cleared description from being skipped.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = todos)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct TodoUpdate<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub is_completed: bool,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Todo> for NewTodoRow<'a> {
    fn from(todo: &'a Todo) -> Self {
        Self {
            id: *todo.id().as_uuid(),
            title: todo.title().as_ref(),
            description: todo.description(),
            is_completed: todo.is_completed(),
            created_at: todo.created_at(),
            updated_at: todo.updated_at(),
        }
    }
}

impl<'a> From<&'a Todo> for TodoUpdate<'a> {
    fn from(todo: &'a Todo) -> Self {
        Self {
            title: todo.title().as_ref(),
            description: todo.description(),
            is_completed: todo.is_completed(),
            updated_at: todo.updated_at(),
        }
    }
}

impl TryFrom<TodoRow> for Todo {
    type Error = TodoValidationError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        Self::from_draft(TodoDraft {
            id: row.id,
            title: row.title,
            description: row.description,
            completed: row.is_completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
