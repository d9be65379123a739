//! Todo aggregate and its validated field types.
//!
//! A [`Todo`] owns its invariants: the title is never empty, `created_at` is
//! fixed at creation, and every mutation advances `updated_at`. Adapters
//! rebuild stored rows through [`Todo::from_draft`], which re-checks the same
//! invariants so corrupt rows surface as errors instead of invalid entities.

use std::fmt;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum title length in characters, matching the storage column width.
pub const TODO_TITLE_MAX: usize = 255;

/// Timestamps are kept at microsecond precision so every store round-trips
/// them exactly.
const TIMESTAMP_PRECISION: u16 = 6;

/// Validation errors raised while constructing Todo values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoValidationError {
    #[error("todo id must not be empty")]
    EmptyId,
    #[error("todo id must be a valid UUID")]
    InvalidId,
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("updated_at must not precede created_at")]
    TimestampsOutOfOrder,
}

/// Stable Todo identifier.
///
/// # Examples
/// ```
/// use todo_backend::domain::TodoId;
///
/// let id = TodoId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// assert!(TodoId::new("nope").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TodoId(Uuid);

impl TodoId {
    /// Parse an identifier from its canonical string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, TodoValidationError> {
        let raw = id.as_ref();
        if raw.trim().is_empty() {
            return Err(TodoValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(TodoValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| TodoValidationError::InvalidId)
    }

    /// Generate a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TodoId {
    type Err = TodoValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TodoId {
    type Error = TodoValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TodoId> for String {
    fn from(value: TodoId) -> Self {
        value.to_string()
    }
}

/// Non-empty Todo title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TodoTitle(String);

impl TodoTitle {
    /// Validate and construct a title.
    ///
    /// The text is stored verbatim; only emptiness is judged on the trimmed
    /// value.
    pub fn new(title: impl Into<String>) -> Result<Self, TodoValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TodoValidationError::EmptyTitle);
        }
        if title.chars().count() > TODO_TITLE_MAX {
            return Err(TodoValidationError::TitleTooLong {
                max: TODO_TITLE_MAX,
            });
        }
        Ok(Self(title))
    }
}

impl AsRef<str> for TodoTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TodoTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl TryFrom<String> for TodoTitle {
    type Error = TodoValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TodoTitle> for String {
    fn from(value: TodoTitle) -> Self {
        value.0
    }
}

/// Unvalidated field bundle used to rehydrate a stored Todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single Todo item.
///
/// ## Invariants
/// - `title` is non-empty once trimmed and at most [`TODO_TITLE_MAX`] chars.
/// - `updated_at >= created_at`.
/// - Timestamps carry at most microsecond precision.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use todo_backend::domain::{Todo, TodoTitle};
///
/// let title = TodoTitle::new("Buy milk").expect("valid title");
/// let todo = Todo::create(title, None, Utc::now());
/// assert!(!todo.is_completed());
/// assert_eq!(todo.created_at(), todo.updated_at());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    id: TodoId,
    title: TodoTitle,
    description: Option<String>,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Todo {
    /// Create a new, open Todo with a fresh identifier.
    #[must_use]
    pub fn create(title: TodoTitle, description: Option<String>, now: DateTime<Utc>) -> Self {
        Self::create_with_id(TodoId::random(), title, description, now)
    }

    /// Create a new, open Todo with a caller-chosen identifier.
    #[must_use]
    pub fn create_with_id(
        id: TodoId,
        title: TodoTitle,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let now = normalise(now);
        Self {
            id,
            title,
            description,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a Todo from stored fields, re-checking every invariant.
    pub fn from_draft(draft: TodoDraft) -> Result<Self, TodoValidationError> {
        let TodoDraft {
            id,
            title,
            description,
            completed,
            created_at,
            updated_at,
        } = draft;
        let created_at = normalise(created_at);
        let updated_at = normalise(updated_at);
        if updated_at < created_at {
            return Err(TodoValidationError::TimestampsOutOfOrder);
        }
        Ok(Self {
            id: TodoId::from_uuid(id),
            title: TodoTitle::new(title)?,
            description,
            completed,
            created_at,
            updated_at,
        })
    }

    #[must_use]
    pub const fn id(&self) -> &TodoId {
        &self.id
    }

    #[must_use]
    pub const fn title(&self) -> &TodoTitle {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply the provided field changes and advance `updated_at`.
    ///
    /// Absent fields are left untouched.
    pub fn revise(
        &mut self,
        title: Option<TodoTitle>,
        description: Option<String>,
        now: DateTime<Utc>,
    ) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = Some(description);
        }
        self.touch(now);
    }

    /// Mark the Todo completed. Completing twice keeps it completed.
    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.completed = true;
        self.touch(now);
    }

    /// Mark the Todo open again.
    pub fn reopen(&mut self, now: DateTime<Utc>) {
        self.completed = false;
        self.touch(now);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        let floor = self.updated_at + Duration::microseconds(1);
        self.updated_at = normalise(now).max(floor);
    }
}

fn normalise(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    timestamp.trunc_subsecs(TIMESTAMP_PRECISION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53)
            .single()
            .expect("valid fixture timestamp")
    }

    #[fixture]
    fn todo(now: DateTime<Utc>) -> Todo {
        Todo::create(
            TodoTitle::new("Buy milk").expect("valid title"),
            Some("semi-skimmed".to_owned()),
            now,
        )
    }

    #[rstest]
    #[case("", TodoValidationError::EmptyTitle)]
    #[case("   ", TodoValidationError::EmptyTitle)]
    #[case(&"x".repeat(TODO_TITLE_MAX + 1), TodoValidationError::TitleTooLong { max: TODO_TITLE_MAX })]
    fn title_rejects_invalid_values(#[case] raw: &str, #[case] expected: TodoValidationError) {
        assert_eq!(TodoTitle::new(raw), Err(expected));
    }

    #[rstest]
    fn title_accepts_boundary_length() {
        let raw = "é".repeat(TODO_TITLE_MAX);
        let title = TodoTitle::new(raw.clone()).expect("max length is allowed");
        assert_eq!(title.as_ref(), raw);
    }

    #[rstest]
    #[case("", TodoValidationError::EmptyId)]
    #[case("abc", TodoValidationError::InvalidId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", TodoValidationError::InvalidId)]
    fn id_rejects_invalid_values(#[case] raw: &str, #[case] expected: TodoValidationError) {
        assert_eq!(TodoId::new(raw), Err(expected));
    }

    #[rstest]
    fn create_starts_open_with_equal_timestamps(todo: Todo, now: DateTime<Utc>) {
        assert!(!todo.is_completed());
        assert_eq!(todo.created_at(), now);
        assert_eq!(todo.updated_at(), now);
        assert_eq!(todo.description(), Some("semi-skimmed"));
    }

    #[rstest]
    fn create_truncates_to_microseconds(now: DateTime<Utc>) {
        let precise = now + Duration::nanoseconds(1_234_567);
        let todo = Todo::create(TodoTitle::new("t").expect("valid title"), None, precise);
        assert_eq!(todo.created_at(), now + Duration::microseconds(1_234));
    }

    #[rstest]
    fn revise_applies_only_provided_fields(mut todo: Todo, now: DateTime<Utc>) {
        let later = now + Duration::seconds(5);
        todo.revise(None, Some("oat".to_owned()), later);

        assert_eq!(todo.title().as_ref(), "Buy milk");
        assert_eq!(todo.description(), Some("oat"));
        assert_eq!(todo.updated_at(), later);
        assert_eq!(todo.created_at(), now);
    }

    #[rstest]
    fn mutations_advance_updated_at_even_when_clock_stalls(mut todo: Todo, now: DateTime<Utc>) {
        todo.complete(now);
        let first = todo.updated_at();
        todo.complete(now - Duration::seconds(10));

        assert!(todo.is_completed());
        assert!(first > now);
        assert!(todo.updated_at() > first);
    }

    #[rstest]
    fn reopen_clears_completion(mut todo: Todo, now: DateTime<Utc>) {
        todo.complete(now + Duration::seconds(1));
        todo.reopen(now + Duration::seconds(2));
        assert!(!todo.is_completed());
        assert_eq!(todo.updated_at(), now + Duration::seconds(2));
    }

    #[rstest]
    fn from_draft_round_trips_fields(todo: Todo) {
        let draft = TodoDraft {
            id: *todo.id().as_uuid(),
            title: todo.title().to_string(),
            description: todo.description().map(str::to_owned),
            completed: todo.is_completed(),
            created_at: todo.created_at(),
            updated_at: todo.updated_at(),
        };
        assert_eq!(Todo::from_draft(draft), Ok(todo));
    }

    #[rstest]
    fn from_draft_rejects_out_of_order_timestamps(now: DateTime<Utc>) {
        let draft = TodoDraft {
            id: Uuid::new_v4(),
            title: "t".to_owned(),
            description: None,
            completed: false,
            created_at: now,
            updated_at: now - Duration::seconds(1),
        };
        assert_eq!(
            Todo::from_draft(draft),
            Err(TodoValidationError::TimestampsOutOfOrder)
        );
    }

    #[rstest]
    fn id_serialises_as_string() {
        let id = TodoId::from_uuid(Uuid::nil());
        let value = serde_json::to_value(id).expect("serialise id");
        assert_eq!(value, serde_json::json!("00000000-0000-0000-0000-000000000000"));
    }
}
