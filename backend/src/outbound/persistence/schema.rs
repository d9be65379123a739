//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Todo items.
    ///
    /// One row per Todo; `id` is assigned by the application (UUID v4).
    todos (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Non-empty title (max 255 characters).
        title -> Varchar,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Completion flag, false on creation.
        is_completed -> Bool,
        /// Creation timestamp, never changed after insert.
        created_at -> Timestamptz,
        /// Timestamp of the last mutation.
        updated_at -> Timestamptz,
    }
}
