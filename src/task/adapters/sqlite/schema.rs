//! Diesel schema for task persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Storage-assigned task identifier.
        id -> BigInt,
        /// Trimmed, non-empty description.
        description -> Text,
        /// Lifecycle status: `pending` or `completed`.
        status -> Text,
        /// Creation timestamp written by storage.
        created_at -> Timestamp,
        /// Completion timestamp, set only for completed tasks.
        completed_at -> Nullable<Timestamp>,
    }
}
