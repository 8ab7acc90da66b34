//! Diesel schema for task persistence.

diesel::table! {
    /// Owner-scoped task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning user identifier.
        owner_id -> Uuid,
        /// Task name.
        #[max_length = 255]
        name -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Optional absolute deadline.
        deadline -> Nullable<Timestamptz>,
        /// Task priority.
        #[max_length = 20]
        priority -> Varchar,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Completion flag.
        completed -> Bool,
        /// Provenance payload.
        origin -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
