//! Diesel schema for reminder persistence.

diesel::table! {
    /// Deadline reminder records.
    reminders (id) {
        /// Reminder identifier.
        id -> Uuid,
        /// Owning task identifier.
        task_id -> Uuid,
        /// Scheduled fire time.
        fire_at -> Timestamptz,
        /// Dispatch flag.
        sent -> Bool,
        /// Dispatch timestamp.
        sent_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
