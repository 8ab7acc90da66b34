//! Diesel schema for suggestion persistence.

diesel::table! {
    /// Generator-produced candidate task records.
    suggestions (id) {
        /// Suggestion identifier.
        id -> Uuid,
        /// Owning user identifier.
        owner_id -> Uuid,
        /// Candidate task name.
        #[max_length = 255]
        name -> Varchar,
        /// Candidate description.
        description -> Text,
        /// Candidate deadline.
        deadline -> Nullable<Timestamptz>,
        /// Candidate priority.
        #[max_length = 20]
        priority -> Varchar,
        /// Lifecycle status, independent of acceptance.
        #[max_length = 20]
        lifecycle_status -> Varchar,
        /// Acceptance state.
        #[max_length = 20]
        acceptance_status -> Varchar,
        /// Materialized task reference, set on acceptance.
        accepted_task_id -> Nullable<Uuid>,
        /// Raw generator response retained for audit.
        raw_response -> Text,
        /// Generator identifier.
        #[max_length = 100]
        generator -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Response timestamp.
        responded_at -> Nullable<Timestamptz>,
    }
}
