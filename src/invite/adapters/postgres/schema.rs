//! Diesel schema for invite persistence.

diesel::table! {
    /// Task-share invite records.
    task_share_invites (id) {
        /// Invite identifier.
        id -> Uuid,
        /// Sharing user identifier.
        sender_id -> Uuid,
        /// Receiving user identifier.
        receiver_id -> Uuid,
        /// Shared task identifier (the sender's original).
        task_id -> Uuid,
        /// Invite status.
        #[max_length = 20]
        status -> Varchar,
        /// Unique opaque token.
        #[max_length = 128]
        token -> Varchar,
        /// Response timestamp.
        responded_at -> Nullable<Timestamptz>,
        /// Receiver-side task copy, set on acceptance.
        shared_task_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
