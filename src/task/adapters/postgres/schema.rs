//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 100]
        title -> Varchar,
        /// Owning customer.
        customer_id -> Uuid,
        /// Assigned employee, set once claimed.
        assignee_id -> Nullable<Uuid>,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Free-text report.
        report -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Completion timestamp.
        closed_at -> Nullable<Timestamptz>,
        /// Compare-and-swap revision.
        revision -> Int8,
    }
}
