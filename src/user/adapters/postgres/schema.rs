//! Diesel schema for user persistence.

diesel::table! {
    /// Registered users.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Unique username.
        #[max_length = 150]
        username -> Varchar,
        /// Unique contact phone number.
        #[max_length = 15]
        phone -> Varchar,
        /// Optional e-mail address.
        #[max_length = 254]
        email -> Nullable<Varchar>,
        /// Customer role flag.
        is_customer -> Bool,
        /// Employee role flag.
        is_employee -> Bool,
        /// Encoded password digest.
        #[max_length = 255]
        password_digest -> Varchar,
        /// Registration timestamp.
        joined_at -> Timestamptz,
    }
}
