//! Diesel table definitions for the forum schema.
//!
//! Kept in step with `backend/migrations` by hand; `diesel print-schema`
//! against a migrated database regenerates them.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        password_hash -> Text,
        first_name -> Varchar,
        last_name -> Varchar,
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    /// Role grants; at most one row per user and role.
    user_roles (user_id, role) {
        user_id -> Uuid,
        role -> Varchar,
    }
}

diesel::table! {
    categories (id) {
        id -> Uuid,
        name -> Varchar,
        icon -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Discussion topics. `category_id` restricts category deletion and
    /// `revision` guards concurrent edits.
    topics (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Text,
        media_url -> Nullable<Text>,
        created_at -> Timestamptz,
        user_id -> Uuid,
        category_id -> Nullable<Uuid>,
        revision -> Int4,
    }
}

diesel::table! {
    comments (id) {
        id -> Uuid,
        topic_id -> Uuid,
        user_id -> Uuid,
        content -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per (topic, user) pair.
    votes (id) {
        id -> Uuid,
        topic_id -> Uuid,
        user_id -> Uuid,
        is_liked -> Bool,
    }
}

diesel::table! {
    /// One row per (user, topic) pair.
    favorites (id) {
        id -> Uuid,
        user_id -> Uuid,
        topic_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(user_roles -> users (user_id));
diesel::joinable!(topics -> users (user_id));
diesel::joinable!(topics -> categories (category_id));
diesel::joinable!(comments -> topics (topic_id));
diesel::joinable!(comments -> users (user_id));
diesel::joinable!(votes -> topics (topic_id));
diesel::joinable!(favorites -> topics (topic_id));

diesel::allow_tables_to_appear_in_same_query!(
    users, user_roles, categories, topics, comments, votes, favorites,
);
