// Copyright (c) SmartInfra Team
// SPDX-License-Identifier: Apache-2.0

// Import diesel table macros
use diesel::{allow_tables_to_appear_in_same_query, joinable, table};

// Define users table
table! {
    users (id) {
        id -> Integer,
        username -> Varchar,
        full_name -> Varchar,
        email -> Varchar,
        password_hash -> Varchar,
        role -> Varchar,
        created_at -> Timestamp,
    }
}

// Define reports table (incoming road-damage reports)
table! {
    reports (id) {
        id -> Integer,
        user_id -> Integer,
        caption -> Text,
        image_url -> Varchar,
        severity -> Varchar,
        status -> Varchar,
        lat -> Double,
        lng -> Double,
        province -> Varchar,
        city -> Varchar,
        district -> Varchar,
        created_at -> Timestamp,
    }
}

// Define reviews table (citizen feedback ratings)
table! {
    reviews (id) {
        id -> Integer,
        user_id -> Integer,
        rating -> SmallInt,
        comment -> Nullable<Text>,
        created_at -> Timestamp,
    }
}

joinable!(reports -> users (user_id));
joinable!(reviews -> users (user_id));

// Allow joining the tables if needed
allow_tables_to_appear_in_same_query!(
    users,
    reports,
    reviews,
);
