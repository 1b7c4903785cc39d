//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, regenerate this file with
//! `diesel print-schema` or update it by hand to match.

diesel::table! {
    /// Registered users with their health profile columns.
    ///
    /// `id` is the compact internal key used for joins; `uuid` is the
    /// external identifier and the only one exposed outside storage.
    users (id) {
        id -> Int8,
        uuid -> Uuid,
        email -> Varchar,
        password_hash -> Varchar,
        name -> Varchar,
        diet_type -> Nullable<Varchar>,
        height -> Nullable<Float8>,
        weight -> Nullable<Float8>,
        age_range -> Nullable<Varchar>,
        gender -> Nullable<Varchar>,
        created_at -> Timestamptz,
        /// Auto-updated by trigger.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Allergy catalog (seeded externally).
    allergies (id) {
        id -> Int4,
        name -> Varchar,
        display_name -> Varchar,
    }
}

diesel::table! {
    /// Disease catalog (seeded externally).
    diseases (id) {
        id -> Int4,
        name -> Varchar,
        display_name -> Varchar,
    }
}

diesel::table! {
    /// Special-condition catalog (seeded externally).
    special_conditions (id) {
        id -> Int4,
        name -> Varchar,
        display_name -> Varchar,
    }
}

diesel::table! {
    user_allergies (user_id, allergy_id) {
        user_id -> Int8,
        allergy_id -> Int4,
    }
}

diesel::table! {
    user_diseases (user_id, disease_id) {
        user_id -> Int8,
        disease_id -> Int4,
    }
}

diesel::table! {
    user_special_conditions (user_id, condition_id) {
        user_id -> Int8,
        condition_id -> Int4,
    }
}

diesel::table! {
    /// Append-only scan log.
    ///
    /// List and payload columns hold JSON-encoded text; see
    /// `json_fields` for the decode rules.
    scan_history (id) {
        id -> Int8,
        user_id -> Int8,
        product_name -> Varchar,
        risk_level -> Varchar,
        risk_score -> Int4,
        risk_reason -> Text,
        calories -> Nullable<Float8>,
        carbs -> Nullable<Float8>,
        protein -> Nullable<Float8>,
        fat -> Nullable<Float8>,
        detected_ingredients -> Text,
        detected_allergens -> Text,
        diet_warnings -> Text,
        analysis_payload -> Text,
        scanned_at -> Timestamptz,
    }
}

diesel::joinable!(user_allergies -> users (user_id));
diesel::joinable!(user_allergies -> allergies (allergy_id));
diesel::joinable!(user_diseases -> users (user_id));
diesel::joinable!(user_diseases -> diseases (disease_id));
diesel::joinable!(user_special_conditions -> users (user_id));
diesel::joinable!(user_special_conditions -> special_conditions (condition_id));
diesel::joinable!(scan_history -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    allergies,
    diseases,
    special_conditions,
    user_allergies,
    user_diseases,
    user_special_conditions,
    scan_history,
);
