// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

// Table definitions for the columns this service reads and writes. The
// schema itself is owned by the hosted backend.

use diesel::allow_tables_to_appear_in_same_query;
use diesel::joinable;
use diesel::table;

table! {
    profiles (id) {
        id -> Uuid,
        name -> Text,
        profile_picture -> Nullable<Text>,
        mood -> Nullable<Text>,
        birth_date -> Nullable<Date>,
        gender -> Nullable<Text>,
        country -> Nullable<Text>,
        interests -> Nullable<Array<Text>>,
        invite_code -> Nullable<Text>,
        created_at -> Nullable<Timestamptz>,
        completed -> Nullable<Bool>,
    }
}

// Accounts of the backend's authentication service
table! {
    auth.users (id) {
        id -> Uuid,
        email -> Nullable<Varchar>,
    }
}

table! {
    couples (id) {
        id -> Uuid,
        created_at -> Nullable<Timestamptz>,
        user1_id -> Uuid,
        user2_id -> Nullable<Uuid>,
    }
}

table! {
    questions (id) {
        id -> Uuid,
        content -> Text,
        created_at -> Nullable<Timestamptz>,
        scheduled_time -> Time,
    }
}

table! {
    daily_questions (id) {
        id -> Uuid,
        couple_id -> Nullable<Uuid>,
        question_id -> Nullable<Uuid>,
        scheduled_for -> Date,
        created_at -> Nullable<Timestamptz>,
    }
}

table! {
    quiz_themes (id) {
        id -> Uuid,
        name -> Text,
        description -> Nullable<Text>,
        created_at -> Nullable<Timestamptz>,
    }
}

table! {
    quizzes (id) {
        id -> Uuid,
        theme_id -> Uuid,
        title -> Text,
        description -> Nullable<Text>,
        image -> Nullable<Text>,
        created_at -> Nullable<Timestamptz>,
    }
}

table! {
    quiz_questions (id) {
        id -> Uuid,
        quiz_id -> Uuid,
        content -> Text,
        ord -> Int4,
        created_at -> Nullable<Timestamptz>,
    }
}

table! {
    quiz_answers (id) {
        id -> Uuid,
        question_id -> Uuid,
        quiz_id -> Uuid,
        user_id -> Uuid,
        couple_id -> Uuid,
        answer_value -> Int4,
        created_at -> Nullable<Timestamptz>,
        answered_at -> Nullable<Timestamptz>,
    }
}

table! {
    quiz_results (id) {
        id -> Uuid,
        couple_id -> Uuid,
        quiz_id -> Uuid,
        score -> Int4,
    }
}

table! {
    quiz_invites (id) {
        id -> Uuid,
        quiz_id -> Nullable<Uuid>,
        sender_id -> Nullable<Uuid>,
        receiver_id -> Nullable<Uuid>,
    }
}

table! {
    service_categories (id) {
        id -> Uuid,
        name -> Text,
        description -> Nullable<Text>,
        icon -> Nullable<Text>,
        created_at -> Nullable<Timestamptz>,
    }
}

table! {
    service_subcategories (id) {
        id -> Uuid,
        category_id -> Uuid,
        name -> Text,
        description -> Nullable<Text>,
        icon -> Nullable<Text>,
        created_at -> Nullable<Timestamptz>,
    }
}

table! {
    service_providers (id) {
        id -> Uuid,
        subcategory_id -> Uuid,
        name -> Text,
        description -> Nullable<Text>,
        address -> Nullable<Text>,
        city -> Nullable<Text>,
        latitude -> Nullable<Numeric>,
        longitude -> Nullable<Numeric>,
        phone -> Nullable<Text>,
        opening_hours -> Nullable<Jsonb>,
        price_range -> Nullable<Text>,
        image_url -> Nullable<Text>,
        website -> Nullable<Text>,
        created_at -> Nullable<Timestamptz>,
    }
}

table! {
    service_stats (id) {
        id -> Uuid,
        service_provider_id -> Uuid,
        user_id -> Nullable<Uuid>,
        accessed_at -> Timestamptz,
    }
}

// Dependent tables, only touched by cascading deletes

table! {
    answers (id) {
        id -> Uuid,
        daily_question_id -> Nullable<Uuid>,
        user_id -> Nullable<Uuid>,
    }
}

table! {
    chat_threads (id) {
        id -> Uuid,
        couple_id -> Nullable<Uuid>,
    }
}

table! {
    chat_messages (id) {
        id -> Uuid,
        thread_id -> Nullable<Uuid>,
        sender_id -> Nullable<Uuid>,
    }
}

table! {
    calendar_events (id) {
        id -> Uuid,
        couple_id -> Uuid,
    }
}

table! {
    calendar_souvenirs (id) {
        id -> Uuid,
        couple_id -> Uuid,
    }
}

table! {
    calendar_todos (id) {
        id -> Uuid,
        couple_id -> Uuid,
    }
}

table! {
    notifications (id) {
        id -> Uuid,
        user_id -> Nullable<Uuid>,
        data -> Nullable<Jsonb>,
    }
}

table! {
    notification_settings (id) {
        id -> Uuid,
        user_id -> Nullable<Uuid>,
    }
}

table! {
    pulses (id) {
        id -> Uuid,
        sender_id -> Uuid,
        receiver_id -> Uuid,
    }
}

joinable!(daily_questions -> couples (couple_id));
joinable!(daily_questions -> questions (question_id));
joinable!(quizzes -> quiz_themes (theme_id));
joinable!(quiz_questions -> quizzes (quiz_id));
joinable!(service_subcategories -> service_categories (category_id));
joinable!(service_providers -> service_subcategories (subcategory_id));
joinable!(service_stats -> service_providers (service_provider_id));

allow_tables_to_appear_in_same_query!(
    profiles,
    users,
    couples,
    questions,
    daily_questions,
    quiz_themes,
    quizzes,
    quiz_questions,
    quiz_answers,
    quiz_results,
    quiz_invites,
    service_categories,
    service_subcategories,
    service_providers,
    service_stats,
    answers,
    chat_threads,
    chat_messages,
    calendar_events,
    calendar_souvenirs,
    calendar_todos,
    notifications,
    notification_settings,
    pulses,
);
