// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

// Handler tests against a real Postgres. They run only when DATABASE_URL is
// set; each test builds the tables it needs in a throwaway schema and drops
// it at the end.

use axum::extract::{Path, Query, State};
use diesel::sql_types::BigInt;
use diesel::QueryableByName;
use diesel_async::{RunQueryDsl, SimpleAsyncConnection};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use couples_admin::api::handlers::{
    couples, daily_questions, quiz_themes, quizzes, service_categories, users,
};
use couples_admin::api::routes::{DeleteQuery, ListQuery, ToastVariant};
use couples_admin::api::AppState;
use couples_admin::config::Config;
use couples_admin::db::Database;
use couples_admin::error::AdminError;
use couples_admin::integrity::CascadeReport;
use couples_admin::models::service::ServiceCategoryDraft;
use couples_admin::models::{QuizDraft, QuizThemeDraft};
use couples_admin::upload::CloudinaryHost;

const TABLES: &str = r#"
CREATE TABLE profiles (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    name text NOT NULL,
    profile_picture text,
    mood text,
    birth_date date,
    gender text,
    country text,
    interests text[],
    invite_code text,
    created_at timestamptz DEFAULT now(),
    completed boolean
);
CREATE TABLE couples (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    created_at timestamptz DEFAULT now(),
    user1_id uuid NOT NULL REFERENCES profiles(id),
    user2_id uuid REFERENCES profiles(id)
);
CREATE TABLE questions (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    content text NOT NULL,
    created_at timestamptz DEFAULT now(),
    scheduled_time time NOT NULL DEFAULT '08:00:00'
);
CREATE TABLE daily_questions (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    couple_id uuid REFERENCES couples(id),
    question_id uuid REFERENCES questions(id),
    scheduled_for date NOT NULL,
    created_at timestamptz DEFAULT now()
);
CREATE TABLE quiz_themes (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    name text NOT NULL,
    description text,
    created_at timestamptz DEFAULT now()
);
CREATE TABLE quizzes (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    theme_id uuid NOT NULL REFERENCES quiz_themes(id),
    title text NOT NULL,
    description text,
    image text,
    created_at timestamptz DEFAULT now()
);
CREATE TABLE quiz_questions (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    quiz_id uuid NOT NULL REFERENCES quizzes(id),
    content text NOT NULL,
    ord integer NOT NULL DEFAULT 0,
    created_at timestamptz DEFAULT now()
);
CREATE TABLE quiz_answers (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    question_id uuid NOT NULL REFERENCES quiz_questions(id),
    quiz_id uuid NOT NULL REFERENCES quizzes(id),
    user_id uuid NOT NULL REFERENCES profiles(id),
    couple_id uuid NOT NULL REFERENCES couples(id),
    answer_value integer NOT NULL,
    created_at timestamptz DEFAULT now(),
    answered_at timestamptz
);
CREATE TABLE quiz_results (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    couple_id uuid NOT NULL REFERENCES couples(id),
    quiz_id uuid NOT NULL REFERENCES quizzes(id),
    score integer NOT NULL
);
CREATE TABLE quiz_invites (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    quiz_id uuid REFERENCES quizzes(id),
    sender_id uuid REFERENCES profiles(id),
    receiver_id uuid REFERENCES profiles(id)
);
CREATE TABLE service_categories (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    name text NOT NULL,
    description text,
    icon text,
    created_at timestamptz DEFAULT now()
);
CREATE TABLE service_subcategories (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    category_id uuid NOT NULL REFERENCES service_categories(id),
    name text NOT NULL,
    description text,
    icon text,
    created_at timestamptz DEFAULT now()
);
CREATE TABLE service_providers (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    subcategory_id uuid NOT NULL REFERENCES service_subcategories(id),
    name text NOT NULL,
    description text,
    address text,
    city text,
    latitude numeric,
    longitude numeric,
    phone text,
    opening_hours jsonb,
    price_range text,
    image_url text,
    website text,
    created_at timestamptz DEFAULT now()
);
CREATE TABLE service_stats (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    service_provider_id uuid NOT NULL REFERENCES service_providers(id),
    user_id uuid REFERENCES profiles(id),
    accessed_at timestamptz NOT NULL DEFAULT now()
);
CREATE TABLE answers (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    daily_question_id uuid REFERENCES daily_questions(id),
    user_id uuid REFERENCES profiles(id)
);
CREATE TABLE chat_threads (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    couple_id uuid REFERENCES couples(id)
);
CREATE TABLE chat_messages (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    thread_id uuid REFERENCES chat_threads(id),
    sender_id uuid REFERENCES profiles(id)
);
CREATE TABLE calendar_events (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    couple_id uuid NOT NULL REFERENCES couples(id)
);
CREATE TABLE calendar_souvenirs (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    couple_id uuid NOT NULL REFERENCES couples(id)
);
CREATE TABLE calendar_todos (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    couple_id uuid NOT NULL REFERENCES couples(id)
);
CREATE TABLE notifications (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id uuid REFERENCES profiles(id),
    data jsonb
);
CREATE TABLE notification_settings (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id uuid REFERENCES profiles(id)
);
CREATE TABLE pulses (
    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    sender_id uuid NOT NULL REFERENCES profiles(id),
    receiver_id uuid NOT NULL REFERENCES profiles(id)
);
"#;

#[derive(QueryableByName)]
struct RowCount {
    #[diesel(sql_type = BigInt)]
    n: i64,
}

/// App state on a single pooled connection whose search path points at a
/// fresh schema
struct Scratch {
    state: AppState,
    schema: String,
}

impl Scratch {
    async fn open() -> Option<Self> {
        let url = match std::env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => url,
            _ => {
                warn!("DATABASE_URL not set, skipping database test");
                return None;
            }
        };

        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some(url.clone()),
            "DATABASE_MAX_CONNECTIONS" => Some("1".to_string()),
            "JWT_SECRET" => Some("db-test-secret".to_string()),
            _ => None,
        })
        .unwrap();
        let db = Database::connect_lazy(&config.database).unwrap();
        let images = Arc::new(CloudinaryHost::new(config.images.clone()));
        let scratch = Scratch {
            state: AppState::new(Arc::new(db), Arc::new(config), images),
            schema: format!("couples_admin_test_{}", Uuid::new_v4().simple()),
        };

        scratch
            .exec(&format!(
                "CREATE SCHEMA {0}; SET search_path TO {0}; {1}",
                scratch.schema, TABLES
            ))
            .await;
        Some(scratch)
    }

    async fn exec(&self, sql: &str) {
        let mut conn = self.state.db.get_connection().await.unwrap();
        conn.batch_execute(sql).await.unwrap();
    }

    async fn count(&self, table: &str) -> i64 {
        let mut conn = self.state.db.get_connection().await.unwrap();
        diesel::sql_query(format!("SELECT count(*) AS n FROM {}", table))
            .get_result::<RowCount>(&mut conn)
            .await
            .unwrap()
            .n
    }

    async fn close(self) {
        self.exec(&format!("DROP SCHEMA {} CASCADE", self.schema))
            .await;
    }
}

fn confirmed() -> Query<DeleteQuery> {
    Query(DeleteQuery { confirm: true })
}

fn removed(report: &CascadeReport, table: &str) -> usize {
    report
        .removed
        .iter()
        .find(|entry| entry.table == table)
        .map_or(0, |entry| entry.rows)
}

fn theme_draft(name: &str) -> QuizThemeDraft {
    QuizThemeDraft {
        name: name.to_string(),
        description: None,
    }
}

#[test_log::test(tokio::test)]
async fn theme_with_a_quiz_cannot_be_deleted() {
    let Some(db) = Scratch::open().await else {
        return;
    };
    let state = &db.state;

    let empty = quiz_themes::save_quiz_theme(state, None, theme_draft("Communication"))
        .await
        .unwrap();
    quiz_themes::delete_quiz_theme(State(state.clone()), Path(empty.id), confirmed())
        .await
        .unwrap();
    assert_eq!(db.count("quiz_themes").await, 0);

    let theme = quiz_themes::save_quiz_theme(state, None, theme_draft("Communication"))
        .await
        .unwrap();
    let quiz = quizzes::save_quiz(
        state,
        None,
        QuizDraft {
            theme_id: theme.id,
            title: "Trust Basics".to_string(),
            description: None,
            image: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(quiz.theme_id, theme.id);

    let err = quiz_themes::delete_quiz_theme(State(state.clone()), Path(theme.id), confirmed())
        .await
        .unwrap_err();
    match &err {
        AdminError::HasDependents { title, message, .. } => {
            assert_eq!(title, "Cannot Delete Theme");
            assert!(message.starts_with("This theme has quizzes"));
        }
        other => panic!("unexpected: {:?}", other),
    }
    assert_eq!(err.toast().variant, ToastVariant::Destructive);
    assert_eq!(db.count("quiz_themes").await, 1);

    db.close().await;
}

#[test_log::test(tokio::test)]
async fn created_category_is_listed_first_and_rename_keeps_created_at() {
    let Some(db) = Scratch::open().await else {
        return;
    };
    let state = &db.state;
    let draft = |name: &str, icon: Option<&str>| ServiceCategoryDraft {
        name: name.to_string(),
        description: None,
        icon: icon.map(str::to_string),
    };

    service_categories::save_category(state, None, draft("Dining", None))
        .await
        .unwrap();
    let wellness = service_categories::save_category(state, None, draft("Wellness", Some("🧘")))
        .await
        .unwrap();

    let listed = service_categories::fetch_categories(state, &ListQuery::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, wellness.id);
    assert_eq!(listed[0].icon.as_deref(), Some("🧘"));

    service_categories::save_category(state, Some(wellness.id), draft("Wellness & Spa", Some("🧘")))
        .await
        .unwrap();

    let listed = service_categories::fetch_categories(state, &ListQuery::default())
        .await
        .unwrap();
    assert_eq!(listed[0].id, wellness.id);
    assert_eq!(listed[0].name, "Wellness & Spa");
    assert_eq!(listed[0].created_at, wellness.created_at);

    let search = ListQuery {
        search: Some("SPA".to_string()),
        ..ListQuery::default()
    };
    let found = service_categories::fetch_categories(state, &search).await.unwrap();
    assert_eq!(found.len(), 1);

    db.close().await;
}

#[test_log::test(tokio::test)]
async fn couple_delete_removes_its_rows_in_one_go() {
    let Some(db) = Scratch::open().await else {
        return;
    };
    let (alex, sam, kim) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let (couple, other_couple) = (Uuid::new_v4(), Uuid::new_v4());
    let (question, daily, thread) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    db.exec(&format!(
        r#"
        INSERT INTO profiles (id, name) VALUES ('{alex}', 'Alex'), ('{sam}', 'Sam'), ('{kim}', 'Kim');
        INSERT INTO couples (id, user1_id, user2_id) VALUES ('{couple}', '{alex}', '{sam}');
        INSERT INTO couples (id, user1_id) VALUES ('{other_couple}', '{kim}');
        INSERT INTO questions (id, content) VALUES ('{question}', 'What made you smile today?');
        INSERT INTO daily_questions (id, couple_id, question_id, scheduled_for)
            VALUES ('{daily}', '{couple}', '{question}', '2025-02-14');
        INSERT INTO answers (daily_question_id, user_id) VALUES ('{daily}', '{alex}');
        INSERT INTO chat_threads (id, couple_id) VALUES ('{thread}', '{couple}');
        INSERT INTO chat_messages (thread_id, sender_id) VALUES ('{thread}', '{sam}');
        INSERT INTO calendar_events (couple_id) VALUES ('{couple}');
        INSERT INTO notifications (user_id, data) VALUES
            ('{alex}', '{{"couple_id": "{couple}"}}'),
            ('{alex}', '{{"couple_id": "{other_couple}"}}'),
            ('{sam}', NULL),
            ('{kim}', '{{"couple_id": "{couple}"}}');
        "#
    ))
    .await;

    let response = couples::delete_couple(State(db.state.clone()), Path(couple), confirmed())
        .await
        .unwrap();
    let report = response.0.data.unwrap();

    assert_eq!(removed(&report, "answers"), 1);
    assert_eq!(removed(&report, "chat_messages"), 1);
    assert_eq!(removed(&report, "chat_threads"), 1);
    assert_eq!(removed(&report, "daily_questions"), 1);
    assert_eq!(removed(&report, "calendar_events"), 1);
    assert_eq!(removed(&report, "notifications"), 1);
    assert_eq!(removed(&report, "couples"), 1);

    assert_eq!(db.count("couples").await, 1);
    assert_eq!(db.count("notifications").await, 3);
    assert_eq!(db.count("profiles").await, 3);
    assert_eq!(db.count("questions").await, 1);

    let err = couples::delete_couple(State(db.state.clone()), Path(couple), confirmed())
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::NotFound(_)));

    db.close().await;
}

#[test_log::test(tokio::test)]
async fn user_in_a_couple_is_kept_until_the_couple_is_gone() {
    let Some(db) = Scratch::open().await else {
        return;
    };
    let (alex, sam, couple) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    db.exec(&format!(
        r#"
        INSERT INTO profiles (id, name) VALUES ('{alex}', 'Alex'), ('{sam}', 'Sam');
        INSERT INTO couples (id, user1_id, user2_id) VALUES ('{couple}', '{alex}', '{sam}');
        INSERT INTO pulses (sender_id, receiver_id) VALUES ('{sam}', '{alex}');
        INSERT INTO notification_settings (user_id) VALUES ('{alex}');
        INSERT INTO notifications (user_id, data) VALUES ('{alex}', NULL);
        "#
    ))
    .await;

    let err = users::delete_user(State(db.state.clone()), Path(alex), confirmed())
        .await
        .unwrap_err();
    match &err {
        AdminError::HasDependents { title, message, .. } => {
            assert_eq!(title, "Cannot Delete User");
            assert!(message.starts_with("This user has couple relationships"));
        }
        other => panic!("unexpected: {:?}", other),
    }
    assert_eq!(err.toast().variant, ToastVariant::Default);
    assert_eq!(db.count("profiles").await, 2);
    assert_eq!(db.count("pulses").await, 1);

    couples::delete_couple(State(db.state.clone()), Path(couple), confirmed())
        .await
        .unwrap();

    let response = users::delete_user(State(db.state.clone()), Path(alex), confirmed())
        .await
        .unwrap();
    let report = response.0.data.unwrap();
    assert_eq!(removed(&report, "pulses"), 1);
    assert_eq!(removed(&report, "notification_settings"), 1);
    assert_eq!(removed(&report, "notifications"), 1);
    assert_eq!(removed(&report, "profiles"), 1);
    assert_eq!(db.count("profiles").await, 1);

    db.close().await;
}

#[test_log::test(tokio::test)]
async fn answered_daily_question_is_refused_with_a_notice() {
    let Some(db) = Scratch::open().await else {
        return;
    };
    let (alex, question, daily) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    db.exec(&format!(
        r#"
        INSERT INTO profiles (id, name) VALUES ('{alex}', 'Alex');
        INSERT INTO questions (id, content) VALUES ('{question}', 'Favourite trip together?');
        INSERT INTO daily_questions (id, question_id, scheduled_for)
            VALUES ('{daily}', '{question}', '2025-03-01');
        INSERT INTO answers (daily_question_id, user_id) VALUES ('{daily}', '{alex}');
        "#
    ))
    .await;

    let err = daily_questions::delete_daily_question(State(db.state.clone()), Path(daily), confirmed())
        .await
        .unwrap_err();
    let toast = err.toast();
    assert_eq!(toast.title, "Cannot Delete");
    assert_eq!(toast.variant, ToastVariant::Default);
    assert_eq!(db.count("daily_questions").await, 1);

    db.close().await;
}
