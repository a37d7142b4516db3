// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! Referential integrity around deletes.
//!
//! Three mechanisms, chosen per screen: a proactive dependent-row probe, a
//! reactive mapping of foreign-key violations, and transactional cascades
//! for couples and users.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{Bool, Text};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AdminError;
use crate::models::Couple;
use crate::schema::{
    answers, calendar_events, calendar_souvenirs, calendar_todos, chat_messages, chat_threads,
    couples, daily_questions, notification_settings, notifications, profiles, pulses,
    quiz_answers, quiz_invites, quiz_results, service_stats,
};

/// Text Postgres puts in SQLSTATE 23503 messages
pub const FK_VIOLATION_TEXT: &str = "violates foreign key constraint";

/// Outcome of probing one dependent table before deleting a parent
#[derive(Debug, Clone)]
pub struct DependentCheck {
    pub table: &'static str,
    pub count: i64,
    pub title: &'static str,
    pub message: &'static str,
}

/// Refuse the delete on the first table that still holds children
pub fn ensure_no_dependents(checks: &[DependentCheck]) -> Result<(), AdminError> {
    match checks.iter().find(|check| check.count > 0) {
        Some(check) => {
            debug!(
                "Delete blocked by {} dependent row(s) in {}",
                check.count, check.table
            );
            Err(AdminError::has_dependents(check.title, check.message))
        }
        None => Ok(()),
    }
}

pub fn is_foreign_key_violation(err: &DieselError) -> bool {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => true,
        DieselError::DatabaseError(_, info) => info.message().contains(FK_VIOLATION_TEXT),
        _ => false,
    }
}

/// Turn a foreign-key violation into a tailored "has dependents" refusal;
/// any other failure keeps the generic message.
pub fn map_delete_error(
    err: DieselError,
    title: &'static str,
    message: &'static str,
    fallback: &'static str,
) -> AdminError {
    if is_foreign_key_violation(&err) {
        AdminError::has_dependents(title, message)
    } else {
        AdminError::database(fallback)(err)
    }
}

/// Rows removed per table by a cascade
#[derive(Debug, Default, Serialize)]
pub struct CascadeReport {
    pub removed: Vec<RemovedRows>,
}

#[derive(Debug, Serialize)]
pub struct RemovedRows {
    pub table: &'static str,
    pub rows: usize,
}

impl CascadeReport {
    fn record(&mut self, table: &'static str, rows: usize) {
        debug!("Cascade removed {} row(s) from {}", rows, table);
        self.removed.push(RemovedRows { table, rows });
    }

    pub fn total(&self) -> usize {
        self.removed.iter().map(|r| r.rows).sum()
    }
}

/// Delete a couple and everything keyed by it in one transaction.
///
/// Returns `None` when the couple does not exist; nothing is removed then.
pub async fn delete_couple_cascade(
    conn: &mut AsyncPgConnection,
    couple_id: Uuid,
) -> QueryResult<Option<CascadeReport>> {
    let report = conn
        .transaction::<_, DieselError, _>(|conn| {
            async move {
                let couple: Option<Couple> = couples::table
                    .find(couple_id)
                    .select(Couple::as_select())
                    .first(conn)
                    .await
                    .optional()?;

                let Some(couple) = couple else {
                    return Ok(None);
                };
                let member_ids: Vec<Uuid> = couple.member_ids().collect();

                let mut report = CascadeReport::default();

                let couple_daily_questions = daily_questions::table
                    .filter(daily_questions::couple_id.eq(couple_id))
                    .select(daily_questions::id.nullable());
                let rows = diesel::delete(
                    answers::table.filter(answers::daily_question_id.eq_any(couple_daily_questions)),
                )
                .execute(conn)
                .await?;
                report.record("answers", rows);

                let couple_threads = chat_threads::table
                    .filter(chat_threads::couple_id.eq(couple_id))
                    .select(chat_threads::id.nullable());
                let rows = diesel::delete(
                    chat_messages::table.filter(chat_messages::thread_id.eq_any(couple_threads)),
                )
                .execute(conn)
                .await?;
                report.record("chat_messages", rows);

                let rows = diesel::delete(
                    chat_threads::table.filter(chat_threads::couple_id.eq(couple_id)),
                )
                .execute(conn)
                .await?;
                report.record("chat_threads", rows);

                let rows = diesel::delete(
                    daily_questions::table.filter(daily_questions::couple_id.eq(couple_id)),
                )
                .execute(conn)
                .await?;
                report.record("daily_questions", rows);

                let rows = diesel::delete(
                    quiz_answers::table.filter(quiz_answers::couple_id.eq(couple_id)),
                )
                .execute(conn)
                .await?;
                report.record("quiz_answers", rows);

                let rows = diesel::delete(
                    quiz_results::table.filter(quiz_results::couple_id.eq(couple_id)),
                )
                .execute(conn)
                .await?;
                report.record("quiz_results", rows);

                let rows = diesel::delete(
                    calendar_events::table.filter(calendar_events::couple_id.eq(couple_id)),
                )
                .execute(conn)
                .await?;
                report.record("calendar_events", rows);

                let rows = diesel::delete(
                    calendar_souvenirs::table.filter(calendar_souvenirs::couple_id.eq(couple_id)),
                )
                .execute(conn)
                .await?;
                report.record("calendar_souvenirs", rows);

                let rows = diesel::delete(
                    calendar_todos::table.filter(calendar_todos::couple_id.eq(couple_id)),
                )
                .execute(conn)
                .await?;
                report.record("calendar_todos", rows);

                // Notifications are keyed by user; only the ones about this couple go
                let rows = diesel::delete(
                    notifications::table
                        .filter(notifications::user_id.eq_any(member_ids))
                        .filter(
                            sql::<Bool>("data->>'couple_id' = ")
                                .bind::<Text, _>(couple_id.to_string()),
                        ),
                )
                .execute(conn)
                .await?;
                report.record("notifications", rows);

                let rows = diesel::delete(couples::table.find(couple_id))
                    .execute(conn)
                    .await?;
                report.record("couples", rows);

                Ok(Some(report))
            }
            .scope_boxed()
        })
        .await?;

    if let Some(report) = &report {
        info!(
            "Deleted couple {} with {} dependent row(s)",
            couple_id,
            report.total().saturating_sub(1)
        );
    }
    Ok(report)
}

/// Remove a profile and the rows keyed by that user in one transaction.
///
/// Callers must check couple membership first; a couple still pointing at
/// the profile makes the final delete fail with a foreign-key violation and
/// rolls the whole cleanup back.
pub async fn delete_profile_with_cleanup(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
) -> QueryResult<CascadeReport> {
    conn.transaction::<_, DieselError, _>(|conn| {
        async move {
            let mut report = CascadeReport::default();

            let rows = diesel::delete(quiz_answers::table.filter(quiz_answers::user_id.eq(user_id)))
                .execute(conn)
                .await?;
            report.record("quiz_answers", rows);

            let rows = diesel::delete(answers::table.filter(answers::user_id.eq(user_id)))
                .execute(conn)
                .await?;
            report.record("answers", rows);

            let rows = diesel::delete(service_stats::table.filter(service_stats::user_id.eq(user_id)))
                .execute(conn)
                .await?;
            report.record("service_stats", rows);

            let rows = diesel::delete(notifications::table.filter(notifications::user_id.eq(user_id)))
                .execute(conn)
                .await?;
            report.record("notifications", rows);

            let rows = diesel::delete(
                notification_settings::table.filter(notification_settings::user_id.eq(user_id)),
            )
            .execute(conn)
            .await?;
            report.record("notification_settings", rows);

            let rows = diesel::delete(
                pulses::table.filter(pulses::sender_id.eq(user_id).or(pulses::receiver_id.eq(user_id))),
            )
            .execute(conn)
            .await?;
            report.record("pulses", rows);

            let rows = diesel::delete(chat_messages::table.filter(chat_messages::sender_id.eq(user_id)))
                .execute(conn)
                .await?;
            report.record("chat_messages", rows);

            let rows = diesel::delete(
                quiz_invites::table.filter(
                    quiz_invites::sender_id
                        .eq(user_id)
                        .or(quiz_invites::receiver_id.eq(user_id)),
                ),
            )
            .execute(conn)
            .await?;
            report.record("quiz_invites", rows);

            let rows = diesel::delete(profiles::table.find(user_id))
                .execute(conn)
                .await?;
            report.record("profiles", rows);

            Ok(report)
        }
        .scope_boxed()
    })
    .await
}
