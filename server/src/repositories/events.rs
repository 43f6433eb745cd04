//! Event catalog queries.

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::event::{CreateEventRequest, Event, Participant};

pub async fn list<'e, E>(executor: E) -> Result<Vec<Event>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, Event>(
        r#"
        SELECT id, title, description, location, start_date, end_date, max_participants,
               created_at, updated_at
        FROM events
        ORDER BY start_date ASC
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Event>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, Event>(
        r#"
        SELECT id, title, description, location, start_date, end_date, max_participants,
               created_at, updated_at
        FROM events
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Reads the event and takes a row lock on it until the transaction ends.
///
/// Every writer that changes the set of registered participants goes
/// through this lock first, so capacity checks made afterwards in the same
/// transaction cannot be invalidated by a concurrent registration.
/// `NO KEY UPDATE` still admits the `KEY SHARE` locks taken by foreign-key
/// inserts (reviews, tickets) against the event.
pub async fn lock_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Event>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, Event>(
        r#"
        SELECT id, title, description, location, start_date, end_date, max_participants,
               created_at, updated_at
        FROM events
        WHERE id = $1
        FOR NO KEY UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn insert<'e, E>(executor: E, new: &CreateEventRequest) -> Result<Event, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, Event>(
        r#"
        INSERT INTO events (title, description, location, start_date, end_date, max_participants)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, title, description, location, start_date, end_date, max_participants,
                  created_at, updated_at
        "#,
    )
    .bind(&new.title)
    .bind(&new.description)
    .bind(&new.location)
    .bind(new.start_date)
    .bind(new.end_date)
    .bind(new.max_participants)
    .fetch_one(executor)
    .await
}

/// Writes every mutable column of `event`. Returns `None` if the row is gone.
pub async fn update<'e, E>(executor: E, event: &Event) -> Result<Option<Event>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, Event>(
        r#"
        UPDATE events
        SET title = $2, description = $3, location = $4, start_date = $5, end_date = $6,
            max_participants = $7, updated_at = NOW()
        WHERE id = $1
        RETURNING id, title, description, location, start_date, end_date, max_participants,
                  created_at, updated_at
        "#,
    )
    .bind(event.id)
    .bind(&event.title)
    .bind(&event.description)
    .bind(&event.location)
    .bind(event.start_date)
    .bind(event.end_date)
    .bind(event.max_participants)
    .fetch_optional(executor)
    .await
}

/// Deletes the event; registrations, tickets and reviews cascade.
pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Everyone with a registration row for the event, in any status.
pub async fn participants<'e, E>(executor: E, event_id: Uuid) -> Result<Vec<Participant>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, Participant>(
        r#"
        SELECT u.id, u.name, r.status, r.created_at AS registered_at
        FROM event_registrations r
        JOIN users u ON u.id = r.user_id
        WHERE r.event_id = $1
        ORDER BY r.created_at ASC
        "#,
    )
    .bind(event_id)
    .fetch_all(executor)
    .await
}
