//! Registration rows, one per (event, user).

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::registration::{Registration, RegistrationStatus};

pub async fn status_of<'e, E>(
    executor: E,
    event_id: Uuid,
    user_id: Uuid,
) -> Result<Option<RegistrationStatus>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar::<_, RegistrationStatus>(
        r#"
        SELECT status
        FROM event_registrations
        WHERE event_id = $1 AND user_id = $2
        "#,
    )
    .bind(event_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Whether the user has ever registered for the event.
///
/// Rows are only created as `registered` and cancellation flips the status
/// without deleting, so any row at all means a registration existed.
pub async fn was_ever_registered<'e, E>(
    executor: E,
    event_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM event_registrations WHERE event_id = $1 AND user_id = $2
        )
        "#,
    )
    .bind(event_id)
    .bind(user_id)
    .fetch_one(executor)
    .await
}

/// Number of rows currently holding `registered` for the event.
pub async fn count_registered<'e, E>(executor: E, event_id: Uuid) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM event_registrations
        WHERE event_id = $1 AND status = 'registered'
        "#,
    )
    .bind(event_id)
    .fetch_one(executor)
    .await
}

/// Creates the registration, or flips an existing row back to `registered`.
pub async fn upsert_registered<'e, E>(
    executor: E,
    event_id: Uuid,
    user_id: Uuid,
) -> Result<Registration, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, Registration>(
        r#"
        INSERT INTO event_registrations (event_id, user_id, status)
        VALUES ($1, $2, 'registered')
        ON CONFLICT (event_id, user_id)
        DO UPDATE SET status = 'registered', updated_at = NOW()
        RETURNING id, event_id, user_id, status, created_at, updated_at
        "#,
    )
    .bind(event_id)
    .bind(user_id)
    .fetch_one(executor)
    .await
}

/// Moves a `registered` row to `cancelled`. Returns false if there was none.
pub async fn cancel<'e, E>(executor: E, event_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        UPDATE event_registrations
        SET status = 'cancelled', updated_at = NOW()
        WHERE event_id = $1 AND user_id = $2 AND status = 'registered'
        "#,
    )
    .bind(event_id)
    .bind(user_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}
