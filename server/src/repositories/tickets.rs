//! Ticket rows.

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::ticket::{RegisteredEvent, Ticket, TicketWithEvent};

/// Inserts an active ticket unless `ticket_code` is already taken, in which
/// case `None` is returned and the surrounding transaction stays usable.
pub async fn insert_if_code_free<'e, E>(
    executor: E,
    user_id: Uuid,
    event_id: Uuid,
    ticket_code: &str,
) -> Result<Option<Ticket>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, Ticket>(
        r#"
        INSERT INTO tickets (user_id, event_id, ticket_code, status)
        VALUES ($1, $2, $3, 'active')
        ON CONFLICT (ticket_code) DO NOTHING
        RETURNING id, user_id, event_id, ticket_code, status, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(event_id)
    .bind(ticket_code)
    .fetch_optional(executor)
    .await
}

/// Cancels the user's active tickets for the event. Returns how many changed.
pub async fn cancel_active<'e, E>(executor: E, event_id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        UPDATE tickets
        SET status = 'cancelled', updated_at = NOW()
        WHERE event_id = $1 AND user_id = $2 AND status = 'active'
        "#,
    )
    .bind(event_id)
    .bind(user_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Events the user holds an active ticket for, soonest first.
pub async fn registered_events<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<RegisteredEvent>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, RegisteredEvent>(
        r#"
        SELECT e.id, e.title, e.description, e.location, e.start_date, e.end_date,
               e.max_participants, t.ticket_code
        FROM tickets t
        JOIN events e ON e.id = t.event_id
        WHERE t.user_id = $1 AND t.status = 'active'
        ORDER BY e.start_date ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// All of the user's tickets in any status, newest first.
pub async fn list_for_user<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<TicketWithEvent>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, TicketWithEvent>(
        r#"
        SELECT t.id, e.id AS event_id, e.title, e.description, e.location, e.start_date,
               e.end_date, e.max_participants, t.ticket_code, t.status
        FROM tickets t
        JOIN events e ON e.id = t.event_id
        WHERE t.user_id = $1
        ORDER BY t.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// One ticket, only if it belongs to `user_id`.
pub async fn find_for_user<'e, E>(
    executor: E,
    ticket_id: Uuid,
    user_id: Uuid,
) -> Result<Option<TicketWithEvent>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, TicketWithEvent>(
        r#"
        SELECT t.id, e.id AS event_id, e.title, e.description, e.location, e.start_date,
               e.end_date, e.max_participants, t.ticket_code, t.status
        FROM tickets t
        JOIN events e ON e.id = t.event_id
        WHERE t.id = $1 AND t.user_id = $2
        "#,
    )
    .bind(ticket_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}
