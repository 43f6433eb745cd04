//! Event reviews, one per (user, event).

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::review::ReviewRow;

pub async fn exists<'e, E>(executor: E, event_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM event_reviews WHERE event_id = $1 AND user_id = $2
        )
        "#,
    )
    .bind(event_id)
    .bind(user_id)
    .fetch_one(executor)
    .await
}

/// Inserts the review unless the user already reviewed the event, in which
/// case `None` is returned.
pub async fn insert<'e, E>(
    executor: E,
    event_id: Uuid,
    user_id: Uuid,
    body: &str,
    rating: i32,
) -> Result<Option<ReviewRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, ReviewRow>(
        r#"
        WITH inserted AS (
            INSERT INTO event_reviews (event_id, user_id, review, rating)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, event_id) DO NOTHING
            RETURNING id, user_id, event_id, review, rating, created_at, updated_at
        )
        SELECT i.id, i.user_id, i.event_id, i.review, i.rating, i.created_at, i.updated_at,
               u.name AS reviewer_name
        FROM inserted i
        JOIN users u ON u.id = i.user_id
        "#,
    )
    .bind(event_id)
    .bind(user_id)
    .bind(body)
    .bind(rating)
    .fetch_optional(executor)
    .await
}

/// Reviews for the event, most recent first.
pub async fn list_for_event<'e, E>(executor: E, event_id: Uuid) -> Result<Vec<ReviewRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, ReviewRow>(
        r#"
        SELECT r.id, r.user_id, r.event_id, r.review, r.rating, r.created_at, r.updated_at,
               u.name AS reviewer_name
        FROM event_reviews r
        JOIN users u ON u.id = r.user_id
        WHERE r.event_id = $1
        ORDER BY r.created_at DESC, r.id DESC
        "#,
    )
    .bind(event_id)
    .fetch_all(executor)
    .await
}

/// Mean rating, `None` when the event has no reviews.
pub async fn average_rating<'e, E>(executor: E, event_id: Uuid) -> Result<Option<f64>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar::<_, Option<f64>>(
        r#"
        SELECT AVG(rating)::FLOAT8
        FROM event_reviews
        WHERE event_id = $1
        "#,
    )
    .bind(event_id)
    .fetch_one(executor)
    .await
}
