//! Review gate: who may review an event, and the review listing.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::models::review::{Review, ReviewSummary, SubmitReviewRequest};
use crate::repositories::{events, registrations, reviews};
use crate::utils::error::AppError;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Event not found")]
    EventNotFound,

    #[error("Cannot review an event that hasn't ended yet")]
    EventNotEnded,

    #[error("You must have attended the event to leave a review")]
    NotAttended,

    #[error("Invalid review: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("You have already reviewed this event")]
    AlreadyReviewed,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        let message = err.to_string();
        match err {
            ReviewError::EventNotFound => AppError::NotFound(message),
            ReviewError::EventNotEnded => AppError::Precondition("EVENT_NOT_ENDED", message),
            ReviewError::NotAttended => AppError::Forbidden(message),
            ReviewError::Invalid(errors) => AppError::InvalidFields(errors),
            ReviewError::AlreadyReviewed => AppError::Conflict("ALREADY_REVIEWED", message),
            ReviewError::Database(e) => AppError::DatabaseError(e),
        }
    }
}

/// Whether a (user, event) pair has passed the time and attendance checks.
///
/// `ever_registered` is historical: a registration that was later cancelled
/// still counts.
pub fn ensure_eligible(
    end_date: DateTime<Utc>,
    ever_registered: bool,
    now: DateTime<Utc>,
) -> Result<(), ReviewError> {
    if now <= end_date {
        return Err(ReviewError::EventNotEnded);
    }
    if !ever_registered {
        return Err(ReviewError::NotAttended);
    }
    Ok(())
}

/// Mean rounded to one decimal place; 0.0 when there is nothing to average.
pub fn round_average(average: Option<f64>) -> f64 {
    average
        .map(|avg| (avg * 10.0).round() / 10.0)
        .unwrap_or(0.0)
}

#[derive(Clone)]
pub struct ReviewGate {
    pool: PgPool,
}

impl ReviewGate {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn can_review(&self, event_id: Uuid, user_id: Uuid) -> Result<bool, ReviewError> {
        let event = events::find_by_id(&self.pool, event_id)
            .await?
            .ok_or(ReviewError::EventNotFound)?;
        let ever_registered =
            registrations::was_ever_registered(&self.pool, event_id, user_id).await?;

        if ensure_eligible(event.end_date, ever_registered, Utc::now()).is_err() {
            return Ok(false);
        }
        Ok(!reviews::exists(&self.pool, event_id, user_id).await?)
    }

    /// Records a review after the eligibility, input and uniqueness checks.
    ///
    /// The insert is conditional on the (user, event) constraint, so a
    /// concurrent duplicate submission still ends in `AlreadyReviewed`.
    pub async fn submit(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        request: SubmitReviewRequest,
    ) -> Result<Review, ReviewError> {
        let mut tx = self.pool.begin().await?;

        let event = events::find_by_id(&mut *tx, event_id)
            .await?
            .ok_or(ReviewError::EventNotFound)?;
        let ever_registered =
            registrations::was_ever_registered(&mut *tx, event_id, user_id).await?;
        ensure_eligible(event.end_date, ever_registered, Utc::now())?;

        request.validate()?;
        let Some(rating) = request.rating else {
            let mut errors = validator::ValidationErrors::new();
            errors.add("rating", validator::ValidationError::new("required"));
            return Err(ReviewError::Invalid(errors));
        };

        if reviews::exists(&mut *tx, event_id, user_id).await? {
            return Err(ReviewError::AlreadyReviewed);
        }
        let row = reviews::insert(&mut *tx, event_id, user_id, request.review.trim(), rating)
            .await?
            .ok_or(ReviewError::AlreadyReviewed)?;

        tx.commit().await?;

        tracing::info!(%event_id, %user_id, review_id = %row.id, rating, "Review submitted");
        Ok(row.into())
    }

    pub async fn list(&self, event_id: Uuid) -> Result<ReviewSummary, ReviewError> {
        events::find_by_id(&self.pool, event_id)
            .await?
            .ok_or(ReviewError::EventNotFound)?;

        let rows = reviews::list_for_event(&self.pool, event_id).await?;
        let average = reviews::average_rating(&self.pool, event_id).await?;

        Ok(ReviewSummary {
            reviews: rows.into_iter().map(Review::from).collect(),
            average_rating: round_average(average),
        })
    }
}
