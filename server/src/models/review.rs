use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Review row joined with the reviewer's name.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub review: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub reviewer_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Reviewer {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub review: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: Reviewer,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            event_id: row.event_id,
            review: row.review,
            rating: row.rating,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user: Reviewer {
                id: row.user_id,
                name: row.reviewer_name,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitReviewRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_review_body"))]
    pub review: String,
    #[validate(
        required(message = "The rating field is required."),
        range(min = 1, max = 5, message = "The rating must be between 1 and 5.")
    )]
    pub rating: Option<i32>,
}

const MIN_REVIEW_CHARS: usize = 10;

/// At least ten characters once surrounding whitespace is ignored.
fn validate_review_body(review: &str) -> Result<(), validator::ValidationError> {
    if review.trim().chars().count() >= MIN_REVIEW_CHARS {
        return Ok(());
    }
    let mut err = validator::ValidationError::new("length");
    err.message = Some("The review must be at least 10 characters.".into());
    Err(err)
}

/// Body of `GET /events/{id}/reviews`.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewSummary {
    pub reviews: Vec<Review>,
    pub average_rating: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmittedReview {
    pub message: &'static str,
    pub review: Review,
}
