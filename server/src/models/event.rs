use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::registration::RegistrationStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_participants: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Applies a partial update in place.
    pub fn apply(&mut self, changes: UpdateEventRequest) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(location) = changes.location {
            self.location = location;
        }
        if let Some(start_date) = changes.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = changes.end_date {
            self.end_date = end_date;
        }
        if let Some(max_participants) = changes.max_participants {
            self.max_participants = max_participants;
        }
    }

    pub fn has_valid_schedule(&self) -> bool {
        self.end_date > self.start_date
    }
}

/// A user attached to an event through a registration row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Participant {
    pub id: Uuid,
    pub name: String,
    pub status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventWithParticipants {
    #[serde(flatten)]
    pub event: Event,
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 255, message = "The title field is required."))]
    pub title: String,
    #[validate(length(min = 1, message = "The description field is required."))]
    pub description: String,
    #[validate(length(min = 1, max = 255, message = "The location field is required."))]
    pub location: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[validate(range(min = 1, message = "The max participants must be at least 1."))]
    pub max_participants: i32,
}

impl CreateEventRequest {
    pub fn has_valid_schedule(&self) -> bool {
        self.end_date > self.start_date
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 255, message = "The title field must not be empty."))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "The description field must not be empty."))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 255, message = "The location field must not be empty."))]
    pub location: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[validate(range(min = 1, message = "The max participants must be at least 1."))]
    pub max_participants: Option<i32>,
}
