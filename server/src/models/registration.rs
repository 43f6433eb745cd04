use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::event::EventWithParticipants;
use crate::models::ticket::Ticket;

/// Maps to the `registration_status` PostgreSQL enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "registration_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Registered,
    Cancelled,
    Attended,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: RegistrationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `GET /events/{id}/check-registration`.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationCheck {
    pub registered: bool,
    pub registration_open: bool,
    pub current_participants: i64,
    pub max_participants: i32,
}

/// Result of a successful registration.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationReceipt {
    pub message: &'static str,
    pub event: EventWithParticipants,
    pub ticket: Ticket,
}
