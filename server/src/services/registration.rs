//! Registration manager: status checks, capacity-guarded registration and
//! cancellation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::event::EventWithParticipants;
use crate::models::registration::{RegistrationCheck, RegistrationReceipt, RegistrationStatus};
use crate::models::ticket::RegisteredEvent;
use crate::repositories::{events, registrations, tickets};
use crate::services::tickets::issue_ticket;
use crate::utils::error::AppError;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Event not found")]
    EventNotFound,

    #[error("You are already registered for this event")]
    AlreadyRegistered,

    #[error("Event has reached maximum participants")]
    CapacityExceeded,

    #[error("Event has already ended")]
    EventEnded,

    #[error("You are not registered for this event")]
    NotRegistered,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<RegistrationError> for AppError {
    fn from(err: RegistrationError) -> Self {
        let message = err.to_string();
        match err {
            RegistrationError::EventNotFound => AppError::NotFound(message),
            RegistrationError::AlreadyRegistered => {
                AppError::Conflict("ALREADY_REGISTERED", message)
            }
            RegistrationError::CapacityExceeded => AppError::Conflict("CAPACITY_EXCEEDED", message),
            RegistrationError::EventEnded => AppError::Precondition("EVENT_ENDED", message),
            RegistrationError::NotRegistered => AppError::Precondition("NOT_REGISTERED", message),
            RegistrationError::Database(e) => AppError::DatabaseError(e),
        }
    }
}

/// What the register preconditions are evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationSnapshot {
    pub status: Option<RegistrationStatus>,
    pub registered_count: i64,
    pub max_participants: i32,
    pub end_date: DateTime<Utc>,
}

impl RegistrationSnapshot {
    pub fn is_registered(&self) -> bool {
        self.status == Some(RegistrationStatus::Registered)
    }

    pub fn is_open(&self) -> bool {
        self.registered_count < i64::from(self.max_participants)
    }

    /// Checks, in order: not already registered, a free slot, not ended.
    pub fn ensure_can_register(&self, now: DateTime<Utc>) -> Result<(), RegistrationError> {
        if self.is_registered() {
            return Err(RegistrationError::AlreadyRegistered);
        }
        if !self.is_open() {
            return Err(RegistrationError::CapacityExceeded);
        }
        if now >= self.end_date {
            return Err(RegistrationError::EventEnded);
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct RegistrationManager {
    pool: PgPool,
}

impl RegistrationManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn check_status(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<RegistrationCheck, RegistrationError> {
        let event = events::find_by_id(&self.pool, event_id)
            .await?
            .ok_or(RegistrationError::EventNotFound)?;
        let status = registrations::status_of(&self.pool, event_id, user_id).await?;
        let registered_count = registrations::count_registered(&self.pool, event_id).await?;

        let snapshot = RegistrationSnapshot {
            status,
            registered_count,
            max_participants: event.max_participants,
            end_date: event.end_date,
        };

        Ok(RegistrationCheck {
            registered: snapshot.is_registered(),
            registration_open: snapshot.is_open(),
            current_participants: registered_count,
            max_participants: event.max_participants,
        })
    }

    /// Registers `user_id` and issues a fresh ticket in one transaction.
    ///
    /// The event row is locked before the count is read, so concurrent
    /// registrations for the same event are serialized and can never push
    /// the registered count past `max_participants`.
    pub async fn register(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        let mut tx = self.pool.begin().await?;

        let event = events::lock_by_id(&mut *tx, event_id)
            .await?
            .ok_or(RegistrationError::EventNotFound)?;
        let snapshot = RegistrationSnapshot {
            status: registrations::status_of(&mut *tx, event_id, user_id).await?,
            registered_count: registrations::count_registered(&mut *tx, event_id).await?,
            max_participants: event.max_participants,
            end_date: event.end_date,
        };

        if let Err(err) = snapshot.ensure_can_register(Utc::now()) {
            tracing::info!(%event_id, %user_id, reason = %err, "Registration rejected");
            return Err(err);
        }

        registrations::upsert_registered(&mut *tx, event_id, user_id).await?;
        let ticket = issue_ticket(&mut *tx, user_id, event_id).await?;
        let participants = events::participants(&mut *tx, event_id).await?;

        tx.commit().await?;

        tracing::info!(
            %event_id,
            %user_id,
            ticket_id = %ticket.id,
            registered = snapshot.registered_count + 1,
            capacity = event.max_participants,
            "User registered for event"
        );

        Ok(RegistrationReceipt {
            message: "Successfully registered for the event",
            event: EventWithParticipants {
                event,
                participants,
            },
            ticket,
        })
    }

    /// Cancels the registration and every active ticket for it.
    pub async fn cancel(&self, event_id: Uuid, user_id: Uuid) -> Result<(), RegistrationError> {
        let mut tx = self.pool.begin().await?;

        events::lock_by_id(&mut *tx, event_id)
            .await?
            .ok_or(RegistrationError::EventNotFound)?;

        if !registrations::cancel(&mut *tx, event_id, user_id).await? {
            return Err(RegistrationError::NotRegistered);
        }
        let cancelled_tickets = tickets::cancel_active(&mut *tx, event_id, user_id).await?;

        tx.commit().await?;

        tracing::info!(%event_id, %user_id, cancelled_tickets, "Registration cancelled");
        Ok(())
    }

    pub async fn registered_events(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RegisteredEvent>, RegistrationError> {
        Ok(tickets::registered_events(&self.pool, user_id).await?)
    }
}
