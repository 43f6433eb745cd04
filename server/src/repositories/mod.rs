//! Data access for the event, registration, ticket, review and user tables.
//!
//! Every function is generic over the executor so it can run against the
//! pool or inside a caller-owned transaction (`&mut *tx`).

pub mod events;
pub mod registrations;
pub mod reviews;
pub mod tickets;
pub mod users;
