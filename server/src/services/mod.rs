//! The registration workflow: capacity-checked registration, ticket
//! issuance and the review gate.

pub mod registration;
pub mod review;
pub mod tickets;

pub use registration::{RegistrationError, RegistrationManager};
pub use review::{ReviewError, ReviewGate};
