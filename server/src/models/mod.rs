pub mod event;
pub mod registration;
pub mod review;
pub mod ticket;
pub mod user;
