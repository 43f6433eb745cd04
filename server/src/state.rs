use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::services::{RegistrationManager, ReviewGate};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub registrations: RegistrationManager,
    pub reviews: ReviewGate,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        Self {
            registrations: RegistrationManager::new(pool.clone()),
            reviews: ReviewGate::new(pool.clone()),
            config: Arc::new(config),
            pool,
        }
    }
}
