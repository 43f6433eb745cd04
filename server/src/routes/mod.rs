use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, with_security_headers};
use crate::handlers::{events, health_check, registrations, reviews, tickets, users};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    let api = Router::new()
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/:id",
            get(events::show_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/events/:id/check-registration",
            get(registrations::check_registration),
        )
        .route("/events/:id/register", post(registrations::register))
        .route("/events/:id/cancel", post(registrations::cancel_registration))
        .route(
            "/events/:id/reviews",
            get(reviews::list_reviews).post(reviews::submit_review),
        )
        .route("/events/:id/can-review", get(reviews::can_review))
        .route("/user", get(users::current_user))
        .route(
            "/user/registered-events",
            get(registrations::registered_events),
        )
        .route("/tickets", get(tickets::list_tickets))
        .route("/tickets/:id", get(tickets::show_ticket));

    let include_hsts = state.config.production;
    let cors = create_cors_layer(&state.config.cors_allowed_origins);

    let router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .with_state(state);

    with_security_headers(router, include_hsts)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
