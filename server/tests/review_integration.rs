//! Review eligibility and listing against a live PostgreSQL database.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    create_test_app, create_test_pool, create_upcoming_event, create_user, end_event,
    json_request, parse_response_body,
};
use eventhub_server::models::review::SubmitReviewRequest;
use eventhub_server::services::{RegistrationManager, ReviewError, ReviewGate};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

fn request(review: &str, rating: i32) -> SubmitReviewRequest {
    SubmitReviewRequest {
        review: review.to_string(),
        rating: Some(rating),
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_full_attendance_and_review_flow() {
    let pool = create_test_pool().await;
    let alice = create_user(&pool, "Alice", false).await;
    let bob = create_user(&pool, "Bob", false).await;
    let event_id = create_upcoming_event(&pool, 1).await;
    let register_uri = format!("/api/events/{}/register", event_id);
    let cancel_uri = format!("/api/events/{}/cancel", event_id);
    let reviews_uri = format!("/api/events/{}/reviews", event_id);

    let response = create_test_app(pool.clone())
        .oneshot(json_request(Method::POST, &register_uri, &alice.token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = create_test_app(pool.clone())
        .oneshot(json_request(Method::POST, &register_uri, &bob.token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"]["code"], "CAPACITY_EXCEEDED");

    let response = create_test_app(pool.clone())
        .oneshot(json_request(Method::POST, &cancel_uri, &alice.token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = create_test_app(pool.clone())
        .oneshot(json_request(Method::POST, &register_uri, &bob.token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Reviews only open once the event is over.
    let review = json!({ "review": "Great event, well organized", "rating": 4 });
    let response = create_test_app(pool.clone())
        .oneshot(json_request(Method::POST, &reviews_uri, &alice.token, Some(review.clone())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"]["code"], "EVENT_NOT_ENDED");

    end_event(&pool, event_id).await;

    // Alice cancelled, but she was registered once and may still review.
    let response = create_test_app(pool.clone())
        .oneshot(json_request(Method::POST, &reviews_uri, &alice.token, Some(review.clone())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Review submitted successfully");
    assert_eq!(body["review"]["rating"], 4);
    assert_eq!(body["review"]["user"]["name"], "Alice");

    let response = create_test_app(pool.clone())
        .oneshot(json_request(Method::POST, &reviews_uri, &alice.token, Some(review)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"]["code"], "ALREADY_REVIEWED");

    let response = create_test_app(pool.clone())
        .oneshot(json_request(Method::GET, &reviews_uri, &bob.token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["reviews"].as_array().unwrap().len(), 1);
    assert_eq!(body["average_rating"], 4.0);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_non_attendee_is_forbidden() {
    let pool = create_test_pool().await;
    let stranger = create_user(&pool, "Mallory", false).await;
    let event_id = create_upcoming_event(&pool, 5).await;
    end_event(&pool, event_id).await;

    let response = create_test_app(pool.clone())
        .oneshot(json_request(
            Method::POST,
            &format!("/api/events/{}/reviews", event_id),
            &stranger.token,
            Some(json!({ "review": "I was never there at all", "rating": 1 })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_cancelled_registration_can_still_review() {
    let pool = create_test_pool().await;
    let user = create_user(&pool, "Niaj", false).await;
    let event_id = create_upcoming_event(&pool, 5).await;
    let manager = RegistrationManager::new(pool.clone());
    manager.register(event_id, user.id).await.unwrap();
    manager.cancel(event_id, user.id).await.unwrap();
    end_event(&pool, event_id).await;

    let gate = ReviewGate::new(pool.clone());
    assert!(gate.can_review(event_id, user.id).await.unwrap());

    let review = gate
        .submit(event_id, user.id, request("Left early but enjoyed it", 3))
        .await
        .unwrap();
    assert_eq!(review.rating, 3);
    assert!(!gate.can_review(event_id, user.id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_whitespace_padded_review_is_trimmed() {
    let pool = create_test_pool().await;
    let user = create_user(&pool, "Ivan", false).await;
    let event_id = create_upcoming_event(&pool, 5).await;
    RegistrationManager::new(pool.clone())
        .register(event_id, user.id)
        .await
        .unwrap();
    end_event(&pool, event_id).await;
    let gate = ReviewGate::new(pool.clone());

    assert!(matches!(
        gate.submit(event_id, user.id, request("            ", 4)).await,
        Err(ReviewError::Invalid(_))
    ));

    let review = gate
        .submit(event_id, user.id, request("   Well run, thanks!   ", 4))
        .await
        .unwrap();
    assert_eq!(review.review, "Well run, thanks!");
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_invalid_review_is_rejected_with_field_details() {
    let pool = create_test_pool().await;
    let user = create_user(&pool, "Olivia", false).await;
    let event_id = create_upcoming_event(&pool, 5).await;
    RegistrationManager::new(pool.clone())
        .register(event_id, user.id)
        .await
        .unwrap();
    end_event(&pool, event_id).await;

    let response = create_test_app(pool.clone())
        .oneshot(json_request(
            Method::POST,
            &format!("/api/events/{}/reviews", event_id),
            &user.token,
            Some(json!({ "review": "Too short", "rating": 6 })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["review"].is_array());
    assert!(body["error"]["details"]["rating"].is_array());

    // Nothing was stored, so the user may still review.
    let gate = ReviewGate::new(pool.clone());
    assert!(gate.can_review(event_id, user.id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_average_rating_and_ordering() {
    let pool = create_test_pool().await;
    let event_id = create_upcoming_event(&pool, 10).await;
    let manager = RegistrationManager::new(pool.clone());
    let gate = ReviewGate::new(pool.clone());

    let empty = gate.list(event_id).await.unwrap();
    assert!(empty.reviews.is_empty());
    assert_eq!(empty.average_rating, 0.0);

    let mut users = Vec::new();
    for name in ["Peggy", "Rupert", "Sybil"] {
        let user = create_user(&pool, name, false).await;
        manager.register(event_id, user.id).await.unwrap();
        users.push(user);
    }
    end_event(&pool, event_id).await;

    for (user, rating) in users.iter().zip([4, 4, 3]) {
        gate.submit(event_id, user.id, request("Solid talks and good coffee", rating))
            .await
            .unwrap();
    }

    let summary = gate.list(event_id).await.unwrap();
    assert_eq!(summary.reviews.len(), 3);
    assert_eq!(summary.average_rating, 3.7);
    // Newest first.
    assert_eq!(summary.reviews[0].user.name, "Sybil");
    assert_eq!(summary.reviews[2].user.name, "Peggy");

    for user in &users {
        assert!(!gate.can_review(event_id, user.id).await.unwrap());
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_can_review_endpoint() {
    let pool = create_test_pool().await;
    let user = create_user(&pool, "Trent", false).await;
    let event_id = create_upcoming_event(&pool, 5).await;
    let uri = format!("/api/events/{}/can-review", event_id);

    RegistrationManager::new(pool.clone())
        .register(event_id, user.id)
        .await
        .unwrap();

    let response = create_test_app(pool.clone())
        .oneshot(json_request(Method::GET, &uri, &user.token, None))
        .await
        .unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body["can_review"], false);

    end_event(&pool, event_id).await;

    let response = create_test_app(pool.clone())
        .oneshot(json_request(Method::GET, &uri, &user.token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["can_review"], true);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_reviews_for_unknown_event() {
    let pool = create_test_pool().await;
    let user = create_user(&pool, "Victor", false).await;

    let response = create_test_app(pool.clone())
        .oneshot(json_request(
            Method::GET,
            &format!("/api/events/{}/reviews", Uuid::new_v4()),
            &user.token,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
