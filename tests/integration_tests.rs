// Integration tests for the session coordinator against a mocked
// document store

use carousel::core::RatingLedger;
use carousel::models::RatingValue;
use carousel::services::{EventStoreClient, SessionCoordinator, SessionError, StoreCollections};
use mockito::{Matcher, Server, ServerGuard};
use std::sync::Arc;

fn store_client(base_url: &str) -> Arc<EventStoreClient> {
    Arc::new(EventStoreClient::new(
        base_url.to_string(),
        "test-key".to_string(),
        "test-project".to_string(),
        "main".to_string(),
        StoreCollections {
            events: "events".to_string(),
            registrations: "registrations".to_string(),
            users: "users".to_string(),
        },
    ))
}

fn coordinator(base_url: &str) -> SessionCoordinator {
    SessionCoordinator::new(store_client(base_url), Arc::new(RatingLedger::new()), 300)
}

async fn mock_active_event(server: &mut ServerGuard) {
    server
        .mock("GET", "/databases/main/collections/events/documents/event1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"event1","title":"Spring Mixer","status":"active"}"#)
        .create_async()
        .await;
}

async fn mock_checked_in_pool(server: &mut ServerGuard) {
    server
        .mock("GET", "/databases/main/collections/registrations/documents")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"total":5,"documents":[
                {"userId":"m0","eventId":"event1","status":"checked-in"},
                {"userId":"m1","eventId":"event1","status":"checked-in"},
                {"userId":"f0","eventId":"event1","status":"checked-in"},
                {"userId":"f1","eventId":"event1","status":"checked-in"},
                {"userId":"m9","eventId":"event1","status":"registered"}
            ]}"#,
        )
        .create_async()
        .await;

    server
        .mock("GET", "/databases/main/collections/users/documents")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"total":5,"documents":[
                {"id":"m0","name":"Marc","gender":"male","interestedIn":"female","age":29},
                {"id":"m1","name":"Noah","gender":"male","interestedIn":"female","age":31},
                {"id":"f0","name":"Ava","gender":"female","interestedIn":"male","age":28},
                {"id":"f1","name":"Mia","gender":"female","interestedIn":"male","age":30},
                {"id":"m9","name":"Late Guy","gender":"male","interestedIn":"female","age":27}
            ]}"#,
        )
        .create_async()
        .await;
}

#[tokio::test]
async fn test_full_session_flow() {
    let mut server = Server::new_async().await;
    mock_active_event(&mut server).await;
    mock_checked_in_pool(&mut server).await;

    let coordinator = coordinator(&server.url());

    // Round 1: index-wise pairing of the two-group pool
    let round1 = coordinator.start_session("event1").await.unwrap();
    assert_eq!(round1.round_number, 1);
    assert_eq!(round1.pairs.len(), 2);
    assert!(round1.waiting.is_empty());

    // m9 never checked in and must not be in the pool
    assert!(!round1.pairs.iter().any(|p| p.contains("m9")));

    // Participant view
    let view = coordinator.current_pairing_for("event1", "m0").await.unwrap();
    assert!(!view.waiting);
    let partner = view.partner.unwrap();

    // Both sides rate each other interested
    coordinator
        .submit_rating("event1", "m0", &partner.id, RatingValue::Interested, None)
        .await
        .unwrap();
    coordinator
        .submit_rating(
            "event1",
            &partner.id,
            "m0",
            RatingValue::Interested,
            Some("great conversation".to_string()),
        )
        .await
        .unwrap();

    let progress = coordinator.progress_summary("event1").await.unwrap();
    assert_eq!(progress.active_pairs, 2);
    assert_eq!(progress.rating_progress.both, 1);
    assert_eq!(progress.rating_progress.none, 1);

    // Round 2 replaces every pair atomically
    let round2 = coordinator.rotate_partners("event1").await.unwrap();
    assert_eq!(round2.round_number, 2);
    for pair in &round2.pairs {
        let repeated = round1
            .pairs
            .iter()
            .any(|p| p.contains(&pair.left.id) && p.contains(&pair.right.id));
        assert!(!repeated);
    }

    // Ending the session keeps matches queryable
    let ended = coordinator.end_session("event1").await.unwrap();
    assert_eq!(ended.rounds_completed, 2);

    let event_matches = coordinator.matches_for_event("event1").await;
    assert_eq!(event_matches.count, 1);

    // No further rotation once ended
    assert!(matches!(
        coordinator.rotate_partners("event1").await,
        Err(SessionError::InvalidState(_))
    ));
}

#[tokio::test]
async fn test_start_rejected_for_inactive_event() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/databases/main/collections/events/documents/event1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"event1","title":"Spring Mixer","status":"upcoming"}"#)
        .create_async()
        .await;

    let coordinator = coordinator(&server.url());
    assert!(matches!(
        coordinator.start_session("event1").await,
        Err(SessionError::InvalidState(_))
    ));
}

#[tokio::test]
async fn test_store_outage_surfaces_as_collaborator_unavailable() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/databases/main/collections/events/documents/event1")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let coordinator = coordinator(&server.url());
    assert!(matches!(
        coordinator.start_session("event1").await,
        Err(SessionError::CollaboratorUnavailable(_))
    ));
}

#[tokio::test]
async fn test_rotate_without_session_is_invalid_state() {
    let server = Server::new_async().await;
    let coordinator = coordinator(&server.url());

    assert!(matches!(
        coordinator.rotate_partners("event1").await,
        Err(SessionError::InvalidState(_))
    ));
    assert!(matches!(
        coordinator.end_session("event1").await,
        Err(SessionError::InvalidState(_))
    ));
}

#[tokio::test]
async fn test_double_start_is_rejected() {
    let mut server = Server::new_async().await;
    mock_active_event(&mut server).await;
    mock_checked_in_pool(&mut server).await;

    let coordinator = coordinator(&server.url());
    coordinator.start_session("event1").await.unwrap();

    assert!(matches!(
        coordinator.start_session("event1").await,
        Err(SessionError::InvalidState(_))
    ));
}

#[tokio::test]
async fn test_rating_outside_pool_rejected() {
    let mut server = Server::new_async().await;
    mock_active_event(&mut server).await;
    mock_checked_in_pool(&mut server).await;

    let coordinator = coordinator(&server.url());
    coordinator.start_session("event1").await.unwrap();

    let result = coordinator
        .submit_rating("event1", "m0", "ghost", RatingValue::Interested, None)
        .await;
    assert!(matches!(result, Err(SessionError::InvalidParticipant(_))));
}

#[tokio::test]
async fn test_self_rating_rejected_through_coordinator() {
    let mut server = Server::new_async().await;
    mock_active_event(&mut server).await;
    mock_checked_in_pool(&mut server).await;

    let coordinator = coordinator(&server.url());
    coordinator.start_session("event1").await.unwrap();

    let result = coordinator
        .submit_rating("event1", "m0", "m0", RatingValue::Interested, None)
        .await;
    assert!(matches!(result, Err(SessionError::InvalidParticipant(_))));
}

#[tokio::test]
async fn test_unknown_participant_view_rejected() {
    let mut server = Server::new_async().await;
    mock_active_event(&mut server).await;
    mock_checked_in_pool(&mut server).await;

    let coordinator = coordinator(&server.url());
    coordinator.start_session("event1").await.unwrap();

    assert!(matches!(
        coordinator.current_pairing_for("event1", "ghost").await,
        Err(SessionError::InvalidParticipant(_))
    ));
}
