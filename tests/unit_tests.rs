// Unit tests for the Carousel matching core

use carousel::core::{assign_round, PairingHistory, RotationScheduler, SchedulerState};
use carousel::core::{RatingLedger, SchedulerError};
use carousel::models::{MutualMatch, Participant, Rating, RatingValue};
use chrono::Utc;
use std::collections::HashSet;

fn participant(id: &str, gender: &str, interested_in: &str) -> Participant {
    Participant {
        id: id.to_string(),
        name: format!("User {}", id),
        gender: gender.to_string(),
        interested_in: interested_in.to_string(),
        age: 27,
        checked_in: true,
    }
}

fn hetero_pool(males: usize, females: usize) -> Vec<Participant> {
    let mut pool = Vec::new();
    for i in 0..males {
        pool.push(participant(&format!("m{}", i), "male", "female"));
    }
    for i in 0..females {
        pool.push(participant(&format!("f{}", i), "female", "male"));
    }
    pool
}

fn rating(rater: &str, ratee: &str, value: RatingValue) -> Rating {
    Rating {
        rater_id: rater.to_string(),
        ratee_id: ratee.to_string(),
        event_id: "event1".to_string(),
        rating: value,
        notes: None,
        created_at: Utc::now(),
    }
}

#[test]
fn test_compatibility_invariant_over_many_rounds() {
    let mut pool = hetero_pool(6, 8);
    pool.push(participant("n0", "nonbinary", "nonbinary"));
    pool.push(participant("n1", "nonbinary", "nonbinary"));

    let mut history = PairingHistory::default();
    for round in 1..=10 {
        let assignment = assign_round(&pool, round, &history, Utc::now());
        for pair in &assignment.pairs {
            assert!(
                pair.left.compatible_with(&pair.right),
                "incompatible pair in round {}",
                round
            );
            assert_ne!(pair.left.id, pair.right.id);
        }
        history.record(&assignment);
    }
}

#[test]
fn test_no_duplicate_pairs_for_min_group_rounds() {
    // |A| = 4, |B| = 7: four rounds without any repeated pairing
    let pool = hetero_pool(4, 7);
    let mut scheduler = RotationScheduler::new(300);
    let mut seen = HashSet::new();

    let first = scheduler.start(pool).unwrap();
    for pair in &first.pairs {
        assert!(seen.insert((pair.left.id.clone(), pair.right.id.clone())));
    }

    for round in 2..=4 {
        let assignment = scheduler.rotate().unwrap();
        assert_eq!(assignment.pairs.len(), 4);
        for pair in &assignment.pairs {
            assert!(
                seen.insert((pair.left.id.clone(), pair.right.id.clone())),
                "pair repeated in round {}",
                round
            );
        }
    }
}

#[test]
fn test_basic_rotation_scenario() {
    let pool = hetero_pool(3, 3);
    let mut scheduler = RotationScheduler::new(300);

    let round1: Vec<(String, String)> = scheduler
        .start(pool)
        .unwrap()
        .pairs
        .iter()
        .map(|p| (p.left.id.clone(), p.right.id.clone()))
        .collect();
    assert_eq!(
        round1,
        vec![
            ("m0".to_string(), "f0".to_string()),
            ("m1".to_string(), "f1".to_string()),
            ("m2".to_string(), "f2".to_string()),
        ]
    );

    let round2: Vec<(String, String)> = scheduler
        .rotate()
        .unwrap()
        .pairs
        .iter()
        .map(|p| (p.left.id.clone(), p.right.id.clone()))
        .collect();
    assert_eq!(
        round2,
        vec![
            ("m0".to_string(), "f2".to_string()),
            ("m1".to_string(), "f0".to_string()),
            ("m2".to_string(), "f1".to_string()),
        ]
    );
}

#[test]
fn test_uneven_pool_scenario() {
    let pool = hetero_pool(2, 3);
    let mut scheduler = RotationScheduler::new(300);

    let assignment = scheduler.start(pool).unwrap();
    assert_eq!(assignment.pairs.len(), 2);
    assert_eq!(assignment.waiting.len(), 1);
}

#[test]
fn test_state_machine_legality() {
    let mut scheduler = RotationScheduler::new(300);

    assert!(matches!(
        scheduler.rotate(),
        Err(SchedulerError::InvalidState(_))
    ));
    assert!(matches!(
        scheduler.end(),
        Err(SchedulerError::InvalidState(_))
    ));
    assert_eq!(scheduler.round(), 0);
    assert_eq!(scheduler.state(), SchedulerState::Idle);
}

#[tokio::test]
async fn test_idempotent_rating() {
    let ledger = RatingLedger::new();

    ledger
        .submit(rating("a", "b", RatingValue::Interested))
        .await
        .unwrap();
    ledger
        .submit(rating("b", "a", RatingValue::Interested))
        .await
        .unwrap();
    let before = ledger.matches_for_event("event1").await;

    // Same submission again changes nothing
    ledger
        .submit(rating("a", "b", RatingValue::Interested))
        .await
        .unwrap();
    let after = ledger.matches_for_event("event1").await;
    assert_eq!(before, after);

    // A changed rating overwrites rather than appends
    ledger
        .submit(rating("a", "b", RatingValue::NotInterested))
        .await
        .unwrap();
    assert_eq!(ledger.ratings_for_event("event1").await.len(), 2);
    assert!(ledger.matches_for_event("event1").await.is_empty());
}

#[tokio::test]
async fn test_match_detection_scenario() {
    let ledger = RatingLedger::new();

    ledger
        .submit(rating("a", "b", RatingValue::Interested))
        .await
        .unwrap();
    ledger.submit(rating("b", "a", RatingValue::Maybe)).await.unwrap();
    assert!(!ledger.is_mutual_match("a", "b", "event1").await);

    ledger
        .submit(rating("b", "a", RatingValue::Interested))
        .await
        .unwrap();
    assert!(ledger.is_mutual_match("a", "b", "event1").await);
    assert_eq!(
        ledger.matches_for_event("event1").await,
        vec![MutualMatch::new("a", "b")]
    );
}

#[tokio::test]
async fn test_mutual_match_symmetry() {
    let ledger = RatingLedger::new();
    ledger
        .submit(rating("a", "b", RatingValue::Interested))
        .await
        .unwrap();

    assert_eq!(
        ledger.is_mutual_match("a", "b", "event1").await,
        ledger.is_mutual_match("b", "a", "event1").await
    );
}

#[tokio::test]
async fn test_self_rating_rejected() {
    let ledger = RatingLedger::new();
    let result = ledger.submit(rating("a", "a", RatingValue::Interested)).await;
    assert!(result.is_err());
}

#[test]
fn test_ratings_survive_session_end() {
    let pool = hetero_pool(3, 3);
    let mut scheduler = RotationScheduler::new(300);
    scheduler.start(pool).unwrap();
    scheduler.end().unwrap();

    // The scheduler no longer exposes pairs, but nothing it does can
    // touch ledger state; this is a structural guarantee (the ledger is
    // a separate component), asserted here against the session pool.
    assert!(scheduler.current().pairs.is_empty());
    assert_eq!(scheduler.pool().len(), 6);
}
