use pointgate::application::coordinator::AdmissionCoordinator;
use pointgate::domain::ports::{AdmissionStoreHandle, SequencerHandle};
use pointgate::error::AdmissionError;
use pointgate::infrastructure::in_memory::{InMemoryAdmissionStore, InMemorySequencer};
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::sync::Arc;

fn new_coordinator(capacity: u64) -> (Arc<AdmissionCoordinator>, AdmissionStoreHandle) {
    let store: AdmissionStoreHandle = Arc::new(InMemoryAdmissionStore::new());
    let sequencer: SequencerHandle = Arc::new(InMemorySequencer::new());
    let coordinator = Arc::new(AdmissionCoordinator::new(
        sequencer,
        Arc::clone(&store),
        capacity,
    ));
    (coordinator, store)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_capacity_invariant_under_concurrency() {
    let capacity = 50u64;
    let (coordinator, store) = new_coordinator(capacity);

    let mut user_ids: Vec<u64> = (1..=200).collect();
    user_ids.shuffle(&mut rand::thread_rng());

    let mut tasks = Vec::new();
    for user_id in user_ids {
        let coordinator = Arc::clone(&coordinator);
        tasks.push(tokio::spawn(async move { coordinator.apply(user_id).await }));
    }

    let mut admitted = 0usize;
    let mut closed = 0usize;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(AdmissionError::ApplicationClosed) => closed += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(admitted, capacity as usize);
    assert_eq!(closed, 150);

    let records = store.all_records().await.unwrap();
    assert_eq!(records.len(), capacity as usize);

    let orders: HashSet<i64> = records.iter().map(|r| r.order).collect();
    assert_eq!(orders, (1..=capacity as i64).collect::<HashSet<_>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_exact_fill_assigns_every_order_once() {
    let capacity = 100u64;
    let (coordinator, store) = new_coordinator(capacity);

    let mut tasks = Vec::new();
    for user_id in 1..=capacity {
        let coordinator = Arc::clone(&coordinator);
        tasks.push(tokio::spawn(async move { coordinator.apply(user_id).await }));
    }

    for task in tasks {
        task.await.unwrap().expect("every distinct user must be admitted");
    }

    let records = store.all_records().await.unwrap();
    assert_eq!(records.len(), capacity as usize);

    let orders: HashSet<i64> = records.iter().map(|r| r.order).collect();
    assert_eq!(orders, (1..=capacity as i64).collect::<HashSet<_>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_duplicate_user_resolves_to_one_success() {
    // Repeated rounds to exercise different interleavings of the race.
    for _ in 0..20 {
        let (coordinator, store) = new_coordinator(10);

        let first = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.apply(7).await })
        };
        let second = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.apply(7).await })
        };

        let outcomes = [first.await.unwrap(), second.await.unwrap()];
        let successes = outcomes.iter().filter(|o| o.is_ok()).count();
        let duplicates = outcomes
            .iter()
            .filter(|o| matches!(o, Err(AdmissionError::DuplicateUser(7))))
            .count();

        assert_eq!(successes, 1);
        assert_eq!(duplicates, 1);
        assert_eq!(store.all_records().await.unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_over_capacity_user_is_rejected_as_closed() {
    let capacity = 5u64;
    let (coordinator, _) = new_coordinator(capacity);

    for user_id in 1..=capacity {
        coordinator.apply(user_id).await.unwrap();
    }

    let err = coordinator.apply(capacity + 1).await.unwrap_err();
    assert!(matches!(err, AdmissionError::ApplicationClosed));
}

#[tokio::test]
async fn test_reward_tiers_follow_assignment_order() {
    let (coordinator, _) = new_coordinator(10_000);

    let first = coordinator.apply(1).await.unwrap();
    assert_eq!(first.order, 1);
    assert_eq!(first.amount, 100_000);

    for user_id in 2..=101 {
        coordinator.apply(user_id).await.unwrap();
    }

    // The 101st admission falls into the second tier.
    let record = coordinator.apply(500).await.unwrap();
    assert_eq!(record.order, 102);
    assert_eq!(record.amount, 50_000);
}
