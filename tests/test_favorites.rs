//! Favorites: toggling, idempotency under repeated clicks, and removal.

mod fixtures;
mod mocks;

use fixtures::{listing, user, BUYER};
use mocks::MockSavedPropertyRepository;
use realty_mcp_server::domain::PropertyId;
use realty_mcp_server::error::BackendError;
use realty_mcp_server::services::{FavoriteService, FavoriteServiceImpl};
use realty_mcp_server::{FavoriteTools, Metrics, ToggleOutcome};
use std::sync::Arc;

fn tools(repo: &MockSavedPropertyRepository) -> (FavoriteTools, Metrics) {
    let metrics = Metrics::new();
    let tools = FavoriteTools::new(Arc::new(repo.clone()), metrics.clone());
    (tools, metrics)
}

fn pid(id: &str) -> PropertyId {
    PropertyId::new(id).unwrap()
}

#[tokio::test]
async fn test_toggle_saves_then_removes() {
    let repo = MockSavedPropertyRepository::new();
    let (tools, metrics) = tools(&repo);
    let buyer = user(BUYER);

    let first = tools.toggle(&buyer, &pid("p1")).await.unwrap();
    assert_eq!(first, ToggleOutcome::Saved);
    assert_eq!(first.message(), "Property added to your favorites.");
    assert!(tools.is_saved(&buyer, &pid("p1")).await.unwrap());
    assert_eq!(repo.count_for(BUYER), 1);

    let second = tools.toggle(&buyer, &pid("p1")).await.unwrap();
    assert_eq!(second, ToggleOutcome::Removed);
    assert!(!tools.is_saved(&buyer, &pid("p1")).await.unwrap());
    assert_eq!(repo.count_for(BUYER), 0);

    assert_eq!(metrics.favorites_toggled_total(), 2);
}

#[tokio::test]
async fn test_even_number_of_toggles_returns_to_start() {
    let repo = MockSavedPropertyRepository::new();
    let (tools, _) = tools(&repo);
    let buyer = user(BUYER);

    for _ in 0..6 {
        tools.toggle(&buyer, &pid("p2")).await.unwrap();
    }

    assert!(!tools.is_saved(&buyer, &pid("p2")).await.unwrap());
    assert_eq!(repo.count_for(BUYER), 0);
    assert_eq!(repo.get_call_count("insert"), 3);
    assert_eq!(repo.get_call_count("delete_pair"), 3);
}

#[tokio::test]
async fn test_saved_set_loads_once_from_backend() {
    let repo = MockSavedPropertyRepository::new();
    repo.add_saved(BUYER, "p3");
    let (tools, _) = tools(&repo);
    let buyer = user(BUYER);

    assert!(tools.is_saved(&buyer, &pid("p3")).await.unwrap());
    assert!(!tools.is_saved(&buyer, &pid("p4")).await.unwrap());
    assert_eq!(repo.get_call_count("ids_for_user"), 1);

    // A toggle on an already-saved listing removes it
    let outcome = tools.toggle(&buyer, &pid("p3")).await.unwrap();
    assert_eq!(outcome, ToggleOutcome::Removed);
    assert_eq!(repo.get_call_count("ids_for_user"), 1);
}

#[tokio::test]
async fn test_repeated_click_while_in_flight_is_ignored() {
    let repo = MockSavedPropertyRepository::new();
    let gate = repo.hold_writes();
    let (tools, _) = tools(&repo);
    let buyer = user(BUYER);
    let property = pid("p1");

    let (first, second) = tokio::join!(tools.toggle(&buyer, &property), async {
        let second = tools.toggle(&buyer, &property).await;
        gate.notify_one();
        second
    });

    assert_eq!(first.unwrap(), ToggleOutcome::Saved);
    assert_eq!(second.unwrap(), ToggleOutcome::InFlight);
    assert_eq!(repo.get_call_count("insert"), 1);
    assert_eq!(repo.count_for(BUYER), 1);

    // Once the request resolved the next click goes through again
    repo.release_writes();
    let third = tools.toggle(&buyer, &property).await.unwrap();
    assert_eq!(third, ToggleOutcome::Removed);
}

#[tokio::test]
async fn test_in_flight_clears_after_request_resolves() {
    let repo = MockSavedPropertyRepository::new();
    let (tools, _) = tools(&repo);
    let buyer = user(BUYER);

    assert_eq!(
        tools.toggle(&buyer, &pid("p1")).await.unwrap(),
        ToggleOutcome::Saved
    );
    assert_eq!(
        tools.toggle(&buyer, &pid("p1")).await.unwrap(),
        ToggleOutcome::Removed
    );
    assert_eq!(
        tools.toggle(&buyer, &pid("p1")).await.unwrap(),
        ToggleOutcome::Saved
    );
}

#[tokio::test]
async fn test_duplicate_insert_counts_as_saved() {
    let repo = MockSavedPropertyRepository::new();
    let (tools, _) = tools(&repo);
    let buyer = user(BUYER);

    // Load an empty set, then the row appears behind our back (another tab)
    assert!(!tools.is_saved(&buyer, &pid("p5")).await.unwrap());
    repo.add_saved(BUYER, "p5");

    let outcome = tools.toggle(&buyer, &pid("p5")).await.unwrap();
    assert_eq!(outcome, ToggleOutcome::Saved);
    assert!(tools.is_saved(&buyer, &pid("p5")).await.unwrap());
    assert_eq!(repo.count_for(BUYER), 1);
}

#[tokio::test]
async fn test_failed_toggle_reports_message_and_keeps_state() {
    let repo = MockSavedPropertyRepository::new();
    repo.fail_writes(true);
    let (tools, metrics) = tools(&repo);
    let buyer = user(BUYER);

    let err = tools.toggle(&buyer, &pid("p1")).await.unwrap_err();
    match &err {
        BackendError::ActionFailed(msg) => {
            assert_eq!(msg, "Failed to update favorites. Please try again.")
        }
        other => panic!("Expected ActionFailed, got {:?}", other),
    }
    assert_eq!(err.user_message(), "Failed to update favorites. Please try again.");
    assert!(!tools.is_saved(&buyer, &pid("p1")).await.unwrap());
    assert_eq!(metrics.favorites_toggled_total(), 0);

    // The failed request no longer counts as in flight
    repo.fail_writes(false);
    assert_eq!(
        tools.toggle(&buyer, &pid("p1")).await.unwrap(),
        ToggleOutcome::Saved
    );
}

#[tokio::test]
async fn test_users_have_separate_sets() {
    let repo = MockSavedPropertyRepository::new();
    let (tools, _) = tools(&repo);

    tools.toggle(&user("alice"), &pid("p1")).await.unwrap();

    assert!(tools.is_saved(&user("alice"), &pid("p1")).await.unwrap());
    assert!(!tools.is_saved(&user("bob"), &pid("p1")).await.unwrap());
}

#[tokio::test]
async fn test_service_requires_sign_in() {
    let repo = MockSavedPropertyRepository::new();
    let (tools, _) = tools(&repo);
    let service = FavoriteServiceImpl::new(tools, None);

    match service.toggle("p1").await {
        Err(BackendError::SignInRequired(msg)) => {
            assert_eq!(msg, "Please sign in to save properties.")
        }
        other => panic!("Expected SignInRequired, got {:?}", other),
    }
    assert!(service.list().await.is_err());
    assert_eq!(repo.get_call_count("insert"), 0);
}

#[tokio::test]
async fn test_service_rejects_blank_ids() {
    let repo = MockSavedPropertyRepository::new();
    let (tools, _) = tools(&repo);
    let service = FavoriteServiceImpl::new(tools, Some(user(BUYER)));

    assert!(matches!(
        service.toggle("   ").await,
        Err(BackendError::InvalidRequest(_))
    ));
    assert!(matches!(
        service.remove("").await,
        Err(BackendError::InvalidRequest(_))
    ));
}

#[tokio::test]
async fn test_list_and_remove_by_saved_id() {
    let repo = MockSavedPropertyRepository::new();
    repo.add_listing(listing(
        "p1",
        "Modern Downtown Condo",
        850_000.0,
        "condo",
        2,
        "Austin",
        "TX",
        "2024-01-05T00:00:00Z",
    ));
    let saved_id = repo.add_saved(BUYER, "p1");
    repo.add_saved(BUYER, "gone");
    let (tools, _) = tools(&repo);
    let service = FavoriteServiceImpl::new(tools.clone(), Some(user(BUYER)));

    let favorites = service.list().await.unwrap();
    assert_eq!(favorites.len(), 2);
    let joined = favorites.iter().find(|f| f.id == saved_id).unwrap();
    assert_eq!(
        joined.property.as_ref().map(|p| p.title.as_str()),
        Some("Modern Downtown Condo")
    );
    assert!(favorites.iter().any(|f| f.property.is_none()));

    assert!(tools.is_saved(&user(BUYER), &pid("p1")).await.unwrap());
    service.remove(&saved_id).await.unwrap();
    assert!(!tools.is_saved(&user(BUYER), &pid("p1")).await.unwrap());

    match service.remove(&saved_id).await {
        Err(BackendError::NotFound(_)) => {}
        other => panic!("Expected NotFound, got {:?}", other),
    }
}
