//! Background fetcher wired to the search state, as the TUI loop uses it.

use geo_search::geocoding::MockGeocoder;
use geo_search::search::SearchInput;
use geo_search::tui::SuggestionFetcher;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// Scenario: Fetched suggestions flow back into the widget
/// Given a fetcher backed by the mock gazetteer
/// When a settled query is dispatched and its outcome applied
/// Then the widget shows the results with the first row selected
#[tokio::test]
async fn test_dispatch_and_apply() {
    let mock = MockGeocoder::new();
    let (fetcher, mut rx) = SuggestionFetcher::new(Arc::new(mock.clone()));
    let mut input = SearchInput::new(Duration::from_millis(100));
    input.focus();

    let t0 = Instant::now();
    input.set_value("Kreuz", t0);
    let request = input.poll(t0 + Duration::from_millis(100)).unwrap();
    fetcher.dispatch(request);
    assert!(input.is_loading());

    let outcome = timeout(Duration::from_secs(1), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.query, "Kreuz");
    assert!(input.apply_results(outcome.seq, outcome.result));

    assert!(!input.is_loading());
    assert_eq!(input.suggestions()[0].id, "district.kreuzberg");
    assert_eq!(input.selected_index(), Some(0));
    assert_eq!(mock.queries(), vec!["Kreuz".to_string()]);

    fetcher.shutdown().await;
}

/// Scenario: Two overlapping fetches resolve, only the newest is applied
#[tokio::test]
async fn test_overlapping_fetches() {
    let (fetcher, mut rx) = SuggestionFetcher::new(Arc::new(MockGeocoder::new()));
    let mut input = SearchInput::new(Duration::from_millis(100));
    input.focus();

    let t0 = Instant::now();
    input.set_value("Ber", t0);
    fetcher.dispatch(input.poll(t0 + Duration::from_millis(100)).unwrap());
    input.set_value("Harl", t0 + Duration::from_millis(100));
    fetcher.dispatch(input.poll(t0 + Duration::from_millis(200)).unwrap());

    let mut applied = 0;
    for _ in 0..2 {
        let outcome = timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        if input.apply_results(outcome.seq, outcome.result) {
            applied += 1;
        }
    }

    assert_eq!(applied, 1);
    assert_eq!(input.suggestions()[0].id, "neighborhood.harlem");
    fetcher.shutdown().await;
}
