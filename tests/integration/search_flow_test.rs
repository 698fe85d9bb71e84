//! Search input scenarios driven end to end with the mock geocoder.
//!
//! Time is injected, so each scenario controls exactly when the quiet period
//! ends and when results arrive.

use geo_search::error::GeoSearchError;
use geo_search::geocoding::{Geocoder, MockGeocoder, Suggestion};
use geo_search::search::{SearchAction, SearchInput};
use crossterm::event::KeyCode;
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};

const DEBOUNCE: Duration = Duration::from_millis(500);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn focused_input() -> SearchInput {
    let mut input = SearchInput::new(DEBOUNCE);
    input.focus();
    input
}

/// Polls at `now` and, if a fetch is due, resolves it against `geocoder`.
async fn settle(input: &mut SearchInput, geocoder: &MockGeocoder, now: Instant) {
    if let Some(request) = input.poll(now) {
        let result = geocoder.search(&request.query).await;
        input.apply_results(request.seq, result);
    }
}

/// Scenario: Pick the third of three results with the keyboard
/// Given the geocoder answers "Paris" with three features
/// When the user types "Paris", waits, presses Down twice and Enter
/// Then the third feature is selected
#[tokio::test]
async fn test_keyboard_selection_of_third_feature() {
    let geocoder = MockGeocoder::new();
    let mut input = focused_input();
    let t0 = Instant::now();

    input.set_value("Paris", t0);
    settle(&mut input, &geocoder, t0 + DEBOUNCE).await;
    assert_eq!(input.suggestions().len(), 3);
    assert_eq!(input.selected_index(), Some(0));
    assert!(input.is_open());

    assert_eq!(input.handle_key(KeyCode::Down), None);
    assert_eq!(input.handle_key(KeyCode::Down), None);
    let action = input.handle_key(KeyCode::Enter);

    match action {
        Some(SearchAction::Select(place)) => {
            assert_eq!(place.id, "place.paris-tn");
            assert_eq!(place.context.as_deref(), Some("Tennessee"));
        }
        other => panic!("Expected a selection, got {other:?}"),
    }
}

/// Scenario: A typing burst sends one request
/// Given keystrokes "P", "Pa", "Par" 100ms apart
/// When 500ms pass after the last one
/// Then exactly one request with query "Par" is made
#[tokio::test]
async fn test_typing_burst_sends_single_request() {
    let geocoder = MockGeocoder::new();
    let mut input = focused_input();
    let t0 = Instant::now();

    for (i, text) in ["P", "Pa", "Par"].iter().enumerate() {
        let at = t0 + ms(100 * i as u64);
        input.set_value(text, at);
        settle(&mut input, &geocoder, at).await;
    }
    settle(&mut input, &geocoder, t0 + ms(699)).await;
    assert!(geocoder.queries().is_empty());

    settle(&mut input, &geocoder, t0 + ms(700)).await;
    assert_eq!(geocoder.queries(), vec!["Par".to_string()]);
    assert_eq!(input.requests_issued(), 1);
}

/// Scenario: Clearing the text empties the list
/// Given a populated list
/// When the user presses Esc and the parent applies the change
/// Then the text is empty, the list is empty and the panel is hidden
#[tokio::test]
async fn test_escape_clears_everything() {
    let geocoder = MockGeocoder::new();
    let mut input = focused_input();
    let t0 = Instant::now();

    input.set_value("Lon", t0);
    settle(&mut input, &geocoder, t0 + DEBOUNCE).await;
    assert!(!input.suggestions().is_empty());

    let Some(SearchAction::ChangeText(text)) = input.handle_key(KeyCode::Esc) else {
        panic!("Esc should ask the parent to clear the text");
    };
    assert_eq!(text, "");
    input.set_value(&text, t0 + DEBOUNCE);

    assert!(input.suggestions().is_empty());
    assert_eq!(input.selected_index(), None);
    assert!(!input.is_open());

    // Nothing further is fetched for the empty query.
    settle(&mut input, &geocoder, t0 + DEBOUNCE * 3).await;
    assert_eq!(geocoder.queries(), vec!["Lon".to_string()]);
}

/// Scenario: A slow response for an old query is ignored
/// Given a request for "Par" still in flight
/// When the user settles on "Lyon" and its results arrive first
/// Then the late "Par" results do not replace the "Lyon" list
#[tokio::test]
async fn test_late_response_for_old_query_is_dropped() {
    let geocoder = MockGeocoder::new();
    let mut input = focused_input();
    let t0 = Instant::now();

    input.set_value("Par", t0);
    let old = input.poll(t0 + DEBOUNCE).unwrap();

    input.set_value("Lyon", t0 + DEBOUNCE);
    let new = input.poll(t0 + DEBOUNCE * 2).unwrap();
    assert!(new.seq > old.seq);

    let lyon = geocoder.search(&new.query).await;
    assert!(input.apply_results(new.seq, lyon));
    let paris = geocoder.search(&old.query).await;
    assert!(!input.apply_results(old.seq, paris));

    let labels: Vec<&str> = input.suggestions().iter().map(|s| s.text.as_str()).collect();
    assert_eq!(labels, vec!["Lyon"]);
}

/// Scenario: Pointer hover, leave and click
/// Given three suggestions
/// When the pointer enters row 2, leaves it, and row 1 is clicked
/// Then the selection follows the pointer and the click selects row 1
#[tokio::test]
async fn test_pointer_interaction() {
    let geocoder = MockGeocoder::new();
    let mut input = focused_input();
    let t0 = Instant::now();

    input.set_value("Paris", t0);
    settle(&mut input, &geocoder, t0 + DEBOUNCE).await;

    input.hover(2);
    assert_eq!(input.selected_index(), Some(2));
    input.leave(2);
    assert_eq!(input.selected_index(), None);
    assert_eq!(input.handle_key(KeyCode::Enter), None);

    match input.click(1) {
        Some(SearchAction::Select(place)) => assert_eq!(place.id, "place.paris-tx"),
        other => panic!("Expected a selection, got {other:?}"),
    }
}

/// Scenario: Failures keep the list, malformed bodies empty it
/// Given a populated list
/// When a later lookup times out
/// Then the list is kept and an error is reported once
/// When a later lookup returns an undecodable body
/// Then the list is emptied
#[tokio::test]
async fn test_failure_and_malformed_handling() {
    let geocoder = MockGeocoder::new()
        .with_response("Soho", vec![Suggestion::new("locality.soho", "Soho")])
        .with_failure("Sohox", "Request timed out. Try again.")
        .with_malformed("Sohoxy");
    let mut input = focused_input();
    let t0 = Instant::now();

    input.set_value("Soho", t0);
    settle(&mut input, &geocoder, t0 + DEBOUNCE).await;
    assert_eq!(input.suggestions().len(), 1);

    input.set_value("Sohox", t0 + DEBOUNCE);
    settle(&mut input, &geocoder, t0 + DEBOUNCE * 2).await;
    assert_eq!(input.suggestions().len(), 1);
    let error = input.take_error().unwrap();
    assert!(error.contains("Request timed out"));
    assert_eq!(input.take_error(), None);
    assert!(!input.is_loading());

    input.set_value("Sohoxy", t0 + DEBOUNCE * 2);
    settle(&mut input, &geocoder, t0 + DEBOUNCE * 3).await;
    assert!(input.suggestions().is_empty());
    assert!(!input.is_open());
}

#[tokio::test]
async fn test_malformed_error_variant() {
    let geocoder = MockGeocoder::new().with_malformed("x");
    let err = geocoder.search("x").await.unwrap_err();
    assert!(matches!(err, GeoSearchError::MalformedResponse(_)));
    assert_eq!(err.category(), "Response Error");
}
