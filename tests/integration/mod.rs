//! Library-level integration tests.

pub mod fetch_test;
pub mod mapbox_test;
pub mod search_flow_test;
