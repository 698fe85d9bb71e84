//! Headless binary tests.

pub mod common;
pub mod headless_test;
pub mod search_test;
