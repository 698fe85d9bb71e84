//! geosearch - Debounced place search for the terminal.
//!
//! This library exposes the core modules for use in integration tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod logging;
pub mod search;
pub mod tui;
