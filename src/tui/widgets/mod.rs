//! TUI widgets for geosearch.

pub mod header;
pub mod place_panel;
pub mod search_bar;
pub mod spinner;
pub mod suggestions;
pub mod toast;
