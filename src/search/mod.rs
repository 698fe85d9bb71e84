//! The place-search widget core.
//!
//! Text in, debounced fetch requests out, suggestions back in, and a
//! selection cursor driven by keys and the pointer.

pub mod debounce;
pub mod state;

pub use debounce::Debouncer;
pub use state::{FetchRequest, SearchAction, SearchInput};
