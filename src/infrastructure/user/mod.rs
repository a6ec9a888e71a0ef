//! User infrastructure module
//!
//! Document-backed implementation of the user store.

mod store;

pub use store::DocumentUserStore;
