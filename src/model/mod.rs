//! Pure data structures exchanged with the backend and shown by the stores.

pub mod action;
pub mod auth;
pub mod page;

pub use action::*;
pub use auth::*;
pub use page::*;
