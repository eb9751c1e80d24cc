//! Type-safe handles around each store's [`Mailbox`](crate::framework::Mailbox).

pub mod actions_client;
pub mod notification_client;
pub mod session_client;
pub mod store_client;

pub use actions_client::*;
pub use notification_client::*;
pub use session_client::*;
pub use store_client::*;
