//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by `RUST_LOG`
//! (default `info`). Logs go to stderr so the command line output stays parseable.
//!
//! ## What Gets Traced
//!
//! - **Store Lifecycle**: `Store started` and `Shutdown`, tagged with `store=SessionStore` etc.
//! - **Messages**: every handled message at `debug`
//! - **Network Work**: fetch sequence numbers, loaded pages, failed calls at `warn`
//! - **Navigation**: route changes, including forced redirects after a 401
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs (default)
//! actions-dashboard list
//!
//! # Every store message, including superseded fetches
//! RUST_LOG=debug actions-dashboard list --page 2
//!
//! # Only the stores
//! RUST_LOG=actions_dashboard::framework=debug actions-dashboard status
//! ```
//!
//! With `RUST_LOG=debug` a page change looks like:
//!
//! ```text
//! DEBUG Handle store="ActionsStore" msg=SetPage { page: 2, .. }
//! DEBUG Fetch seq=2 page=2 size=10
//! INFO  Page loaded page=2 items=10 total=37
//! ```
//!
//! Tokens and passwords never appear: the types carrying them redact their `Debug` output.

use tracing_subscriber::EnvFilter;

pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // Store names are logged as a field instead
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
