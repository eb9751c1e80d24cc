//! # Actions Dashboard
//!
//! > **The state layer of a small admin dashboard, as Tokio store actors.**
//!
//! The dashboard has a login screen backed by token authentication and a paginated listing
//! (with a create form) of one resource, the *actions*. This crate holds everything below the
//! screens: the session, the listing, the toasts, and the reconciliation of an inconsistent
//! backend into one stable model.
//!
//! ## 🏗️ Design
//!
//! ### One writer per store
//! Each store owns its state inside a single Tokio task and handles its messages one at a
//! time, so no state is ever locked. Handlers never await: network calls are spawned and their
//! results come back as ordinary messages. A page click can therefore be handled while an
//! earlier page is still loading, and the fetch issued **last** is the one applied (every fetch
//! carries a sequence number; stale results are discarded on arrival).
//!
//! ### Snapshots for readers
//! After each message the store publishes an immutable snapshot through a `watch` channel.
//! Screens read the latest snapshot or wait for the next one; they never see a half-applied
//! update.
//!
//! ### Injected collaborators
//! The backend ([`api::AuthApi`], [`api::ActionsApi`]), the token storage
//! ([`storage::KeyValueStore`]), timers ([`framework::Scheduler`]) and navigation
//! ([`api::Navigator`]) are traits. Production wiring uses HTTP, a JSON file and Tokio timers;
//! tests use channel mocks, memory storage and a virtual clock.
//!
//! ### Errors never reach the screens raw
//! Failed listings settle into the store state with a readable message; the message is picked
//! out of the error body by [`api::extract_error_message`]. A 401 from the API host clears the
//! token and redirects to the login screen ([`api::AuthGuard`]).
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Role**: the generic store loop, mailboxes and timers.
//! - **Key items**: [`Store`](framework::Store), [`StoreActor`](framework::StoreActor),
//!   [`ManualScheduler`](framework::ManualScheduler).
//!
//! ### 2. The Stores ([`session_store`], [`actions_store`], [`notification_store`])
//! - **Role**: concrete implementations of the `Store` trait.
//!
//! ### 3. The Interface ([`clients`])
//! - **Role**: typed handles that hide message passing and run form validation
//!   ([`validation`]) before anything is sent.
//! - **Key items**: [`SessionClient`](clients::SessionClient),
//!   [`ActionsClient`](clients::ActionsClient), [`NotificationClient`](clients::NotificationClient).
//!
//! ### 4. The Boundary ([`api`], [`normalizer`], [`storage`], [`model`])
//! - **Role**: the backend and its wire formats, the response normalizer, token persistence.
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`config`])
//! - **Role**: reads the configuration, wires the stores, runs the page flows, shuts down.
//! - **Key items**: [`Dashboard`](lifecycle::Dashboard), [`setup_tracing`](lifecycle::tracing::setup_tracing).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Log in once; the token is kept in .actions-dashboard/session.json
//! actions-dashboard login --username admin@example.com --password secret1
//!
//! # Browse
//! RUST_LOG=debug actions-dashboard list --page 2 --page-size 20
//! ```

pub mod actions_store;
pub mod api;
pub mod clients;
pub mod config;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod normalizer;
pub mod notification_store;
pub mod session_store;
pub mod storage;
pub mod validation;
