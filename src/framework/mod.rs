//! Generic store framework.
//!
//! This module provides the building blocks shared by every store: a single-writer actor
//! loop, its mailbox, snapshot publishing and the timer abstraction.
//!
//! # Main Components
//!
//! - [`Store`] - Trait that a piece of state implements to be driven by a store actor
//! - [`StoreActor`] - Generic task that owns a store and processes its messages
//! - [`Mailbox`] / [`WeakMailbox`] - Sending halves of a store's channel
//! - [`Scheduler`] - Cancelable one-shot timers ([`TokioScheduler`], [`ManualScheduler`])
//!
//! # Testing
//!
//! [`ManualScheduler`] replaces real time in tests; see [`crate::api::mock`] for the
//! HTTP collaborators.

pub mod core;
pub mod scheduler;

pub use core::*;
pub use scheduler::*;
