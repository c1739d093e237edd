//! Board-mutation engine and board store for a Kanban application.
//!
//! [`engine`] holds the pure operations on a board's lists and cards,
//! [`storage`] persists boards under a string-keyed store, and [`session`]
//! ties the two together so every accepted change is written exactly once.

pub mod boards;
pub mod config;
pub mod engine;
pub mod ids;
pub mod search;
pub mod session;
pub mod stats;
pub mod storage;
pub mod types;

pub use engine::{Mutation, MutationError};
pub use session::{BoardSession, SessionError, Workspace};
