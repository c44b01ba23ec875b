//! In-memory todo collection and its domain rules.
//!
//! # Overview
//! `TodoStore` owns every `Todo` and hands out ids from a counter that never
//! goes backwards. The crate has no I/O and no async; the HTTP layer lives in
//! `todo-server` and talks to the store through the types re-exported here.
//!
//! # Design
//! - Text is trimmed and must be non-blank, on create and on update.
//! - Timestamps come from an injected `Clock` so tests can pin them.
//! - The store is a plain value; whoever shares it across threads supplies
//!   the lock.

pub mod clock;
pub mod error;
pub mod store;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::StoreError;
pub use store::TodoStore;
pub use types::{to_iso8601, CreateTodo, Todo, TodoStats, UpdateTodo};
