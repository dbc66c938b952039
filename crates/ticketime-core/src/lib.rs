//! ticketime-core library.
//!
//! Deadline arithmetic for support tickets under a business-hours calendar,
//! plus the JSON-backed store the `tkt` CLI drives.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums per concern, each mapping to an
//!   [`error::ErrorCode`].
//! - **Logging**: `tracing` macros only; subscribers are installed by binaries.
//! - **Clock**: nothing in this crate reads the wall clock. Operations that
//!   depend on the current instant take `now` as an argument.

pub mod calendar;
pub mod config;
pub mod countdown;
pub mod engine;
pub mod error;
pub mod lock;
pub mod model;
pub mod store;

pub use calendar::BusinessCalendar;
pub use countdown::Countdown;
pub use engine::DeadlineEngine;
pub use error::{DeadlineError, ErrorCode};
pub use model::{Category, CompletionState, DeadlineKind, DeadlineSet, Ticket, TicketDraft};
pub use store::{ListQuery, SortOrder, StoreError, TicketEntry, TicketStats, TicketStore};
