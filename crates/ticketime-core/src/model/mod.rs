pub mod deadline;
pub mod ticket;

pub use deadline::{CompletionState, DeadlineKind, DeadlineSet};
pub use ticket::{Category, Ticket, TicketDraft, derive_ticket_id};
