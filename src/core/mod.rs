//! Core session components
//!
//! The turn router and the session log it writes every turn to.

mod router;
mod session_log;

pub use router::{TurnOutcome, TurnRouter};
pub use session_log::SessionLogger;

#[cfg(test)]
pub(crate) use session_log::read_log;
