//! Domain logic for the SIGMA community bot.
//!
//! Everything in this crate is pure: no database access, no network, no
//! clock. Callers supply the current date and the persisted state, and get
//! back decisions and display payloads.

pub mod attendance;
pub mod error;
pub mod join;
pub mod reply;
pub mod types;
pub mod user;
