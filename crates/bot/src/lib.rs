//! SIGMA community bot library.
//!
//! Exposes configuration, the application context, command dispatch, the
//! Discord gateway glue and the liveness HTTP server so integration tests
//! and the binary entrypoint can both access them.

pub mod config;
pub mod discord;
pub mod dispatch;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;
