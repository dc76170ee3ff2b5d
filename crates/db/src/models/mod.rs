//! Row structs and update DTOs.

pub mod user;
