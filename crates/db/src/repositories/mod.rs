//! Data access for the `users` table.

pub mod user_repo;

pub use user_repo::UserRepo;
