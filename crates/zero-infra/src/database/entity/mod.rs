//! SeaORM entities for the `users` and `todos` tables.

pub mod task;
pub mod user;
