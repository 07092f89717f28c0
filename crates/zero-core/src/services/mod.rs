//! Application services - the rules that sit between the HTTP surface and
//! the ports.

mod auth;
mod tasks;
mod users;

pub use auth::{AccessToken, AuthService, TOKEN_TYPE};
pub use tasks::TaskStore;
pub use users::{EMAIL_TAKEN, USERNAME_OR_EMAIL_TAKEN, USERNAME_TAKEN, UserDirectory};
