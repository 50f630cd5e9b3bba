//! Account listing, lookup and profile updates.

pub mod handlers;

pub use handlers::{get_user, list_users, update_user, ListUsersQuery};
