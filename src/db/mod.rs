//! Account persistence.
//!
//! `UserRepository` is the seam every component talks to; `DbOperations` backs it with
//! Postgres and `MemoryUserStore` keeps everything in process.

pub mod memory;
pub mod models;
pub mod operations;
pub mod repository;

pub use memory::MemoryUserStore;
pub use models::{ExperienceLevel, NewUser, ProfileUpdate, TokenPair, User, UserType};
pub use operations::DbOperations;
pub use repository::UserRepository;
