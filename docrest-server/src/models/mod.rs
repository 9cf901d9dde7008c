//! Entities served over HTTP.

pub mod user;

pub use user::{Approval, Attack, User, UserStatus};
