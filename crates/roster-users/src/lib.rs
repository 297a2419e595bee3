//! User records for Roster: types, validation, and in-memory storage.
//!
//! This crate holds everything about users that does not depend on HTTP:
//! the [`UserRecord`] shape, the pure validators that turn a raw JSON body
//! into a [`NewUser`] or [`UserPatch`], and the [`UserStore`] that owns the
//! records and hands out ids.

mod error;
mod store;
mod user;
pub mod validation;

pub use error::UserError;
pub use store::UserStore;
pub use user::{NewUser, UserField, UserPatch, UserRecord};
pub use validation::{validate_create, validate_update, MissingFields, ValidationFailure};

/// Result type for user store operations.
pub type Result<T> = std::result::Result<T, UserError>;
