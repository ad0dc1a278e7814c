//! Driving port for user record management.
//!
//! Inbound adapters call [`UserDirectory`] to list, fetch, create, replace,
//! patch, delete and search user records. The port speaks in domain types
//! and reports failures as [`UserDirectoryError`] so adapters can choose
//! their own status mapping.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{MinimumAge, User, UserDraft, UserId, UserPatch, UserViolations};

use super::define_port_error;

define_port_error! {
    /// Failures surfaced by [`UserDirectory`] operations.
    pub enum UserDirectoryError {
        /// No record carries the requested identifier.
        NotFound { id: UserId } => "User not found with id: {id}",
        /// The birth date implies an age below the configured minimum.
        InvalidAge { minimum_age: MinimumAge } => "Users must be at least {minimum_age} years old",
        /// One or more field rules are broken.
        ValidationFailed { violations: UserViolations } => "{violations}",
        /// The search range starts after it ends.
        InvalidRange { from: NaiveDate, to: NaiveDate } =>
            "Swap the dates. First must be less than equal to second date",
    }
}

/// Confirmation returned by a successful delete.
pub const USER_DELETED_MESSAGE: &str = "User deleted successfully.";

/// Domain use-case port for user record management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Return every record in insertion order.
    async fn list(&self) -> Vec<User>;

    /// Fetch the record with identifier `id`.
    async fn get(&self, id: UserId) -> Result<User, UserDirectoryError>;

    /// Validate and store a new record, assigning the next identifier.
    async fn create(&self, draft: UserDraft) -> Result<User, UserDirectoryError>;

    /// Replace every field of record `id`; the identifier is preserved.
    async fn update(&self, id: UserId, draft: UserDraft) -> Result<User, UserDirectoryError>;

    /// Overwrite only the fields supplied in `patch`.
    async fn patch(&self, id: UserId, patch: UserPatch) -> Result<User, UserDirectoryError>;

    /// Remove record `id`, returning a confirmation message.
    async fn delete(&self, id: UserId) -> Result<String, UserDirectoryError>;

    /// Records born strictly between `from` and `to`, oldest first.
    async fn search_by_birth_date_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<User>, UserDirectoryError>;
}
