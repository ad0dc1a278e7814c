//! Domain primitives, ports and the in-memory user store.
//!
//! Purpose: define strongly typed user records and the rules they obey,
//! independent of transport. Inbound adapters reach the domain only through
//! the [`ports::UserDirectory`] trait.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, UserDraft, UserPatch, UserId: user records and their inputs.
//! - UserViolation, UserViolations: broken field rules.
//! - MinimumAge: the configurable age threshold.
//! - UserStore: mutex-guarded in-memory implementation of the port.
//! - TraceId: per-request correlation identifier.

pub mod age_policy;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_store;

pub use self::age_policy::MinimumAge;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::trace_id::TraceId;
pub use self::user::{User, UserDraft, UserId, UserPatch, UserViolation, UserViolations};
pub use self::user_store::UserStore;
