//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod user_directory;

#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{USER_DELETED_MESSAGE, UserDirectory, UserDirectoryError};
