//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::UserDirectory;

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use userbase::domain::{MinimumAge, UserStore};
/// use userbase::inbound::http::state::HttpState;
///
/// let store = UserStore::new(MinimumAge::default(), Arc::new(DefaultClock));
/// let _state = HttpState::new(Arc::new(store));
/// ```
#[derive(Clone)]
pub struct HttpState {
    /// User records port.
    pub users: Arc<dyn UserDirectory>,
}

impl HttpState {
    /// Construct state from the user directory port.
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }
}
