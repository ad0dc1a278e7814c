//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use userbase::domain::MinimumAge;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) minimum_age: MinimumAge,
    pub(crate) clock: Arc<dyn Clock>,
}

impl ServerConfig {
    /// Construct a server configuration using the system clock.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, minimum_age: MinimumAge) -> Self {
        Self {
            bind_addr,
            minimum_age,
            clock: Arc::new(DefaultClock),
        }
    }

    /// Replace the clock the age and past-date rules read "today" from.
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "Exercised by server tests with a pinned clock")
    )]
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "Exercised by server tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
