//! Service configuration loaded via OrthoConfig.
//!
//! Values layer defaults, configuration files, `USERBASE_*` environment
//! variables and command-line flags, in increasing precedence.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8080;

/// Runtime settings for the user service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USERBASE")]
pub struct UserbaseSettings {
    /// Minimum age, in calendar years, a user must reach.
    #[ortho_config(default = 18)]
    pub minimum_age: u32,
    /// Address the HTTP listener binds to.
    pub host: Option<String>,
    /// Port the HTTP listener binds to.
    pub port: Option<u16>,
}

/// Failure to turn settings into a listen address.
#[derive(Debug, thiserror::Error)]
#[error("invalid listen host {host:?}: {source}")]
pub struct InvalidHost {
    host: String,
    #[source]
    source: std::net::AddrParseError,
}

impl UserbaseSettings {
    /// Return the configured port, falling back to the default.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Resolve the socket address the server should bind to.
    ///
    /// # Errors
    /// Returns [`InvalidHost`] when `host` is not an IP address literal.
    pub fn socket_addr(&self) -> Result<SocketAddr, InvalidHost> {
        let ip = match self.host.as_deref() {
            None => DEFAULT_HOST,
            Some(host) => host.parse::<IpAddr>().map_err(|source| InvalidHost {
                host: host.to_owned(),
                source,
            })?,
        };
        Ok(SocketAddr::new(ip, self.port()))
    }
}
