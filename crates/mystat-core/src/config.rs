//! Connection configuration

use crate::{MystatError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Character set every monitoring session is opened with
pub const DEFAULT_CHARSET: &str = "utf8mb4";

/// Default MySQL port
pub const DEFAULT_PORT: u16 = 3306;

/// A `host:port` pair naming the monitored instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceAddr {
    host: String,
    port: u16,
}

impl InstanceAddr {
    /// Create an address from its parts
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Host name or IP address
    pub fn host(&self) -> &str {
        &self.host
    }

    /// TCP port
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl FromStr for InstanceAddr {
    type Err = MystatError;

    /// Parse `host:port`, e.g. `10.0.0.201:3306` or `[::1]:3306`.
    fn from_str(s: &str) -> Result<Self> {
        let (host, port) = s.trim().rsplit_once(':').ok_or_else(|| {
            MystatError::Usage(format!("invalid address '{}': expected host:port", s))
        })?;

        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        if host.is_empty() {
            return Err(MystatError::Usage(format!(
                "invalid address '{}': host is empty",
                s
            )));
        }

        let port: u16 = port.parse().map_err(|_| {
            MystatError::Usage(format!("invalid address '{}': port '{}' is not a number", s, port))
        })?;
        if port == 0 {
            return Err(MystatError::Usage(format!(
                "invalid address '{}': port must be non-zero",
                s
            )));
        }

        Ok(Self::new(host, port))
    }
}

impl fmt::Display for InstanceAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Everything a driver needs to open a monitoring session
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Instance address
    pub addr: InstanceAddr,
    /// Login user
    pub user: String,
    /// Login password
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// Session character set
    pub charset: String,
}

impl ConnectionConfig {
    /// Create a configuration for the given instance and user
    pub fn new(addr: InstanceAddr, user: impl Into<String>) -> Self {
        Self {
            addr,
            user: user.into(),
            password: None,
            charset: DEFAULT_CHARSET.to_string(),
        }
    }

    /// Builder method: set password
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Host of the monitored instance
    pub fn host(&self) -> &str {
        self.addr.host()
    }

    /// Port of the monitored instance
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("addr", &self.addr)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("charset", &self.charset)
            .finish()
    }
}
