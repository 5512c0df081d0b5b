//! Controller Configuration
//!
//! Process-wide immutable settings, installed once at startup and read
//! through `get()` afterwards. Nothing here changes after installation.

use core::fmt;

use log::{info, warn};
use spin::Once;

use crate::error::Error;

/// Bytes compared by the plaintext validator: 11 characters plus NUL
pub const SECRET_LEN: usize = 12;

/// Secret used when no configuration is installed
pub const DEFAULT_SECRET: &str = "sUperS3cr3t";

/// A NUL-terminated 11-character password
#[derive(Clone, PartialEq, Eq)]
pub struct Secret([u8; SECRET_LEN]);

impl Secret {
    pub const DEFAULT: Secret = Secret(*b"sUperS3cr3t\0");

    /// Build a secret from 11 visible ASCII characters
    pub fn new(text: &str) -> Result<Self, Error> {
        let bytes = text.as_bytes();
        if bytes.len() != SECRET_LEN - 1 || !bytes.iter().all(u8::is_ascii_graphic) {
            return Err(Error::InvalidSecret);
        }
        let mut secret = [0u8; SECRET_LEN];
        secret[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(secret))
    }

    /// The secret including its terminator
    pub fn as_bytes(&self) -> &[u8; SECRET_LEN] {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}

/// Settings shared by every login attempt in this process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockConfig {
    plaintext_secret: Secret,
}

impl LockConfig {
    pub const fn new(plaintext_secret: Secret) -> Self {
        Self { plaintext_secret }
    }

    pub fn plaintext_secret(&self) -> &Secret {
        &self.plaintext_secret
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self::new(Secret::DEFAULT)
    }
}

static CONFIG: Once<LockConfig> = Once::new();

/// Install the process configuration
///
/// Only the first call installs; later calls are ignored with a warning
/// and return the configuration already in place.
pub fn init(config: LockConfig) -> &'static LockConfig {
    if CONFIG.is_completed() {
        warn!("[CONFIG] already installed, ignoring new configuration");
    }
    CONFIG.call_once(|| {
        info!("[CONFIG] installed");
        config
    })
}

/// The installed configuration, installing the default if none was given
pub fn get() -> &'static LockConfig {
    CONFIG.call_once(LockConfig::default)
}
