//! Plaintext comparison validator
//!
//! Compares the first 12 bytes of the password, terminator included,
//! against the configured secret. The comparison exits at the first
//! mismatch, so its running time depends on the length of the matching
//! prefix. It is not constant-time.

use super::{byte_at, PasswordValidator, Verdict};
use crate::config::{self, Secret};
use crate::error::Error;
use crate::trap::{TrapDispatcher, TrapHandler};

#[derive(Debug, Clone, Copy)]
pub struct PlaintextCompare<'s> {
    secret: &'s Secret,
}

impl<'s> PlaintextCompare<'s> {
    pub const fn new(secret: &'s Secret) -> Self {
        Self { secret }
    }

    pub fn accepts(&self, password: &[u8]) -> bool {
        for (i, &expected) in self.secret.as_bytes().iter().enumerate() {
            if byte_at(password, i) != expected {
                return false;
            }
        }
        true
    }
}

impl PlaintextCompare<'static> {
    /// Compare against the process configuration's secret
    pub fn from_config() -> Self {
        Self::new(config::get().plaintext_secret())
    }
}

impl PasswordValidator for PlaintextCompare<'_> {
    fn check<H: TrapHandler>(
        &self,
        _dispatcher: &mut TrapDispatcher<H>,
        password: &[u8],
    ) -> Result<Verdict, Error> {
        Ok(Verdict::from(self.accepts(password)))
    }
}
