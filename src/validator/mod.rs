//! Password Validators
//!
//! Four interchangeable strategies mapping a password buffer to a verdict.
//!
//! | Validator | Decision made by |
//! |-----------|------------------|
//! | `DelegatedA` | trusted peer, trap 0x7d |
//! | `DelegatedB` | trusted peer, trap 0x7e |
//! | `Checksum` | in-process XOR check |
//! | `PlaintextCompare` | in-process comparison with the configured secret |
//!
//! Local validators read bytes past the end of a short buffer as zero, the
//! way a zeroed frame reads.

mod checksum;
mod delegated;
mod plaintext;

use crate::error::Error;
use crate::trap::{TrapDispatcher, TrapHandler};

pub use checksum::Checksum;
pub use delegated::{DelegatedA, DelegatedB};
pub use plaintext::PlaintextCompare;

/// Outcome of one validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Granted,
    Denied,
}

impl Verdict {
    #[inline]
    pub const fn is_granted(self) -> bool {
        matches!(self, Verdict::Granted)
    }
}

impl From<bool> for Verdict {
    fn from(granted: bool) -> Self {
        if granted {
            Verdict::Granted
        } else {
            Verdict::Denied
        }
    }
}

/// Capability shared by every validator
pub trait PasswordValidator {
    /// Judge `password`. Local validators never touch the dispatcher.
    fn check<H: TrapHandler>(
        &self,
        dispatcher: &mut TrapDispatcher<H>,
        password: &[u8],
    ) -> Result<Verdict, Error>;
}

/// One of the four validators, chosen at runtime
#[derive(Debug, Clone, Copy)]
pub enum Validator<'s> {
    DelegatedA(DelegatedA),
    DelegatedB(DelegatedB),
    Checksum(Checksum),
    PlaintextCompare(PlaintextCompare<'s>),
}

impl Validator<'_> {
    /// Whether the verdict comes from the trusted peer
    pub const fn is_delegated(&self) -> bool {
        matches!(self, Validator::DelegatedA(_) | Validator::DelegatedB(_))
    }
}

impl PasswordValidator for Validator<'_> {
    fn check<H: TrapHandler>(
        &self,
        dispatcher: &mut TrapDispatcher<H>,
        password: &[u8],
    ) -> Result<Verdict, Error> {
        match self {
            Validator::DelegatedA(v) => v.check(dispatcher, password),
            Validator::DelegatedB(v) => v.check(dispatcher, password),
            Validator::Checksum(v) => v.check(dispatcher, password),
            Validator::PlaintextCompare(v) => v.check(dispatcher, password),
        }
    }
}

/// Byte `index` of `password`, zero past the end
#[inline]
fn byte_at(password: &[u8], index: usize) -> u8 {
    password.get(index).copied().unwrap_or(0)
}
