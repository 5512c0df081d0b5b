//! Validation Flag
//!
//! The out-parameter a delegated check trap uses to hand its verdict back
//! across the trust boundary.
//!
//! # Trust Model
//! - The flag starts out denying
//! - Only the dispatcher arms it, and only while routing a check trap
//! - A grant is honoured only while armed; any other grant forges the flag
//! - Reading a forged flag is a `TrustBoundaryViolation`, never a grant

use crate::error::Error;
use crate::trap::TrapVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagState {
    /// Initial state, no trap has touched the flag
    Deny,
    /// A check trap is executing with this flag
    Armed(TrapVector),
    /// The check trap returned without a grant
    Refused,
    /// The peer granted while armed
    Granted(TrapVector),
    /// Granted by someone other than an armed trap
    Forged,
}

/// Single boolean verdict channel from the trusted peer
#[derive(Debug, PartialEq, Eq)]
pub struct ValidationFlag {
    state: FlagState,
}

impl ValidationFlag {
    /// A fresh flag, initialized to deny
    pub const fn deny() -> Self {
        Self {
            state: FlagState::Deny,
        }
    }

    /// Set the flag to grant.
    ///
    /// Called by the trusted peer from inside a check trap. A grant outside
    /// an armed trap forges the flag.
    pub fn grant(&mut self) {
        self.state = match self.state {
            FlagState::Armed(vector) | FlagState::Granted(vector) => FlagState::Granted(vector),
            _ => FlagState::Forged,
        };
    }

    /// Whether the flag currently reads as granted, before settlement
    pub fn is_set(&self) -> bool {
        matches!(self.state, FlagState::Granted(_) | FlagState::Forged)
    }

    pub(crate) fn arm(&mut self, vector: TrapVector) -> Result<(), Error> {
        match self.state {
            FlagState::Deny => {
                self.state = FlagState::Armed(vector);
                Ok(())
            }
            // Forged, or reused across traps where an old grant could leak into a new check
            _ => Err(Error::TrustBoundaryViolation(vector)),
        }
    }

    pub(crate) fn disarm(&mut self) {
        if let FlagState::Armed(_) = self.state {
            self.state = FlagState::Refused;
        }
    }

    /// Read the verdict for a check issued on `vector`.
    ///
    /// Returns `Ok(true)` only if the peer granted while `vector` was armed.
    pub fn settle(&self, vector: TrapVector) -> Result<bool, Error> {
        match self.state {
            FlagState::Granted(armed) if armed == vector => Ok(true),
            FlagState::Granted(_) | FlagState::Forged => Err(Error::TrustBoundaryViolation(vector)),
            FlagState::Deny | FlagState::Armed(_) | FlagState::Refused => Ok(false),
        }
    }
}

impl Default for ValidationFlag {
    fn default() -> Self {
        Self::deny()
    }
}
