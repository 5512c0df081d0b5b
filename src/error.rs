//! Error Types
//!
//! Hazards raised by the trap layer and the untrusted-side wrappers.
//! A denied password is not an error; it is `Verdict::Denied`.

use core::fmt;

use crate::trap::TrapVector;

/// Errno-style codes returned by [`Error::code`]
pub mod codes {
    pub const EPERM: i64 = -1;
    pub const EFAULT: i64 = -14;
    pub const EINVAL: i64 = -22;
    pub const ENOSYS: i64 = -38;
}

/// Errors crossing the trap boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Requested read length exceeds the destination buffer
    BufferOverflow { requested: usize, capacity: usize },
    /// A validation flag was granted without an armed check trap
    TrustBoundaryViolation(TrapVector),
    /// The installed handler does not service this vector
    UnsupportedTrap(TrapVector),
    /// Raw vector number outside the trap table
    UnknownVector(u8),
    /// Secret is not 11 visible ASCII characters
    InvalidSecret,
}

impl Error {
    /// Errno-style code, mirroring a syscall return value
    pub const fn code(&self) -> i64 {
        match self {
            Error::BufferOverflow { .. } => codes::EFAULT,
            Error::TrustBoundaryViolation(_) => codes::EPERM,
            Error::UnsupportedTrap(_) => codes::ENOSYS,
            Error::UnknownVector(_) | Error::InvalidSecret => codes::EINVAL,
        }
    }

    /// Hazards raised while a login attempt runs; they stop the controller
    /// rather than being reported as denial.
    ///
    /// The rest are caller mistakes caught before any trap is issued.
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::BufferOverflow { .. }
                | Error::TrustBoundaryViolation(_)
                | Error::UnsupportedTrap(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BufferOverflow {
                requested,
                capacity,
            } => write!(
                f,
                "buffer overflow: requested {} bytes into a {} byte buffer",
                requested, capacity
            ),
            Error::TrustBoundaryViolation(vector) => write!(
                f,
                "trust boundary violation: flag granted outside {:?}",
                vector
            ),
            Error::UnsupportedTrap(vector) => {
                write!(f, "trap {:?} (0x{:02x}) not serviced", vector, *vector as u8)
            }
            Error::UnknownVector(raw) => write!(f, "unknown trap vector 0x{:02x}", raw),
            Error::InvalidSecret => f.write_str("secret must be 11 visible ASCII characters"),
        }
    }
}
