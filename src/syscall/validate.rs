//! Password Buffer Validation
//!
//! Bounds checking for the buffer handed to READ_LINE.
//!
//! # Security Principles
//! - The buffer owns its declared capacity; callers only supply a length
//! - Fail-secure: a length past the capacity is `BufferOverflow`
//! - The overrun the legacy programs rely on is only reachable through an
//!   explicit `BoundsPolicy::LegacyOverrun`, and is confined to the frame

use core::fmt;

use log::warn;

use crate::error::Error;
use crate::security::SecureWrapper;

/// Size of the backing frame every password buffer lives in.
///
/// Stands in for the stack frame around the declared array: legacy
/// overruns land here instead of in unrelated memory.
pub const FRAME_LEN: usize = 32;

/// What to do when a read asks for more than the declared capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundsPolicy {
    /// Reject with `BufferOverflow`
    #[default]
    Strict,
    /// Let the read spill past the capacity into the frame
    LegacyOverrun,
}

/// Check a requested read length against a declared capacity
///
/// # Returns
/// * `Ok(len)` - Number of frame bytes the read may touch
/// * `Err(Error::BufferOverflow)` - Validation failed
pub fn validate_read_len(
    capacity: usize,
    requested: usize,
    policy: BoundsPolicy,
) -> Result<usize, Error> {
    // Zero-length reads are valid
    if requested <= capacity {
        return Ok(requested);
    }

    match policy {
        BoundsPolicy::Strict => Err(Error::BufferOverflow {
            requested,
            capacity,
        }),
        BoundsPolicy::LegacyOverrun if requested <= FRAME_LEN => {
            warn!(
                "[SYSCALL] read_line: legacy overrun, {} bytes into {} byte buffer",
                requested, capacity
            );
            Ok(requested)
        }
        BoundsPolicy::LegacyOverrun => Err(Error::BufferOverflow {
            requested,
            capacity: FRAME_LEN,
        }),
    }
}

/// A fixed-capacity password buffer for one login attempt
///
/// This type guarantees that:
/// - The declared capacity never exceeds the backing frame
/// - Reads are bounds-checked against the capacity (or the frame, in legacy mode)
/// - The frame is zeroed on drop
pub struct PasswordBuffer {
    frame: SecureWrapper<[u8; FRAME_LEN]>,
    capacity: usize,
    filled: usize,
    policy: BoundsPolicy,
}

impl PasswordBuffer {
    /// A strict buffer with the given declared capacity
    pub fn new(capacity: usize) -> Result<Self, Error> {
        Self::with_policy(capacity, BoundsPolicy::Strict)
    }

    /// A buffer that reproduces the legacy overrun
    pub fn legacy(capacity: usize) -> Result<Self, Error> {
        Self::with_policy(capacity, BoundsPolicy::LegacyOverrun)
    }

    pub fn with_policy(capacity: usize, policy: BoundsPolicy) -> Result<Self, Error> {
        if capacity > FRAME_LEN {
            return Err(Error::BufferOverflow {
                requested: capacity,
                capacity: FRAME_LEN,
            });
        }
        Ok(Self {
            frame: SecureWrapper::new([0; FRAME_LEN]),
            capacity,
            filled: 0,
            policy,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> BoundsPolicy {
        self.policy
    }

    /// Bytes stored by the last read
    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Bytes the last read wrote past the declared capacity
    pub fn overrun(&self) -> usize {
        self.filled.saturating_sub(self.capacity)
    }

    /// The buffer as a validator sees it.
    ///
    /// Covers the declared capacity, plus any overrun bytes.
    pub fn as_bytes(&self) -> &[u8] {
        let end = self.capacity.max(self.filled);
        &self.frame.inner()[..end]
    }

    /// Zero the frame and forget the last read
    pub fn clear(&mut self) {
        self.frame.wipe();
        self.filled = 0;
    }

    /// Validate `requested` and hand out the zeroed window a read may fill
    pub(crate) fn read_window(&mut self, requested: usize) -> Result<&mut [u8], Error> {
        let len = validate_read_len(self.capacity, requested, self.policy)?;
        self.clear();
        Ok(&mut self.frame.inner_mut()[..len])
    }

    pub(crate) fn commit(&mut self, filled: usize) {
        self.filled = filled;
    }
}

impl fmt::Debug for PasswordBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordBuffer")
            .field("capacity", &self.capacity)
            .field("filled", &self.filled)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
