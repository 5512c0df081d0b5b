//! XOR checksum validator
//!
//! Accepts any password whose first byte is `a`, whose first four bytes
//! XOR to `0xf5`, and whose byte 5 is zero. For a fixed first byte there
//! are 2^16 choices of bytes 1..3 for every byte 4, so the accepted set
//! is large; this is a weak check.

use super::{byte_at, PasswordValidator, Verdict};
use crate::error::Error;
use crate::trap::{TrapDispatcher, TrapHandler};

/// Required first byte
pub const FIRST_BYTE: u8 = b'a';
/// Required XOR of bytes 0..4
pub const XOR_TARGET: u8 = 0xf5;
/// Offset that must hold a zero byte
pub const TERMINATOR_OFFSET: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checksum;

impl Checksum {
    /// The decision, without a dispatcher
    pub fn accepts(password: &[u8]) -> bool {
        let xor = (0..4).fold(0u8, |acc, i| acc ^ byte_at(password, i));
        byte_at(password, TERMINATOR_OFFSET) == 0
            && byte_at(password, 0) == FIRST_BYTE
            && xor == XOR_TARGET
    }
}

impl PasswordValidator for Checksum {
    fn check<H: TrapHandler>(
        &self,
        _dispatcher: &mut TrapDispatcher<H>,
        password: &[u8],
    ) -> Result<Verdict, Error> {
        Ok(Verdict::from(Self::accepts(password)))
    }
}
