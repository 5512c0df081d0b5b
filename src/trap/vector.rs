//! Trap Vector Table
//!
//! The closed set of trap numbers shared by the untrusted application
//! and the trusted peer. Numbers are fixed at compile time.
//!
//! | Vector | Number | Arguments |
//! |--------|--------|-----------|
//! | WRITE_CHAR | 0x00 | byte |
//! | READ_LINE | 0x02 | buffer, length |
//! | CHECK_VARIANT_A | 0x7d | password, flag |
//! | CHECK_VARIANT_B | 0x7e | password, flag |
//! | UNLOCK | 0x7f | none |

use bitflags::bitflags;

use crate::error::Error;

/// Trap numbers
pub mod numbers {
    pub const WRITE_CHAR: u8 = 0x00;
    pub const READ_LINE: u8 = 0x02;
    pub const CHECK_VARIANT_A: u8 = 0x7d;
    pub const CHECK_VARIANT_B: u8 = 0x7e;
    pub const UNLOCK: u8 = 0x7f;
}

/// A trap request identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TrapVector {
    WriteChar = numbers::WRITE_CHAR,
    ReadLine = numbers::READ_LINE,
    CheckVariantA = numbers::CHECK_VARIANT_A,
    CheckVariantB = numbers::CHECK_VARIANT_B,
    Unlock = numbers::UNLOCK,
}

impl TrapVector {
    /// Every vector in the table, in numeric order
    pub const ALL: [TrapVector; 5] = [
        TrapVector::WriteChar,
        TrapVector::ReadLine,
        TrapVector::CheckVariantA,
        TrapVector::CheckVariantB,
        TrapVector::Unlock,
    ];

    /// The service bit a handler must advertise to receive this vector
    #[inline]
    pub const fn service(self) -> Services {
        match self {
            TrapVector::WriteChar => Services::WRITE_CHAR,
            TrapVector::ReadLine => Services::READ_LINE,
            TrapVector::CheckVariantA => Services::CHECK_VARIANT_A,
            TrapVector::CheckVariantB => Services::CHECK_VARIANT_B,
            TrapVector::Unlock => Services::UNLOCK,
        }
    }

    /// Whether this vector carries a validation flag across the boundary
    #[inline]
    pub const fn is_check(self) -> bool {
        matches!(self, TrapVector::CheckVariantA | TrapVector::CheckVariantB)
    }
}

impl TryFrom<u8> for TrapVector {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            numbers::WRITE_CHAR => Ok(TrapVector::WriteChar),
            numbers::READ_LINE => Ok(TrapVector::ReadLine),
            numbers::CHECK_VARIANT_A => Ok(TrapVector::CheckVariantA),
            numbers::CHECK_VARIANT_B => Ok(TrapVector::CheckVariantB),
            numbers::UNLOCK => Ok(TrapVector::Unlock),
            _ => Err(Error::UnknownVector(raw)),
        }
    }
}

impl From<TrapVector> for u8 {
    fn from(vector: TrapVector) -> u8 {
        vector as u8
    }
}

bitflags! {
    /// Vectors a trap handler services.
    ///
    /// The dispatcher refuses to route a trap whose bit is not set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Services: u8 {
        const WRITE_CHAR = 1 << 0;
        const READ_LINE = 1 << 1;
        const CHECK_VARIANT_A = 1 << 2;
        const CHECK_VARIANT_B = 1 << 3;
        const UNLOCK = 1 << 4;

        /// Console I/O only, no trust decisions or actuator
        const CONSOLE = Self::WRITE_CHAR.bits() | Self::READ_LINE.bits();
        /// Both delegated password checks
        const HSM = Self::CHECK_VARIANT_A.bits() | Self::CHECK_VARIANT_B.bits();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_round_trip() {
        for vector in TrapVector::ALL {
            assert_eq!(TrapVector::try_from(u8::from(vector)), Ok(vector));
        }
    }

    #[test]
    fn test_table_numbers() {
        assert_eq!(TrapVector::WriteChar as u8, 0);
        assert_eq!(TrapVector::ReadLine as u8, 2);
        assert_eq!(TrapVector::CheckVariantA as u8, 0x7d);
        assert_eq!(TrapVector::CheckVariantB as u8, 0x7e);
        assert_eq!(TrapVector::Unlock as u8, 0x7f);
    }

    #[test]
    fn test_unknown_vector() {
        assert_eq!(TrapVector::try_from(1), Err(Error::UnknownVector(1)));
        assert_eq!(TrapVector::try_from(0x80), Err(Error::UnknownVector(0x80)));
    }

    #[test]
    fn test_service_bits_distinct() {
        let all = TrapVector::ALL
            .iter()
            .fold(Services::empty(), |acc, v| acc | v.service());
        assert_eq!(all, Services::all());
        assert!(Services::HSM.contains(TrapVector::CheckVariantB.service()));
        assert!(!Services::CONSOLE.contains(Services::UNLOCK));
    }
}
