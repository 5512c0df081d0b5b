//! Trap Interface
//!
//! The software-interrupt boundary between the untrusted application and
//! the trusted peer that owns the console, the password checks and the
//! door actuator.
//!
//! # Security Model
//! - Closed vector table: no dynamic registration
//! - Typed requests: argument count and type are fixed per vector
//! - Validation flags can only be granted while a check trap is armed
//!
//! # Vectors
//! - 0x00: write_char(byte)
//! - 0x02: read_line(buf, len)
//! - 0x7d: check_variant_a(password, flag)
//! - 0x7e: check_variant_b(password, flag)
//! - 0x7f: unlock()

mod dispatch;
mod flag;
mod vector;

#[cfg(test)]
pub(crate) mod fake;

pub use dispatch::{Trap, TrapDispatcher, TrapHandler, TrapReply};
pub use flag::ValidationFlag;
pub use vector::{numbers, Services, TrapVector};
