//! Trap Console
//!
//! Formatted console output over the WRITE_CHAR trap, one trap per byte.
//!
//! # Security Considerations
//! - Output passes through the same dispatcher as every other trap
//! - A refused WRITE_CHAR is kept and reported, not swallowed

use core::fmt::{self, Write};

use crate::error::Error;
use crate::syscall;
use crate::trap::{TrapDispatcher, TrapHandler, TrapVector};

/// Console writer bound to a dispatcher
pub struct Console<'d, H: TrapHandler> {
    dispatcher: &'d mut TrapDispatcher<H>,
    error: Option<Error>,
}

impl<'d, H: TrapHandler> Console<'d, H> {
    pub fn new(dispatcher: &'d mut TrapDispatcher<H>) -> Self {
        Self {
            dispatcher,
            error: None,
        }
    }

    /// Write raw bytes, stopping at the first refused trap
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        for &byte in bytes {
            if let Err(e) = syscall::write_char(self.dispatcher, byte) {
                self.error = Some(e);
                return Err(e);
            }
        }
        Ok(())
    }

    /// The trap error behind the last `fmt::Error`, if any
    pub fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }
}

impl<H: TrapHandler> Write for Console<'_, H> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

/// Write `line` followed by a newline
pub fn puts<H: TrapHandler>(dispatcher: &mut TrapDispatcher<H>, line: &str) -> Result<(), Error> {
    let mut console = Console::new(dispatcher);
    if writeln!(console, "{}", line).is_err() {
        // fmt::Error only arises from a refused trap, which the console records
        return Err(console
            .take_error()
            .unwrap_or(Error::UnsupportedTrap(TrapVector::WriteChar)));
    }
    Ok(())
}
