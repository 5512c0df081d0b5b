//! System Call Wrappers
//!
//! Untrusted-side wrappers that issue one trap each.
//!
//! # Security Model
//! - READ_LINE never receives a window larger than the buffer allows
//! - UNLOCK is fire-and-forget: no acknowledgement from the actuator
//!
//! # Wrappers
//! - write_char(c): WRITE_CHAR
//! - read_line(buf, len): READ_LINE
//! - unlock(): UNLOCK

mod validate;

use log::{debug, info};

use crate::error::Error;
use crate::trap::{Trap, TrapDispatcher, TrapHandler, TrapReply};

pub use validate::{validate_read_len, BoundsPolicy, PasswordBuffer, FRAME_LEN};

/// Emit one byte to the console
pub fn write_char<H: TrapHandler>(dispatcher: &mut TrapDispatcher<H>, c: u8) -> Result<(), Error> {
    dispatcher.dispatch(Trap::WriteChar(c))?;
    Ok(())
}

/// Read a line from the console into `buffer`
///
/// # Arguments
/// * `buffer` - Destination; owns its capacity
/// * `max_length` - Most bytes the handler may store
///
/// # Returns
/// Number of bytes stored, or `BufferOverflow` if `max_length` exceeds
/// what the buffer's policy allows. No trap is issued on overflow.
pub fn read_line<H: TrapHandler>(
    dispatcher: &mut TrapDispatcher<H>,
    buffer: &mut PasswordBuffer,
    max_length: usize,
) -> Result<usize, Error> {
    let window = buffer.read_window(max_length)?;
    let read = match dispatcher.dispatch(Trap::ReadLine { buf: window })? {
        TrapReply::Read(n) => n,
        TrapReply::Done => 0,
    };
    buffer.commit(read);
    debug!(
        "[SYSCALL] read_line: {} bytes (capacity {}, overrun {})",
        read,
        buffer.capacity(),
        buffer.overrun()
    );
    Ok(read)
}

/// Trigger the door actuator
///
/// Returns once the trap has been issued; whether the lock moved is not
/// observable from here.
pub fn unlock<H: TrapHandler>(dispatcher: &mut TrapDispatcher<H>) -> Result<(), Error> {
    dispatcher.dispatch(Trap::Unlock)?;
    info!("[SYSCALL] unlock issued");
    Ok(())
}
