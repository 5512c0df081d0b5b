//! Trap Dispatcher
//!
//! Routes typed trap requests to the installed handler.
//!
//! # Security Considerations
//! - Vectors the handler does not advertise are rejected with ENOSYS
//! - Check traps arm the validation flag for exactly the duration of the call
//! - READ_LINE replies are clamped to the buffer the caller supplied

use log::{trace, warn};

use super::flag::ValidationFlag;
use super::vector::{Services, TrapVector};
use crate::error::Error;

/// A trap request with its per-vector arguments
#[derive(Debug)]
pub enum Trap<'a> {
    /// Emit one byte to the console
    WriteChar(u8),
    /// Fill `buf` from the console, returning the byte count
    ReadLine { buf: &'a mut [u8] },
    /// Ask the trusted peer to judge `password` (variant A)
    CheckVariantA {
        password: &'a [u8],
        flag: &'a mut ValidationFlag,
    },
    /// Ask the trusted peer to judge `password` (variant B)
    CheckVariantB {
        password: &'a [u8],
        flag: &'a mut ValidationFlag,
    },
    /// Trigger the door actuator
    Unlock,
}

impl Trap<'_> {
    /// The vector this request is issued on
    pub fn vector(&self) -> TrapVector {
        match self {
            Trap::WriteChar(_) => TrapVector::WriteChar,
            Trap::ReadLine { .. } => TrapVector::ReadLine,
            Trap::CheckVariantA { .. } => TrapVector::CheckVariantA,
            Trap::CheckVariantB { .. } => TrapVector::CheckVariantB,
            Trap::Unlock => TrapVector::Unlock,
        }
    }
}

/// Handler result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapReply {
    /// The trap completed with nothing to return
    Done,
    /// READ_LINE stored this many bytes
    Read(usize),
}

/// The trusted side of the trap boundary
pub trait TrapHandler {
    /// Vectors this handler services
    fn services(&self) -> Services;

    /// Execute one trap. Blocks until complete.
    fn handle(&mut self, trap: Trap<'_>) -> TrapReply;
}

impl<H: TrapHandler + ?Sized> TrapHandler for &mut H {
    fn services(&self) -> Services {
        (**self).services()
    }

    fn handle(&mut self, trap: Trap<'_>) -> TrapReply {
        (**self).handle(trap)
    }
}

/// Single entry point for every trap issued by the application
#[derive(Debug)]
pub struct TrapDispatcher<H> {
    handler: H,
}

impl<H: TrapHandler> TrapDispatcher<H> {
    /// Install `handler` behind the trap boundary
    pub const fn new(handler: H) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Dispatch a trap
    ///
    /// # Returns
    /// The handler's reply, or `UnsupportedTrap` if the handler does not
    /// service the vector. Check traps fail with `TrustBoundaryViolation`
    /// if their flag is not fresh.
    pub fn dispatch(&mut self, trap: Trap<'_>) -> Result<TrapReply, Error> {
        let vector = trap.vector();
        if !self.handler.services().contains(vector.service()) {
            warn!("[TRAP] unserviced vector 0x{:02x} ({:?})", vector as u8, vector);
            return Err(Error::UnsupportedTrap(vector));
        }
        trace!("[TRAP] 0x{:02x} {:?}", vector as u8, vector);

        match trap {
            Trap::ReadLine { buf } => {
                let len = buf.len();
                match self.handler.handle(Trap::ReadLine { buf }) {
                    TrapReply::Read(n) if n > len => {
                        warn!("[TRAP] read_line reply {} clamped to {}", n, len);
                        Ok(TrapReply::Read(len))
                    }
                    reply => Ok(reply),
                }
            }
            Trap::CheckVariantA { password, flag } => {
                flag.arm(vector)?;
                let reply = self.handler.handle(Trap::CheckVariantA {
                    password,
                    flag: &mut *flag,
                });
                flag.disarm();
                Ok(reply)
            }
            Trap::CheckVariantB { password, flag } => {
                flag.arm(vector)?;
                let reply = self.handler.handle(Trap::CheckVariantB {
                    password,
                    flag: &mut *flag,
                });
                flag.disarm();
                Ok(reply)
            }
            other => Ok(self.handler.handle(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trap::fake::FakePeer;

    #[test]
    fn test_routes_to_handler() {
        let mut dispatcher = TrapDispatcher::new(FakePeer::new());
        assert_eq!(dispatcher.dispatch(Trap::WriteChar(b'x')), Ok(TrapReply::Done));
        assert_eq!(dispatcher.dispatch(Trap::Unlock), Ok(TrapReply::Done));
        let peer = dispatcher.into_handler();
        assert_eq!(peer.output, b"x");
        assert_eq!(peer.unlocks, 1);
    }

    #[test]
    fn test_unserviced_vector_rejected() {
        let mut dispatcher = TrapDispatcher::new(FakePeer::with_services(Services::CONSOLE));
        assert_eq!(
            dispatcher.dispatch(Trap::Unlock),
            Err(Error::UnsupportedTrap(TrapVector::Unlock))
        );
        assert_eq!(dispatcher.handler().unlocks, 0);
        assert!(dispatcher.handler().vectors.is_empty());
    }

    #[test]
    fn test_read_reply_clamped() {
        let mut peer = FakePeer::new();
        peer.input = b"0123456789".to_vec();
        peer.overreport_reads = true;
        let mut dispatcher = TrapDispatcher::new(peer);
        let mut buf = [0u8; 4];
        let reply = dispatcher.dispatch(Trap::ReadLine { buf: &mut buf });
        assert_eq!(reply, Ok(TrapReply::Read(4)));
        assert_eq!(&buf, b"0123");
    }

    #[test]
    fn test_check_trap_grants_through_flag() {
        let mut peer = FakePeer::new();
        peer.grant_a = true;
        let mut dispatcher = TrapDispatcher::new(peer);
        let mut flag = ValidationFlag::deny();
        dispatcher
            .dispatch(Trap::CheckVariantA {
                password: b"pw",
                flag: &mut flag,
            })
            .unwrap();
        assert_eq!(flag.settle(TrapVector::CheckVariantA), Ok(true));
    }

    #[test]
    fn test_prearmed_flag_rejected() {
        let mut dispatcher = TrapDispatcher::new(FakePeer::new());
        let mut flag = ValidationFlag::deny();
        flag.grant();
        let result = dispatcher.dispatch(Trap::CheckVariantB {
            password: b"pw",
            flag: &mut flag,
        });
        assert_eq!(
            result,
            Err(Error::TrustBoundaryViolation(TrapVector::CheckVariantB))
        );
        assert!(dispatcher.handler().vectors.is_empty());
    }

    #[test]
    fn test_borrowed_handler() {
        let mut peer = FakePeer::new();
        {
            let mut dispatcher = TrapDispatcher::new(&mut peer);
            dispatcher.dispatch(Trap::Unlock).unwrap();
        }
        assert_eq!(peer.unlocks, 1);
    }
}
