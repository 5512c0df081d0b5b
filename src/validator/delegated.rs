//! Delegated validators
//!
//! The verdict is computed by the trusted peer and handed back through a
//! `ValidationFlag`. Untrusted code only creates the flag and reads it.

use log::debug;

use super::{PasswordValidator, Verdict};
use crate::error::Error;
use crate::trap::{Trap, TrapDispatcher, TrapHandler, TrapVector, ValidationFlag};

/// Delegates to the peer on CHECK_VARIANT_A (0x7d)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DelegatedA;

/// Delegates to the peer on CHECK_VARIANT_B (0x7e)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DelegatedB;

impl PasswordValidator for DelegatedA {
    fn check<H: TrapHandler>(
        &self,
        dispatcher: &mut TrapDispatcher<H>,
        password: &[u8],
    ) -> Result<Verdict, Error> {
        let mut flag = ValidationFlag::deny();
        dispatcher.dispatch(Trap::CheckVariantA {
            password,
            flag: &mut flag,
        })?;
        settle(&flag, TrapVector::CheckVariantA)
    }
}

impl PasswordValidator for DelegatedB {
    fn check<H: TrapHandler>(
        &self,
        dispatcher: &mut TrapDispatcher<H>,
        password: &[u8],
    ) -> Result<Verdict, Error> {
        let mut flag = ValidationFlag::deny();
        dispatcher.dispatch(Trap::CheckVariantB {
            password,
            flag: &mut flag,
        })?;
        settle(&flag, TrapVector::CheckVariantB)
    }
}

fn settle(flag: &ValidationFlag, vector: TrapVector) -> Result<Verdict, Error> {
    let verdict = Verdict::from(flag.settle(vector)?);
    debug!("[VALIDATE] peer verdict on 0x{:02x}: {:?}", vector as u8, verdict);
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trap::fake::FakePeer;
    use crate::trap::Services;

    #[test]
    fn test_peer_grant() {
        let mut peer = FakePeer::new();
        peer.grant_a = true;
        let mut dispatcher = TrapDispatcher::new(peer);
        assert_eq!(DelegatedA.check(&mut dispatcher, b"pw"), Ok(Verdict::Granted));
        assert_eq!(dispatcher.handler().vectors, [TrapVector::CheckVariantA]);
    }

    #[test]
    fn test_peer_refusal() {
        let mut dispatcher = TrapDispatcher::new(FakePeer::new());
        assert_eq!(DelegatedB.check(&mut dispatcher, b"pw"), Ok(Verdict::Denied));
        assert_eq!(dispatcher.handler().vectors, [TrapVector::CheckVariantB]);
    }

    #[test]
    fn test_variants_use_their_own_vector() {
        let mut peer = FakePeer::new();
        peer.grant_a = true;
        let mut dispatcher = TrapDispatcher::new(peer);
        assert_eq!(DelegatedB.check(&mut dispatcher, b"pw"), Ok(Verdict::Denied));
    }

    #[test]
    fn test_missing_hsm_is_error() {
        let mut dispatcher = TrapDispatcher::new(FakePeer::with_services(Services::CONSOLE));
        assert_eq!(
            DelegatedA.check(&mut dispatcher, b"pw"),
            Err(Error::UnsupportedTrap(TrapVector::CheckVariantA))
        );
    }
}
