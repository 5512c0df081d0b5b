//! Login Orchestration
//!
//! Runs one attempt: prompt, read, validate, maybe unlock, report.
//!
//! ```text
//! AwaitingInput -> Validating -> Granted -> MaybeUnlock -> Reported
//!                             \-> Denied -----------------> Reported
//! ```
//!
//! # Security Considerations
//! - The password buffer is zeroed when the attempt ends
//! - UNLOCK is only ever issued after a granted verdict, and only for
//!   profiles that actuate the lock
//! - A denied attempt leaves nothing behind

use log::{debug, info};

use crate::console::puts;
use crate::error::Error;
use crate::syscall::{self, BoundsPolicy, PasswordBuffer};
use crate::trap::{TrapDispatcher, TrapHandler};
use crate::validator::{
    Checksum, DelegatedA, DelegatedB, PasswordValidator, PlaintextCompare, Validator, Verdict,
};

/// Console prompt
pub const PROMPT: &str = "Enter the password to continue";
/// Reported after a granted verdict
pub const GRANTED: &str = "Access Granted!";
/// Reported after a denied verdict
pub const DENIED: &str = "Invalid password; try again";

/// Default declared buffer capacity and read length
pub const DEFAULT_BUFFER_LEN: usize = 20;

/// Progress of one login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    AwaitingInput,
    Validating,
    Granted,
    Denied,
    MaybeUnlock,
    Reported,
}

/// How an attempt reads, judges and actuates
#[derive(Debug, Clone, Copy)]
pub struct LoginProfile<'s> {
    validator: Validator<'s>,
    capacity: usize,
    request_len: usize,
    unlock_on_grant: bool,
    policy: BoundsPolicy,
}

impl<'s> LoginProfile<'s> {
    /// A strict profile with a 20 byte buffer that unlocks on grant
    pub const fn new(validator: Validator<'s>) -> Self {
        Self {
            validator,
            capacity: DEFAULT_BUFFER_LEN,
            request_len: DEFAULT_BUFFER_LEN,
            unlock_on_grant: true,
            policy: BoundsPolicy::Strict,
        }
    }

    /// Declared capacity of the password buffer
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Length passed to READ_LINE, independent of the capacity
    pub const fn with_request_len(mut self, request_len: usize) -> Self {
        self.request_len = request_len;
        self
    }

    /// Report success without issuing UNLOCK
    pub const fn without_unlock(mut self) -> Self {
        self.unlock_on_grant = false;
        self
    }

    pub const fn with_policy(mut self, policy: BoundsPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub const fn validator(&self) -> &Validator<'s> {
        &self.validator
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub const fn request_len(&self) -> usize {
        self.request_len
    }

    pub const fn unlocks_on_grant(&self) -> bool {
        self.unlock_on_grant
    }

    pub const fn policy(&self) -> BoundsPolicy {
        self.policy
    }
}

/// The four door controller programs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Plaintext comparison against the configured secret
    Tutorial,
    /// XOR checksum, no stored secret
    NoHardcodedPassword,
    /// Peer decides on 0x7d, controller unlocks
    Hsm1,
    /// Peer decides on 0x7e, controller never unlocks
    Hsm2,
}

impl Level {
    pub const ALL: [Level; 4] = [
        Level::Tutorial,
        Level::NoHardcodedPassword,
        Level::Hsm1,
        Level::Hsm2,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Level::Tutorial => "tutorial",
            Level::NoHardcodedPassword => "no-hardcoded-password",
            Level::Hsm1 => "hsm1",
            Level::Hsm2 => "hsm2",
        }
    }

    /// The level's profile under `policy`.
    ///
    /// The HSM levels declare a 10 byte buffer but read 20 bytes into it,
    /// so under `BoundsPolicy::Strict` they fail with `BufferOverflow`.
    pub fn profile(self, policy: BoundsPolicy) -> LoginProfile<'static> {
        let profile = match self {
            Level::Tutorial => {
                LoginProfile::new(Validator::PlaintextCompare(PlaintextCompare::from_config()))
            }
            Level::NoHardcodedPassword => LoginProfile::new(Validator::Checksum(Checksum)),
            Level::Hsm1 => LoginProfile::new(Validator::DelegatedA(DelegatedA)).with_capacity(10),
            Level::Hsm2 => LoginProfile::new(Validator::DelegatedB(DelegatedB))
                .with_capacity(10)
                .without_unlock(),
        };
        profile.with_policy(policy)
    }
}

/// Result of a completed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub verdict: Verdict,
    /// Whether UNLOCK was issued
    pub unlocked: bool,
}

impl Outcome {
    /// The line reported on the console
    pub const fn message(&self) -> &'static str {
        if self.verdict.is_granted() {
            GRANTED
        } else {
            DENIED
        }
    }
}

fn advance(state: &mut LoginState, next: LoginState) {
    debug!("[LOGIN] {:?} -> {:?}", state, next);
    *state = next;
}

/// Run one login attempt
///
/// # Returns
/// The outcome once the status line has been reported, or the hazard
/// that stopped the attempt. Hazards never issue UNLOCK.
pub fn login<H: TrapHandler>(
    dispatcher: &mut TrapDispatcher<H>,
    profile: &LoginProfile<'_>,
) -> Result<Outcome, Error> {
    let mut state = LoginState::AwaitingInput;
    puts(dispatcher, PROMPT)?;

    let mut buffer = PasswordBuffer::with_policy(profile.capacity, profile.policy)?;
    syscall::read_line(dispatcher, &mut buffer, profile.request_len)?;

    advance(&mut state, LoginState::Validating);
    let verdict = profile.validator.check(dispatcher, buffer.as_bytes())?;
    buffer.clear();

    let mut unlocked = false;
    if verdict.is_granted() {
        advance(&mut state, LoginState::Granted);
        advance(&mut state, LoginState::MaybeUnlock);
        if profile.unlock_on_grant {
            syscall::unlock(dispatcher)?;
            unlocked = true;
        }
    } else {
        advance(&mut state, LoginState::Denied);
    }

    let outcome = Outcome { verdict, unlocked };
    puts(dispatcher, outcome.message())?;
    advance(&mut state, LoginState::Reported);
    info!(
        "[LOGIN] verdict {:?}, unlocked: {}",
        outcome.verdict, outcome.unlocked
    );
    Ok(outcome)
}
