//! LockGate - Trap-Dispatched Door Lock Controller
//!
//! The untrusted half of a door controller: it prompts for a password,
//! reads it through a trap, judges it with one of four validators and
//! triggers the door actuator through another trap.
//!
//! # Security Features
//! - Single dispatch point for all console I/O, trust decisions and actuation
//! - Typed trap requests: no unchecked argument lists
//! - Bounds-checked password buffers, zeroed after each attempt
//! - Validation flags that only an armed check trap can grant
//!
//! # Layout
//! - `trap`: vector table, dispatcher, handler trait, validation flag
//! - `syscall`: READ_LINE / WRITE_CHAR / UNLOCK wrappers, password buffer
//! - `validator`: delegated (HSM) and local validators
//! - `login`: one login attempt and the four controller levels

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod console;
pub mod error;
pub mod login;
pub mod security;
pub mod syscall;
pub mod trap;
pub mod validator;

pub use error::Error;
pub use login::{login, Level, LoginProfile, Outcome};
pub use trap::{Trap, TrapDispatcher, TrapHandler, TrapReply, TrapVector};
pub use validator::{PasswordValidator, Validator, Verdict};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
