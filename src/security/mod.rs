//! Security Primitives Module
//!
//! Secret hygiene for password frames:
//! - Frames are zeroed when the login attempt ends
//! - Memory is cleared using volatile writes to prevent optimization

pub mod zeroize;

pub use zeroize::{SecureWrapper, Zeroize};
