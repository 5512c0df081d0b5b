//! Secure Memory Zeroization
//!
//! Password frames are wiped when a login attempt ends so that no typed
//! password survives in memory past its one validation.
//!
//! # Design
//! - `Zeroize` trait for byte storage that can be securely cleared
//! - `SecureWrapper<T>` RAII type that zeros on drop
//! - Volatile writes prevent compiler optimization of zeroing

use core::ptr;
use core::sync::atomic::{compiler_fence, Ordering};

/// Trait for types that can be securely zeroed.
///
/// Implementations must overwrite all contents in a way that cannot be
/// optimized away.
pub trait Zeroize {
    fn zeroize(&mut self);
}

impl Zeroize for [u8] {
    fn zeroize(&mut self) {
        // SAFETY: the pointer and length come from a live mutable slice
        unsafe {
            volatile_set_memory(self.as_mut_ptr(), 0, self.len());
        }
        compiler_fence(Ordering::SeqCst);
    }
}

impl<const N: usize> Zeroize for [u8; N] {
    fn zeroize(&mut self) {
        self.as_mut_slice().zeroize();
    }
}

/// A wrapper that securely zeroizes its contents on drop.
///
/// Holds the backing frame of a [`PasswordBuffer`](crate::syscall::PasswordBuffer).
#[derive(Debug)]
pub struct SecureWrapper<T: Zeroize> {
    inner: T,
}

impl<T: Zeroize> SecureWrapper<T> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Self { inner: value }
    }

    #[inline]
    pub fn inner(&self) -> &T {
        &self.inner
    }

    #[inline]
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Wipe the contents now, keeping the wrapper usable
    #[inline]
    pub fn wipe(&mut self) {
        self.inner.zeroize();
    }
}

impl<T: Zeroize> Drop for SecureWrapper<T> {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl<T: Zeroize + Default> Default for SecureWrapper<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Volatile memset that cannot be optimized away.
///
/// # Safety
/// - `dst` must be valid for writes of `count` bytes
#[inline]
unsafe fn volatile_set_memory(dst: *mut u8, val: u8, count: usize) {
    for i in 0..count {
        // SAFETY: Caller guarantees dst is valid for count bytes
        unsafe {
            ptr::write_volatile(dst.add(i), val);
        }
    }
}
