use std::ffi::{CStr, c_char, c_void};

/// The heap primitives a [`Tracker`](crate::Tracker) forwards to.
///
/// # Safety
///
/// Implementors must follow the C heap contract: a non-null result from
/// `malloc`, `realloc`, `calloc` or `strdup` is a live block that stays valid
/// until handed to `free` or `realloc`; failure is reported only as null;
/// `calloc` memory is zeroed; a failed `realloc` leaves the old block
/// untouched.
pub unsafe trait Platform {
  fn malloc(
    &self,
    size: usize,
  ) -> *mut c_void;

  /// # Safety
  ///
  /// `ptr` must be null or a live block returned by this platform.
  unsafe fn realloc(
    &self,
    ptr: *mut c_void,
    size: usize,
  ) -> *mut c_void;

  fn calloc(
    &self,
    count: usize,
    size: usize,
  ) -> *mut c_void;

  fn strdup(
    &self,
    s: &CStr,
  ) -> *mut c_char;

  /// # Safety
  ///
  /// `ptr` must be a live block returned by this platform and must not be
  /// used afterwards.
  unsafe fn free(
    &self,
    ptr: *mut c_void,
  );
}

/// The C library allocator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Libc;

// SAFETY: the libc primitives are the contract itself, and are thread-safe
// on every supported POSIX target.
unsafe impl Platform for Libc {
  #[inline]
  fn malloc(
    &self,
    size: usize,
  ) -> *mut c_void {
    unsafe { libc::malloc(size) }
  }

  #[inline]
  unsafe fn realloc(
    &self,
    ptr: *mut c_void,
    size: usize,
  ) -> *mut c_void {
    unsafe { libc::realloc(ptr, size) }
  }

  #[inline]
  fn calloc(
    &self,
    count: usize,
    size: usize,
  ) -> *mut c_void {
    unsafe { libc::calloc(count, size) }
  }

  #[inline]
  fn strdup(
    &self,
    s: &CStr,
  ) -> *mut c_char {
    // SAFETY: `s` is NUL-terminated by construction.
    unsafe { libc::strdup(s.as_ptr()) }
  }

  #[inline]
  unsafe fn free(
    &self,
    ptr: *mut c_void,
  ) {
    unsafe { libc::free(ptr) }
  }
}
