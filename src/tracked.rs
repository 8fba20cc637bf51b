use std::{
  ffi::{CStr, c_char, c_void},
  ptr::{self, NonNull},
};

use tracing::{error, info};

use crate::{
  counters::{AllocStats, Counters, Op},
  error::AllocError,
  platform::{Libc, Platform},
  site::CallSite,
};

static GLOBAL: Counters = Counters::new();

/// The process-wide counter set behind the free functions of this crate and
/// [`CountingAllocator`](crate::CountingAllocator).
pub fn global() -> &'static Counters {
  &GLOBAL
}

/// Counts heap operations into a [`Counters`] set while forwarding them to a
/// [`Platform`].
///
/// A counter is bumped only when the platform call succeeds. Failures leave
/// the counters untouched, emit an `error` event and yield null.
#[derive(Debug, Clone, Copy)]
pub struct Tracker<'c, P> {
  platform: P,
  counters: &'c Counters,
}

impl Tracker<'static, Libc> {
  /// The libc allocator counted into [`global()`].
  pub fn global() -> Self {
    Self::new(Libc, &GLOBAL)
  }
}

impl<'c, P: Platform> Tracker<'c, P> {
  pub const fn new(
    platform: P,
    counters: &'c Counters,
  ) -> Self {
    Self { platform, counters }
  }

  pub fn platform(&self) -> &P {
    &self.platform
  }

  pub fn stats(&self) -> AllocStats {
    self.counters.snapshot()
  }

  fn settle<T>(
    &self,
    op: Op,
    ptr: *mut T,
    site: CallSite,
  ) -> *mut T {
    if ptr.is_null() {
      let err = AllocError::AllocationFailure { op, site };
      error!(
        op = op.name(),
        file = site.file,
        function = site.function,
        line = site.line,
        "{err}"
      );
    } else {
      self.counters.record(op);
    }
    ptr
  }

  /// Allocates `size` bytes. Returns null on failure.
  pub fn malloc(
    &self,
    size: usize,
    site: CallSite,
  ) -> *mut c_void {
    let ptr = self.platform.malloc(size);
    self.settle(Op::Malloc, ptr, site)
  }

  /// Resizes the block at `ptr`, or allocates when `ptr` is null.
  ///
  /// On failure null is returned and the block at `ptr` is left untouched:
  /// it is still valid and still owned by the caller, who must keep the old
  /// pointer around to release it.
  ///
  /// A non-null `ptr` with `size == 0` is a release: the block goes through
  /// [`Tracker::free`], is counted as a free, and null comes back without an
  /// error event.
  ///
  /// # Safety
  ///
  /// `ptr` must be null or a live block from this tracker's platform. On
  /// success, and always when `size == 0`, `ptr` must no longer be used.
  pub unsafe fn realloc(
    &self,
    ptr: *mut c_void,
    size: usize,
    site: CallSite,
  ) -> *mut c_void {
    if size == 0 && !ptr.is_null() {
      unsafe { self.free(ptr, site) };
      return ptr::null_mut();
    }

    let new = unsafe { self.platform.realloc(ptr, size) };
    self.settle(Op::Realloc, new, site)
  }

  /// Allocates `count * size` zeroed bytes. Returns null on failure,
  /// including when the product overflows.
  pub fn calloc(
    &self,
    count: usize,
    size: usize,
    site: CallSite,
  ) -> *mut c_void {
    let ptr = self.platform.calloc(count, size);
    self.settle(Op::Calloc, ptr, site)
  }

  /// Copies `s`, terminator included, into a fresh block. Returns null on
  /// failure.
  pub fn strdup(
    &self,
    s: &CStr,
    site: CallSite,
  ) -> *mut c_char {
    let ptr = self.platform.strdup(s);
    self.settle(Op::Strdup, ptr, site)
  }

  /// Returns `ptr` to the platform. Null is accepted and ignored: neither
  /// the platform nor the free counter is touched.
  ///
  /// # Safety
  ///
  /// `ptr` must be null or a live block from this tracker's platform, and
  /// must not be used afterwards.
  pub unsafe fn free(
    &self,
    ptr: *mut c_void,
    _site: CallSite,
  ) {
    if ptr.is_null() {
      return;
    }

    unsafe { self.platform.free(ptr) };
    self.counters.record(Op::Free);
  }

  pub fn try_malloc(
    &self,
    size: usize,
    site: CallSite,
  ) -> Result<NonNull<c_void>, AllocError> {
    NonNull::new(self.malloc(size, site)).ok_or(AllocError::AllocationFailure { op: Op::Malloc, site })
  }

  /// Like [`Tracker::realloc`]; on `Err` the block at `ptr` is still owned
  /// by the caller. `Ok(None)` means a zero-size request released it.
  ///
  /// # Safety
  ///
  /// Same as [`Tracker::realloc`].
  pub unsafe fn try_realloc(
    &self,
    ptr: *mut c_void,
    size: usize,
    site: CallSite,
  ) -> Result<Option<NonNull<c_void>>, AllocError> {
    if size == 0 && !ptr.is_null() {
      unsafe { self.free(ptr, site) };
      return Ok(None);
    }

    let new = unsafe { self.realloc(ptr, size, site) };
    NonNull::new(new)
      .map(Some)
      .ok_or(AllocError::AllocationFailure { op: Op::Realloc, site })
  }

  pub fn try_calloc(
    &self,
    count: usize,
    size: usize,
    site: CallSite,
  ) -> Result<NonNull<c_void>, AllocError> {
    NonNull::new(self.calloc(count, size, site)).ok_or(AllocError::AllocationFailure { op: Op::Calloc, site })
  }

  pub fn try_strdup(
    &self,
    s: &CStr,
    site: CallSite,
  ) -> Result<NonNull<c_char>, AllocError> {
    NonNull::new(self.strdup(s, site)).ok_or(AllocError::AllocationFailure { op: Op::Strdup, site })
  }

  /// Emits every counter as an `info` event.
  pub fn report(&self) {
    let stats = self.stats();
    for op in Op::ALL {
      info!(op = op.name(), count = stats.count(op), "{op}_count: {}", stats.count(op));
    }
  }
}

/// Allocates `size` bytes from libc, counted into [`global()`].
pub fn malloc(
  size: usize,
  site: CallSite,
) -> *mut c_void {
  Tracker::global().malloc(size, site)
}

/// Resizes a block from libc, counted into [`global()`].
///
/// # Safety
///
/// See [`Tracker::realloc`].
pub unsafe fn realloc(
  ptr: *mut c_void,
  size: usize,
  site: CallSite,
) -> *mut c_void {
  unsafe { Tracker::global().realloc(ptr, size, site) }
}

/// Allocates zeroed memory from libc, counted into [`global()`].
pub fn calloc(
  count: usize,
  size: usize,
  site: CallSite,
) -> *mut c_void {
  Tracker::global().calloc(count, size, site)
}

/// Duplicates a string with libc, counted into [`global()`].
pub fn strdup(
  s: &CStr,
  site: CallSite,
) -> *mut c_char {
  Tracker::global().strdup(s, site)
}

/// Releases a libc block, counted into [`global()`]. Null is a no-op.
///
/// # Safety
///
/// See [`Tracker::free`].
pub unsafe fn free(
  ptr: *mut c_void,
  site: CallSite,
) {
  unsafe { Tracker::global().free(ptr, site) }
}

/// Current values of the global counter set.
pub fn stats() -> AllocStats {
  GLOBAL.snapshot()
}

/// Emits the global counter set as `info` events.
pub fn report() {
  Tracker::global().report()
}
