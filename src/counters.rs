use std::{
  fmt,
  sync::atomic::{AtomicU64, Ordering},
};

/// The heap primitive a counter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
  Malloc,
  Realloc,
  Calloc,
  Strdup,
  Free,
}

impl Op {
  pub const ALL: [Op; 5] = [Op::Malloc, Op::Realloc, Op::Calloc, Op::Strdup, Op::Free];

  pub const fn name(self) -> &'static str {
    match self {
      Op::Malloc => "malloc",
      Op::Realloc => "realloc",
      Op::Calloc => "calloc",
      Op::Strdup => "strdup",
      Op::Free => "free",
    }
  }
}

impl fmt::Display for Op {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// A set of monotonically increasing operation counters.
///
/// Every counter is an independent [`AtomicU64`], so any number of threads
/// may bump the same set without losing updates. There is no way to
/// decrement or reset a counter.
///
/// The process-wide instance lives behind [`crate::global`]; additional
/// instances can be created for isolated accounting:
///
/// ```rust
/// use ztally::{Counters, Libc, Tracker, call_site};
///
/// static MINE: Counters = Counters::new();
///
/// let tracker = Tracker::new(Libc, &MINE);
/// let ptr = tracker.malloc(32, call_site!());
/// unsafe { tracker.free(ptr, call_site!()) };
///
/// assert_eq!(MINE.snapshot().malloc_count, 1);
/// assert_eq!(MINE.snapshot().free_count, 1);
/// ```
#[derive(Debug, Default)]
pub struct Counters {
  malloc: AtomicU64,
  realloc: AtomicU64,
  calloc: AtomicU64,
  strdup: AtomicU64,
  free: AtomicU64,
}

impl Counters {
  pub const fn new() -> Self {
    Self {
      malloc: AtomicU64::new(0),
      realloc: AtomicU64::new(0),
      calloc: AtomicU64::new(0),
      strdup: AtomicU64::new(0),
      free: AtomicU64::new(0),
    }
  }

  fn slot(
    &self,
    op: Op,
  ) -> &AtomicU64 {
    match op {
      Op::Malloc => &self.malloc,
      Op::Realloc => &self.realloc,
      Op::Calloc => &self.calloc,
      Op::Strdup => &self.strdup,
      Op::Free => &self.free,
    }
  }

  /// Records one successful `op`.
  #[inline]
  pub fn record(
    &self,
    op: Op,
  ) {
    self.slot(op).fetch_add(1, Ordering::Relaxed);
  }

  pub fn get(
    &self,
    op: Op,
  ) -> u64 {
    self.slot(op).load(Ordering::Relaxed)
  }

  /// Reads all five counters.
  ///
  /// Each counter is loaded on its own, so while other threads are
  /// allocating the result is not a consistent cut across counters.
  pub fn snapshot(&self) -> AllocStats {
    AllocStats {
      malloc_count: self.get(Op::Malloc),
      realloc_count: self.get(Op::Realloc),
      calloc_count: self.get(Op::Calloc),
      strdup_count: self.get(Op::Strdup),
      free_count: self.get(Op::Free),
    }
  }
}

/// Counter values read at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocStats {
  pub malloc_count: u64,
  pub realloc_count: u64,
  pub calloc_count: u64,
  pub strdup_count: u64,
  pub free_count: u64,
}

impl AllocStats {
  pub fn count(
    &self,
    op: Op,
  ) -> u64 {
    match op {
      Op::Malloc => self.malloc_count,
      Op::Realloc => self.realloc_count,
      Op::Calloc => self.calloc_count,
      Op::Strdup => self.strdup_count,
      Op::Free => self.free_count,
    }
  }

  /// Counts accumulated since `earlier`.
  ///
  /// Counters never decrease, so the subtraction saturates only when
  /// `earlier` was taken from a different counter set.
  pub fn since(
    &self,
    earlier: &AllocStats,
  ) -> AllocStats {
    AllocStats {
      malloc_count: self.malloc_count.saturating_sub(earlier.malloc_count),
      realloc_count: self.realloc_count.saturating_sub(earlier.realloc_count),
      calloc_count: self.calloc_count.saturating_sub(earlier.calloc_count),
      strdup_count: self.strdup_count.saturating_sub(earlier.strdup_count),
      free_count: self.free_count.saturating_sub(earlier.free_count),
    }
  }

  /// One-line human-readable summary.
  pub fn summary(&self) -> String {
    format!(
      "malloc: {}, realloc: {}, calloc: {}, strdup: {}, free: {}",
      self.malloc_count, self.realloc_count, self.calloc_count, self.strdup_count, self.free_count,
    )
  }
}
