//! Exercises the process-wide counter set. Kept to a single test so that
//! nothing else in this binary touches the global counters.

use std::{ffi::CStr, ptr};

use ztally::{
  AllocStats, tracked_calloc, tracked_free, tracked_malloc, tracked_realloc, tracked_strdup,
};

#[test]
fn global_counters_follow_tracked_calls() {
  assert_eq!(ztally::stats(), AllocStats::default());

  // allocate, release, allocate again.
  let first = tracked_malloc!(32);
  assert!(!first.is_null());
  unsafe { tracked_free!(first) };
  let second = tracked_malloc!(32);
  assert!(!second.is_null());

  let stats = ztally::stats();
  assert_eq!(stats.malloc_count, 2);
  assert_eq!(stats.free_count, 1);

  // Null release touches nothing.
  unsafe { tracked_free!(ptr::null_mut()) };
  assert_eq!(ztally::stats(), stats);

  // A failed realloc is not counted and the block is still ours.
  let failed = unsafe { tracked_realloc!(second, usize::MAX) };
  assert!(failed.is_null());
  assert_eq!(ztally::stats(), stats);

  let second = unsafe { tracked_realloc!(second, 64) };
  assert!(!second.is_null());

  let zeroed = tracked_calloc!(3, 5);
  let copy = tracked_strdup!(c"ztally");
  assert_eq!(unsafe { CStr::from_ptr(copy) }, c"ztally");

  unsafe {
    tracked_free!(second);
    tracked_free!(zeroed);
    tracked_free!(copy.cast());
  }

  let stats = ztally::stats();
  assert_eq!(
    stats,
    AllocStats {
      malloc_count: 2,
      realloc_count: 1,
      calloc_count: 1,
      strdup_count: 1,
      free_count: 4,
    }
  );

  ztally::report();
  ztally::report();
  assert_eq!(ztally::stats(), stats);

  // The entry points and `global()` share one counter set.
  assert_eq!(ztally::global().snapshot(), stats);
}
