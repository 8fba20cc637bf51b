//! # ztally - Counting Heap Allocation Wrappers
//!
//! This crate provides thin wrappers around the C heap primitives
//! (`malloc`, `realloc`, `calloc`, `strdup`, `free`) that count every
//! successful call. It is meant for cheap memory-usage auditing in Linux
//! userspace tooling: all real memory management is left to libc.
//!
//! ## Overview
//!
//! ```text
//!   Data flow of a tracked call:
//!
//!   ┌──────────┐  size, call site  ┌──────────┐  size  ┌──────────────┐
//!   │  caller  │ ────────────────► │ Tracker  │ ─────► │   Platform   │
//!   └──────────┘                   └──────────┘        │ (libc heap)  │
//!        ▲                              │   ◄───────── └──────────────┘
//!        │           ptr / null         │      ptr / null
//!        └──────────────────────────────┤
//!                                       │ non-null?
//!                                       ▼
//!                              ┌──────────────────┐
//!                              │     Counters     │   null ──► error! event
//!                              │ malloc  realloc  │
//!                              │ calloc  strdup   │
//!                              │ free             │
//!                              └──────────────────┘
//! ```
//!
//! Counters only ever go up, and only on success. A failed call leaves them
//! untouched, logs an `error` event through [`tracing`] and returns null.
//!
//! ## Crate Structure
//!
//! ```text
//!   ztally
//!   ├── align      - Alignment helpers (align_up!, align_down!, align_sys!)
//!   ├── counters   - Atomic counter set and snapshots
//!   ├── error      - AllocError
//!   ├── global     - CountingAllocator (GlobalAlloc adapter)
//!   ├── platform   - Platform trait and the libc implementation
//!   ├── site       - CallSite and the tracked_* macros
//!   └── tracked    - Tracker and the process-wide entry points
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use ztally::{tracked_free, tracked_malloc, tracked_strdup};
//!
//! let before = ztally::stats();
//!
//! let buf = tracked_malloc!(128);
//! let name = tracked_strdup!(c"sensor0");
//! assert!(!buf.is_null() && !name.is_null());
//!
//! unsafe {
//!     tracked_free!(buf);
//!     tracked_free!(name.cast());
//! }
//!
//! // Other threads may be counting too, hence `>=`.
//! let delta = ztally::stats().since(&before);
//! assert!(delta.malloc_count >= 1);
//! assert!(delta.strdup_count >= 1);
//! assert!(delta.free_count >= 2);
//!
//! // Emits malloc_count, realloc_count, ... as `info` events.
//! ztally::report();
//! ```
//!
//! ## Failed `realloc`
//!
//! A failed `realloc` returns null and leaves the old block alone. The
//! caller still owns it and must free it through the old pointer:
//!
//! ```rust
//! use ztally::{tracked_free, tracked_malloc, tracked_realloc};
//!
//! let old = tracked_malloc!(16);
//! let new = unsafe { tracked_realloc!(old, usize::MAX) };
//! assert!(new.is_null());
//! unsafe { tracked_free!(old) };
//! ```
//!
//! Resizing a live block to zero bytes is a release, not a failure: the
//! block is freed and counted as such, null comes back, and the old pointer
//! must not be freed again.
//!
//! ```rust
//! use ztally::{tracked_malloc, tracked_realloc};
//!
//! let block = tracked_malloc!(16);
//! let gone = unsafe { tracked_realloc!(block, 0) };
//! assert!(gone.is_null());
//! ```
//!
//! ## Concurrency
//!
//! Each counter is an `AtomicU64` bumped with a relaxed `fetch_add`, so
//! concurrent callers never lose an update. A [`AllocStats`] snapshot reads
//! the five counters one by one.
//!
//! ## Safety
//!
//! `realloc` and `free` take raw pointers whose provenance the crate cannot
//! check; both are `unsafe`. `malloc`, `calloc` and `strdup` only hand out
//! fresh pointers and are safe to call.

pub mod align;
mod counters;
mod error;
mod global;
mod platform;
#[doc(hidden)]
pub mod site;
mod tracked;

pub use align::roundup_pow_of_two;
pub use counters::{AllocStats, Counters, Op};
pub use error::AllocError;
pub use global::CountingAllocator;
pub use platform::{Libc, Platform};
pub use site::CallSite;
pub use tracked::{Tracker, calloc, free, global, malloc, realloc, report, stats, strdup};
