use std::{
  alloc::{GlobalAlloc, Layout},
  ffi::c_void,
  mem, ptr,
};

use crate::{counters::Op, tracked::global};

/// Alignment every `malloc` result is guaranteed to satisfy.
const MALLOC_ALIGN: usize = 2 * mem::size_of::<usize>();

/// Global allocator that sends Rust heap traffic through libc and counts it
/// into [`global()`](crate::global).
///
/// `alloc` counts as malloc, `alloc_zeroed` as calloc, `realloc` as realloc
/// and `dealloc` as free. Nothing is logged from here: emitting a diagnostic
/// would allocate from inside the allocator. Allocation failure surfaces
/// through the standard `handle_alloc_error` path.
///
/// ```rust,ignore
/// #[global_allocator]
/// static ALLOC: ztally::CountingAllocator = ztally::CountingAllocator;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CountingAllocator;

unsafe fn aligned_malloc(layout: Layout) -> *mut u8 {
  unsafe {
    if layout.align() > MALLOC_ALIGN {
      let mut out: *mut c_void = ptr::null_mut();
      if libc::posix_memalign(&mut out, layout.align(), layout.size()) == 0 {
        out as *mut u8
      } else {
        ptr::null_mut()
      }
    } else {
      libc::malloc(layout.size()) as *mut u8
    }
  }
}

fn counted(
  op: Op,
  ptr: *mut u8,
) -> *mut u8 {
  if !ptr.is_null() {
    global().record(op);
  }
  ptr
}

// SAFETY: libc's allocator is thread-safe, and every method returns memory
// aligned to `layout.align()` or null.
unsafe impl GlobalAlloc for CountingAllocator {
  #[inline]
  unsafe fn alloc(
    &self,
    layout: Layout,
  ) -> *mut u8 {
    counted(Op::Malloc, unsafe { aligned_malloc(layout) })
  }

  #[inline]
  unsafe fn alloc_zeroed(
    &self,
    layout: Layout,
  ) -> *mut u8 {
    let ptr = unsafe {
      if layout.align() > MALLOC_ALIGN {
        let ptr = aligned_malloc(layout);
        if !ptr.is_null() {
          ptr::write_bytes(ptr, 0, layout.size());
        }
        ptr
      } else {
        libc::calloc(1, layout.size()) as *mut u8
      }
    };
    counted(Op::Calloc, ptr)
  }

  #[inline]
  unsafe fn realloc(
    &self,
    ptr: *mut u8,
    layout: Layout,
    new_size: usize,
  ) -> *mut u8 {
    let new = unsafe {
      if layout.align() > MALLOC_ALIGN {
        // libc realloc does not keep over-alignment.
        let new = aligned_malloc(Layout::from_size_align_unchecked(new_size, layout.align()));
        if !new.is_null() {
          ptr::copy_nonoverlapping(ptr, new, layout.size().min(new_size));
          libc::free(ptr as *mut c_void);
        }
        new
      } else {
        libc::realloc(ptr as *mut c_void, new_size) as *mut u8
      }
    };
    counted(Op::Realloc, new)
  }

  #[inline]
  unsafe fn dealloc(
    &self,
    ptr: *mut u8,
    _layout: Layout,
  ) {
    unsafe { libc::free(ptr as *mut c_void) };
    global().record(Op::Free);
  }
}
