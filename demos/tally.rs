use std::ffi::CStr;

use ztally::{tracked_calloc, tracked_free, tracked_malloc, tracked_realloc, tracked_strdup};

/// Prints the counters after `step` and holds the process until a line is
/// read from stdin, so it can be inspected with `pmap` or `gdb` meanwhile.
fn checkpoint(step: &str) {
  println!("[{step}] {}", ztally::stats().summary());
  println!(">>> press ENTER for the next step");
  let mut line = String::new();
  let _ = std::io::stdin().read_line(&mut line);
}

fn main() {
  // Counter reports and allocation failures are `tracing` events.
  tracing_subscriber::fmt().with_target(false).init();

  ztally::report();
  checkpoint("start");

  unsafe {
    // 1) malloc a u32 and write through it.
    let first = tracked_malloc!(size_of::<u32>()) as *mut u32;
    first.write(0xDEADBEEF);
    println!("\n[1] malloc u32 at {:?}, value = 0x{:X}", first, first.read());
    checkpoint("1");

    // 2) Grow it to 16 u32s. The first value survives the move.
    let grown = tracked_realloc!(first.cast(), 16 * size_of::<u32>()) as *mut u32;
    println!("\n[2] realloc to 64 bytes at {:?}, value = 0x{:X}", grown, grown.read());
    checkpoint("2");

    // 3) calloc a zeroed table and duplicate a string.
    let table = tracked_calloc!(8, size_of::<u64>()) as *mut u64;
    let name = tracked_strdup!(c"eth0");
    println!("\n[3] calloc table[0] = {}, strdup = {:?}", table.read(), CStr::from_ptr(name));
    checkpoint("3");

    // 4) An impossible realloc fails, logs an error and leaves `grown`
    //    owned by us.
    let failed = tracked_realloc!(grown.cast(), usize::MAX);
    println!("\n[4] realloc(usize::MAX) = {:?}, old value = 0x{:X}", failed, grown.read());
    checkpoint("4");

    // 5) Shrinking `table` to zero releases it; it is counted as a free.
    let released = tracked_realloc!(table.cast(), 0);
    println!("\n[5] realloc(table, 0) = {:?}", released);
    checkpoint("5");

    // 6) Release the rest. Freeing null is a no-op and is not counted.
    tracked_free!(grown.cast());
    tracked_free!(name.cast());
    tracked_free!(std::ptr::null_mut());
    println!("\n[6] released all blocks");
  }

  ztally::report();
}
