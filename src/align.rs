use std::{ffi::c_long, mem};

/// Size of the platform word that [`align_sys!`](crate::align_sys) rounds to.
pub const SYS_WORD: usize = mem::size_of::<c_long>();

/// Rounds `value` up to the next multiple of `align`.
///
/// `align` need not be a power of two.
///
/// ```rust
/// use ztally::align_up;
///
/// assert_eq!(align_up!(13, 8), 16);
/// assert_eq!(align_up!(16, 8), 16);
/// assert_eq!(align_up!(10, 3), 12);
/// ```
#[macro_export]
macro_rules! align_up {
  ($value:expr, $align:expr) => {{
    let value = $value;
    let align = $align;
    match value % align {
      0 => value,
      rem => value + (align - rem),
    }
  }};
}

/// Rounds `value` down to a multiple of `align`.
///
/// ```rust
/// use ztally::align_down;
///
/// assert_eq!(align_down!(13, 8), 8);
/// assert_eq!(align_down!(10, 3), 9);
/// ```
#[macro_export]
macro_rules! align_down {
  ($value:expr, $align:expr) => {{
    let value = $value;
    value - (value % $align)
  }};
}

/// Rounds `value` up to the machine word (`c_long`) size.
///
/// ```rust
/// use ztally::align_sys;
///
/// match std::mem::size_of::<std::ffi::c_long>() {
///     8 => assert_eq!(align_sys!(13), 16), // 64 bit machine.
///     4 => assert_eq!(align_sys!(11), 12), // 32 bit machine.
///     _ => {},
/// };
/// ```
#[macro_export]
macro_rules! align_sys {
  ($value:expr) => {
    $crate::align_up!($value, $crate::align::SYS_WORD)
  };
}

/// Smallest power of two that is `>= n`.
///
/// `0` maps to `1`. Inputs above `2^31` have no `u32` answer and wrap to `0`.
pub const fn roundup_pow_of_two(n: u32) -> u32 {
  if n == 0 {
    return 1;
  }
  match n.checked_next_power_of_two() {
    Some(p) => p,
    None => 0,
  }
}
