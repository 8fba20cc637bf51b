use std::fmt;

/// Where a tracked call was made from.
///
/// Built by [`call_site!`](crate::call_site) at the caller. The tracked
/// operations never store it; it only shows up in the diagnostic emitted
/// when an allocation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite {
  pub file: &'static str,
  pub function: &'static str,
  pub line: u32,
}

impl CallSite {
  pub const fn new(
    file: &'static str,
    function: &'static str,
    line: u32,
  ) -> Self {
    Self { file, function, line }
  }

  /// Placeholder for callers that have no location to report.
  pub const fn unknown() -> Self {
    Self::new("<unknown>", "<unknown>", 0)
  }
}

impl fmt::Display for CallSite {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(f, "{}:{} ({})", self.file, self.line, self.function)
  }
}

/// Strips the marker fn and any closure segments from a type name produced
/// inside [`call_site!`](crate::call_site), leaving the enclosing function path.
#[doc(hidden)]
pub fn enclosing_function(type_name: &'static str) -> &'static str {
  let mut name = type_name.strip_suffix("::__ztally_here").unwrap_or(type_name);
  while let Some(outer) = name.strip_suffix("::{{closure}}") {
    name = outer;
  }
  name
}

/// Captures the current file, enclosing function and line as a [`CallSite`].
#[macro_export]
macro_rules! call_site {
  () => {{
    fn __ztally_here() {}
    $crate::CallSite::new(
      file!(),
      $crate::site::enclosing_function(::core::any::type_name_of_val(&__ztally_here)),
      line!(),
    )
  }};
}

/// [`malloc`](crate::malloc) with the caller's location attached.
#[macro_export]
macro_rules! tracked_malloc {
  ($size:expr) => {
    $crate::malloc($size, $crate::call_site!())
  };
}

/// [`realloc`](crate::realloc) with the caller's location attached. Must be
/// used inside an `unsafe` block.
#[macro_export]
macro_rules! tracked_realloc {
  ($ptr:expr, $size:expr) => {
    $crate::realloc($ptr, $size, $crate::call_site!())
  };
}

/// [`calloc`](crate::calloc) with the caller's location attached.
#[macro_export]
macro_rules! tracked_calloc {
  ($count:expr, $size:expr) => {
    $crate::calloc($count, $size, $crate::call_site!())
  };
}

/// [`strdup`](crate::strdup) with the caller's location attached.
#[macro_export]
macro_rules! tracked_strdup {
  ($s:expr) => {
    $crate::strdup($s, $crate::call_site!())
  };
}

/// [`free`](crate::free) with the caller's location attached. Must be used
/// inside an `unsafe` block.
#[macro_export]
macro_rules! tracked_free {
  ($ptr:expr) => {
    $crate::free($ptr, $crate::call_site!())
  };
}
