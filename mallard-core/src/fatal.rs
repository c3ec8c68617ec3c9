//! Last-resort process termination for contract violations.
//!
//! Expected failures travel as [`crate::EngineResult`]; this path exists only
//! for wrong-branch result access and broken invariants with no result
//! boundary to carry them. Exit status 101 distinguishes the controlled
//! abort from a normal failure exit; the critical variant aborts without
//! cleanup.

/// Break into an attached debugger in debug builds. No-op in release.
#[inline]
pub fn debug_break() {
    #[cfg(all(debug_assertions, unix))]
    unsafe {
        libc::raise(libc::SIGTRAP);
    }
}

/// Prints the message to stderr, breaks in debug builds, then performs a
/// controlled exit with status 101. Never returns.
pub fn fatal(message: &str) -> ! {
    eprintln!("engine panicked: {message}");
    debug_break();
    std::process::exit(101);
}

/// Like [`fatal`], but triggers a hard process abort without cleanup. For
/// failures where even a controlled exit cannot be trusted.
pub fn fatal_critical(message: &str) -> ! {
    eprintln!("engine panicked: {message}");
    debug_break();
    std::process::abort();
}
