//! Stack growth for recursive tree walks.
//!
//! The parser, the analyzer, the code generator and the interpreter all
//! recurse over the AST, and the interpreter also recurses once per program
//! call. Wrapping each recursive step in [`guarded`] moves the walk onto a
//! freshly allocated stack segment whenever less than [`RED_ZONE`] bytes are
//! left, so nesting is bounded by the configured limits instead of by the
//! size of the thread's stack.
//!
//! # Examples
//!
//! ```
//! fn depth(n: u32) -> u32 {
//!     pyrite_mem::stack::guarded(|| if n == 0 { 0 } else { 1 + depth(n - 1) })
//! }
//!
//! assert_eq!(depth(100_000), 100_000);
//! ```

/// Remaining stack below which a new segment is allocated.
pub const RED_ZONE: usize = 128 * 1024;

/// Size of each additional stack segment.
pub const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Runs `f`, first switching to a new stack segment if the current one is
/// nearly exhausted.
#[inline]
pub fn guarded<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nest(n: usize) -> usize {
        guarded(|| {
            let padding = [n as u8; 256];
            if n == 0 {
                usize::from(padding[0])
            } else {
                nest(n - 1) + 1
            }
        })
    }

    #[test]
    fn test_deep_recursion_survives() {
        assert_eq!(nest(50_000), 50_000);
    }

    #[test]
    fn test_shallow_call_runs_in_place() {
        assert_eq!(guarded(|| 2 + 2), 4);
    }
}
