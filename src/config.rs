//! Interpreter limits.

/// Bounds on recursion so that hostile or runaway programs fail with an error instead of
/// overflowing the host stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of nested user function calls.
    pub max_call_depth: usize,
    /// Maximum nesting of sub-expressions accepted by the parser.  Every operator folded into
    /// a chain such as `1 + 2 + 3` counts as one level.
    pub max_nesting: usize,
    /// Maximum number of expression evaluations and function calls in progress at once,
    /// summed over all active calls.
    pub max_eval_depth: usize,
}

pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;
pub const DEFAULT_MAX_NESTING: usize = 64;
/// Fits the 2 MiB stack of a spawned thread in unoptimized builds.
pub const DEFAULT_MAX_EVAL_DEPTH: usize = 256;

impl Default for Config {
    fn default() -> Config {
        Config {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_nesting: DEFAULT_MAX_NESTING,
            max_eval_depth: DEFAULT_MAX_EVAL_DEPTH,
        }
    }
}
