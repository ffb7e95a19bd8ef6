// Resource limits for the tokenizer and parser

/// Default maximum nesting depth of statements and expressions
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default maximum number of tokens a single source may produce
pub const DEFAULT_MAX_TOKENS: usize = 1_000_000;

/// Bounds applied while tokenizing and parsing one source.
///
/// Recursive descent uses one stack frame chain per nesting level, so the depth
/// bound is what keeps pathological input (`((((...))))`, `- - - - x`, deeply
/// nested `begin` blocks) from overflowing the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_depth: usize,
    pub max_tokens: usize,
}

impl Limits {
    pub fn new(max_depth: usize, max_tokens: usize) -> Self {
        Self {
            max_depth,
            max_tokens,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH, DEFAULT_MAX_TOKENS)
    }
}
