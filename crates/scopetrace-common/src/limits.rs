//! Centralized limits and thresholds for the scopetrace engine.
//!
//! Every limit here can be overridden per call through the analysis options;
//! these are the defaults.

/// Maximum nesting depth of scopes, parenthesised groups, array and object
/// literals combined.
///
/// The scope builder is recursive descent, so each nesting level costs
/// stack frames. Input deeper than this surfaces as a `NestingTooDeep`
/// parse error instead of overflowing the stack.
///
/// ```javascript
/// f(f(f(f(f(f(/* ... 512 levels ... */))))));
/// ```
pub const MAX_NESTING_DEPTH: u32 = 512;

/// Upper bound on walks up the scope chain.
///
/// The tree is acyclic by construction, so a walk longer than this means
/// corrupted parent links; resolution stops instead of looping.
pub const MAX_SCOPE_WALK_ITERATIONS: usize = 10_000;

/// Initial capacity hint for token buffers: roughly one token per
/// four bytes of typical JavaScript.
pub const TOKENS_PER_BYTE_HINT: usize = 4;
