//! Name resolution for the scopetrace engine.
//!
//! Turns every identifier reference recorded in a [`ScopeTree`] into an
//! [`Occurrence`] bound to the nearest enclosing declaration, or left
//! unresolved when no scope on the chain declares the name.

pub mod occurrence;
pub mod state;

pub use occurrence::{Occurrence, OccurrenceId};
pub use state::{BindResult, BinderState};

use scopetrace_parser::ScopeTree;

/// Resolve all references of `tree`. Never fails: unknown names come back
/// as occurrences with no binding.
pub fn bind(tree: &ScopeTree) -> BindResult {
    BinderState::new(tree).bind()
}

#[cfg(test)]
#[path = "tests/binder_tests.rs"]
mod binder_tests;
