//! Scope builder for the scopetrace engine.
//!
//! Consumes the token stream produced by `scopetrace-scanner` and produces a
//! [`ScopeTree`]: the nested Global / Function / Block / Loop scopes of the
//! program, the bindings each scope declares, and every identifier reference
//! together with the scope it textually appears in. Resolving references
//! against the tree is the binder's job.

pub mod error;
pub mod scope;
pub mod state;
mod state_expressions;
mod state_statements;

pub use error::{ParseError, ParseErrorKind};
pub use scope::{
    Ancestors, Binding, BindingId, DeclKind, Reference, ScopeId, ScopeKind, ScopeNode, ScopeTree,
};
pub use state::{BuilderOptions, ScopeBuilder, build_scopes, build_scopes_with_options};
