//! Analysis options.

use scopetrace_common::limits::MAX_NESTING_DEPTH;
use scopetrace_parser::BuilderOptions;
use serde::{Deserialize, Serialize};

/// Work bounds for a single `analyze` call.
///
/// Deserializes from the CLI's JSON config file; missing fields take their
/// default values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AnalyzeOptions {
    /// Maximum number of tokens the scanner may produce. `None` is unbounded.
    pub max_tokens: Option<usize>,
    /// Maximum combined nesting of scopes and bracketed groups.
    pub max_nesting_depth: u32,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        AnalyzeOptions {
            max_tokens: None,
            max_nesting_depth: MAX_NESTING_DEPTH,
        }
    }
}

impl AnalyzeOptions {
    pub fn builder_options(&self) -> BuilderOptions {
        BuilderOptions {
            max_nesting_depth: self.max_nesting_depth,
        }
    }
}
