//! Analysis options from `--config` and command-line overrides.

use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::args::CliArgs;
use crate::options::AnalyzeOptions;

pub fn load_options(path: &Path) -> Result<AnalyzeOptions> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_options(&source).with_context(|| format!("failed to parse config: {}", path.display()))
}

pub fn parse_options(source: &str) -> Result<AnalyzeOptions> {
    let options = serde_json::from_str(source)?;
    Ok(options)
}

/// Config file values (if any), then explicit flags on top.
pub fn resolve_options(args: &CliArgs) -> Result<AnalyzeOptions> {
    let mut options = match &args.config {
        Some(path) => load_options(path)?,
        None => AnalyzeOptions::default(),
    };
    apply_cli_overrides(&mut options, args);
    Ok(options)
}

pub fn apply_cli_overrides(options: &mut AnalyzeOptions, args: &CliArgs) {
    if let Some(max_tokens) = args.max_tokens {
        options.max_tokens = Some(max_tokens);
    }
    if let Some(depth) = args.max_nesting_depth {
        options.max_nesting_depth = depth;
    }
}
