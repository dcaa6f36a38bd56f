use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the scopetrace binary.
#[derive(Parser, Debug)]
#[command(
    name = "scopetrace",
    version,
    about = "Print the lexical scopes and variable bindings of JavaScript files"
)]
pub struct CliArgs {
    /// Files or directories to analyze. Directories are searched for .js, .mjs and .cjs files.
    #[arg(required = true, value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Skip paths matching this glob (repeatable).
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, ignore_case = true)]
    pub format: OutputFormat,

    /// Disable colored output.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// List occurrences of names no enclosing scope declares.
    #[arg(long)]
    pub unresolved: bool,

    /// Exit with status 2 when any unresolved names are found.
    #[arg(long = "fail-on-unresolved")]
    pub fail_on_unresolved: bool,

    /// JSON file with analysis options (`maxTokens`, `maxNestingDepth`).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Abort a file after this many tokens.
    #[arg(long = "max-tokens", value_name = "N")]
    pub max_tokens: Option<usize>,

    /// Reject programs nested deeper than this.
    #[arg(long = "max-nesting-depth", value_name = "N")]
    pub max_nesting_depth: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented scope tree.
    Text,
    /// Nested scope reports, one per file.
    Json,
}
