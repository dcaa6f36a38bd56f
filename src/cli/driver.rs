//! File discovery, parallel analysis and output for the CLI.

use anyhow::{Context, Result, bail};
use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use crate::analysis::{Analysis, AnalyzeError, analyze_with_options};
use crate::cli::args::{CliArgs, OutputFormat};
use crate::cli::config::resolve_options;
use crate::cli::reporter::Reporter;
use crate::options::AnalyzeOptions;
use crate::report::{ScopeReport, UnresolvedReport};

pub const EXIT_SUCCESS: i32 = 0;
/// At least one file could not be read or analyzed.
pub const EXIT_ANALYSIS_FAILED: i32 = 1;
/// `--fail-on-unresolved` and at least one unresolved name.
pub const EXIT_UNRESOLVED: i32 = 2;

pub const SOURCE_EXTENSIONS: &[&str] = &["js", "mjs", "cjs"];

#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to read file: {0}")]
    Read(#[from] std::io::Error),
    #[error(transparent)]
    Analyze(#[from] AnalyzeError),
}

pub struct FileOutcome {
    pub path: PathBuf,
    pub source: String,
    pub result: Result<Analysis, FileError>,
}

impl FileOutcome {
    pub fn unresolved_count(&self) -> usize {
        self.result
            .as_ref()
            .map(|analysis| analysis.unresolved().count())
            .unwrap_or_default()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileReport<'a> {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    scopes: Option<ScopeReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unresolved: Vec<UnresolvedReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a AnalyzeError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

pub fn build_exclude_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("invalid --exclude glob: {pattern}"))?;
        builder.add(glob);
    }
    builder.build().context("failed to build --exclude globs")
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Expand `paths` into the list of files to analyze, sorted and deduplicated.
///
/// Files named explicitly are kept whatever their extension; directories
/// contribute only JavaScript sources. Excluded paths are dropped either way.
pub fn discover_files(paths: &[PathBuf], exclude: &GlobSet) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for root in paths {
        if !root.exists() {
            bail!("path does not exist: {}", root.display());
        }
        if root.is_file() {
            if !exclude.is_match(root) {
                files.push(root.clone());
            }
            continue;
        }
        for entry in WalkDir::new(root).follow_links(true) {
            let entry =
                entry.with_context(|| format!("failed to walk directory: {}", root.display()))?;
            let path = entry.path();
            if entry.file_type().is_file() && has_source_extension(path) && !exclude.is_match(path)
            {
                files.push(path.to_path_buf());
            }
        }
    }
    files.sort();
    files.dedup();
    debug!(files = files.len(), "discovered source files");
    Ok(files)
}

pub fn analyze_file(path: &Path, options: &AnalyzeOptions) -> FileOutcome {
    let (source, result) = match std::fs::read_to_string(path) {
        Ok(source) => {
            let result = analyze_with_options(&source, options).map_err(FileError::from);
            (source, result)
        }
        Err(err) => (String::new(), Err(FileError::Read(err))),
    };
    FileOutcome {
        path: path.to_path_buf(),
        source,
        result,
    }
}

/// Analyze files in parallel; outcomes keep the order of `files`.
pub fn analyze_files(files: &[PathBuf], options: &AnalyzeOptions) -> Vec<FileOutcome> {
    files
        .par_iter()
        .map(|path| analyze_file(path, options))
        .collect()
}

/// Run the CLI, writing the report to `out`. Returns the process exit code.
pub fn run(args: &CliArgs, color: bool, out: &mut dyn Write) -> Result<i32> {
    let options = resolve_options(args)?;
    let exclude = build_exclude_set(&args.exclude)?;
    let files = discover_files(&args.paths, &exclude)?;
    let outcomes = analyze_files(&files, &options);

    match args.format {
        OutputFormat::Text => write_text(args, color, &outcomes, out)?,
        OutputFormat::Json => write_json(&outcomes, out)?,
    }
    out.flush().context("failed to flush output")?;

    Ok(exit_code(args, &outcomes))
}

pub fn exit_code(args: &CliArgs, outcomes: &[FileOutcome]) -> i32 {
    if outcomes.iter().any(|o| o.result.is_err()) {
        EXIT_ANALYSIS_FAILED
    } else if args.fail_on_unresolved && outcomes.iter().any(|o| o.unresolved_count() > 0) {
        EXIT_UNRESOLVED
    } else {
        EXIT_SUCCESS
    }
}

fn write_text(
    args: &CliArgs,
    color: bool,
    outcomes: &[FileOutcome],
    out: &mut dyn Write,
) -> Result<()> {
    let reporter = Reporter::new(color);
    for (index, outcome) in outcomes.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        let path = outcome.path.display().to_string();
        let rendered = match &outcome.result {
            Ok(analysis) => {
                let mut rendered = reporter.render_tree(&path, analysis);
                if args.unresolved || args.fail_on_unresolved {
                    rendered.push_str(&reporter.render_unresolved(&path, analysis));
                }
                rendered
            }
            Err(FileError::Analyze(err)) => reporter.render_error(&path, &outcome.source, err),
            Err(err @ FileError::Read(_)) => reporter.render_file_error(&path, &err.to_string()),
        };
        out.write_all(rendered.as_bytes())
            .context("failed to write report")?;
    }
    Ok(())
}

fn write_json(outcomes: &[FileOutcome], out: &mut dyn Write) -> Result<()> {
    let reports: Vec<FileReport<'_>> = outcomes
        .iter()
        .map(|outcome| {
            let path = outcome.path.display().to_string();
            match &outcome.result {
                Ok(analysis) => FileReport {
                    path,
                    scopes: Some(analysis.to_report()),
                    unresolved: analysis
                        .unresolved()
                        .map(|o| UnresolvedReport {
                            name: o.name.clone(),
                            range: analysis.source_range(o.span),
                        })
                        .collect(),
                    error: None,
                    message: None,
                },
                Err(err) => FileReport {
                    path,
                    scopes: None,
                    unresolved: Vec::new(),
                    error: match err {
                        FileError::Analyze(err) => Some(err),
                        FileError::Read(_) => None,
                    },
                    message: Some(err.to_string()),
                },
            }
        })
        .collect();

    serde_json::to_writer_pretty(&mut *out, &reports).context("failed to write JSON report")?;
    writeln!(out)?;
    Ok(())
}
