use colored::Colorize;

use crate::analysis::{Analysis, AnalyzeError};
use scopetrace_common::LineMap;
use scopetrace_parser::{ScopeKind, ScopeNode};

/// Renders analyses for the terminal.
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    /// The scope tree as nested cards: one header line per scope followed by
    /// its variables.
    pub fn render_tree(&self, path: &str, analysis: &Analysis) -> String {
        let mut out = String::new();
        out.push_str(&self.paint_path(path));
        out.push('\n');
        self.render_scope(analysis, analysis.root(), 0, &mut out);
        out
    }

    fn render_scope(&self, analysis: &Analysis, scope: &ScopeNode, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        let start = analysis.source_range(scope.range);
        out.push_str(&format!(
            "{indent}{} {} {}:{}-{}:{}\n",
            self.paint_label(scope),
            self.dim(&format!("({})", scope.kind.as_str())),
            start.start_position.line + 1,
            start.start_position.character + 1,
            start.end_position.line + 1,
            start.end_position.character + 1,
        ));

        for binding in analysis.variables_in(scope.id).unwrap_or_default() {
            let uses = analysis
                .occurrences_of(binding.id)
                .map(|o| o.len())
                .unwrap_or_default();
            let uses = match uses {
                1 => "1 use".to_string(),
                n => format!("{n} uses"),
            };
            let name = if self.color {
                binding.name.green().to_string()
            } else {
                binding.name.clone()
            };
            out.push_str(&format!(
                "{indent}  {} {name} {}\n",
                binding.kind.as_str(),
                self.dim(&format!("({uses})"))
            ));
        }

        for child in scope.children.iter().filter_map(|&id| analysis.scope(id)) {
            self.render_scope(analysis, child, depth + 1, out);
        }
    }

    /// One warning line per unresolved occurrence.
    pub fn render_unresolved(&self, path: &str, analysis: &Analysis) -> String {
        let mut out = String::new();
        for occurrence in analysis.unresolved() {
            let position = analysis
                .line_map()
                .offset_to_position(occurrence.span.start, analysis.source());
            let category = if self.color {
                "warning".yellow().to_string()
            } else {
                "warning".to_string()
            };
            out.push_str(&format!(
                "{}:{}:{} - {category}: `{}` is not declared in any enclosing scope\n",
                self.paint_path(path),
                position.line + 1,
                position.character + 1,
                occurrence.name,
            ));
        }
        out
    }

    pub fn render_error(&self, path: &str, source: &str, error: &AnalyzeError) -> String {
        let line_map = LineMap::build(source);
        let position = line_map.offset_to_position(error.position(), source);
        let location = format!(
            "{}:{}:{}",
            self.paint_path(path),
            position.line + 1,
            position.character + 1
        );
        self.format_failure(&location, &error.to_string())
    }

    /// A failure with no position, such as an unreadable file.
    pub fn render_file_error(&self, path: &str, message: &str) -> String {
        self.format_failure(&self.paint_path(path), message)
    }

    fn format_failure(&self, location: &str, message: &str) -> String {
        let category = if self.color {
            "error".red().bold().to_string()
        } else {
            "error".to_string()
        };
        format!("{location} - {category}: {message}\n")
    }

    fn paint_path(&self, path: &str) -> String {
        if self.color {
            path.bold().to_string()
        } else {
            path.to_string()
        }
    }

    fn paint_label(&self, scope: &ScopeNode) -> String {
        if !self.color {
            return scope.label.clone();
        }
        match scope.kind {
            ScopeKind::Global => scope.label.bold().to_string(),
            ScopeKind::Function => scope.label.cyan().bold().to_string(),
            ScopeKind::Block | ScopeKind::Loop => scope.label.blue().to_string(),
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}
