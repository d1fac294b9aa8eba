//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use super::Diagnostics;
use super::message::{Severity, SourceRef};

/// Builder for rendering diagnostics with various options.
pub struct DiagnosticsPrinter<'d> {
    diagnostics: &'d Diagnostics,
    colored: bool,
    min_severity: Severity,
}

impl<'d> DiagnosticsPrinter<'d> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            colored: false,
            min_severity: Severity::Info,
        }
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    /// Skip messages below `severity`.
    pub fn min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        let visible = self
            .diagnostics
            .iter()
            .filter(|d| d.severity() >= self.min_severity);
        for (i, diag) in visible.enumerate() {
            let level = severity_to_level(diag.severity());
            let title = level.primary_title(diag.message());
            let location = diag.source().map(ToString::to_string).unwrap_or_default();
            let note = format!("at {location}");

            let group = match diag.source() {
                Some(SourceRef {
                    expression: Some((text, range)),
                    ..
                }) => title.element(
                    Snippet::source(text.as_str())
                        .line_start(1)
                        .path(location.as_str())
                        .annotation(
                            AnnotationKind::Primary
                                .span(adjust_range(range.clone(), text.len()))
                                .label(diag.message()),
                        ),
                ),
                Some(_) => title.element(Level::NOTE.message(note.as_str())),
                None => Group::with_title(title),
            };
            let report: Vec<Group> = vec![group];

            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", renderer.render(&report))?;
        }

        Ok(())
    }

    /// One line per message, no snippets.
    pub fn format_plain(&self, w: &mut impl Write) -> std::fmt::Result {
        let visible = self
            .diagnostics
            .iter()
            .filter(|d| d.severity() >= self.min_severity);
        for (i, diag) in visible.enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", diag)?;
        }
        Ok(())
    }

    pub fn render_plain(&self) -> String {
        let mut out = String::new();
        self.format_plain(&mut out)
            .expect("String write never fails");
        out
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
        Severity::Info => Level::INFO,
    }
}

fn adjust_range(range: std::ops::Range<usize>, limit: usize) -> std::ops::Range<usize> {
    let start = range.start.min(limit);
    let end = range.end.min(limit);

    if start == end {
        return start..(start + 1).min(limit);
    }

    start..end
}

impl Diagnostics {
    pub fn printer(&self) -> DiagnosticsPrinter<'_> {
        DiagnosticsPrinter::new(self)
    }
}
