//! Rendering of collected diagnostics.
//!
//! Three layouts, picked from what the caller supplies:
//! - no source: one `Display` line per diagnostic, spans as byte offsets
//! - `plain(true)`: `kind: message at line:col`, one per line
//! - otherwise: annotated source excerpts via annotate-snippets

use std::fmt::Write;
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};
use stacknote_core::LineIndex;

use super::{DiagnosticMessage, Diagnostics, Span};

#[derive(Clone, Copy)]
enum Layout {
    Offsets,
    Plain,
    Excerpt { colored: bool },
}

pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
    plain: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
            plain: false,
        }
    }

    pub fn source(self, source: &'s str) -> Self {
        Self {
            source: Some(source),
            ..self
        }
    }

    /// Shown in excerpt headers and as a prefix of plain lines.
    pub fn path(self, path: &'s str) -> Self {
        Self {
            path: Some(path),
            ..self
        }
    }

    pub fn colored(self, colored: bool) -> Self {
        Self { colored, ..self }
    }

    pub fn plain(self, plain: bool) -> Self {
        Self { plain, ..self }
    }

    fn layout(&self) -> Layout {
        match (self.source, self.plain) {
            (None, _) => Layout::Offsets,
            (Some(_), true) => Layout::Plain,
            (Some(_), false) => Layout::Excerpt {
                colored: self.colored,
            },
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let source = self.source.unwrap_or_default();
        match self.layout() {
            Layout::Offsets => self
                .diagnostics
                .iter()
                .try_for_each(|diag| writeln!(w, "{diag}")),
            Layout::Plain => {
                let index = LineIndex::new(source);
                for diag in self.diagnostics {
                    self.write_plain(w, &index, diag)?;
                }
                Ok(())
            }
            Layout::Excerpt { colored } => {
                let renderer = if colored {
                    Renderer::styled()
                } else {
                    Renderer::plain()
                };
                let mut first = true;
                for diag in self.diagnostics {
                    if !first {
                        w.write_char('\n')?;
                    }
                    first = false;
                    self.write_excerpt(w, &renderer, source, diag)?;
                }
                Ok(())
            }
        }
    }

    fn write_plain(
        &self,
        w: &mut impl Write,
        index: &LineIndex,
        diag: &DiagnosticMessage,
    ) -> std::fmt::Result {
        let prefix = self.path.map(|p| format!("{p}: ")).unwrap_or_default();
        let at = index.line_col(diag.span.start);
        writeln!(w, "{prefix}{}: {} at {at}", diag.kind, diag.message)
    }

    fn write_excerpt(
        &self,
        w: &mut impl Write,
        renderer: &Renderer,
        source: &str,
        diag: &DiagnosticMessage,
    ) -> std::fmt::Result {
        let annotation = AnnotationKind::Primary
            .span(visible_range(diag.span, source.len()))
            .label(&diag.message);
        let snippet = Snippet::source(source).line_start(1).annotation(annotation);
        let snippet = match self.path {
            Some(path) => snippet.path(path),
            None => snippet,
        };

        let title = diag
            .function
            .as_ref()
            .map_or_else(|| diag.kind.to_string(), |f| format!("{} in `{f}`", diag.kind));
        let group = [Level::ERROR.primary_title(title).element(snippet)];
        write!(w, "{}", renderer.render(&group))
    }
}

/// Clamps to the source and widens an empty span to one column where possible.
fn visible_range(span: Span, len: usize) -> Range<usize> {
    let start = span.start.min(len);
    let end = span.end.clamp(start, len);
    if end > start {
        start..end
    } else {
        start..(start + 1).min(len)
    }
}

impl Diagnostics {
    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(self)
    }
}
