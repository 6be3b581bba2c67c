//! Error rendering using ariadne
//!
//! Formula diagnostics are rendered as reports with the error code, the
//! message, the offending span underlined in the formula, and help notes.

use crate::{Diagnostic, Error};
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use std::io::Write;

/// Source id shown in report headers.
const FORMULA_ID: &str = "<formula>";

/// Render an error to stderr
///
/// # Example
/// ```no_run
/// use bumpalo::Bump;
/// use statexpr::{Engine, EngineOptions, render_error};
///
/// let arena = Bump::new();
/// let engine = Engine::new(&arena, EngineOptions::default()).unwrap();
///
/// if let Err(e) = engine.compile("Max(1)") {
///     render_error(&e);
/// }
/// ```
pub fn render_error(error: &Error) {
    render_error_to_writer(error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
///
/// This is useful when you want to control where the error is written,
/// such as to a file, a buffer, or a custom output stream.
pub fn render_error_to(error: &Error, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(error, writer, true)
}

/// Render an error to a String (useful for tests, web UIs, etc.)
///
/// # Example
/// ```
/// use bumpalo::Bump;
/// use statexpr::{Engine, EngineOptions, render_error_to_string};
///
/// let arena = Bump::new();
/// let engine = Engine::new(&arena, EngineOptions::default()).unwrap();
///
/// let err = engine.compile("Foo(1)").unwrap_err();
/// assert!(render_error_to_string(&err).contains("Foo"));
/// ```
pub fn render_error_to_string(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
///
/// This is the same as `render_error_to_string` but without ANSI color codes,
/// making the output easier to compare in tests.
pub fn render_error_to_string_no_color(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &Error,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    match error {
        Error::Compilation {
            diagnostics,
            formula,
        } => render_diagnostics(formula, diagnostics, writer, use_color),
        Error::Registry(err) => {
            writeln!(writer, "Registry error: {}", err)
        }
        Error::Api(msg) => {
            writeln!(writer, "API error: {}", msg)
        }
    }
}

fn render_diagnostics(
    formula: &str,
    diagnostics: &[Diagnostic],
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    for diag in diagnostics {
        let mut colors = ColorGenerator::new();
        colors.next(); // Skip the first color.

        // Spans past the end would make ariadne point at nothing.
        let span = diag.span.start().min(formula.len())..diag.span.end().min(formula.len());

        let mut report = Report::build(ReportKind::Error, (FORMULA_ID, span.clone()))
            .with_message(&diag.message)
            .with_config(ariadne::Config::default().with_color(use_color));

        // Add error code if present
        if let Some(code) = &diag.code {
            report = report.with_code(code);
        }

        let color = colors.next();
        report = report.with_label(
            Label::new((FORMULA_ID, span))
                .with_message(&diag.message)
                .with_color(color),
        );

        for help_msg in &diag.help {
            report = report.with_help(help_msg);
        }

        report
            .finish()
            .write((FORMULA_ID, Source::from(formula)), &mut *writer)?;
    }

    Ok(())
}
