//! Definition of diagnostics displayed to users.

use std::fmt;

/// Represents a span of source.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    /// The start of the span.
    start: usize,
    /// The end of the span.
    end: usize,
}

impl Span {
    /// Creates a new span from the given start and length.
    pub const fn new(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    /// Creates a new span from the given start and noninclusive end.
    ///
    /// # Panics
    ///
    /// Panics if `end` is less than `start`.
    pub const fn from_range(start: usize, end: usize) -> Self {
        assert!(start <= end, "span end must not precede its start");
        Self { start, end }
    }

    /// Gets the start of the span.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Gets the noninclusive end of the span.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Gets the length of the span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Determines if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Determines if this span entirely encloses the other span.
    pub fn encloses(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{start}..{end}", start = self.start, end = self.end)
    }
}

impl From<logos::Span> for Span {
    fn from(value: logos::Span) -> Self {
        Self::new(value.start, value.len())
    }
}

/// Represents the severity of a diagnostic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The diagnostic is displayed as an error.
    Error,
    /// The diagnostic is displayed as a warning.
    Warning,
    /// The diagnostic is displayed as information.
    Information,
    /// The diagnostic is displayed as a hint.
    Hint,
}

impl Severity {
    /// Returns `true` if the severity is [`Hint`].
    ///
    /// [`Hint`]: Severity::Hint
    #[must_use]
    pub fn is_hint(&self) -> bool {
        matches!(self, Self::Hint)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Information => write!(f, "information"),
            Self::Hint => write!(f, "hint"),
        }
    }
}

/// Represents a diagnostic to display to the user.
///
/// A diagnostic is the positioned "problem" produced by parsing or
/// validating a template.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Diagnostic {
    /// The optional rule associated with the diagnostic.
    rule: Option<String>,
    /// The severity of the diagnostic.
    severity: Severity,
    /// The diagnostic message.
    message: String,
    /// The labels for the diagnostic.
    ///
    /// The first label in the collection is considered the primary label.
    labels: Vec<Label>,
}

impl Diagnostic {
    /// Creates a new diagnostic with the given severity and message.
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule: None,
            severity,
            message: message.into(),
            labels: Default::default(),
        }
    }

    /// Creates a new diagnostic error with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Creates a new diagnostic warning with the given message.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Creates a new hint diagnostic with the given message.
    pub fn hint(message: impl Into<String>) -> Self {
        Self::new(Severity::Hint, message)
    }

    /// Sets the rule for the diagnostic.
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Adds a highlight to the diagnostic.
    ///
    /// This is equivalent to adding a label with an empty message.
    pub fn with_highlight(mut self, span: impl Into<Span>) -> Self {
        self.labels.push(Label::new(String::new(), span.into()));
        self
    }

    /// Adds a label to the diagnostic.
    ///
    /// The first label added is considered the primary label.
    pub fn with_label(mut self, message: impl Into<String>, span: impl Into<Span>) -> Self {
        self.labels.push(Label::new(message, span.into()));
        self
    }

    /// Gets the optional rule associated with the diagnostic.
    pub fn rule(&self) -> Option<&str> {
        self.rule.as_deref()
    }

    /// Gets the severity level of the diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Gets the message of the diagnostic.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Gets the location of the diagnostic.
    ///
    /// This is the span of the primary label, if there is one.
    pub fn location(&self) -> Option<Span> {
        self.labels.first().map(Label::span)
    }

    /// Converts this diagnostic to a `codespan` [Diagnostic].
    ///
    /// The provided file identifier is used for the diagnostic.
    ///
    /// [Diagnostic]: codespan_reporting::diagnostic::Diagnostic
    pub fn to_codespan<FileId: Copy>(
        &self,
        file_id: FileId,
    ) -> codespan_reporting::diagnostic::Diagnostic<FileId> {
        use codespan_reporting::diagnostic as codespan;

        let mut diagnostic: codespan::Diagnostic<FileId> = match self.severity {
            Severity::Error => codespan::Diagnostic::error(),
            Severity::Warning => codespan::Diagnostic::warning(),
            Severity::Information => codespan::Diagnostic::note(),
            Severity::Hint => codespan::Diagnostic::help(),
        };

        if let Some(rule) = &self.rule {
            diagnostic.code = Some(rule.clone());
        }

        diagnostic.message.clone_from(&self.message);

        if self.labels.is_empty() {
            // Codespan will treat this as a label at the end of the file
            diagnostic.labels.push(codespan::Label::new(
                codespan::LabelStyle::Primary,
                file_id,
                usize::MAX - 1..usize::MAX,
            ))
        } else {
            for (i, label) in self.labels.iter().enumerate() {
                diagnostic.labels.push(
                    codespan::Label::new(
                        if i == 0 {
                            codespan::LabelStyle::Primary
                        } else {
                            codespan::LabelStyle::Secondary
                        },
                        file_id,
                        label.span.start..label.span.end,
                    )
                    .with_message(&label.message),
                );
            }
        }

        diagnostic
    }
}

/// Represents a label that annotates the source code.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Label {
    /// The optional message of the label (may be empty).
    message: String,
    /// The span of the label.
    span: Span,
}

impl Label {
    /// Creates a new label with the given message and span.
    pub fn new(message: impl Into<String>, span: impl Into<Span>) -> Self {
        Self {
            message: message.into(),
            span: span.into(),
        }
    }

    /// Gets the span of the label.
    pub fn span(&self) -> Span {
        self.span
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn spans_enclose_other_spans() {
        let a = Span::new(2, 3);
        let b = Span::from_range(0, 12);
        assert!(b.encloses(a));
        assert!(!a.encloses(b));
        assert_eq!(b.to_string(), "0..12");
    }

    #[test]
    fn location_is_the_primary_label() {
        let diagnostic = Diagnostic::error("bad")
            .with_highlight(Span::new(4, 2))
            .with_label("related", Span::new(0, 1));
        assert_eq!(diagnostic.location(), Some(Span::new(4, 2)));
        assert_eq!(Diagnostic::hint("nothing").location(), None);
    }

    #[test]
    fn rules_become_codespan_codes() {
        let diagnostic = Diagnostic::warning("too big")
            .with_rule("maximum")
            .with_label("this value", Span::new(3, 4));
        assert_eq!(diagnostic.rule(), Some("maximum"));

        let codespan = diagnostic.to_codespan(());
        assert_eq!(codespan.code.as_deref(), Some("maximum"));
        assert_eq!(codespan.message, "too big");
        assert_eq!(codespan.labels.len(), 1);
        assert_eq!(codespan.labels[0].range, 3..7);
        assert_eq!(codespan.labels[0].message, "this value");
    }

    #[test]
    fn diagnostics_without_labels_point_at_the_end() {
        let codespan = Diagnostic::hint("nothing here").to_codespan(());
        assert_eq!(codespan.code, None);
        assert_eq!(
            codespan.severity,
            codespan_reporting::diagnostic::Severity::Help
        );
        assert_eq!(codespan.labels[0].range, usize::MAX - 1..usize::MAX);
    }
}
