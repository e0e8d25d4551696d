//! Non-fatal generation diagnostics

use std::fmt;

/// A problem found while generating one field that did not stop generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Fully-qualified name of the message being generated
    pub message_type: String,
    pub field: String,
    pub text: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "warning: {}.{}: {}", self.message_type, self.field, self.text)
    }
}

/// Diagnostics collected during one generation run, owned by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(
        &mut self,
        message_type: impl Into<String>,
        field: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.entries.push(Diagnostic {
            message_type: message_type.into(),
            field: field.into(),
            text: text.into(),
        });
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
