//! Diagnostics sink shared by every compilation pass.
//!
//! Errors and warnings are collected in the order they are recorded. Notes
//! always attach to the most recently recorded error.

use crate::SourceLocation;

use super::errors::{Error, ErrorImpl};

#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<Error>,
    warnings: Vec<Error>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn record(&mut self, error: Error) {
        self.errors.push(error);
    }

    pub fn record_error(&mut self, error_impl: ErrorImpl, location: SourceLocation) {
        self.record(Error::new(error_impl, location));
    }

    pub fn record_warning(&mut self, error_impl: ErrorImpl, location: SourceLocation) {
        self.warnings.push(Error::warning(error_impl, location));
    }

    /// Attaches a note to the last recorded error. Without a prior error the
    /// note is dropped.
    pub fn record_note(&mut self, note: impl Into<String>) {
        if let Some(error) = self.errors.last_mut() {
            error.add_note(note);
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Error] {
        &self.warnings
    }

    /// Hands every pending warning to `emit` and forgets them.
    pub fn flush_warnings(&mut self, mut emit: impl FnMut(&Error)) {
        for warning in self.warnings.drain(..) {
            emit(&warning);
        }
    }
}
