use std::sync::Arc;

use thiserror::Error;

/// Shared underlying cause attached to a [`WizardError`]
pub type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Hint shown next to errors that may succeed on a second attempt
pub const TRANSIENT_HINT: &str = "This may be transient, try again shortly.";

#[derive(Error, Debug, Clone)]
pub enum WizardError {
    /// User input or configuration is malformed
    #[error("{message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    /// An external collaborator (gh, git, the hosting API) failed
    #[error("{message}")]
    Backend {
        message: String,
        retryable: bool,
        #[source]
        cause: Option<Cause>,
    },

    /// Local filesystem or state problem
    #[error("{message}")]
    Project {
        message: String,
        #[source]
        cause: Option<Cause>,
    },
}

/// Coarse classification of a [`WizardError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Backend,
    Project,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation error"),
            ErrorKind::Backend => write!(f, "backend error"),
            ErrorKind::Project => write!(f, "project error"),
        }
    }
}

impl WizardError {
    pub fn validation(message: impl Into<String>) -> Self {
        WizardError::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Validation error tied to a specific input field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        WizardError::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Backend failure; retryable unless marked otherwise with [`WizardError::permanent`]
    pub fn backend(message: impl Into<String>) -> Self {
        WizardError::Backend {
            message: message.into(),
            retryable: true,
            cause: None,
        }
    }

    pub fn project(message: impl Into<String>) -> Self {
        WizardError::Project {
            message: message.into(),
            cause: None,
        }
    }

    /// Attach an underlying cause. Validation errors carry no cause.
    pub fn with_cause<E>(mut self, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match &mut self {
            WizardError::Backend { cause, .. } | WizardError::Project { cause, .. } => {
                *cause = Some(Arc::new(error));
            }
            WizardError::Validation { .. } => {}
        }
        self
    }

    /// Mark a backend error as not worth retrying
    pub fn permanent(mut self) -> Self {
        if let WizardError::Backend { retryable, .. } = &mut self {
            *retryable = false;
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            WizardError::Validation { .. } => ErrorKind::Validation,
            WizardError::Backend { .. } => ErrorKind::Backend,
            WizardError::Project { .. } => ErrorKind::Project,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, WizardError::Backend { retryable: true, .. })
    }

    /// The input field a validation error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            WizardError::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    /// User-facing hint to display under the error message
    pub fn hint(&self) -> Option<String> {
        if self.is_retryable() {
            return Some(TRANSIENT_HINT.to_string());
        }

        let hint = match self.field()? {
            "repository_name" => {
                "Use letters, digits, '.', '-' or '_' (at most 100 characters), \
                 without a leading or trailing '.', '-' or '_'."
            }
            "description" => "Shorten the description to 100 characters or fewer.",
            "visibility" => "Choose either private or public.",
            "clone_after_create" | "add_readme" => "Answer y, yes, true or 1, or n, no, false or 0.",
            "template" => "Pass an existing template as owner/name, or 'none'.",
            "config" => "Fix the configuration file or regenerate it with `gh-wizard config init --force`.",
            _ => return None,
        };
        Some(hint.to_string())
    }
}

impl From<std::io::Error> for WizardError {
    fn from(error: std::io::Error) -> Self {
        WizardError::project(format!("IO error: {error}")).with_cause(error)
    }
}

pub type Result<T> = std::result::Result<T, WizardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_errors_are_retryable_by_default() {
        let err = WizardError::backend("gh timed out");
        assert_eq!(err.kind(), ErrorKind::Backend);
        assert!(err.is_retryable());
        assert_eq!(err.hint().as_deref(), Some(TRANSIENT_HINT));

        let err = err.permanent();
        assert!(!err.is_retryable());
        assert_eq!(err.hint(), None);
    }

    #[test]
    fn test_validation_hint_is_field_specific() {
        let err = WizardError::invalid_field("add_readme", "please answer y/n");
        assert!(!err.is_retryable());
        assert_eq!(err.field(), Some("add_readme"));
        assert!(err.hint().unwrap().contains("yes"));

        assert_eq!(WizardError::validation("bad").hint(), None);
    }

    #[test]
    fn test_io_error_becomes_project_error_with_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: WizardError = io.into();
        assert_eq!(err.kind(), ErrorKind::Project);
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_retryable());
    }
}
