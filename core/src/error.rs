use std::fmt;

use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Every failure a directory call can surface. Display is the user-facing one-liner.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request could not be built or sent.
    #[error("{message}")]
    Client { message: String },

    /// The server was unreachable (no HTTP status at all).
    #[error("{message}")]
    Network { url: String, message: String },

    /// A non-2xx response, or a 2xx response whose body could not be decoded.
    #[error("{message}")]
    Server {
        url: String,
        status: u16,
        status_text: String,
        backend: String,
        message: String,
    },

    /// An HTML document came back where JSON was expected.
    #[error("{message}")]
    ProxyMisconfiguration { url: String, status: u16, message: String },

    /// Form input rejected before any request was made.
    #[error("{0}")]
    Validation(ValidationErrors),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } | ApiError::ProxyMisconfiguration { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Server { status: 404, .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All field errors of one submitted form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[VALIDATION_ERROR] Please fill all required fields correctly.")?;
        for error in &self.errors {
            write!(f, " {}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}
