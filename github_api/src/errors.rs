//! Error types for the API client and the formatter for API error payloads.

use std::fmt;

use crate::types::{FieldError, RequestError, CODE_INVALID, CODE_MISSING_FIELD};

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The API answered 404 or 500 with a structured error payload.
    #[error(transparent)]
    Request(#[from] RequestException),
    /// The API answered with a status the client has no handling for.
    #[error("{status_text}")]
    UnexpectedStatus { status: u16, status_text: String },
    /// The response body was empty or not valid JSON for the target type.
    #[error("Failed to parse response: {0}")]
    Parse(String),
    /// Connecting, sending, or reading the response failed.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The configured host and request URI do not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The request URI is absolute or points away from the configured host.
    #[error("URI must be relative to the configured host: {0}")]
    ForeignUri(String),
    /// The base URL uses a scheme other than http or https.
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
}

impl Error {
    /// HTTP status of the response that caused this error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request(e) => Some(e.status()),
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for every failure that is not a structured API error.
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::Request(_))
    }

    /// The structured API error, if this is one.
    pub fn as_request_exception(&self) -> Option<&RequestException> {
        match self {
            Self::Request(e) => Some(e),
            _ => None,
        }
    }
}

/// A failed request whose response carried an API error payload.
///
/// The human-readable message is rebuilt from the payload every time it is
/// requested through [`RequestException::message`] or `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestException {
    error: Option<RequestError>,
    status: u16,
}

impl RequestException {
    pub fn new(error: RequestError, status: u16) -> Self {
        Self {
            error: Some(error),
            status,
        }
    }

    /// Exception for a failed status whose body carried no payload.
    pub fn without_payload(status: u16) -> Self {
        Self {
            error: None,
            status,
        }
    }

    pub fn error(&self) -> Option<&RequestError> {
        self.error.as_ref()
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn into_error(self) -> Option<RequestError> {
        self.error
    }

    /// Formats the payload and status into a single diagnostic line.
    pub fn message(&self) -> String {
        format_request_error(self.error.as_ref(), self.status)
    }
}

impl fmt::Display for RequestException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for RequestException {}

/// Formats a single field error according to its code.
pub fn format_field_error(error: &FieldError) -> String {
    match (error.code.as_str(), error.value.as_deref()) {
        (CODE_INVALID, Some(value)) => {
            format!("Invalid value of '{}' for field '{}'", value, error.field)
        }
        (CODE_INVALID, None) => format!("Invalid value for field '{}'", error.field),
        (CODE_MISSING_FIELD, _) => format!("Missing required field '{}'", error.field),
        _ => format!(
            "Error with field '{}' in {} resource",
            error.field, error.resource
        ),
    }
}

/// Formats an error payload and HTTP status as `<message> (<status>): <field>, <field>`.
///
/// The status stands alone when there is no top-level message, and the colon
/// and field list are omitted when there are no field errors. A missing
/// payload formats like an empty one.
pub fn format_request_error(error: Option<&RequestError>, status: u16) -> String {
    let mut message = error
        .and_then(|e| e.message.clone())
        .unwrap_or_default();
    if message.is_empty() {
        message.push_str(&status.to_string());
    } else {
        message.push_str(&format!(" ({})", status));
    }

    let fields = error.map(|e| e.errors.as_slice()).unwrap_or_default();
    if !fields.is_empty() {
        message.push(':');
        for field in fields {
            message.push(' ');
            message.push_str(&format_field_error(field));
            message.push(',');
        }
        message.pop();
    }
    message
}
