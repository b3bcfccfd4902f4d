//! Error payload types returned by the API on 404 and 500 responses.

use serde::{Deserialize, Serialize};

/// Code for a field whose value was rejected.
pub const CODE_INVALID: &str = "invalid";

/// Code for a required field that was not supplied.
pub const CODE_MISSING_FIELD: &str = "missing_field";

/// Code for a referenced resource that does not exist.
pub const CODE_MISSING: &str = "missing";

/// Code for a value that must be unique but is already taken.
pub const CODE_ALREADY_EXISTS: &str = "already_exists";

/// A validation problem with a single input field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct FieldError {
    /// Resource type the field belongs to (e.g. "Issue").
    pub resource: String,

    /// Name of the offending field.
    pub field: String,

    /// Machine-readable error code, see the `CODE_*` constants.
    pub code: String,

    /// Offending value, when the server echoes it back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl FieldError {
    /// True when the server rejected the supplied value.
    pub fn is_invalid(&self) -> bool {
        self.code == CODE_INVALID
    }

    /// True when a required field was not sent.
    pub fn is_missing_field(&self) -> bool {
        self.code == CODE_MISSING_FIELD
    }
}

/// Aggregate error payload: an optional top-level message plus field errors
/// in the order the server reported them.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct RequestError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<FieldError>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<FieldError>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<FieldError>>::deserialize(deserializer)?.unwrap_or_default())
}
