//! JSON codec shared by every response the client decodes.
//!
//! Field names on the wire are lower case with underscores, which matches
//! Rust field naming; models declare `#[serde(rename_all = "snake_case")]` so
//! the convention holds even for renamed fields. Timestamps use
//! [`DATE_FORMAT`] and are (de)serialized through the [`date`] and
//! [`date::option`] helpers.

use serde::de::DeserializeOwned;

use crate::Error;

/// Wire format for timestamps, always UTC (e.g. `2011-04-10T20:09:31Z`).
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Decodes a response body into `T`.
///
/// An empty body and any JSON failure both surface as [`Error::Parse`].
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    if body.trim().is_empty() {
        return Err(Error::Parse("Empty body".to_string()));
    }
    serde_json::from_str::<T>(body).map_err(|e| Error::Parse(e.to_string()))
}

/// Serde helpers for `DateTime<Utc>` fields in [`DATE_FORMAT`].
///
/// ```ignore
/// #[derive(Deserialize)]
/// struct Issue {
///     #[serde(with = "github_api::codec::date")]
///     created_at: DateTime<Utc>,
/// }
/// ```
pub mod date {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn parse(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        let naive = NaiveDateTime::parse_from_str(value, DATE_FORMAT)?;
        Ok(Utc.from_utc_datetime(&naive))
    }

    pub fn format(value: &DateTime<Utc>) -> String {
        value.format(DATE_FORMAT).to_string()
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    /// Same as the parent module for nullable timestamps.
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => serializer.serialize_some(&super::format(v)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| super::parse(&raw).map_err(de::Error::custom))
                .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Datelike, Timelike, Utc};
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::types::RequestError;

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "snake_case")]
    struct Milestone {
        open_issues: i64,
        #[serde(with = "date")]
        created_at: DateTime<Utc>,
        #[serde(default, with = "date::option")]
        closed_at: Option<DateTime<Utc>>,
    }

    #[test]
    fn empty_body_is_parse_error() {
        let result = decode::<RequestError>("");
        assert!(matches!(result, Err(Error::Parse(msg)) if msg == "Empty body"));

        let result = decode::<RequestError>("  \n");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let result = decode::<RequestError>("{not valid json}");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn decodes_dates_in_fixed_format() {
        let m: Milestone = decode(
            r#"{"open_issues": 4, "created_at": "2011-04-10T20:09:31Z", "closed_at": null}"#,
        )
        .unwrap();
        assert_eq!(m.open_issues, 4);
        assert_eq!(m.created_at.year(), 2011);
        assert_eq!(m.created_at.month(), 4);
        assert_eq!(m.created_at.hour(), 20);
        assert_eq!(m.created_at.second(), 31);
        assert!(m.closed_at.is_none());

        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains(r#""created_at":"2011-04-10T20:09:31Z""#));
    }

    #[test]
    fn rejects_dates_in_other_formats() {
        let result = decode::<Milestone>(
            r#"{"open_issues": 0, "created_at": "04/10/2011 20:09"}"#,
        );
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn optional_date_present() {
        let m: Milestone = decode(
            r#"{"open_issues": 0, "created_at": "2011-04-10T20:09:31Z", "closed_at": "2012-01-02T03:04:05Z"}"#,
        )
        .unwrap();
        assert_eq!(date::format(&m.closed_at.unwrap()), "2012-01-02T03:04:05Z");
    }
}
