//! Chapter records produced by the chaptering stage.

use serde::{Deserialize, Deserializer, Serialize};

use crate::timestamp::{parse_timestamp_secs, TimestampError};

/// A single chapter marker.
///
/// The pipeline writes Spanish field names (`inicio`, `capitulo`, `descripcion`);
/// English names are accepted as aliases so a renamed upstream field does not
/// drop the whole chapter list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Start marker as written by the pipeline (`HH:MM:SS`)
    #[serde(rename = "inicio", alias = "start")]
    pub start: String,
    /// Chapter title
    #[serde(
        rename = "capitulo",
        alias = "title",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub title: String,
    /// Chapter description
    #[serde(
        rename = "descripcion",
        alias = "description",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub description: String,
}

/// Read an optional text field, treating `null` like a missing one.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Chapter {
    pub fn new(
        start: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            start: start.into(),
            title: title.into(),
            description: description.into(),
        }
    }

    /// Start offset in seconds (`hours*3600 + minutes*60 + seconds`).
    pub fn start_seconds(&self) -> Result<u32, TimestampError> {
        parse_timestamp_secs(&self.start)
    }
}
