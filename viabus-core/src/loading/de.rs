//! Custom deserializers for loosely-typed feed fields.

use serde::{Deserialize, Deserializer};

use crate::{Error, StopId};

/// Stop ids appear in the feed both as JSON numbers and as numeric
/// strings; accept either.
pub(super) fn stop_id<'de, D>(deserializer: D) -> Result<StopId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(StopId),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(id) => Ok(id),
        Raw::Text(text) => parse_stop_id(&text).map_err(serde::de::Error::custom),
    }
}

/// Parse a string-keyed stop id from the feed's map keys.
pub(super) fn parse_stop_id(raw: &str) -> Result<StopId, Error> {
    raw.trim()
        .parse::<StopId>()
        .map_err(|_| Error::InvalidFeed(format!("stop id is not an integer: {raw:?}")))
}
