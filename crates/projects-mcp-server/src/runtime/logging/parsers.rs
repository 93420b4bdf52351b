use std::str::FromStr;

use serde::de::{Error, Unexpected};
use serde::{Deserialize, Deserializer};
use tracing::Level;

/// Deserialize a log level from its name, ignoring case
pub(super) fn level<'de, D>(deserializer: D) -> Result<Level, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Level::from_str(raw.trim())
        .map_err(|_| Error::invalid_value(Unexpected::Str(&raw), &"a log level such as info"))
}
