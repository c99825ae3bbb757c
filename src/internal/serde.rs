use serde::de::{DeserializeOwned, Error};
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// Some response values are `null` even though the field exists on every other response of the
/// same kind (e.g. `about` of a user or `alternate_title` of an anime). These are replaced with the
/// [`Default`] implementation of the corresponding type.
pub(crate) fn deserialize_maybe_null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value: Option<T> = Deserialize::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// Deserializes `null` and an empty string (`""`) to `None`, everything else is parsed via
/// [`FromStr`]. Airing dates of not yet aired anime are delivered this way.
pub(crate) fn deserialize_empty_string_to_none<'de, D, T>(
    deserializer: D,
) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value: Option<String> = Deserialize::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => T::from_str(value)
            .map(Some)
            .map_err(|e| Error::custom(format!("cannot parse '{}': {}", value, e))),
    }
}

/// Some ids are sometimes delivered as string and sometimes as number (`"25930"` vs `25930`).
pub(crate) fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<StringOrNumber>::deserialize(deserializer)? {
        Some(StringOrNumber::String(string)) => string,
        Some(StringOrNumber::Number(number)) => number.to_string(),
        None => String::new(),
    })
}
