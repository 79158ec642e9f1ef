//! Lenient decoding for backend collections.
//!
//! The backend sometimes omits a collection, sends `null`, or sends a value of
//! the wrong shape. Fields decoded with [`vec`] always come out as a vector:
//! anything that is not a JSON array becomes empty, and entries of an array
//! that fail to decode are dropped with a warning. Scalar fields decoded with
//! [`or_default`] treat `null` the same as a missing field.
//!
//! ```rust
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Envelope {
//!     #[serde(default, deserialize_with = "shop_core::lenient::vec")]
//!     content: Vec<u32>,
//! }
//!
//! let envelope: Envelope = serde_json::from_str(r#"{"content": null}"#).unwrap();
//! assert!(envelope.content.is_empty());
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Deserialize a vector, tolerating absent, `null` and malformed values.
///
/// Pair with `#[serde(default)]` so a missing field also yields an empty
/// vector.
///
/// # Errors
///
/// Only fails if the underlying deserializer cannot produce a JSON value at
/// all.
pub fn vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(Value::Array(entries)) => entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(error = %e, "Dropping malformed entry");
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Deserialize a value, mapping `null` to `T::default()`.
///
/// Pair with `#[serde(default)]` so a missing field is also defaulted.
///
/// # Errors
///
/// Fails if the value is present, not `null`, and not a valid `T`.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
