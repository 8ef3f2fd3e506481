// Nullable column helpers
// Hosted tables send `null` for empty columns; the models read those as their defaults

use serde::{Deserialize, Deserializer};

/// Deserialize `null` (or a missing field, paired with `#[serde(default)]`)
/// as `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read a text column, treating `null` and blank text as absent.
pub fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|value| !value.trim().is_empty()))
}
