//! Partial update values.
//!
//! [`Patch`] distinguishes a field that was not supplied from one that was
//! supplied, including explicitly supplied `null` for optional fields.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A field in a partial update.
///
/// Deserializes from any present value as `Set`; use it with
/// `#[serde(default)]` so absent fields become `Unset`. For optional
/// attributes use `Patch<Option<T>>`, where `Set(None)` clears the value.
///
/// # Example
///
/// ```
/// use payroll_engine::models::Patch;
///
/// let mut notes = Some("first".to_string());
/// Patch::Unset.apply_to(&mut notes);
/// assert_eq!(notes.as_deref(), Some("first"));
///
/// Patch::Set(None).apply_to(&mut notes);
/// assert_eq!(notes, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// The field was not supplied; keep the current value.
    #[default]
    Unset,
    /// The field was supplied with this value.
    Set(T),
}

impl<T> Patch<T> {
    /// Returns true if the field was not supplied.
    pub fn is_unset(&self) -> bool {
        matches!(self, Patch::Unset)
    }

    /// Returns the supplied value, if any.
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Patch::Set(value) => Some(value),
            Patch::Unset => None,
        }
    }

    /// Overwrites `target` when the field was supplied.
    pub fn apply_to(self, target: &mut T) {
        if let Patch::Set(value) = self {
            *target = value;
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Patch::Set)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Set(value) => value.serialize(serializer),
            Patch::Unset => serializer.serialize_none(),
        }
    }
}
