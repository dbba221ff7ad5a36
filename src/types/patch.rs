use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A field of a sparse update.
///
/// Fields are declared with `#[serde(default, skip_serializing_if = "Patch::is_absent")]`
/// so that an omitted key decodes as `Absent` and an explicit `null` as `Null`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// Key omitted: leave the stored value unchanged.
    #[default]
    Absent,
    /// Explicit `null`: clear the stored value.
    Null,
    /// Replace the stored value.
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// Applies the patch to a nullable stored value.
    pub fn apply_to(self, current: Option<T>) -> Option<T> {
        match self {
            Patch::Absent => current,
            Patch::Null => None,
            Patch::Value(v) => Some(v),
        }
    }

    /// Interprets the patch for a non-nullable field: `Null` is rejected.
    pub fn required(self, field: &str) -> Result<Option<T>, String> {
        match self {
            Patch::Absent => Ok(None),
            Patch::Null => Err(format!("{} cannot be null", field)),
            Patch::Value(v) => Ok(Some(v)),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        }
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Value(v) => serializer.serialize_some(v),
            Patch::Absent | Patch::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}
