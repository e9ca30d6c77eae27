//! Sparse updates for client records.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::Client;

/// One field of a patch, with presence tracked separately from the value.
///
/// Decoding from JSON: a missing key stays `Unset` (the containing struct
/// uses `#[serde(default)]`), an explicit `null` becomes `Null`, anything
/// else becomes `Value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchField<T> {
    Unset,
    Null,
    Value(T),
}

impl<T> Default for PatchField<T> {
    fn default() -> Self {
        PatchField::Unset
    }
}

impl<T> PatchField<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, PatchField::Unset)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PatchField::Null)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            PatchField::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for PatchField<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => PatchField::Value(value),
            None => PatchField::Null,
        })
    }
}

impl<T: Serialize> Serialize for PatchField<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PatchField::Value(value) => serializer.serialize_some(value),
            PatchField::Unset | PatchField::Null => serializer.serialize_none(),
        }
    }
}

/// A sparse overlay on a [`Client`]. The id is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientPatch {
    #[serde(default, skip_serializing_if = "PatchField::is_unset")]
    pub name: PatchField<String>,
    #[serde(default, skip_serializing_if = "PatchField::is_unset")]
    pub location: PatchField<String>,
    #[serde(default, skip_serializing_if = "PatchField::is_unset")]
    pub email: PatchField<String>,
    #[serde(default, skip_serializing_if = "PatchField::is_unset")]
    pub phone_number: PatchField<i64>,
}

impl ClientPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = PatchField::Value(name.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = PatchField::Value(location.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = PatchField::Value(email.into());
        self
    }

    pub fn phone_number(mut self, phone_number: i64) -> Self {
        self.phone_number = PatchField::Value(phone_number);
        self
    }

    /// True when no field is present at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_unset()
            && self.location.is_unset()
            && self.email.is_unset()
            && self.phone_number.is_unset()
    }

    /// Name of the first field explicitly set to `null`, if any.
    ///
    /// Every client field is required, so a cleared field cannot be applied.
    pub fn cleared_field(&self) -> Option<&'static str> {
        [
            ("name", self.name.is_null()),
            ("location", self.location.is_null()),
            ("email", self.email.is_null()),
            ("phone_number", self.phone_number.is_null()),
        ]
        .into_iter()
        .find(|(_, cleared)| *cleared)
        .map(|(field, _)| field)
    }

    /// Overwrite the fields of `client` that carry a value.
    pub fn apply_to(&self, client: &mut Client) {
        if let Some(name) = self.name.value() {
            client.name = name.clone();
        }
        if let Some(location) = self.location.value() {
            client.location = location.clone();
        }
        if let Some(email) = self.email.value() {
            client.email = email.clone();
        }
        if let Some(phone_number) = self.phone_number.value() {
            client.phone_number = *phone_number;
        }
    }

    /// The `$set` document for a merge-update: only fields carrying a value.
    pub fn to_set_document(&self) -> Map<String, Value> {
        let mut set = Map::new();
        if let Some(name) = self.name.value() {
            set.insert("name".into(), Value::from(name.as_str()));
        }
        if let Some(location) = self.location.value() {
            set.insert("location".into(), Value::from(location.as_str()));
        }
        if let Some(email) = self.email.value() {
            set.insert("email".into(), Value::from(email.as_str()));
        }
        if let Some(phone_number) = self.phone_number.value() {
            set.insert("phone_number".into(), Value::from(*phone_number));
        }
        set
    }
}
