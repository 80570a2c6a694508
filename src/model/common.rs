use serde::{Deserialize, Deserializer, Serialize};

/// Store-assigned record identifier.
pub type Id = i64;

/// A record as persisted: the store-assigned id plus the record's own fields.
///
/// The id is kept outside of `data` so that mutators handed to the store can
/// never change it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: Id,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Stored<T> {
    pub fn new(id: Id, data: T) -> Self {
        Self { id, data }
    }
}

/// One field of a partial update payload.
///
/// `Absent` means the key was not in the request body and the stored value is
/// left alone. A nullable column uses `Field<Option<T>>`, so an explicit
/// `null` arrives as `Present(None)` and clears the value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Field<T> {
    #[default]
    Absent,
    Present(T),
}

impl<T> Field<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Field::Present(_))
    }

    pub fn as_present(&self) -> Option<&T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Absent => None,
        }
    }

    /// Overwrite `slot` when the field was sent.
    pub fn assign_to(self, slot: &mut T) {
        if let Field::Present(value) = self {
            *slot = value;
        }
    }
}

// Only called by serde when the key exists; missing keys fall back to
// `Default` through `#[serde(default)]` on the payload struct.
impl<'de, T> Deserialize<'de> for Field<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Field::Present)
    }
}
