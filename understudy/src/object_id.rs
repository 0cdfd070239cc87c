use std::{fmt, hash, sync::Arc};
use uuid::Uuid;

/// Identity of a call receiver or a session.
///
/// Each [`Double`](crate::Double), each [`Template`](crate::Template)
/// receiver and each [`Session`](crate::Session) draws a random v4 id, so
/// `same_as` holds only for the very object that was stubbed or verified,
/// never for a look-alike with the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, hash::Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(u128);

impl ObjectId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().as_u128())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Uuid::from_u128(self.0))
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        ObjectId::new()
    }
}

/// A named, identity-compared reference to an object.
///
/// A double passes its own `ObjectRef` as the `this` of calls made through
/// it, and [`same_as`](crate::same_as) compares against it. The name only
/// shows up in messages, as `[object obj]`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectRef {
    id: ObjectId,
    name: Arc<str>,
}

impl ObjectRef {
    /// Create a reference to a brand new object.
    pub fn new(name: &str) -> Self {
        Self {
            id: ObjectId::new(),
            name: Arc::from(name),
        }
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ObjectRef {}

impl hash::Hash for ObjectRef {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[object {}]", self.name)
    }
}
