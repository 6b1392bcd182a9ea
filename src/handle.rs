use std::fmt;

/// Opaque identity of a tracked object.
///
/// The engine never interprets the value beyond bit-identity and ordering;
/// it is a key, not a pointer. Ids come from two places: a process-wide
/// counter ([`global::fresh_id`](crate::global::fresh_id)) for wrappers
/// that own their identity, or the bits of an address
/// ([`ObjectId::from_ptr`]) when the caller tracks foreign memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(pub u64);

impl ObjectId {
    /// Derive an id from a raw address.
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        ObjectId(ptr as usize as u64)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}
