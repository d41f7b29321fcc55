//! Entity identifiers and their normalized comparison keys.
//!
//! Identifiers come in two shapes: primitives (integers, plain strings) and
//! structured values such as BSON object ids or UUIDs. Structured values are
//! not directly comparable across the two sides of a relation (a source may
//! hold an `ObjectId` while the target was read back as its hex string), so
//! every comparison goes through a [`NormalizedKey`].
//!
//! ```rust
//! use bson::oid::ObjectId;
//! use relink_query::{Identifier, NormalizedKey, normalize_key};
//!
//! let oid = ObjectId::new();
//! assert_eq!(normalize_key(&oid), NormalizedKey::from(oid.to_hex()));
//! assert_eq!(normalize_key(&7_i64), NormalizedKey::Int(7));
//!
//! // Identifiers compare by their normalized form.
//! assert_eq!(Identifier::from(oid), Identifier::from(oid.to_hex()));
//! assert_ne!(Identifier::from(1), Identifier::from("1"));
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize, Serializer};
use smol_str::SmolStr;
use uuid::Uuid;

/// Canonical, comparable form of an [`Identifier`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NormalizedKey {
    /// Integer key.
    Int(i64),
    /// String key (plain strings and canonical forms of structured ids).
    Str(SmolStr),
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for NormalizedKey {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for NormalizedKey {
    fn from(v: &str) -> Self {
        Self::Str(SmolStr::new(v))
    }
}

impl From<String> for NormalizedKey {
    fn from(v: String) -> Self {
        Self::Str(SmolStr::from(v))
    }
}

/// Projection of a value onto its stable [`NormalizedKey`].
///
/// Implementations must be pure: the same logical value always yields the
/// same key, whichever side of a relation it was read from.
pub trait NormalizeKey {
    /// Get the normalized key.
    fn normalize_key(&self) -> NormalizedKey;
}

/// Normalize any supported identifier representation.
#[inline]
pub fn normalize_key<K: NormalizeKey + ?Sized>(id: &K) -> NormalizedKey {
    id.normalize_key()
}

/// An opaque primary or foreign key value.
///
/// Equality and hashing go through [`NormalizeKey`], so an `ObjectId` equals
/// the `String` holding its hex form.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawIdentifier")]
pub enum Identifier {
    /// Integer identifier.
    Int(i64),
    /// String identifier.
    String(String),
    /// BSON object id.
    ObjectId(ObjectId),
    /// UUID.
    Uuid(Uuid),
}

impl Identifier {
    /// Check if this is a BSON object id.
    pub fn is_object_id(&self) -> bool {
        matches!(self, Self::ObjectId(_))
    }

    /// Get the integer value, if this is an integer identifier.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }
}

/// Check if an identifier is a BSON object id.
pub fn is_bson_type(id: &Identifier) -> bool {
    id.is_object_id()
}

impl NormalizeKey for Identifier {
    fn normalize_key(&self) -> NormalizedKey {
        match self {
            Self::Int(v) => NormalizedKey::Int(*v),
            Self::String(s) => s.as_str().normalize_key(),
            Self::ObjectId(oid) => oid.normalize_key(),
            Self::Uuid(uuid) => uuid.normalize_key(),
        }
    }
}

impl NormalizeKey for NormalizedKey {
    fn normalize_key(&self) -> NormalizedKey {
        self.clone()
    }
}

impl NormalizeKey for ObjectId {
    fn normalize_key(&self) -> NormalizedKey {
        NormalizedKey::Str(SmolStr::from(self.to_hex()))
    }
}

impl NormalizeKey for Uuid {
    fn normalize_key(&self) -> NormalizedKey {
        NormalizedKey::Str(SmolStr::from(self.hyphenated().to_string()))
    }
}

impl NormalizeKey for i64 {
    fn normalize_key(&self) -> NormalizedKey {
        NormalizedKey::Int(*self)
    }
}

impl NormalizeKey for i32 {
    fn normalize_key(&self) -> NormalizedKey {
        NormalizedKey::Int(i64::from(*self))
    }
}

impl NormalizeKey for str {
    /// Object id hex text is lowercased, whatever its case.
    fn normalize_key(&self) -> NormalizedKey {
        if is_object_id_hex(self) {
            NormalizedKey::Str(SmolStr::from(self.to_ascii_lowercase()))
        } else {
            NormalizedKey::Str(SmolStr::new(self))
        }
    }
}

impl NormalizeKey for String {
    fn normalize_key(&self) -> NormalizedKey {
        self.as_str().normalize_key()
    }
}

/// 24 hex digits is the canonical object id form.
fn is_object_id_hex(s: &str) -> bool {
    s.len() == 24 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

impl<K: NormalizeKey + ?Sized> NormalizeKey for &K {
    fn normalize_key(&self) -> NormalizedKey {
        (**self).normalize_key()
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.normalize_key() == other.normalize_key()
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalize_key().hash(state);
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.normalize_key())
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::String(s) => serializer.serialize_str(s),
            Self::ObjectId(oid) => serializer.serialize_str(&oid.to_hex()),
            Self::Uuid(uuid) => serializer.collect_str(&uuid.hyphenated()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIdentifier {
    Int(i64),
    String(String),
}

impl From<RawIdentifier> for Identifier {
    fn from(raw: RawIdentifier) -> Self {
        match raw {
            RawIdentifier::Int(v) => Self::Int(v),
            RawIdentifier::String(s) if is_object_id_hex(&s) => match ObjectId::parse_str(&s) {
                Ok(oid) => Self::ObjectId(oid),
                Err(_) => Self::String(s),
            },
            RawIdentifier::String(s) => Self::String(s),
        }
    }
}

impl From<i64> for Identifier {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Identifier {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<String> for Identifier {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Identifier {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<ObjectId> for Identifier {
    fn from(v: ObjectId) -> Self {
        Self::ObjectId(v)
    }
}

impl From<Uuid> for Identifier {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<&Identifier> for Identifier {
    fn from(v: &Identifier) -> Self {
        v.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_keys_unchanged() {
        assert_eq!(normalize_key(&Identifier::Int(3)), NormalizedKey::Int(3));
        assert_eq!(normalize_key("pen"), NormalizedKey::from("pen"));
    }

    #[test]
    fn test_object_id_normalizes_to_hex() {
        let oid = ObjectId::new();
        assert_eq!(normalize_key(&Identifier::from(oid)), NormalizedKey::from(oid.to_hex()));
    }

    #[test]
    fn test_normalize_is_stable_across_instances() {
        let oid = ObjectId::new();
        let copy = ObjectId::parse_str(oid.to_hex()).unwrap();
        assert_eq!(normalize_key(&oid), normalize_key(&copy));
        assert_eq!(normalize_key(&oid), normalize_key(&oid));
    }

    #[test]
    fn test_uppercase_hex_matches_however_it_arrives() {
        let upper = "507F1F77BCF86CD799439011";
        let built = Identifier::from(upper);
        let read: Identifier = serde_json::from_value(serde_json::json!(upper)).unwrap();

        assert!(read.is_object_id());
        assert_eq!(built, read);
        assert_eq!(normalize_key(upper), NormalizedKey::from("507f1f77bcf86cd799439011"));
        assert_eq!(normalize_key(&built), normalize_key(&read));
    }

    #[test]
    fn test_non_hex_strings_keep_case() {
        assert_eq!(normalize_key("Thor"), NormalizedKey::from("Thor"));
    }

    #[test]
    fn test_uuid_normalizes_to_hyphenated() {
        let uuid = Uuid::new_v4();
        assert_eq!(normalize_key(&uuid), NormalizedKey::from(uuid.to_string()));
    }

    #[test]
    fn test_int_and_string_are_distinct() {
        assert_ne!(Identifier::from(1), Identifier::from("1"));
    }

    #[test]
    fn test_is_bson_type() {
        assert!(is_bson_type(&Identifier::from(ObjectId::new())));
        assert!(!is_bson_type(&Identifier::from(1)));
    }

    #[test]
    fn test_serialize_canonical_forms() {
        let oid = ObjectId::new();
        assert_eq!(serde_json::to_value(Identifier::from(oid)).unwrap(), serde_json::json!(oid.to_hex()));
        assert_eq!(serde_json::to_value(Identifier::from(5)).unwrap(), serde_json::json!(5));
    }

    #[test]
    fn test_deserialize_recognizes_object_ids() {
        let oid = ObjectId::new();
        let id: Identifier = serde_json::from_value(serde_json::json!(oid.to_hex())).unwrap();
        assert!(id.is_object_id());

        let id: Identifier = serde_json::from_value(serde_json::json!("thor")).unwrap();
        assert!(matches!(id, Identifier::String(_)));

        let id: Identifier = serde_json::from_value(serde_json::json!(12)).unwrap();
        assert_eq!(id.as_int(), Some(12));
    }
}
