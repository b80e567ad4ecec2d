use indexmap::IndexMap;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::sync::Arc;

/// Keyed children of a [`DocValue::Record`], in declaration order.
pub type DocMap = IndexMap<String, DocValue>;

/// A documentation value that must never be merged into.
///
/// Implement this for values that carry their own identity (a generated schema
/// object, a handle into another document) so that merging replaces them as a whole
/// instead of recursing into their fields.
pub trait OpaqueDoc: fmt::Debug + Send + Sync {
    /// Short type label used in equality checks and debug output.
    fn kind(&self) -> &str;

    /// JSON form emitted when the document is serialized.
    fn to_json(&self) -> Value;
}

/// Shared handle to an [`OpaqueDoc`].
#[derive(Clone)]
pub struct Opaque(Arc<dyn OpaqueDoc>);

impl Opaque {
    pub fn new<T: OpaqueDoc + 'static>(value: T) -> Self {
        Self(Arc::new(value))
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        self.0.kind()
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        self.0.to_json()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Opaque").field(&self.0).finish()
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.kind() == other.kind() && self.to_json() == other.to_json())
    }
}

/// A documentation fragment.
///
/// Plain JSON shapes map onto `Null`, `Bool`, `Number`, `String`, `List` and
/// `Record`. `Opaque` marks values the merger replaces but never enters.
#[derive(Debug, Clone, PartialEq)]
pub enum DocValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<DocValue>),
    Record(DocMap),
    Opaque(Opaque),
}

impl Default for DocValue {
    /// The empty fragment: a record with no keys.
    fn default() -> Self {
        DocValue::Record(DocMap::new())
    }
}

impl DocValue {
    /// Empty record, the identity element of the merge.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn opaque<T: OpaqueDoc + 'static>(value: T) -> Self {
        DocValue::Opaque(Opaque::new(value))
    }

    /// `true` for `Null` and for a record without keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            DocValue::Null => true,
            DocValue::Record(map) => map.is_empty(),
            _ => false,
        }
    }

    #[must_use]
    pub fn is_record(&self) -> bool {
        matches!(self, DocValue::Record(_))
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&DocMap> {
        match self {
            DocValue::Record(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[DocValue]> {
        match self {
            DocValue::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a key when this value is a record.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&DocValue> {
        self.as_record().and_then(|map| map.get(key))
    }

    /// Follow a `/`-separated key path, e.g. `components/schemas/Pet`.
    #[must_use]
    pub fn pointer(&self, path: &str) -> Option<&DocValue> {
        path.split('/')
            .filter(|key| !key.is_empty())
            .try_fold(self, |value, key| value.get(key))
    }

    /// Remove and return a top-level key when this value is a record.
    pub fn remove(&mut self, key: &str) -> Option<DocValue> {
        match self {
            DocValue::Record(map) => map.shift_remove(key),
            _ => None,
        }
    }

    /// Merge `overlay` into `self` using the rules of [`merge`](super::merge).
    pub fn merge_from(&mut self, overlay: &DocValue) {
        let merged = super::merge(self, [overlay]);
        *self = merged;
    }

    /// Convert to plain JSON. Opaque values serialize through [`OpaqueDoc::to_json`].
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            DocValue::Null => Value::Null,
            DocValue::Bool(b) => Value::Bool(*b),
            DocValue::Number(n) => Value::Number(n.clone()),
            DocValue::String(s) => Value::String(s.clone()),
            DocValue::List(items) => Value::Array(items.iter().map(DocValue::to_json).collect()),
            DocValue::Record(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
            DocValue::Opaque(o) => o.to_json(),
        }
    }
}

impl From<Value> for DocValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => DocValue::Null,
            Value::Bool(b) => DocValue::Bool(b),
            Value::Number(n) => DocValue::Number(n),
            Value::String(s) => DocValue::String(s),
            Value::Array(items) => DocValue::List(items.into_iter().map(DocValue::from).collect()),
            Value::Object(map) => {
                DocValue::Record(map.into_iter().map(|(k, v)| (k, DocValue::from(v))).collect())
            }
        }
    }
}

impl From<&DocValue> for Value {
    fn from(value: &DocValue) -> Self {
        value.to_json()
    }
}

impl From<DocMap> for DocValue {
    fn from(map: DocMap) -> Self {
        DocValue::Record(map)
    }
}

impl From<Opaque> for DocValue {
    fn from(opaque: Opaque) -> Self {
        DocValue::Opaque(opaque)
    }
}

impl From<&str> for DocValue {
    fn from(s: &str) -> Self {
        DocValue::String(s.to_string())
    }
}

impl From<String> for DocValue {
    fn from(s: String) -> Self {
        DocValue::String(s)
    }
}

impl From<bool> for DocValue {
    fn from(b: bool) -> Self {
        DocValue::Bool(b)
    }
}

impl From<i64> for DocValue {
    fn from(n: i64) -> Self {
        DocValue::Number(n.into())
    }
}

impl From<Option<DocValue>> for DocValue {
    /// `None` becomes the empty fragment.
    fn from(value: Option<DocValue>) -> Self {
        value.unwrap_or_default()
    }
}

impl Serialize for DocValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

struct DocValueVisitor;

impl<'de> Visitor<'de> for DocValueVisitor {
    type Value = DocValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a documentation value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<DocValue, E> {
        Ok(DocValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<DocValue, E> {
        Ok(DocValue::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<DocValue, E> {
        Ok(DocValue::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<DocValue, E> {
        Ok(Number::from_f64(v).map_or(DocValue::Null, DocValue::Number))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<DocValue, E> {
        Ok(DocValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<DocValue, E> {
        Ok(DocValue::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<DocValue, E> {
        Ok(DocValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<DocValue, E> {
        Ok(DocValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<DocValue, D::Error> {
        DocValue::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<DocValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(DocValue::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<DocValue, A::Error> {
        let mut fields = DocMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((RecordKey(key), value)) = map.next_entry()? {
            fields.insert(key, value);
        }
        Ok(DocValue::Record(fields))
    }
}

impl<'de> Deserialize<'de> for DocValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DocValueVisitor)
    }
}

/// Record key. YAML allows scalar keys such as `200:` or `true:`; they become strings.
struct RecordKey(String);

struct RecordKeyVisitor;

impl Visitor<'_> for RecordKeyVisitor {
    type Value = RecordKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number or boolean key")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<RecordKey, E> {
        Ok(RecordKey(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<RecordKey, E> {
        Ok(RecordKey(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<RecordKey, E> {
        Ok(RecordKey(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<RecordKey, E> {
        Ok(RecordKey(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RecordKey, E> {
        Ok(RecordKey(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<RecordKey, E> {
        Ok(RecordKey(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<RecordKey, E> {
        Ok(RecordKey("null".to_string()))
    }
}

impl<'de> Deserialize<'de> for RecordKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RecordKeyVisitor)
    }
}
