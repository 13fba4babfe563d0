use crate::Result;
use core::fmt;
use ohno::IntoAppError;
use serde::de::{Error as DeError, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// A nested input document: objects, arrays, numbers and text
///
/// Objects keep the order of their keys, so measurements come out in document order.
/// Booleans and nulls carry no measurement and are kept as [`MetricTree::Other`].
#[derive(Debug, Clone, PartialEq)]
pub enum MetricTree {
    Number(f64),
    Mapping(Vec<(String, Self)>),
    Sequence(Vec<Self>),
    Text(String),
    Other,
}

impl MetricTree {
    /// Parse a JSON document
    ///
    /// # Errors
    /// Returns an error if the text is not valid JSON
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).into_app_err("parsing JSON metric document")
    }

    /// Parse a YAML document
    ///
    /// # Errors
    /// Returns an error if the text is not valid YAML
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).into_app_err("parsing YAML metric document")
    }

    /// Look up the child of a mapping node
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

/// Objects keep their key order because `serde_json` is built with `preserve_order`.
impl From<serde_json::Value> for MetricTree {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Number(n) => n.as_f64().map_or(Self::Other, Self::Number),
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Mapping(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect()),
            Value::Bool(_) | Value::Null => Self::Other,
        }
    }
}

impl<'de> Deserialize<'de> for MetricTree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MetricTreeVisitor)
    }
}

struct MetricTreeVisitor;

impl<'de> Visitor<'de> for MetricTreeVisitor {
    type Value = MetricTree;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a metric document")
    }

    #[expect(clippy::cast_precision_loss, reason = "Measurement values are reported as f64")]
    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Ok(MetricTree::Number(v as f64))
    }

    #[expect(clippy::cast_precision_loss, reason = "Measurement values are reported as f64")]
    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Ok(MetricTree::Number(v as f64))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Ok(MetricTree::Number(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Ok(MetricTree::Text(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Ok(MetricTree::Text(v))
    }

    fn visit_bool<E>(self, _v: bool) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Ok(MetricTree::Other)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Ok(MetricTree::Other)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Ok(MetricTree::Other)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        MetricTree::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(MetricTree::Sequence(items))
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((MapKey(key), value)) = access.next_entry::<MapKey, MetricTree>()? {
            entries.push((key, value));
        }
        Ok(MetricTree::Mapping(entries))
    }
}

/// Mapping key; scalar keys such as YAML's `0: 12` are kept in their text form
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MapKeyVisitor)
    }
}

struct MapKeyVisitor;

impl Visitor<'_> for MapKeyVisitor {
    type Value = MapKey;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a string, number or boolean key")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Ok(MapKey(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Ok(MapKey(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Ok(MapKey(v.to_string()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Ok(MapKey(v.to_string()))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Ok(MapKey(v.to_string()))
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Ok(MapKey(v.to_string()))
    }
}
