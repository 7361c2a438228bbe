// Typed document values, serialized exactly the way the Firestore REST API
// encodes them: `{"stringValue": "..."}`, `{"integerValue": "42"}`, ...

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Field map of a single document
pub type Fields = BTreeMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldValue {
    NullValue(()),
    BooleanValue(bool),
    #[serde(
        serialize_with = "serialize_int64",
        deserialize_with = "deserialize_int64"
    )]
    IntegerValue(i64),
    DoubleValue(f64),
    TimestampValue(DateTime<Utc>),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(GeoPoint),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<FieldValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: Fields,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

// int64 travels as a JSON string; accept bare numbers too
fn serialize_int64<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

fn deserialize_int64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Int64 {
        Text(String),
        Number(i64),
    }

    match Int64::deserialize(deserializer)? {
        Int64::Number(n) => Ok(n),
        Int64::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

impl FieldValue {
    pub fn string(value: impl Into<String>) -> Self {
        FieldValue::StringValue(value.into())
    }

    pub fn array(values: Vec<FieldValue>) -> Self {
        FieldValue::ArrayValue(ArrayValue { values })
    }

    pub fn map(fields: Fields) -> Self {
        FieldValue::MapValue(MapValue { fields })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::StringValue(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view; integers widen to f64 and numeric strings are parsed
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::IntegerValue(n) => Some(*n as f64),
            FieldValue::DoubleValue(d) => Some(*d),
            FieldValue::StringValue(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Integer view; doubles are accepted only when they carry no fraction
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::IntegerValue(n) => Some(*n),
            FieldValue::DoubleValue(d) if d.fract() == 0.0 => Some(*d as i64),
            FieldValue::StringValue(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::TimestampValue(ts) => Some(*ts),
            FieldValue::StringValue(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|ts| ts.with_timezone(&Utc)),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::ArrayValue(array) => Some(&array.values),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Fields> {
        match self {
            FieldValue::MapValue(map) => Some(&map.fields),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::NullValue(()))
    }

    /// Ordering used by filtered reads. Values of different kinds do not compare,
    /// except integers and doubles which share the numeric ordering.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        use FieldValue::*;
        match (self, other) {
            (IntegerValue(a), IntegerValue(b)) => Some(a.cmp(b)),
            (IntegerValue(_) | DoubleValue(_), IntegerValue(_) | DoubleValue(_)) => {
                self.as_f64()?.partial_cmp(&other.as_f64()?)
            }
            (TimestampValue(a), TimestampValue(b)) => Some(a.cmp(b)),
            (StringValue(a), StringValue(b)) => Some(a.cmp(b)),
            (BooleanValue(a), BooleanValue(b)) => Some(a.cmp(b)),
            (NullValue(()), NullValue(())) => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::StringValue(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::StringValue(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::IntegerValue(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::IntegerValue(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::DoubleValue(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::BooleanValue(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::TimestampValue(value)
    }
}

/// Lenient typed accessors over a document's field map
pub trait FieldsExt {
    fn str_field(&self, name: &str) -> Option<&str>;
    fn non_empty_str(&self, name: &str) -> Option<&str>;
    fn f64_field(&self, name: &str) -> Option<f64>;
    fn i64_field(&self, name: &str) -> Option<i64>;
    fn timestamp_field(&self, name: &str) -> Option<DateTime<Utc>>;
    fn array_field(&self, name: &str) -> &[FieldValue];
}

impl FieldsExt for Fields {
    fn str_field(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    fn non_empty_str(&self, name: &str) -> Option<&str> {
        self.str_field(name).filter(|s| !s.trim().is_empty())
    }

    fn f64_field(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_f64)
    }

    fn i64_field(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FieldValue::as_i64)
    }

    fn timestamp_field(&self, name: &str) -> Option<DateTime<Utc>> {
        self.get(name).and_then(FieldValue::as_timestamp)
    }

    fn array_field(&self, name: &str) -> &[FieldValue] {
        self.get(name).and_then(FieldValue::as_array).unwrap_or(&[])
    }
}
