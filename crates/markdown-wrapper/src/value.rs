use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

/// Property mapping of an element, in insertion order.
pub type Properties = IndexMap<String, PropertyValue>;

/// Extra attributes configured for the wrapper element, in insertion order.
pub type Attributes = IndexMap<String, AttributeValue>;

/// Value stored in an element's property mapping.
///
/// Lists and nulls only appear on nodes produced upstream (for example
/// `className: ["language-rust"]` on code blocks); the wrapper itself only
/// writes scalars.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    List(Vec<PropertyValue>),
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropertyValue::Null => serializer.serialize_unit(),
            PropertyValue::Boolean(value) => serializer.serialize_bool(*value),
            PropertyValue::Number(value) => serialize_number(*value, serializer),
            PropertyValue::String(value) => serializer.serialize_str(value),
            PropertyValue::List(values) => values.serialize(serializer),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<AttributeValue> for PropertyValue {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::String(value) => PropertyValue::String(value),
            AttributeValue::Number(value) => PropertyValue::Number(value),
            AttributeValue::Boolean(value) => PropertyValue::Boolean(value),
        }
    }
}

/// Scalar accepted for a configured wrapper attribute.
///
/// Values are passed through verbatim; nothing checks whether they make
/// sense for the attribute they are attached to.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Boolean(bool),
    Number(f64),
    String(String),
}

impl AttributeValue {
    /// Interprets a command-line style value: `true`/`false` become
    /// booleans, finite numbers become numbers, anything else stays a string.
    pub fn parse_loose(raw: &str) -> Self {
        match raw {
            "true" => return AttributeValue::Boolean(true),
            "false" => return AttributeValue::Boolean(false),
            _ => {}
        }
        match raw.parse::<f64>() {
            Ok(number) if number.is_finite() => AttributeValue::Number(number),
            _ => AttributeValue::String(raw.to_owned()),
        }
    }
}

impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AttributeValue::Boolean(value) => serializer.serialize_bool(*value),
            AttributeValue::Number(value) => serialize_number(*value, serializer),
            AttributeValue::String(value) => serializer.serialize_str(value),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Boolean(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Number(f64::from(value))
    }
}

// Integral values are written without a fractional part so `tabindex = -1`
// round-trips as `-1` rather than `-1.0`. Negative zero has no integer form
// and stays a float.
fn serialize_number<S: Serializer>(value: f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    let negative_zero = value == 0.0 && value.is_sign_negative();
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER && !negative_zero {
        serializer.serialize_i64(value as i64)
    } else {
        serializer.serialize_f64(value)
    }
}
