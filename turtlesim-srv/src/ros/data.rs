//! Runtime data structures for decoded ROS1 messages

use serde_json::{json, Map, Value};

#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub name: String,
    pub value: Vec<Field>,
}

impl Message {
    pub fn get(&self, field_name: &str) -> Option<&FieldValue> {
        self.value
            .iter()
            .find(|field| field.name == field_name)
            .map(|field| &field.value)
    }

    /// JSON object keyed by field name, in definition order.
    pub fn to_json(&self) -> Value {
        let object: Map<String, Value> = self
            .value
            .iter()
            .map(|field| (field.name.clone(), field.value.to_json()))
            .collect();
        Value::Object(object)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
}

impl Field {
    pub fn new(name: String, value: FieldValue) -> Field {
        Field { name, value }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Base(BaseValue),
    Array(Vec<BaseValue>),
    Sequence(Vec<BaseValue>),
}

impl FieldValue {
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Base(value) => value.to_json(),
            FieldValue::Array(values) | FieldValue::Sequence(values) => {
                Value::Array(values.iter().map(BaseValue::to_json).collect())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum BaseValue {
    Primitive(PrimitiveValue),
    Complex(Message),
}

impl BaseValue {
    pub fn to_json(&self) -> Value {
        match self {
            BaseValue::Primitive(value) => value.to_json(),
            BaseValue::Complex(message) => message.to_json(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveValue {
    Bool(bool),
    Byte(u8),
    Char(char),
    Float32(f32),
    Float64(f64),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    String(String),
    Time { secs: u32, nsecs: u32 },
    Duration { secs: i32, nsecs: i32 },
}

impl PrimitiveValue {
    /// NaN and infinite floats have no JSON number form and become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            PrimitiveValue::Bool(v) => json!(v),
            PrimitiveValue::Byte(v) | PrimitiveValue::UInt8(v) => json!(v),
            PrimitiveValue::Char(v) => json!(*v as u32),
            PrimitiveValue::Float32(v) => json!(v),
            PrimitiveValue::Float64(v) => json!(v),
            PrimitiveValue::Int8(v) => json!(v),
            PrimitiveValue::Int16(v) => json!(v),
            PrimitiveValue::UInt16(v) => json!(v),
            PrimitiveValue::Int32(v) => json!(v),
            PrimitiveValue::UInt32(v) => json!(v),
            PrimitiveValue::Int64(v) => json!(v),
            PrimitiveValue::UInt64(v) => json!(v),
            PrimitiveValue::String(v) => json!(v),
            PrimitiveValue::Time { secs, nsecs } => json!({ "secs": secs, "nsecs": nsecs }),
            PrimitiveValue::Duration { secs, nsecs } => json!({ "secs": secs, "nsecs": nsecs }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primitive(name: &str, value: PrimitiveValue) -> Field {
        Field::new(
            name.to_string(),
            FieldValue::Base(BaseValue::Primitive(value)),
        )
    }

    #[test]
    fn test_message_to_json() {
        let message = Message {
            name: "SetPenRequest".to_string(),
            value: vec![
                primitive("r", PrimitiveValue::UInt8(255)),
                primitive("off", PrimitiveValue::UInt8(1)),
                Field::new(
                    "trail".to_string(),
                    FieldValue::Sequence(vec![
                        BaseValue::Primitive(PrimitiveValue::Float32(0.5)),
                        BaseValue::Primitive(PrimitiveValue::Float32(1.5)),
                    ]),
                ),
                primitive("stamp", PrimitiveValue::Time { secs: 3, nsecs: 4 }),
            ],
        };

        assert_eq!(
            message.to_json(),
            json!({
                "r": 255,
                "off": 1,
                "trail": [0.5, 1.5],
                "stamp": { "secs": 3, "nsecs": 4 }
            })
        );
    }

    #[test]
    fn test_get_field() {
        let message = Message {
            name: "KillRequest".to_string(),
            value: vec![primitive("name", PrimitiveValue::String("turtle1".into()))],
        };
        assert_eq!(
            message.get("name"),
            Some(&FieldValue::Base(BaseValue::Primitive(PrimitiveValue::String(
                "turtle1".into()
            ))))
        );
        assert!(message.get("missing").is_none());
    }

    #[test]
    fn test_non_finite_floats_become_null() {
        assert_eq!(PrimitiveValue::Float32(f32::NAN).to_json(), Value::Null);
        assert_eq!(PrimitiveValue::Float64(f64::INFINITY).to_json(), Value::Null);
        assert_eq!(PrimitiveValue::Float32(-0.25).to_json(), json!(-0.25));
    }
}
