//! ROS1 wire bytes to dynamic message parser

use super::core::extract_message_type;
use super::data::{BaseValue, Field, FieldValue, Message, PrimitiveValue};
use super::types::{
    ensure_not_recursive, BaseType, DefinitionTable, FieldDefinition, FieldType,
    MessageDefinition, Primitive,
};
use crate::error::{Result, TurtlesimSrvError};
use crate::wire::{Ros1Deserializer, LENGTH_PREFIX_SIZE};

pub struct SingleMessageRos1Parser<'a> {
    msg_definition_table: &'a DefinitionTable<'a>,
    deserializer: Ros1Deserializer<'a>,
    name: String,
}

impl<'a> SingleMessageRos1Parser<'a> {
    pub fn new(
        msg_definition_table: &'a DefinitionTable<'a>,
        name: String,
        data: &'a [u8],
    ) -> Self {
        Self {
            msg_definition_table,
            deserializer: Ros1Deserializer::new(data),
            name,
        }
    }

    /// Decode one message and require that it consumes every byte.
    pub fn parse(&mut self) -> Result<Message> {
        let name = self.name.clone();
        ensure_not_recursive(&name, self.msg_definition_table)?;
        let message = self.parse_complex(&name)?;
        let remaining = self.deserializer.remaining();
        if remaining != 0 {
            return Err(TurtlesimSrvError::TrailingBytes {
                datatype: name,
                remaining,
            });
        }
        Ok(message)
    }

    fn parse_field(&mut self, field: &FieldDefinition<'a>) -> Result<Field> {
        let value = match &field.data_type {
            FieldType::Sequence(base_type) => {
                FieldValue::Sequence(self.parse_dynamic_array(base_type)?)
            }
            FieldType::Array { data_type, length } => {
                FieldValue::Array(self.parse_static_array(data_type, *length)?)
            }
            FieldType::Base(base_type) => FieldValue::Base(self.parse_base_value(base_type)?),
        };

        Ok(Field {
            name: field.name.to_string(),
            value,
        })
    }

    fn parse_static_array(&mut self, base_type: &BaseType, length: u32) -> Result<Vec<BaseValue>> {
        self.ensure_elements_fit(base_type, length)?;
        (0..length)
            .map(|_| self.parse_base_value(base_type))
            .collect()
    }

    fn parse_dynamic_array(&mut self, base_type: &BaseType) -> Result<Vec<BaseValue>> {
        let length = self.deserializer.read_sequence_length()?;
        self.ensure_elements_fit(base_type, length)?;
        let mut values = Vec::with_capacity(length as usize);
        for _ in 0..length {
            values.push(self.parse_base_value(base_type)?);
        }
        Ok(values)
    }

    /// Reject `length` elements before decoding any of them if the remaining
    /// bytes cannot hold them. Elements that take no bytes count as one.
    fn ensure_elements_fit(&self, base_type: &BaseType, length: u32) -> Result<()> {
        let element_size = self.min_wire_size(base_type)?.max(1);
        self.deserializer
            .ensure_remaining((length as usize).saturating_mul(element_size))
    }

    /// Fewest bytes one value of `base_type` takes on the wire.
    fn min_wire_size(&self, base_type: &BaseType) -> Result<usize> {
        match base_type {
            BaseType::Primitive(prim) => Ok(prim.min_wire_size()),
            BaseType::Complex(name) => {
                let definition = self.definition(name)?;
                definition.fields.iter().try_fold(0usize, |total, field| -> Result<usize> {
                    let size = match &field.data_type {
                        FieldType::Base(data_type) => self.min_wire_size(data_type)?,
                        FieldType::Array { data_type, length } => self
                            .min_wire_size(data_type)?
                            .saturating_mul(*length as usize),
                        FieldType::Sequence(_) => LENGTH_PREFIX_SIZE,
                    };
                    Ok(total.saturating_add(size))
                })
            }
        }
    }

    fn definition(&self, name: &str) -> Result<&'a MessageDefinition<'a>> {
        let table = self.msg_definition_table;
        table
            .get(extract_message_type(name))
            .ok_or_else(|| TurtlesimSrvError::TypeNotFound {
                type_name: name.to_string(),
                parent: self.name.clone(),
            })
    }

    fn parse_base_value(&mut self, base_type: &BaseType) -> Result<BaseValue> {
        match base_type {
            BaseType::Primitive(prim) => Ok(BaseValue::Primitive(self.parse_primitive(prim)?)),
            BaseType::Complex(name) => Ok(BaseValue::Complex(self.parse_complex(name)?)),
        }
    }

    fn parse_complex(&mut self, name: &str) -> Result<Message> {
        let msg_definition = self.definition(name)?;

        let mut message = Message {
            name: extract_message_type(name).to_string(),
            value: Vec::with_capacity(msg_definition.fields.len()),
        };
        for field in msg_definition.fields.iter() {
            message.value.push(self.parse_field(field)?);
        }

        Ok(message)
    }

    fn parse_primitive(&mut self, prim: &Primitive) -> Result<PrimitiveValue> {
        let de = &mut self.deserializer;
        Ok(match prim {
            Primitive::Bool => PrimitiveValue::Bool(de.deserialize_bool()?),
            Primitive::Byte => PrimitiveValue::Byte(de.deserialize_u8()?),
            Primitive::Char => PrimitiveValue::Char(de.deserialize_char()?),
            Primitive::Float32 => PrimitiveValue::Float32(de.deserialize_f32()?),
            Primitive::Float64 => PrimitiveValue::Float64(de.deserialize_f64()?),
            Primitive::Int8 => PrimitiveValue::Int8(de.deserialize_i8()?),
            Primitive::UInt8 => PrimitiveValue::UInt8(de.deserialize_u8()?),
            Primitive::Int16 => PrimitiveValue::Int16(de.deserialize_i16()?),
            Primitive::UInt16 => PrimitiveValue::UInt16(de.deserialize_u16()?),
            Primitive::Int32 => PrimitiveValue::Int32(de.deserialize_i32()?),
            Primitive::UInt32 => PrimitiveValue::UInt32(de.deserialize_u32()?),
            Primitive::Int64 => PrimitiveValue::Int64(de.deserialize_i64()?),
            Primitive::UInt64 => PrimitiveValue::UInt64(de.deserialize_u64()?),
            Primitive::String => PrimitiveValue::String(de.deserialize_string()?),
            Primitive::Time => PrimitiveValue::Time {
                secs: de.deserialize_u32()?,
                nsecs: de.deserialize_u32()?,
            },
            Primitive::Duration => PrimitiveValue::Duration {
                secs: de.deserialize_i32()?,
                nsecs: de.deserialize_i32()?,
            },
        })
    }
}

pub struct Ros1Parser<'a> {
    msg_definition_table: &'a DefinitionTable<'a>,
}

impl<'a> Ros1Parser<'a> {
    pub fn new(msg_definition_table: &'a DefinitionTable<'a>) -> Self {
        Self {
            msg_definition_table,
        }
    }

    pub fn parse(&self, name: &str, data: &'a [u8]) -> Result<Message> {
        let mut single_message_parser =
            SingleMessageRos1Parser::new(self.msg_definition_table, name.to_string(), data);
        single_message_parser.parse()
    }
}
