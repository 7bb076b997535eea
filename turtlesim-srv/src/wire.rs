//! ROS1 wire format: little-endian, unaligned, no encapsulation header.

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use crate::error::{Result, TurtlesimSrvError};

/// Size in bytes of the length prefix carried by strings and variable-length arrays.
pub const LENGTH_PREFIX_SIZE: usize = 4;

#[derive(Default, Debug)]
pub struct Ros1Deserializer<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Ros1Deserializer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Fail with `BufferUnderrun` unless at least `count` bytes are left.
    #[inline]
    pub fn ensure_remaining(&self, count: usize) -> Result<()> {
        if count > self.remaining() {
            return Err(TurtlesimSrvError::BufferUnderrun {
                requested: count,
                position: self.position,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn next_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        self.ensure_remaining(count)?;
        self.position += count;
        Ok(&self.data[self.position - count..self.position])
    }

    #[inline]
    pub fn read_sequence_length(&mut self) -> Result<u32> {
        self.deserialize_u32()
    }

    pub fn deserialize_bool(&mut self) -> Result<bool> {
        Ok(self.next_bytes(1)?[0] != 0x00)
    }

    pub fn deserialize_i8(&mut self) -> Result<i8> {
        Ok(self.next_bytes(1)?[0] as i8)
    }

    pub fn deserialize_u8(&mut self) -> Result<u8> {
        Ok(self.next_bytes(1)?[0])
    }

    pub fn deserialize_char(&mut self) -> Result<char> {
        Ok(self.next_bytes(1)?[0] as char)
    }

    pub fn deserialize_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.next_bytes(2)?))
    }

    pub fn deserialize_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.next_bytes(2)?))
    }

    pub fn deserialize_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.next_bytes(4)?))
    }

    pub fn deserialize_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.next_bytes(4)?))
    }

    pub fn deserialize_i64(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.next_bytes(8)?))
    }

    pub fn deserialize_u64(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.next_bytes(8)?))
    }

    pub fn deserialize_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.next_bytes(4)?))
    }

    pub fn deserialize_f64(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.next_bytes(8)?))
    }

    /// Strings carry a `u32` byte length and no terminator.
    pub fn deserialize_string(&mut self) -> Result<String> {
        let byte_length = self.deserialize_u32()? as usize;
        let start = self.position;
        let bytes = self.next_bytes(byte_length)?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|source| TurtlesimSrvError::InvalidString {
                position: start,
                source,
            })
    }
}

/// Appends ROS1-encoded values to an owned buffer.
#[derive(Default, Debug)]
pub struct Ros1Serializer {
    buffer: Vec<u8>,
}

// Writes into a Vec<u8> cannot fail.
macro_rules! impl_serialize_le {
    ($($method_name:ident => $rust_type:ty => $write:ident),* $(,)?) => {
        $(
            pub fn $method_name(&mut self, value: $rust_type) {
                let _ = self.buffer.$write::<LittleEndian>(value);
            }
        )*
    };
}

impl Ros1Serializer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn serialize_bool(&mut self, value: bool) {
        self.buffer.push(u8::from(value));
    }

    pub fn serialize_i8(&mut self, value: i8) {
        self.buffer.push(value as u8);
    }

    pub fn serialize_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    impl_serialize_le! {
        serialize_i16 => i16 => write_i16,
        serialize_u16 => u16 => write_u16,
        serialize_i32 => i32 => write_i32,
        serialize_u32 => u32 => write_u32,
        serialize_i64 => i64 => write_i64,
        serialize_u64 => u64 => write_u64,
        serialize_f32 => f32 => write_f32,
        serialize_f64 => f64 => write_f64,
    }

    pub fn write_sequence_length(&mut self, length: usize) {
        self.serialize_u32(length as u32);
    }

    pub fn serialize_string(&mut self, value: &str) {
        self.write_sequence_length(value.len());
        self.buffer.extend_from_slice(value.as_bytes());
    }
}

/// Encoded size of a string field.
pub fn string_length(value: &str) -> usize {
    LENGTH_PREFIX_SIZE + value.len()
}
