//! Typed bindings for the turtlesim services.
//!
//! Each service module exports a `<Name>Request`/`<Name>Response` pair, a
//! zero-sized `<Name>` marker implementing [`RosService`], and the
//! `DESCRIPTOR` static that the registry hands out.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, TurtlesimSrvError};
use crate::registry::{ServiceName, ServiceType};
use crate::wire::{string_length, Ros1Deserializer, Ros1Serializer, LENGTH_PREFIX_SIZE};

/// A message with a ROS1 identity and wire encoding.
pub trait RosMessage: Sized {
    /// e.g. `turtlesim/SpawnRequest`
    const DATATYPE: &'static str;
    const MD5SUM: &'static str;
    /// Definition text as written in the `.srv` file.
    const MESSAGE_DEFINITION: &'static str;

    fn serialized_length(&self) -> usize;

    fn serialize(&self, ser: &mut Ros1Serializer);

    fn deserialize(de: &mut Ros1Deserializer<'_>) -> Result<Self>;

    fn to_bytes(&self) -> Vec<u8> {
        let mut ser = Ros1Serializer::with_capacity(self.serialized_length());
        self.serialize(&mut ser);
        ser.into_bytes()
    }

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut de = Ros1Deserializer::new(data);
        let message = Self::deserialize(&mut de)?;
        match de.remaining() {
            0 => Ok(message),
            remaining => Err(TurtlesimSrvError::TrailingBytes {
                datatype: Self::DATATYPE.to_string(),
                remaining,
            }),
        }
    }
}

pub trait RosService {
    type Request: RosMessage + Serialize + DeserializeOwned;
    type Response: RosMessage + Serialize + DeserializeOwned;

    /// e.g. `turtlesim/Spawn`
    const DATATYPE: &'static str;
    const MD5SUM: &'static str;

    fn descriptor() -> &'static ServiceType;
}

/// A single field value in the ROS1 wire format.
pub trait WireField: Sized {
    fn wire_length(&self) -> usize;

    fn write(&self, ser: &mut Ros1Serializer);

    fn read(de: &mut Ros1Deserializer<'_>) -> Result<Self>;
}

macro_rules! impl_wire_field {
    ($($rust_type:ty => $serialize:ident, $deserialize:ident);* $(;)?) => {
        $(
            impl WireField for $rust_type {
                fn wire_length(&self) -> usize {
                    std::mem::size_of::<$rust_type>()
                }

                fn write(&self, ser: &mut Ros1Serializer) {
                    ser.$serialize(*self);
                }

                fn read(de: &mut Ros1Deserializer<'_>) -> Result<Self> {
                    de.$deserialize()
                }
            }
        )*
    };
}

impl_wire_field! {
    bool => serialize_bool, deserialize_bool;
    i8 => serialize_i8, deserialize_i8;
    u8 => serialize_u8, deserialize_u8;
    i16 => serialize_i16, deserialize_i16;
    u16 => serialize_u16, deserialize_u16;
    i32 => serialize_i32, deserialize_i32;
    u32 => serialize_u32, deserialize_u32;
    i64 => serialize_i64, deserialize_i64;
    u64 => serialize_u64, deserialize_u64;
    f32 => serialize_f32, deserialize_f32;
    f64 => serialize_f64, deserialize_f64;
}

impl WireField for String {
    fn wire_length(&self) -> usize {
        string_length(self)
    }

    fn write(&self, ser: &mut Ros1Serializer) {
        ser.serialize_string(self);
    }

    fn read(de: &mut Ros1Deserializer<'_>) -> Result<Self> {
        de.deserialize_string()
    }
}

impl<T: WireField> WireField for Vec<T> {
    fn wire_length(&self) -> usize {
        LENGTH_PREFIX_SIZE + self.iter().map(WireField::wire_length).sum::<usize>()
    }

    fn write(&self, ser: &mut Ros1Serializer) {
        ser.write_sequence_length(self.len());
        for item in self {
            item.write(ser);
        }
    }

    fn read(de: &mut Ros1Deserializer<'_>) -> Result<Self> {
        let length = de.read_sequence_length()? as usize;
        // Every element takes at least one byte.
        de.ensure_remaining(length)?;
        let mut values = Vec::with_capacity(length);
        for _ in 0..length {
            values.push(T::read(de)?);
        }
        Ok(values)
    }
}

/// Which half of a service a message belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Request,
    Response,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Request => "request",
            MessageKind::Response => "response",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = TurtlesimSrvError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "request" => Ok(MessageKind::Request),
            "response" => Ok(MessageKind::Response),
            other => Err(TurtlesimSrvError::ConfigError {
                message: format!("unknown message kind '{other}', expected 'request' or 'response'"),
            }),
        }
    }
}

/// Generates the request/response pair, the service marker and `DESCRIPTOR`.
macro_rules! ros_service {
    (@message $name:ident, $datatype:expr, $md5sum:literal, $definition:literal,
        { $($(#[$field_meta:meta])* $field:ident: $ty:ty),* }) => {
        #[derive(Clone, Debug, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(default, deny_unknown_fields)]
        pub struct $name {
            $($(#[$field_meta])* pub $field: $ty,)*
        }

        impl $crate::srv::RosMessage for $name {
            const DATATYPE: &'static str = $datatype;
            const MD5SUM: &'static str = $md5sum;
            const MESSAGE_DEFINITION: &'static str = $definition;

            fn serialized_length(&self) -> usize {
                0 $(+ $crate::srv::WireField::wire_length(&self.$field))*
            }

            #[allow(unused_variables)]
            fn serialize(&self, ser: &mut $crate::wire::Ros1Serializer) {
                $($crate::srv::WireField::write(&self.$field, ser);)*
            }

            #[allow(unused_variables)]
            fn deserialize(
                de: &mut $crate::wire::Ros1Deserializer<'_>,
            ) -> $crate::error::Result<Self> {
                Ok(Self {
                    $($field: $crate::srv::WireField::read(de)?,)*
                })
            }
        }
    };

    (
        $(#[$service_meta:meta])*
        $service:ident,
        md5sum: $md5sum:literal,
        request: $request:ident {
            md5sum: $request_md5sum:literal,
            definition: $request_definition:literal,
            fields: { $($(#[$request_field_meta:meta])* $request_field:ident: $request_type:ty),* $(,)? } $(,)?
        },
        response: $response:ident {
            md5sum: $response_md5sum:literal,
            definition: $response_definition:literal,
            fields: { $($(#[$response_field_meta:meta])* $response_field:ident: $response_type:ty),* $(,)? } $(,)?
        } $(,)?
    ) => {
        ros_service!(@message $request,
            concat!("turtlesim/", stringify!($request)),
            $request_md5sum,
            $request_definition,
            { $($(#[$request_field_meta])* $request_field: $request_type),* });

        ros_service!(@message $response,
            concat!("turtlesim/", stringify!($response)),
            $response_md5sum,
            $response_definition,
            { $($(#[$response_field_meta])* $response_field: $response_type),* });

        $(#[$service_meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $service;

        impl $crate::srv::RosService for $service {
            type Request = $request;
            type Response = $response;

            const DATATYPE: &'static str = concat!("turtlesim/", stringify!($service));
            const MD5SUM: &'static str = $md5sum;

            fn descriptor() -> &'static $crate::registry::ServiceType {
                &DESCRIPTOR
            }
        }

        pub static DESCRIPTOR: $crate::registry::ServiceType = $crate::registry::ServiceType {
            name: $crate::registry::ServiceName::$service,
            datatype: <$service as $crate::srv::RosService>::DATATYPE,
            md5sum: $md5sum,
            definition: concat!($request_definition, "---\n", $response_definition),
            request: $crate::registry::MessageType::of::<$request>(),
            response: $crate::registry::MessageType::of::<$response>(),
        };
    };

}

pub mod kill;
pub mod set_pen;
pub mod spawn;
pub mod teleport_absolute;
pub mod teleport_relative;

pub use kill::{Kill, KillRequest, KillResponse};
pub use set_pen::{SetPen, SetPenRequest, SetPenResponse};
pub use spawn::{Spawn, SpawnRequest, SpawnResponse};
pub use teleport_absolute::{TeleportAbsolute, TeleportAbsoluteRequest, TeleportAbsoluteResponse};
pub use teleport_relative::{TeleportRelative, TeleportRelativeRequest, TeleportRelativeResponse};

fn encode_typed<S: RosService>(kind: MessageKind, json: &str) -> Result<Vec<u8>> {
    let bytes = match kind {
        MessageKind::Request => serde_json::from_str::<S::Request>(json)?.to_bytes(),
        MessageKind::Response => serde_json::from_str::<S::Response>(json)?.to_bytes(),
    };
    debug!(service = S::DATATYPE, %kind, bytes = bytes.len(), "encoded message");
    Ok(bytes)
}

fn decode_typed<S: RosService>(kind: MessageKind, data: &[u8]) -> Result<serde_json::Value> {
    let value = match kind {
        MessageKind::Request => serde_json::to_value(S::Request::from_bytes(data)?)?,
        MessageKind::Response => serde_json::to_value(S::Response::from_bytes(data)?)?,
    };
    debug!(service = S::DATATYPE, %kind, bytes = data.len(), "decoded message");
    Ok(value)
}

/// Encode a JSON request or response for `name` into ROS1 wire bytes.
/// Missing fields take their default value; unknown fields are rejected.
pub fn encode_json(name: ServiceName, kind: MessageKind, json: &str) -> Result<Vec<u8>> {
    match name {
        ServiceName::TeleportAbsolute => encode_typed::<TeleportAbsolute>(kind, json),
        ServiceName::Kill => encode_typed::<Kill>(kind, json),
        ServiceName::SetPen => encode_typed::<SetPen>(kind, json),
        ServiceName::Spawn => encode_typed::<Spawn>(kind, json),
        ServiceName::TeleportRelative => encode_typed::<TeleportRelative>(kind, json),
    }
}

/// Decode ROS1 wire bytes for `name` into the JSON form of the typed message.
///
/// NaN and infinite floats decode to `null`, which [`encode_json`] rejects, so
/// such messages do not survive a JSON round trip.
pub fn decode_json(name: ServiceName, kind: MessageKind, data: &[u8]) -> Result<serde_json::Value> {
    match name {
        ServiceName::TeleportAbsolute => decode_typed::<TeleportAbsolute>(kind, data),
        ServiceName::Kill => decode_typed::<Kill>(kind, data),
        ServiceName::SetPen => decode_typed::<SetPen>(kind, data),
        ServiceName::Spawn => decode_typed::<Spawn>(kind, data),
        ServiceName::TeleportRelative => decode_typed::<TeleportRelative>(kind, data),
    }
}
