//! The fixed set of turtlesim service types.
//!
//! [`REGISTRY`] is built at compile time from the `DESCRIPTOR` statics of the
//! service modules, so every entry is present and every lookup of the same
//! name yields the same `&'static ServiceType`.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::{Result, TurtlesimSrvError};
use crate::ros::{
    extract_message_type, parse_msg_definition_from_schema_sections, parse_schema_sections,
    parse_service_definition, DefinitionTable, Message, Ros1Parser, ServiceDefinition,
};
use crate::srv::{
    kill, set_pen, spawn, teleport_absolute, teleport_relative, MessageKind, RosMessage,
};

pub const PACKAGE: &str = "turtlesim";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceName {
    TeleportAbsolute,
    Kill,
    SetPen,
    Spawn,
    TeleportRelative,
}

impl ServiceName {
    pub const ALL: [ServiceName; 5] = [
        ServiceName::TeleportAbsolute,
        ServiceName::Kill,
        ServiceName::SetPen,
        ServiceName::Spawn,
        ServiceName::TeleportRelative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceName::TeleportAbsolute => "TeleportAbsolute",
            ServiceName::Kill => "Kill",
            ServiceName::SetPen => "SetPen",
            ServiceName::Spawn => "Spawn",
            ServiceName::TeleportRelative => "TeleportRelative",
        }
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceName {
    type Err = TurtlesimSrvError;

    /// Accepts `Spawn` or `turtlesim/Spawn`. Matching is case-sensitive.
    fn from_str(s: &str) -> Result<Self> {
        let short_name = match s.split_once('/') {
            Some((PACKAGE, rest)) => rest,
            Some(_) => s,
            None => s,
        };
        ServiceName::ALL
            .into_iter()
            .find(|name| name.as_str() == short_name)
            .ok_or_else(|| TurtlesimSrvError::ServiceNotFound {
                name: s.to_string(),
            })
    }
}

/// Identity and definition of one half of a service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageType {
    pub(crate) datatype: &'static str,
    pub(crate) md5sum: &'static str,
    pub(crate) definition: &'static str,
}

impl MessageType {
    pub const fn of<M: RosMessage>() -> Self {
        Self {
            datatype: M::DATATYPE,
            md5sum: M::MD5SUM,
            definition: M::MESSAGE_DEFINITION,
        }
    }

    pub fn datatype(&self) -> &'static str {
        self.datatype
    }

    pub fn md5sum(&self) -> &'static str {
        self.md5sum
    }

    pub fn definition(&self) -> &'static str {
        self.definition
    }

    /// Short type name, e.g. `SpawnRequest`.
    pub fn short_name(&self) -> &'static str {
        extract_message_type(self.datatype)
    }

    /// Definitions needed to decode this message. The definition text may
    /// carry `MSG: pkg/Type` sections for nested types, as full ROS1
    /// definitions do.
    pub fn definition_table(&self) -> Result<DefinitionTable<'static>> {
        let sections = parse_schema_sections(self.datatype, self.definition)?;
        let mut table = DefinitionTable::new();
        parse_msg_definition_from_schema_sections(&sections, &mut table)?;
        Ok(table)
    }

    /// Decode wire bytes into a dynamic [`Message`] driven by the definition text.
    pub fn decode(&self, data: &[u8]) -> Result<Message> {
        let table = self.definition_table()?;
        Ros1Parser::new(&table).parse(self.short_name(), data)
    }
}

/// The binding the registry hands out for one service.
#[derive(Debug, PartialEq, Eq)]
pub struct ServiceType {
    pub(crate) name: ServiceName,
    pub(crate) datatype: &'static str,
    pub(crate) md5sum: &'static str,
    pub(crate) definition: &'static str,
    pub(crate) request: MessageType,
    pub(crate) response: MessageType,
}

impl ServiceType {
    pub fn name(&self) -> ServiceName {
        self.name
    }

    pub fn datatype(&self) -> &'static str {
        self.datatype
    }

    pub fn md5sum(&self) -> &'static str {
        self.md5sum
    }

    /// Full `.srv` text, request and response separated by `---`.
    pub fn definition(&self) -> &'static str {
        self.definition
    }

    pub fn request(&self) -> &MessageType {
        &self.request
    }

    pub fn response(&self) -> &MessageType {
        &self.response
    }

    pub fn message(&self, kind: MessageKind) -> &MessageType {
        match kind {
            MessageKind::Request => &self.request,
            MessageKind::Response => &self.response,
        }
    }

    pub fn parse_definition(&self) -> Result<ServiceDefinition<'static>> {
        parse_service_definition(self.datatype, self.definition)
    }

    /// Decode wire bytes into a dynamic [`Message`] driven by the parsed definition.
    pub fn decode(&self, kind: MessageKind, data: &[u8]) -> Result<Message> {
        let message = self.message(kind).decode(data)?;
        debug!(service = self.datatype, %kind, bytes = data.len(), "decoded dynamic message");
        Ok(message)
    }
}

/// One named field per service; see [`registry`].
#[derive(Debug)]
pub struct ServiceRegistry {
    pub teleport_absolute: &'static ServiceType,
    pub kill: &'static ServiceType,
    pub set_pen: &'static ServiceType,
    pub spawn: &'static ServiceType,
    pub teleport_relative: &'static ServiceType,
}

pub static REGISTRY: ServiceRegistry = ServiceRegistry {
    teleport_absolute: &teleport_absolute::DESCRIPTOR,
    kill: &kill::DESCRIPTOR,
    set_pen: &set_pen::DESCRIPTOR,
    spawn: &spawn::DESCRIPTOR,
    teleport_relative: &teleport_relative::DESCRIPTOR,
};

pub fn registry() -> &'static ServiceRegistry {
    &REGISTRY
}

impl ServiceRegistry {
    pub fn get(&self, name: ServiceName) -> &'static ServiceType {
        match name {
            ServiceName::TeleportAbsolute => self.teleport_absolute,
            ServiceName::Kill => self.kill,
            ServiceName::SetPen => self.set_pen,
            ServiceName::Spawn => self.spawn,
            ServiceName::TeleportRelative => self.teleport_relative,
        }
    }

    pub fn lookup(&self, name: &str) -> Result<&'static ServiceType> {
        trace!(name, "service lookup");
        let service_name = name.parse::<ServiceName>()?;
        Ok(self.get(service_name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ServiceName, &'static ServiceType)> + '_ {
        ServiceName::ALL
            .into_iter()
            .map(move |name| (name, self.get(name)))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        ServiceName::ALL.into_iter().map(|name| name.as_str())
    }

    pub fn len(&self) -> usize {
        ServiceName::ALL.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}
