//! ROS1 message and service definitions

use std::collections::{HashMap, HashSet};
use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::digit1,
    combinator::{map, map_res, opt, recognize},
    multi::many0,
    sequence::{delimited, pair},
    IResult, Parser,
};

use super::checksum::md5_hex;
use super::core::{
    extract_message_type, identifier, is_constant_line, is_service_separator, strip_comment,
};
use crate::error::{Result, TurtlesimSrvError};
use crate::wire::LENGTH_PREFIX_SIZE;

/// Definitions keyed by short type name, e.g. `"SpawnRequest"`.
pub type DefinitionTable<'a> = HashMap<String, MessageDefinition<'a>>;

#[derive(Clone, Debug, PartialEq)]
pub struct MessageDefinition<'a> {
    pub name: String,
    pub constants: Vec<ConstantDefinition<'a>>,
    pub fields: Vec<FieldDefinition<'a>>,
}

impl<'a> MessageDefinition<'a> {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDefinition<'a>>) -> MessageDefinition<'a> {
        MessageDefinition {
            name: name.into(),
            constants: Vec::new(),
            fields,
        }
    }

    /// Canonical text hashed into the ROS1 md5sum. Complex fields are replaced
    /// by the md5sum of their own definition, looked up in `table`.
    ///
    /// A type that reaches itself through its fields has no md5sum and fails
    /// with a `Definition` error.
    pub fn md5_text(&self, table: &DefinitionTable<'_>) -> Result<String> {
        let mut visiting = vec![extract_message_type(&self.name).to_string()];
        self.md5_text_visiting(table, &mut visiting)
    }

    fn md5_text_visiting(
        &self,
        table: &DefinitionTable<'_>,
        visiting: &mut Vec<String>,
    ) -> Result<String> {
        let mut lines = Vec::with_capacity(self.constants.len() + self.fields.len());
        for constant in &self.constants {
            lines.push(format!(
                "{} {}={}",
                constant.data_type, constant.name, constant.value
            ));
        }
        for field in &self.fields {
            match field.data_type.base_type() {
                BaseType::Primitive(_) => lines.push(format!("{} {}", field.data_type, field.name)),
                BaseType::Complex(type_name) => {
                    let short_name = extract_message_type(type_name);
                    if visiting.iter().any(|name| name == short_name) {
                        return Err(recursive_type_error(&self.name, type_name));
                    }
                    let nested = table.get(short_name).ok_or_else(|| {
                        TurtlesimSrvError::TypeNotFound {
                            type_name: type_name.clone(),
                            parent: self.name.clone(),
                        }
                    })?;
                    visiting.push(short_name.to_string());
                    let nested_text = nested.md5_text_visiting(table, visiting)?;
                    visiting.pop();
                    lines.push(format!("{} {}", md5_hex(&nested_text), field.name));
                }
            }
        }
        Ok(lines.join("\n"))
    }

    pub fn md5sum(&self, table: &DefinitionTable<'_>) -> Result<String> {
        Ok(md5_hex(&self.md5_text(table)?))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConstantDefinition<'a> {
    pub data_type: Primitive,
    pub name: &'a str,
    pub value: &'a str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDefinition<'a> {
    pub data_type: FieldType,
    pub name: &'a str,
}

impl<'a> FieldDefinition<'a> {
    pub fn new(data_type: FieldType, name: &'a str) -> FieldDefinition<'a> {
        FieldDefinition { data_type, name }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldType {
    Base(BaseType),
    Array { data_type: BaseType, length: u32 },
    Sequence(BaseType),
}

impl FieldType {
    pub fn base_type(&self) -> &BaseType {
        match self {
            FieldType::Base(data_type)
            | FieldType::Array { data_type, .. }
            | FieldType::Sequence(data_type) => data_type,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Base(data_type) => write!(f, "{data_type}"),
            FieldType::Array { data_type, length } => write!(f, "{data_type}[{length}]"),
            FieldType::Sequence(data_type) => write!(f, "{data_type}[]"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum BaseType {
    Primitive(Primitive),
    Complex(String),
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseType::Primitive(prim) => write!(f, "{prim}"),
            BaseType::Complex(name) => f.write_str(name),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Bool,
    Byte,
    Char,
    Float32,
    Float64,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    String,
    Time,
    Duration,
}

impl Primitive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Float32 => "float32",
            Primitive::Float64 => "float64",
            Primitive::Int8 => "int8",
            Primitive::UInt8 => "uint8",
            Primitive::Int16 => "int16",
            Primitive::UInt16 => "uint16",
            Primitive::Int32 => "int32",
            Primitive::UInt32 => "uint32",
            Primitive::Int64 => "int64",
            Primitive::UInt64 => "uint64",
            Primitive::String => "string",
            Primitive::Time => "time",
            Primitive::Duration => "duration",
        }
    }
}

impl Primitive {
    /// Fewest bytes a value takes on the wire. Strings count only their length prefix.
    pub fn min_wire_size(&self) -> usize {
        match self {
            Primitive::Bool
            | Primitive::Byte
            | Primitive::Char
            | Primitive::Int8
            | Primitive::UInt8 => 1,
            Primitive::Int16 | Primitive::UInt16 => 2,
            Primitive::Int32 | Primitive::UInt32 | Primitive::Float32 => 4,
            Primitive::String => LENGTH_PREFIX_SIZE,
            Primitive::Int64
            | Primitive::UInt64
            | Primitive::Float64
            | Primitive::Time
            | Primitive::Duration => 8,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ServiceDefinition<'a> {
    pub name: String,
    pub request: MessageDefinition<'a>,
    pub response: MessageDefinition<'a>,
}

impl<'a> ServiceDefinition<'a> {
    /// The ROS1 service md5sum covers the request text followed directly by the response text.
    pub fn md5sum(&self, table: &DefinitionTable<'_>) -> Result<String> {
        let mut text = self.request.md5_text(table)?;
        text.push_str(&self.response.md5_text(table)?);
        Ok(md5_hex(&text))
    }

    /// Table holding the request and response definitions, ready for decoding.
    pub fn definition_table(&self) -> DefinitionTable<'a> {
        HashMap::from([
            (self.request.name.clone(), self.request.clone()),
            (self.response.name.clone(), self.response.clone()),
        ])
    }
}

fn definition_error(type_name: &str, line: &str, message: impl Into<String>) -> TurtlesimSrvError {
    TurtlesimSrvError::Definition {
        type_name: type_name.to_string(),
        line: line.to_string(),
        message: message.into(),
    }
}

fn recursive_type_error(parent: &str, type_name: &str) -> TurtlesimSrvError {
    definition_error(parent, type_name, "recursive type")
}

/// Check that `name` and every type it reaches are in `table` and that none
/// of them contains itself.
pub fn ensure_not_recursive(name: &str, table: &DefinitionTable<'_>) -> Result<()> {
    let mut visiting = Vec::new();
    let mut checked = HashSet::new();
    visit_complex(name, name, table, &mut visiting, &mut checked)
}

fn visit_complex(
    type_name: &str,
    parent: &str,
    table: &DefinitionTable<'_>,
    visiting: &mut Vec<String>,
    checked: &mut HashSet<String>,
) -> Result<()> {
    let short_name = extract_message_type(type_name);
    if visiting.iter().any(|name| name == short_name) {
        return Err(recursive_type_error(parent, type_name));
    }
    if checked.contains(short_name) {
        return Ok(());
    }
    let definition = table
        .get(short_name)
        .ok_or_else(|| TurtlesimSrvError::TypeNotFound {
            type_name: type_name.to_string(),
            parent: parent.to_string(),
        })?;

    visiting.push(short_name.to_string());
    for field in &definition.fields {
        if let BaseType::Complex(nested) = field.data_type.base_type() {
            visit_complex(nested, &definition.name, table, visiting, checked)?;
        }
    }
    visiting.pop();
    checked.insert(short_name.to_string());
    Ok(())
}

pub fn parse_message_definition<'a>(
    name: impl Into<String>,
    text: &'a str,
) -> Result<MessageDefinition<'a>> {
    let name = name.into();
    let mut constants = Vec::new();
    let mut fields = Vec::new();

    for line in text.lines() {
        let trimmed = strip_comment(line).trim();
        if trimmed.is_empty() {
            continue;
        }

        if is_constant_line(trimmed) {
            constants.push(parse_constant_line(&name, trimmed)?);
            continue;
        }

        let mut tokens = trimmed.split_whitespace();
        let (Some(data_type), Some(field_name), None) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(definition_error(&name, line, "expected '<type> <name>'"));
        };

        let data_type = match ros_data_type(data_type) {
            Ok(("", data_type)) => data_type,
            Ok((rest, _)) => {
                return Err(definition_error(
                    &name,
                    line,
                    format!("unexpected trailing characters '{rest}' in type"),
                ))
            }
            Err(err) => {
                return Err(definition_error(
                    &name,
                    line,
                    format!("failed to parse type '{data_type}': {err}"),
                ))
            }
        };
        fields.push(FieldDefinition::new(data_type, field_name));
    }

    Ok(MessageDefinition {
        name,
        constants,
        fields,
    })
}

fn parse_constant_line<'a>(type_name: &str, line: &'a str) -> Result<ConstantDefinition<'a>> {
    let Some((declaration, value)) = line.split_once('=') else {
        return Err(definition_error(type_name, line, "expected '<type> <NAME>=<value>'"));
    };
    let mut tokens = declaration.split_whitespace();
    let (Some(data_type), Some(name), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(definition_error(type_name, line, "expected '<type> <NAME>=<value>'"));
    };
    let data_type = match primitive_type(data_type) {
        Ok(("", prim)) => prim,
        _ => {
            return Err(definition_error(
                type_name,
                line,
                format!("constant type '{data_type}' is not a primitive"),
            ))
        }
    };
    Ok(ConstantDefinition {
        data_type,
        name,
        value: value.trim(),
    })
}

/// Split `.srv` text on its `---` line into `<Name>Request` and `<Name>Response`.
pub fn parse_service_definition<'a>(name: &str, text: &'a str) -> Result<ServiceDefinition<'a>> {
    let short_name = extract_message_type(name);
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if is_service_separator(line) {
            let request_text = &text[..offset];
            let response_text = &text[offset + line.len()..];
            return Ok(ServiceDefinition {
                name: short_name.to_string(),
                request: parse_message_definition(format!("{short_name}Request"), request_text)?,
                response: parse_message_definition(format!("{short_name}Response"), response_text)?,
            });
        }
        offset += line.len();
    }
    Err(definition_error(short_name, "", "missing '---' separator"))
}

#[derive(Debug, Clone)]
pub struct SchemaSection<'a> {
    pub type_name: &'a str,
    pub content: &'a str,
}

pub const SECTION_DELIMITER: &str =
    "================================================================================";

/// Split a full ROS1 message definition (as carried in connection headers) into
/// the root section and its `MSG: pkg/Type` dependencies. The root section is
/// always present, even when it has no fields.
pub fn parse_schema_sections<'a>(
    schema_name: &'a str,
    schema_text: &'a str,
) -> Result<Vec<SchemaSection<'a>>> {
    let mut raw_sections = schema_text.split(SECTION_DELIMITER).map(str::trim);
    let mut sections = vec![SchemaSection {
        type_name: schema_name,
        content: raw_sections.next().unwrap_or_default(),
    }];

    for raw_section in raw_sections.filter(|s| !s.is_empty()) {
        let (header, content) = raw_section.split_once('\n').unwrap_or((raw_section, ""));
        let type_name = header
            .strip_prefix("MSG:")
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| definition_error(schema_name, header, "expected 'MSG: <type>' header"))?;
        sections.push(SchemaSection { type_name, content });
    }

    Ok(sections)
}

/// Parse every section into `table`, keyed by short name. Existing entries win.
pub fn parse_msg_definition_from_schema_sections<'a>(
    schema_sections: &[SchemaSection<'a>],
    table: &mut DefinitionTable<'a>,
) -> Result<()> {
    for schema_section in schema_sections.iter().rev() {
        let short_name = extract_message_type(schema_section.type_name);
        if table.contains_key(short_name) {
            continue;
        }
        let definition = parse_message_definition(short_name, schema_section.content)?;
        table.insert(short_name.to_string(), definition);
    }
    Ok(())
}

pub fn ros_data_type(input: &str) -> IResult<&str, FieldType> {
    let array_suffix = delimited(
        tag("["),
        opt(map_res(digit1, |digits: &str| digits.parse::<u32>())),
        tag("]"),
    );
    let mut parser = pair(non_array_ros_data_type, opt(array_suffix));
    let (rest, (data_type, suffix)) = parser.parse(input)?;

    let field_type = match suffix {
        None => FieldType::Base(data_type),
        Some(None) => FieldType::Sequence(data_type),
        Some(Some(length)) => FieldType::Array { data_type, length },
    };
    Ok((rest, field_type))
}

pub fn non_array_ros_data_type(input: &str) -> IResult<&str, BaseType> {
    let mut parser = map(
        recognize(pair(identifier, many0(pair(tag("/"), identifier)))),
        |full_type: &str| match primitive_type(full_type) {
            Ok(("", prim)) => BaseType::Primitive(prim),
            _ => BaseType::Complex(full_type.to_string()),
        },
    );
    parser.parse(input)
}

pub fn primitive_type(input: &str) -> IResult<&str, Primitive> {
    let mut parser = alt((
        map(tag("bool"), |_| Primitive::Bool),
        map(tag("byte"), |_| Primitive::Byte),
        map(tag("char"), |_| Primitive::Char),
        map(tag("float32"), |_| Primitive::Float32),
        map(tag("float64"), |_| Primitive::Float64),
        map(tag("int8"), |_| Primitive::Int8),
        map(tag("uint8"), |_| Primitive::UInt8),
        map(tag("int16"), |_| Primitive::Int16),
        map(tag("uint16"), |_| Primitive::UInt16),
        map(tag("int32"), |_| Primitive::Int32),
        map(tag("uint32"), |_| Primitive::UInt32),
        map(tag("int64"), |_| Primitive::Int64),
        map(tag("uint64"), |_| Primitive::UInt64),
        map(tag("string"), |_| Primitive::String),
        map(tag("time"), |_| Primitive::Time),
        map(tag("duration"), |_| Primitive::Duration),
    ));
    parser.parse(input)
}


#[cfg(test)]
mod tests {
    use super::test_helpers::*;
    use super::*;

    const SPAWN_SRV: &str = "float32 x\nfloat32 y\nfloat32 theta\nstring name # Optional.  A unique name will be created and returned if this is empty\n---\nstring name\n";

    #[test]
    fn test_parse_message_definition_skips_comments() {
        let text = "# turtle pose\nfloat32 x\nfloat32 y\n\nfloat32 theta  # radians\nfloat32 linear_velocity\nfloat32 angular_velocity\n";
        let definition = parse_message_definition("Pose", text).unwrap();
        assert_eq!(definition, create_pose_definition());
    }

    #[test]
    fn test_parse_array_types() {
        assert_eq!(
            ros_data_type("uint8[3]"),
            Ok((
                "",
                FieldType::Array {
                    data_type: BaseType::Primitive(Primitive::UInt8),
                    length: 3
                }
            ))
        );
        assert_eq!(
            ros_data_type("turtlesim/Pose[]"),
            Ok((
                "",
                FieldType::Sequence(BaseType::Complex("turtlesim/Pose".to_string()))
            ))
        );
        assert_eq!(
            ros_data_type("string"),
            Ok(("", FieldType::Base(BaseType::Primitive(Primitive::String))))
        );
    }

    #[test]
    fn test_primitive_prefix_is_complex() {
        assert_eq!(
            non_array_ros_data_type("stringent"),
            Ok(("", BaseType::Complex("stringent".to_string())))
        );
    }

    #[test]
    fn test_parse_constants() {
        let text = "uint8 PEN_OFF=1\nstring LABEL=turtle # not a comment\nuint8 off\n";
        let definition = parse_message_definition("Pen", text).unwrap();
        assert_eq!(
            definition.constants,
            vec![
                ConstantDefinition {
                    data_type: Primitive::UInt8,
                    name: "PEN_OFF",
                    value: "1"
                },
                ConstantDefinition {
                    data_type: Primitive::String,
                    name: "LABEL",
                    value: "turtle # not a comment"
                },
            ]
        );
        assert_eq!(definition.fields.len(), 1);
        assert_eq!(
            definition.md5_text(&DefinitionTable::new()).unwrap(),
            "uint8 PEN_OFF=1\nstring LABEL=turtle # not a comment\nuint8 off"
        );
    }

    #[test]
    fn test_malformed_line_is_rejected() {
        let err = parse_message_definition("Broken", "float32\n").unwrap_err();
        assert!(matches!(err, TurtlesimSrvError::Definition { ref type_name, .. } if type_name == "Broken"));

        let err = parse_message_definition("Broken", "uint8[x] data\n").unwrap_err();
        assert!(matches!(err, TurtlesimSrvError::Definition { .. }));
    }

    #[test]
    fn test_parse_service_definition() {
        let definition = parse_service_definition("turtlesim/Spawn", SPAWN_SRV).unwrap();
        assert_eq!(definition.name, "Spawn");
        assert_eq!(definition.request, create_spawn_request_definition());
        assert_eq!(
            definition.response,
            MessageDefinition::new(
                "SpawnResponse",
                vec![FieldDefBuilder::primitive(Primitive::String, "name")]
            )
        );
    }

    #[test]
    fn test_service_without_separator() {
        let err = parse_service_definition("Kill", "string name\n").unwrap_err();
        assert!(matches!(err, TurtlesimSrvError::Definition { .. }));
    }

    #[test]
    fn test_empty_response_half() {
        let definition = parse_service_definition("Kill", "string name\n---\n").unwrap();
        assert!(definition.response.fields.is_empty());
        assert_eq!(definition.response.name, "KillResponse");
    }

    #[test]
    fn test_service_md5sum() {
        let definition = parse_service_definition("Spawn", SPAWN_SRV).unwrap();
        let table = definition.definition_table();
        assert_eq!(
            definition.request.md5sum(&table).unwrap(),
            "57f001c49ab7b11d699f8606c1f4f7ff"
        );
        assert_eq!(
            definition.response.md5sum(&table).unwrap(),
            "c1f3d28f1b044c871e6eff2e9fc3c667"
        );
        assert_eq!(
            definition.md5sum(&table).unwrap(),
            "0b2d2e872a8e2887d5ed626f2bf2c561"
        );
    }

    #[test]
    fn test_md5_text_resolves_complex_fields() {
        let table = DefinitionTable::from([("Color".to_string(), create_color_definition())]);
        let definition = MessageDefinition::new(
            "Pen",
            vec![
                FieldDefBuilder::complex("turtlesim/Color", "color"),
                FieldDefBuilder::array(Primitive::UInt8, 2, "width"),
                FieldDefBuilder::sequence(Primitive::Float32, "trail"),
            ],
        );
        let color_md5 = create_color_definition().md5sum(&table).unwrap();
        assert_eq!(
            definition.md5_text(&table).unwrap(),
            format!("{color_md5} color\nuint8[2] width\nfloat32[] trail")
        );

        let err = definition.md5_text(&DefinitionTable::new()).unwrap_err();
        assert!(matches!(err, TurtlesimSrvError::TypeNotFound { .. }));
    }

    #[test]
    fn test_parse_schema_sections() {
        let text = format!(
            "turtlesim/Color color\nfloat32 width\n{SECTION_DELIMITER}\nMSG: turtlesim/Color\nuint8 r\nuint8 g\nuint8 b\n"
        );
        let sections = parse_schema_sections("Pen", &text).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].type_name, "turtlesim/Color");

        let mut table = DefinitionTable::new();
        parse_msg_definition_from_schema_sections(&sections, &mut table).unwrap();
        assert_eq!(table["Color"], create_color_definition());
        assert_eq!(table["Pen"].fields.len(), 2);
    }

    #[test]
    fn test_schema_sections_keep_empty_root() {
        let sections = parse_schema_sections("turtlesim/KillResponse", "").unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, "");

        let mut table = DefinitionTable::new();
        parse_msg_definition_from_schema_sections(&sections, &mut table).unwrap();
        assert!(table["KillResponse"].fields.is_empty());
    }

    #[test]
    fn test_schema_section_without_header() {
        let text = format!("uint8 r\n{SECTION_DELIMITER}\nuint8 g\n");
        let err = parse_schema_sections("Color", &text).unwrap_err();
        assert!(matches!(err, TurtlesimSrvError::Definition { .. }));
    }

    #[test]
    fn test_self_referencing_type_has_no_md5sum() {
        let definition = parse_message_definition("Node", "pkg/Node[] children\n").unwrap();
        let table = DefinitionTable::from([("Node".to_string(), definition)]);
        let err = table["Node"].md5sum(&table).unwrap_err();
        assert!(matches!(
            err,
            TurtlesimSrvError::Definition { ref message, .. } if message == "recursive type"
        ));
    }

    #[test]
    fn test_mutually_referencing_types_are_rejected() {
        let table = DefinitionTable::from([
            (
                "Head".to_string(),
                parse_message_definition("Head", "pkg/Tail tail\n").unwrap(),
            ),
            (
                "Tail".to_string(),
                parse_message_definition("Tail", "uint8 id\npkg/Head[2] heads\n").unwrap(),
            ),
        ]);
        assert!(matches!(
            table["Head"].md5_text(&table),
            Err(TurtlesimSrvError::Definition { .. })
        ));
        assert!(matches!(
            ensure_not_recursive("pkg/Tail", &table),
            Err(TurtlesimSrvError::Definition { ref message, .. }) if message == "recursive type"
        ));
    }

    #[test]
    fn test_shared_nested_type_is_not_recursive() {
        let table = DefinitionTable::from([
            ("Color".to_string(), create_color_definition()),
            (
                "Pen".to_string(),
                MessageDefinition::new(
                    "Pen",
                    vec![
                        FieldDefBuilder::complex("turtlesim/Color", "fill"),
                        FieldDefBuilder::complex("turtlesim/Color", "stroke"),
                    ],
                ),
            ),
        ]);
        ensure_not_recursive("Pen", &table).unwrap();
        assert!(table["Pen"].md5sum(&table).is_ok());
        assert!(matches!(
            ensure_not_recursive("Brush", &table),
            Err(TurtlesimSrvError::TypeNotFound { .. })
        ));
    }

    #[test]
    fn test_primitive_min_wire_size() {
        assert_eq!(Primitive::Bool.min_wire_size(), 1);
        assert_eq!(Primitive::UInt16.min_wire_size(), 2);
        assert_eq!(Primitive::Float32.min_wire_size(), 4);
        assert_eq!(Primitive::String.min_wire_size(), 4);
        assert_eq!(Primitive::Duration.min_wire_size(), 8);
    }
}
