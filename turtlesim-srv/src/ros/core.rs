//! Core utilities for ROS1 definition text

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1},
    combinator::recognize,
    multi::many0,
    sequence::pair,
    IResult, Parser,
};

/// Line separating the request and response halves of a `.srv` file.
pub const SERVICE_SEPARATOR: &str = "---";

/// Extract the message type from a full ROS type name
/// e.g., "turtlesim/Spawn" -> "Spawn"
pub fn extract_message_type(full_type_name: &str) -> &str {
    full_type_name.rsplit('/').next().unwrap_or(full_type_name)
}

/// Drop a trailing `#` comment. String constants keep everything after `=`.
pub fn strip_comment(line: &str) -> &str {
    let comment = line.find('#');
    let assignment = line.find('=');
    match (comment, assignment) {
        (Some(c), Some(a)) if a < c && line[..a].trim_start().starts_with("string ") => line,
        (Some(c), _) => &line[..c],
        (None, _) => line,
    }
}

/// Check if a line in a message definition is a constant definition
pub fn is_constant_line(line: &str) -> bool {
    line.contains('=') && !line.contains('[')
}

pub fn is_service_separator(line: &str) -> bool {
    line.trim() == SERVICE_SEPARATOR
}

/// Parse a ROS identifier (field names, package names, etc.)
/// Starts with [a-zA-Z], followed by alphanumerics and underscores
pub fn identifier(input: &str) -> IResult<&str, &str> {
    let mut parser = recognize(pair(alpha1, many0(alt((alphanumeric1, tag("_"))))));
    parser.parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_type() {
        assert_eq!(extract_message_type("turtlesim/Spawn"), "Spawn");
        assert_eq!(extract_message_type("Spawn"), "Spawn");
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(
            strip_comment("string name # Optional.  A unique name").trim(),
            "string name"
        );
        assert_eq!(strip_comment("string GREETING=hi # there"), "string GREETING=hi # there");
        assert_eq!(strip_comment("int32 X=1 # one").trim(), "int32 X=1");
    }

    #[test]
    fn test_identifier() {
        assert_eq!(identifier("turtle_1 rest"), Ok((" rest", "turtle_1")));
        assert!(identifier("_name").is_err());
    }

    #[test]
    fn test_service_separator() {
        assert!(is_service_separator("---"));
        assert!(is_service_separator("  ---  "));
        assert!(!is_service_separator("----"));
    }
}
