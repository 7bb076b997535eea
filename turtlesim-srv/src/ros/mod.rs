//! ROS1 message definitions, checksums and dynamic decoding

pub mod checksum;
pub mod core;
pub mod data;
pub mod ros1_parser;
pub mod types;

pub use self::checksum::*;
pub use self::core::*;
pub use self::data::*;
pub use self::ros1_parser::*;
pub use self::types::*;
