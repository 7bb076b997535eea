//! Typed ROS1 bindings for the `turtlesim` services and a static registry
//! that aggregates them.
//!
//! ```
//! use turtlesim_srv::{registry, srv::RosService, srv::Kill};
//!
//! let kill = registry().lookup("Kill").unwrap();
//! assert!(std::ptr::eq(kill, Kill::descriptor()));
//! assert_eq!(kill.md5sum(), "c1f3d28f1b044c871e6eff2e9fc3c667");
//! ```

pub mod config;
pub mod error;
pub mod registry;
pub mod ros;
pub mod srv;
pub mod wire;

pub use config::{Config, OutputFormat, ServiceFilter};
pub use error::{Result, TurtlesimSrvError};
pub use registry::{registry, MessageType, ServiceName, ServiceRegistry, ServiceType, REGISTRY};
pub use srv::{MessageKind, RosMessage, RosService};

/// Look up a service binding by name; see [`ServiceRegistry::lookup`].
pub fn lookup(name: &str) -> Result<&'static ServiceType> {
    registry().lookup(name)
}
