pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod models;
pub mod render;
pub mod session;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{DatasetConfig, MapperConfig};
pub use engine::{ControlMapper, FrameworkMapping, MapperStats, ResolvedMapping};
pub use error::{MapperError, Result};
pub use loader::{load_controls, load_mappings};
pub use models::*;
pub use session::build_mapper;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
