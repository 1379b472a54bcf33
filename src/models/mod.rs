pub mod control;
pub mod coverage;
pub mod mapping;

pub use control::{Control, ControlKey};
pub use coverage::{round_percent, CoverageMode, CoverageReport};
pub use mapping::{Mapping, Relationship};
