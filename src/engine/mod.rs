//! In-memory mapping engine
//!
//! Controls and mappings are indexed once at construction and never mutated
//! afterwards, so a built [`ControlMapper`] can be shared freely between
//! readers.

pub mod index;
pub mod mapper;

pub use index::{ControlIndex, MappingIndex};
pub use mapper::{ControlMapper, FrameworkMapping, MapperStats, ResolvedMapping};
