//! Testing infrastructure for correctness verification
//!
//! This module provides an invariant checking framework that probes a built
//! mapper with queries over every loaded control and framework pair.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use controlmap::testing::prelude::*;
//!
//! let mapper = ControlMapper::new(controls, mappings);
//! let probes = ProbeSet::exhaustive(&mapper);
//! let violations = check_all_invariants(&mapper, &probes, &default_invariants());
//! assert!(violations.is_empty());
//! ```
//!
//! # Invariants
//!
//! - **NoDanglingTargets**: resolved targets always exist in the control index
//! - **CoverageBounded**: coverage stays within [0, 100], zero for empty frameworks
//! - **FrameworkMatchesControl**: framework translation agrees with per-control lookup
//! - **QueriesIdempotent**: repeated queries return identical results

pub mod invariants;

pub use invariants::{
    check_all_invariants, default_invariants, CoverageBounded, FrameworkMatchesControl,
    Invariant, NoDanglingTargets, ProbeSet, QueriesIdempotent, Violation,
};

/// Prelude for easy imports
pub mod prelude {
    pub use super::invariants::{
        check_all_invariants, default_invariants, Invariant, ProbeSet, Violation,
    };
    pub use crate::engine::ControlMapper;
}
