//! Cluster access subsystem.
//!
//! # Data Flow
//! ```text
//! API handler (simulate / route-check / trace)
//!     → accessor.rs (ClusterAccessor trait, typed lookups)
//!     → model.rs (narrow typed mirror of Gateway API objects)
//!
//! Backing stores:
//!     snapshot.rs — immutable in-memory snapshot (dev mode, tests)
//!     live kube client — external collaborator, out of scope here
//! ```
//!
//! # Design Decisions
//! - The engine never sees unstructured CRD maps; everything is typed
//! - NotFound and Unavailable are distinct so callers can map 404 vs 503
//! - All lookups are request-scoped reads; nothing is cached or mutated

pub mod accessor;
pub mod model;
pub mod snapshot;

pub use accessor::{ClusterAccessor, ClusterError};
pub use snapshot::ClusterSnapshot;
