//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Simulated request (method, path, headers)
//!     → matcher.rs (evaluate predicates and rules)
//!     → simulator.rs (walk rule list, build per-rule trace)
//!     → Return: SimulationResult (winner + full trace)
//! ```
//!
//! # Design Decisions
//! - Deterministic: same route + request always produce the same result
//! - First match wins (rule index order); the trace still covers every rule
//! - No I/O anywhere in this subsystem; callers fetch the route

pub mod matcher;
pub mod simulator;

pub use matcher::SimulatedRequest;
pub use simulator::{SimulationResult, simulate};
