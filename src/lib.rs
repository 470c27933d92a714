//! Gateway Console
//!
//! Management console API for a Kubernetes Gateway-API-based ingress layer.
//! The core is the route resolution and diagnostics engine: simulate which
//! rule a hypothetical request would hit, diagnose why a named route is or
//! isn't serving traffic, and trace a hostname down to the winning route.
//!
//! # Architecture Overview
//!
//! ```text
//!   JSON request
//!       │
//!       ▼
//!   ┌────────┐    ┌─────────┐    ┌──────────────────────────┐
//!   │  http  │───▶│   api   │───▶│  engine                  │
//!   │ server │    │ handlers│    │  routing  │ diagnostics  │
//!   └────────┘    └─────────┘    └─────┬────────────┬───────┘
//!                                      │            │
//!                                      ▼            ▼
//!                                ┌──────────────────────────┐
//!                                │ cluster (read-only       │
//!                                │ accessor + typed model)  │
//!                                └──────────────────────────┘
//!
//!   Cross-cutting: config, observability (logging/metrics), lifecycle
//! ```
//!
//! The engine is strictly read-only and side-effect-free: every call reads
//! live cluster state through the accessor, computes, and returns. Nothing is
//! cached or persisted across requests.

// Core subsystems
pub mod api;
pub mod cluster;
pub mod config;
pub mod http;

// Engine
pub mod diagnostics;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ConsoleConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
