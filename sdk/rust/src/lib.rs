//! Rust client SDK for the Gateway Console API.

pub mod client;

pub use client::{
    Backend, Check, ConsoleClient, RouteCheckOutcome, SimulationOutcome, Step, TraceOutcome,
};
