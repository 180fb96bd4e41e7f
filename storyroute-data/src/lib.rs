//! External data adapters for storyroute.
//!
//! Responsibilities:
//! - Implement the core provider traits against remote services.
//! - Encapsulate wire formats and their quirks.
//!
//! Boundaries:
//! - Do not encode planning rules (live in `storyroute-core`).
//! - Keep blocking I/O off async executors; prefer async-capable clients.

pub mod routing;
