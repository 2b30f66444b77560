//! Quote calculation engine for comparing a business's current finance
//! operations against an outsourced service bundle.
//!
//! The numeric core lives in [`quoting`]: a deterministic, rule-driven
//! pricing model fed by read-only reference data behind the
//! [`quoting::rates::RateStore`] contract. Everything else in this crate is
//! plumbing for the HTTP service built on top of it.

pub mod config;
pub mod error;
pub mod quoting;
pub mod telemetry;
