//! Vigil - Browser-Activity Security Correlation Engine
//!
//! Aggregates weak browser-side detection signals (newly-registered-domain
//! flags, typosquat heuristics, AI prompt content, extension traffic, CSP
//! violations, login events) into a typed, risk-scored entity graph and mines
//! it for high-risk attack chains.
//!
//! Each build is a deterministic, single-process batch pass: callers supply
//! the detected services and the event log, and receive an immutable
//! serializable [`graph::SecurityGraph`] snapshot.

pub mod config;
pub mod dlp;
pub mod error;
pub mod graph;
pub mod inputs;
pub mod scoring;
pub mod typosquat;

pub use error::{Result, VigilError};
