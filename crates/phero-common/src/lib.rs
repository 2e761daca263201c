//! Common types and utilities for the phero model extractor.
//!
//! This crate provides foundational pieces used across the phero crates:
//! - Centralized recursion and iteration limits
//! - The diagnostic message table and message formatting

// Centralized limits and thresholds
pub mod limits;

// Diagnostic codes and message templates
pub mod diagnostics;
pub use diagnostics::{DiagnosticCode, DiagnosticMessage, format_message};
