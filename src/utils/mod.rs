//! Utils module - Shared utilities and helpers
//!
//! This module provides utility functions and helpers that are used across
//! multiple layers of the application architecture.

/// Input validation for configuration values and API parameters
pub mod validation;

/// Conversions from transport and decode failures into `ApiError`
pub mod error_helpers;

/// Text truncation and secret masking for terminal output
pub mod text;
