//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and small numeric helpers
//! - Logging setup

pub mod math;
pub mod logging;
