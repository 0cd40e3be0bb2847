//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and scalar shaping functions
//! - Frame timing
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
