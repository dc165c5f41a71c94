//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the toolkit:
//! - Math types and operations
//! - Projection, view and rotation transforms
//! - Logging utilities

pub mod math;
pub mod transform;
pub mod logging;
