//! Low-level primitives and utilities
//!
//! This module contains the key-file reader used for the host configuration
//! and path expansion helpers.

pub mod key_file;
pub mod path_utils;
