//! File I/O operations for XML documents.
//!
//! This module provides functionality to load XML files (plain, gzipped, or
//! in the portable JSON form) from disk or stdin.

pub mod loader;
