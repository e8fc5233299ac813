//! Constants used throughout the xylem library.
//!
//! This module provides central definitions for reserved names and path
//! syntax characters used within the library.

/// Name of the workspace a repository opens with unless configured otherwise.
pub const DEFAULT_WORKSPACE: &str = "default";

/// Delimiter between segments in the string form of a path.
pub const DELIMITER: char = '/';

/// Delimiter between the namespace prefix and the local name of a qualified name.
pub const PREFIX_DELIMITER: char = ':';

/// String form of a self-reference segment.
pub const SELF_NAME: &str = ".";

/// String form of a parent-reference segment.
pub const PARENT_NAME: &str = "..";
