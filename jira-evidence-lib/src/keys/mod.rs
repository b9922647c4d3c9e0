//! Issue key extraction
//!
//! Issue keys (`EV-123`) are located in commit messages with a regular expression. The
//! pattern is user-configurable; a fixed default pattern is used to find the key of the
//! latest commit subject.

mod key_pattern;

pub use key_pattern::{DEFAULT_KEY_PATTERN, KeyPattern};
