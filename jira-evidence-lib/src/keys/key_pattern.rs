use crate::Result;
use core::fmt::{Display, Formatter};
use core::str::FromStr;
use ohno::IntoAppError;
use regex::Regex;
use std::collections::HashSet;

/// Pattern matching Jira issue keys such as `EV-123`
pub const DEFAULT_KEY_PATTERN: &str = "[A-Z]+-[0-9]+";

/// A compiled issue key pattern
#[derive(Debug, Clone)]
pub struct KeyPattern {
    regex: Regex,
}

impl KeyPattern {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// Returns an error naming the pattern if it is not a valid regular expression.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).into_app_err_with(|| format!("invalid issue key pattern '{pattern}'"))?;
        Ok(Self { regex })
    }

    /// The pattern used when none is configured.
    #[must_use]
    pub fn default_pattern() -> Self {
        Self::new(DEFAULT_KEY_PATTERN).expect("the default key pattern is a valid regex")
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether `text` contains a match anywhere.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The first non-empty match in `text`, if any.
    #[must_use]
    pub fn first_key<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.regex.find_iter(text).map(|m| m.as_str()).find(|s| !s.is_empty())
    }

    /// Extract the distinct keys found in `text`, in order of first occurrence.
    ///
    /// `seed`, when present and matching the pattern, is placed ahead of everything found in `text`.
    #[must_use]
    pub fn extract_keys(&self, text: &str, seed: Option<&str>) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut keys = Vec::new();

        let seed = seed.filter(|s| !s.is_empty() && self.is_match(s));
        let found = text.lines().flat_map(|line| self.regex.find_iter(line).map(|m| m.as_str()));

        for key in seed.into_iter().chain(found) {
            if !key.is_empty() && seen.insert(key) {
                keys.push(key.to_string());
            }
        }

        keys
    }
}

impl Default for KeyPattern {
    fn default() -> Self {
        Self::default_pattern()
    }
}

impl FromStr for KeyPattern {
    type Err = ohno::AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl Display for KeyPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
