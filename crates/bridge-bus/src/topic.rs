//! # Topic Pattern Matching
//!
//! Wildcard topic templates compiled once at startup. Matching is purely
//! structural: segment counts must agree and literal segments must be equal.
//! A `+name` segment matches exactly one topic level and captures it under
//! `name`. Multi-level wildcards are not supported.

use std::collections::HashMap;
use thiserror::Error;

/// Errors from compiling a topic pattern.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopicPatternError {
    /// The pattern string was empty.
    #[error("Empty topic pattern")]
    Empty,
    /// A `+` wildcard segment had no capture name.
    #[error("Wildcard segment without a name in pattern '{0}'")]
    UnnamedWildcard(String),
    /// Multi-level wildcards (`#`) are not supported.
    #[error("Multi-level wildcard in pattern '{0}'")]
    MultiLevelWildcard(String),
}

/// One level of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Must equal the topic segment exactly.
    Literal(String),
    /// Matches any single segment, captured under the given name.
    Param(String),
}

/// Named parameters captured by a successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicParams(HashMap<String, String>);

impl TopicParams {
    /// Get a captured parameter by wildcard name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Number of captured parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the pattern had no wildcard segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A wildcard topic template, compiled once and immutable for the process
/// lifetime.
///
/// ```
/// use bridge_bus::TopicPattern;
///
/// let pattern = TopicPattern::parse("wallet/+id/accounts").unwrap();
/// let params = pattern.matches("wallet/42/accounts").unwrap();
/// assert_eq!(params.get("id"), Some("42"));
/// assert!(pattern.matches("wallet/42/balance").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPattern {
    segments: Vec<Segment>,
    source: String,
}

impl TopicPattern {
    /// Compile a pattern string.
    ///
    /// # Errors
    ///
    /// Returns an error for empty patterns, unnamed `+` wildcards, and
    /// multi-level (`#`) wildcards.
    pub fn parse(pattern: &str) -> Result<Self, TopicPatternError> {
        if pattern.is_empty() {
            return Err(TopicPatternError::Empty);
        }

        let mut segments = Vec::new();
        for raw in pattern.split('/') {
            if raw == "#" {
                return Err(TopicPatternError::MultiLevelWildcard(pattern.to_string()));
            }
            if let Some(name) = raw.strip_prefix('+') {
                if name.is_empty() {
                    return Err(TopicPatternError::UnnamedWildcard(pattern.to_string()));
                }
                segments.push(Segment::Param(name.to_string()));
            } else {
                segments.push(Segment::Literal(raw.to_string()));
            }
        }

        Ok(Self {
            segments,
            source: pattern.to_string(),
        })
    }

    /// Match a concrete topic against this pattern.
    ///
    /// Pure function: no side effects.
    ///
    /// # Returns
    ///
    /// - `Some(params)` - the topic matched; wildcard captures by name
    /// - `None` - segment count or a literal segment disagreed
    #[must_use]
    pub fn matches(&self, topic: &str) -> Option<TopicParams> {
        let parts: Vec<&str> = topic.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }

        Some(TopicParams(params))
    }

    /// The original pattern string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True when the pattern contains no wildcard segments.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }
}
