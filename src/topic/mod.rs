//! Topic pattern grammar.
//!
//! Topics are `/`-separated segment lists. A registration name is a pattern
//! when one of its segments is a wildcard:
//!
//! - `+` matches exactly one segment
//! - `#` matches the remaining segments, and is only valid as the last segment
//!
//! A name with `#` anywhere but at its end is not a pattern; it is registered
//! as a literal event name.

use crate::{Error, Result};

/// Separator between topic segments
pub const SEPARATOR: char = '/';

/// Wildcard matching exactly one segment
pub const SINGLE_LEVEL: &str = "+";

/// Wildcard matching every remaining segment
pub const MULTI_LEVEL: &str = "#";

/// Which registry a registration name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicKind {
    /// Matched verbatim against emitted names
    Exact,
    /// Matched segment-wise against emitted names
    Pattern,
}

impl TopicKind {
    /// Classify a registration name
    pub fn of(topic: &str) -> Self {
        if is_pattern(topic) {
            TopicKind::Pattern
        } else {
            TopicKind::Exact
        }
    }
}

/// Returns true if `#` occurs in `topic` anywhere except as its final character.
fn has_misplaced_multi_level(topic: &str) -> bool {
    topic.contains(MULTI_LEVEL) && !topic.ends_with(MULTI_LEVEL)
}

/// Check whether `topic` is a pattern: it has a `+` or `#` segment and any
/// `#` sits at the very end.
pub fn is_pattern(topic: &str) -> bool {
    if has_misplaced_multi_level(topic) {
        return false;
    }

    topic
        .split(SEPARATOR)
        .any(|segment| segment == SINGLE_LEVEL || segment == MULTI_LEVEL)
}

/// Test an emitted event name against a pattern.
///
/// The pattern must have no more segments than the event, and every segment
/// pair the two share must be equal or have a wildcard on the pattern side.
/// Event segments past the end of the pattern are accepted, so `a/+` matches
/// `a/b/c` just as `a/#` does.
///
/// Fails with [`Error::InvalidPattern`] if the pattern has a non-trailing `#`.
pub fn matches(pattern: &str, event: &str) -> Result<bool> {
    if has_misplaced_multi_level(pattern) {
        return Err(Error::InvalidPattern {
            pattern: pattern.to_string(),
        });
    }

    let pattern_segments: Vec<&str> = pattern.split(SEPARATOR).collect();
    let event_segments: Vec<&str> = event.split(SEPARATOR).collect();
    let fits = pattern_segments.len() <= event_segments.len();

    Ok(fits
        && pattern_segments
            .iter()
            .zip(event_segments.iter())
            .all(|(p, e)| p == e || *p == SINGLE_LEVEL || (*p == MULTI_LEVEL && fits)))
}
