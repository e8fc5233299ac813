//! Names and segments, the building blocks of paths.
//!
//! A [`Name`] is an optionally prefixed identifier such as `title` or
//! `meta:created`. A [`Segment`] pairs a name with an optional 1-based
//! same-name-sibling index, e.g. `chapter[2]`. The reserved segments `.`
//! and `..` are constructed through dedicated methods and never carry a
//! prefix or an index.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::PathError;
use crate::constants::{PARENT_NAME, PREFIX_DELIMITER, SELF_NAME};

/// Characters that may not appear in a prefix or local name.
const ILLEGAL_NAME_CHARS: [char; 4] = ['/', ':', '[', ']'];

/// Decodes name text during parsing.
///
/// Paths often arrive from transport layers that escape characters which are
/// illegal in raw name text. Implementations reverse that escaping; the
/// decoded text is then validated as usual. The default [`NoOpDecoder`]
/// returns its input unchanged.
pub trait TextDecoder {
    /// Decode one prefix or local-name token.
    fn decode(&self, text: &str) -> String;
}

/// A decoder that passes text through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpDecoder;

impl TextDecoder for NoOpDecoder {
    fn decode(&self, text: &str) -> String {
        text.to_owned()
    }
}

/// An optionally prefixed name.
///
/// Names are immutable and validated on construction: the local part must be
/// non-empty, must not be `.` or `..`, and neither part may contain `/`,
/// `:`, `[`, or `]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name {
    prefix: Option<String>,
    local: String,
}

impl Name {
    /// Create an unprefixed name.
    pub fn new(local: impl Into<String>) -> Result<Self, PathError> {
        let local = local.into();
        validate_local(&local)?;
        Ok(Self {
            prefix: None,
            local,
        })
    }

    /// Create a prefixed name such as `meta:created`.
    pub fn prefixed(
        prefix: impl Into<String>,
        local: impl Into<String>,
    ) -> Result<Self, PathError> {
        let prefix = prefix.into();
        let local = local.into();
        validate_prefix(&prefix, &local)?;
        validate_local(&local)?;
        Ok(Self {
            prefix: Some(prefix),
            local,
        })
    }

    /// Parse a name from its text form, splitting on the prefix delimiter.
    pub fn parse(text: &str) -> Result<Self, PathError> {
        match split_prefix(text)? {
            (Some(prefix), local) => Self::prefixed(prefix, local),
            (None, local) => Self::new(local),
        }
    }

    /// Construct one of the reserved names `.` or `..` without validation.
    pub(super) fn reserved(text: &str) -> Self {
        Self {
            prefix: None,
            local: text.to_owned(),
        }
    }

    /// The namespace prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The local part of the name.
    pub fn local(&self) -> &str {
        &self.local
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}{PREFIX_DELIMITER}{}", self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

impl FromStr for Name {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Name {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        if text == SELF_NAME || text == PARENT_NAME {
            return Ok(Name::reserved(&text));
        }
        Name::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// One step of a path: a name with an optional same-name-sibling index.
///
/// Indexes are 1-based; an absent index on a sole child is the canonical
/// form, and `b` and `b[1]` address the same child (see
/// [`Segment::matches`]). Ordering compares prefix, then local name, then
/// index, with an absent index sorting before `[1]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Segment {
    name: Name,
    index: Option<u32>,
}

impl Segment {
    /// Create a segment without an index.
    pub fn new(name: Name) -> Self {
        Self { name, index: None }
    }

    /// Create a segment with an explicit 1-based index.
    pub fn with_index(name: Name, index: u32) -> Result<Self, PathError> {
        if index == 0 {
            return Err(PathError::InvalidIndex {
                segment: format!("{name}[0]"),
            });
        }
        Ok(Self {
            name,
            index: Some(index),
        })
    }

    /// The reserved self-reference segment `.`.
    pub fn self_reference() -> Self {
        Self {
            name: Name::reserved(SELF_NAME),
            index: None,
        }
    }

    /// The reserved parent-reference segment `..`.
    pub fn parent_reference() -> Self {
        Self {
            name: Name::reserved(PARENT_NAME),
            index: None,
        }
    }

    /// Parse a segment from its text form, e.g. `meta:chapter[2]`.
    pub fn parse(text: &str) -> Result<Self, PathError> {
        parse_token(text, &NoOpDecoder, text)
    }

    /// The segment's name.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The explicit same-name-sibling index, if present.
    pub fn index(&self) -> Option<u32> {
        self.index
    }

    /// True if this segment carries an explicit index.
    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    /// True if this is the reserved self-reference `.`.
    pub fn is_self_reference(&self) -> bool {
        self.name.prefix.is_none() && self.name.local == SELF_NAME
    }

    /// True if this is the reserved parent-reference `..`.
    pub fn is_parent_reference(&self) -> bool {
        self.name.prefix.is_none() && self.name.local == PARENT_NAME
    }

    /// True if this is either reserved segment.
    pub fn is_reference(&self) -> bool {
        self.is_self_reference() || self.is_parent_reference()
    }

    /// Compare two segments treating an absent index as `[1]`.
    ///
    /// This is the equivalence used when resolving a path against actual
    /// children: `b` and `b[1]` address the same node. Strict equality
    /// (`==`) continues to distinguish them.
    pub fn matches(&self, other: &Segment) -> bool {
        self.name == other.name && self.index.unwrap_or(1) == other.index.unwrap_or(1)
    }

    /// Copy of this segment with the given index.
    pub(crate) fn reindexed(&self, index: Option<u32>) -> Self {
        Self {
            name: self.name.clone(),
            index,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{index}]", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl FromStr for Segment {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Segment {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Name> for Segment {
    fn from(name: Name) -> Self {
        Segment::new(name)
    }
}

impl Serialize for Segment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Segment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Segment::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Parse one delimiter-separated token of a path into a segment.
///
/// `full_text` is the surrounding path text, used only for error messages.
pub(super) fn parse_token(
    token: &str,
    decoder: &dyn TextDecoder,
    full_text: &str,
) -> Result<Segment, PathError> {
    if token.is_empty() {
        return Err(PathError::EmptySegment {
            text: full_text.to_owned(),
        });
    }

    let (base, index) = split_index(token)?;
    if base == SELF_NAME || base == PARENT_NAME {
        if index.is_some() {
            return Err(PathError::ReservedSegment {
                segment: token.to_owned(),
            });
        }
        return Ok(if base == SELF_NAME {
            Segment::self_reference()
        } else {
            Segment::parent_reference()
        });
    }

    let (prefix, local) = split_prefix(base)?;
    let local = decoder.decode(local);
    if local == SELF_NAME || local == PARENT_NAME {
        // A prefixed or decoded form of a reserved segment.
        return Err(PathError::ReservedSegment {
            segment: token.to_owned(),
        });
    }
    let name = match prefix {
        Some(prefix) => {
            let prefix = decoder.decode(prefix);
            validate_prefix(&prefix, &local)?;
            validate_local(&local)?;
            Name {
                prefix: Some(prefix),
                local,
            }
        }
        None => {
            validate_local(&local)?;
            Name {
                prefix: None,
                local,
            }
        }
    };
    match index {
        Some(index) => Segment::with_index(name, index),
        None => Ok(Segment::new(name)),
    }
}

/// Split a trailing `[n]` index off a segment token.
fn split_index(token: &str) -> Result<(&str, Option<u32>), PathError> {
    if !token.ends_with(']') {
        return Ok((token, None));
    }
    let open = token.rfind('[').ok_or_else(|| PathError::InvalidIndex {
        segment: token.to_owned(),
    })?;
    let digits = &token[open + 1..token.len() - 1];
    let index = digits
        .parse::<u32>()
        .map_err(|_| PathError::InvalidIndex {
            segment: token.to_owned(),
        })?;
    if index == 0 {
        return Err(PathError::InvalidIndex {
            segment: token.to_owned(),
        });
    }
    Ok((&token[..open], Some(index)))
}

/// Split an optional prefix off a name token.
fn split_prefix(text: &str) -> Result<(Option<&str>, &str), PathError> {
    let mut parts = text.splitn(2, PREFIX_DELIMITER);
    let first = parts.next().unwrap_or_default();
    match parts.next() {
        Some(local) => {
            if local.contains(PREFIX_DELIMITER) {
                return Err(PathError::InvalidName {
                    text: text.to_owned(),
                    reason: "more than one prefix delimiter".to_owned(),
                });
            }
            Ok((Some(first), local))
        }
        None => Ok((None, first)),
    }
}

fn validate_local(local: &str) -> Result<(), PathError> {
    if local.is_empty() {
        return Err(PathError::InvalidName {
            text: local.to_owned(),
            reason: "local name is empty".to_owned(),
        });
    }
    if local == SELF_NAME || local == PARENT_NAME {
        return Err(PathError::InvalidName {
            text: local.to_owned(),
            reason: "local name is reserved".to_owned(),
        });
    }
    if let Some(ch) = local.chars().find(|c| ILLEGAL_NAME_CHARS.contains(c)) {
        return Err(PathError::InvalidName {
            text: local.to_owned(),
            reason: format!("local name contains '{ch}'"),
        });
    }
    Ok(())
}

fn validate_prefix(prefix: &str, local: &str) -> Result<(), PathError> {
    if prefix.is_empty() {
        return Err(PathError::InvalidName {
            text: format!("{PREFIX_DELIMITER}{local}"),
            reason: "prefix is empty".to_owned(),
        });
    }
    if let Some(ch) = prefix.chars().find(|c| ILLEGAL_NAME_CHARS.contains(c)) {
        return Err(PathError::InvalidName {
            text: prefix.to_owned(),
            reason: format!("prefix contains '{ch}'"),
        });
    }
    Ok(())
}
