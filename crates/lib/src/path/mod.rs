//! Hierarchical paths over named, indexable segments.
//!
//! A [`Path`] is an immutable sequence of [`Segment`]s, either absolute
//! (anchored at the root) or relative. Segment names may carry a namespace
//! prefix (`meta:created`) and a 1-based same-name-sibling index
//! (`chapter[2]`). The reserved segments `.` and `..` refer to the current
//! and parent location and are eliminated by [`Path::normalize`].
//!
//! Paths form a small algebra: they can be appended to, truncated to an
//! ancestor, compared for containment, rebased with [`Path::relative_to`],
//! and joined with [`Path::resolve`]. All operations return new paths and
//! leave the receiver untouched.
//!
//! # Examples
//!
//! ```
//! use xylem::Path;
//!
//! let path = Path::parse("/catalog/book[2]/title").unwrap();
//! assert!(path.is_absolute());
//! assert_eq!(path.len(), 3);
//!
//! let parent = path.parent().unwrap();
//! assert_eq!(parent.to_string(), "/catalog/book[2]");
//! assert!(parent.is_ancestor_of(&path));
//! ```

mod errors;
mod segment;


use std::cmp::Ordering;
use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};
use std::ops::{Bound, RangeBounds};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use errors::PathError;
pub use segment::{Name, NoOpDecoder, Segment, TextDecoder};

use crate::constants::DELIMITER;

/// An immutable hierarchical path.
///
/// Equality and hashing consider only the segments and whether the path is
/// absolute; the text form and normalization state are derived. Ordering is
/// segment-wise with three tie-breakers: a strict prefix sorts before its
/// extensions, and an absolute path sorts before an otherwise identical
/// relative one.
#[derive(Debug, Clone)]
pub struct Path {
    segments: Vec<Segment>,
    absolute: bool,
    normalized: bool,
    text: String,
}

impl Path {
    /// The root path `/`.
    pub fn root() -> Self {
        Self::from_segments(Vec::new(), true)
    }

    /// The lone self-reference `.`, the empty relative path.
    pub fn self_path() -> Self {
        Self::from_segments(Vec::new(), false)
    }

    /// Parse a path from its text form.
    ///
    /// Leading and trailing whitespace is ignored, as is a single trailing
    /// delimiter (`/a/b/` parses like `/a/b`). Empty segments, zero or
    /// malformed same-name-sibling indexes, and prefixed or indexed forms
    /// of `.` and `..` are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use xylem::Path;
    ///
    /// let path = Path::parse("a/../b").unwrap();
    /// assert!(path.is_relative());
    /// assert!(!path.is_normalized());
    /// assert_eq!(path.normalize().unwrap().to_string(), "b");
    ///
    /// assert!(Path::parse("/a//b").is_err());
    /// assert!(Path::parse("/a[0]").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self, PathError> {
        Self::parse_with(text, &NoOpDecoder)
    }

    /// Parse a path, passing each prefix and local-name token through the
    /// given decoder before validation.
    pub fn parse_with(text: &str, decoder: &dyn TextDecoder) -> Result<Self, PathError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(PathError::BlankText);
        }
        let absolute = trimmed.starts_with(DELIMITER);
        if absolute && trimmed.len() == 1 {
            return Ok(Self::root());
        }
        let mut body = if absolute { &trimmed[1..] } else { trimmed };
        // A single trailing delimiter is tolerated; anything more is an
        // empty segment.
        if body.ends_with(DELIMITER) {
            body = &body[..body.len() - 1];
        }
        if body.is_empty() {
            return Err(PathError::EmptySegment {
                text: trimmed.to_owned(),
            });
        }
        let mut segments = Vec::new();
        for token in body.split(DELIMITER) {
            segments.push(segment::parse_token(token, decoder, trimmed)?);
        }
        Ok(Self::from_segments(segments, absolute))
    }

    /// Build an absolute path from segments.
    pub fn absolute_from(segments: impl IntoIterator<Item = Segment>) -> Self {
        Self::from_segments(segments.into_iter().collect(), true)
    }

    /// Build a relative path from segments. An empty sequence yields `.`.
    pub fn relative_from(segments: impl IntoIterator<Item = Segment>) -> Self {
        Self::from_segments(segments.into_iter().collect(), false)
    }

    fn from_segments(mut segments: Vec<Segment>, absolute: bool) -> Self {
        if !absolute && segments.is_empty() {
            segments.push(Segment::self_reference());
        }
        let normalized = is_normalized_form(&segments, absolute);
        let text = render(&segments, absolute);
        Self {
            segments,
            absolute,
            normalized,
            text,
        }
    }

    /// True if this path is anchored at the root.
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// True if this path is relative.
    pub fn is_relative(&self) -> bool {
        !self.absolute
    }

    /// True if this is the root path `/`.
    pub fn is_root(&self) -> bool {
        self.absolute && self.segments.is_empty()
    }

    /// True if no reserved segment remains to be eliminated.
    ///
    /// The lone self-reference `.` counts as normalized, as does a relative
    /// path whose parent-references all sit in a leading run.
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// The number of segments. The root has zero.
    pub fn len(&self) -> usize {
        if self.is_lone_self() {
            return 0;
        }
        self.segments.len()
    }

    /// True if this path has no segments, i.e. it is `/` or `.`.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The segment at `index`, if any.
    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// The final segment, if any.
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Iterate over the segments.
    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// The text form of this path.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    fn is_lone_self(&self) -> bool {
        !self.absolute && self.segments.len() == 1 && self.segments[0].is_self_reference()
    }

    /// New path with one segment appended.
    ///
    /// ```
    /// use xylem::{Name, Path};
    ///
    /// let base = Path::parse("/catalog").unwrap();
    /// let child = base.append(Name::new("book").unwrap());
    /// assert_eq!(child.to_string(), "/catalog/book");
    /// ```
    pub fn append(&self, segment: impl Into<Segment>) -> Self {
        let mut segments = self.segments_for_append();
        segments.push(segment.into());
        Self::from_segments(segments, self.absolute)
    }

    /// New path with all given segments appended in order.
    pub fn append_all(&self, segments: impl IntoIterator<Item = Segment>) -> Self {
        let mut joined = self.segments_for_append();
        joined.extend(segments);
        Self::from_segments(joined, self.absolute)
    }

    /// Appending to `.` yields a plain relative path, not `./x`.
    fn segments_for_append(&self) -> Vec<Segment> {
        if self.is_lone_self() {
            Vec::new()
        } else {
            self.segments.clone()
        }
    }

    /// The ancestor `degree` levels up. Degree zero is the path itself.
    ///
    /// Fails with [`PathError::AncestorDegree`] when the path is too short,
    /// in particular for any ancestor of the root.
    pub fn ancestor(&self, degree: usize) -> Result<Self, PathError> {
        if degree == 0 {
            return Ok(self.clone());
        }
        let len = self.len();
        if degree > len {
            return Err(PathError::AncestorDegree {
                path: self.to_string(),
                degree,
            });
        }
        Ok(Self::from_segments(
            self.segments[..len - degree].to_vec(),
            self.absolute,
        ))
    }

    /// The immediate parent, equivalent to `ancestor(1)`.
    pub fn parent(&self) -> Result<Self, PathError> {
        self.ancestor(1)
    }

    /// True if this path is a proper ancestor of `other`.
    ///
    /// Both paths must have the same absoluteness and the comparison is
    /// segment-wise and strict: `b` and `b[1]` are different segments here.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        self.absolute == other.absolute
            && self.segments.len() < other.segments.len()
            && self.segments.iter().zip(&other.segments).all(|(a, b)| a == b)
    }

    /// True if this path is a proper descendant of `other`.
    pub fn is_descendant_of(&self, other: &Path) -> bool {
        other.is_ancestor_of(self)
    }

    /// True if this path equals `other` or is an ancestor of it.
    pub fn is_at_or_above(&self, other: &Path) -> bool {
        self == other || self.is_ancestor_of(other)
    }

    /// True if this path equals `other` or is a descendant of it.
    pub fn is_at_or_below(&self, other: &Path) -> bool {
        self == other || self.is_descendant_of(other)
    }

    /// Remove reserved segments.
    ///
    /// `.` segments are dropped and `..` cancels the preceding segment.
    /// An absolute path that would step above the root fails with
    /// [`PathError::RootEscape`]; a relative path keeps leading `..`
    /// segments and collapses to `.` when everything cancels.
    pub fn normalize(&self) -> Result<Self, PathError> {
        if self.normalized {
            return Ok(self.clone());
        }
        let mut out: Vec<Segment> = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            if segment.is_self_reference() {
                continue;
            }
            if segment.is_parent_reference() {
                match out.last() {
                    Some(last) if !last.is_parent_reference() => {
                        out.pop();
                    }
                    _ => {
                        if self.absolute {
                            return Err(PathError::RootEscape {
                                path: self.to_string(),
                            });
                        }
                        out.push(segment.clone());
                    }
                }
            } else {
                out.push(segment.clone());
            }
        }
        Ok(Self::from_segments(out, self.absolute))
    }

    /// Normalize, requiring an absolute path.
    ///
    /// The canonical form is the unique name under which an absolute
    /// location is stored and compared.
    pub fn canonicalize(&self) -> Result<Self, PathError> {
        if !self.absolute {
            return Err(PathError::AbsoluteRequired {
                operation: "canonicalize".to_owned(),
                path: self.to_string(),
            });
        }
        self.normalize()
    }

    /// The relative path that leads from `start` to this path.
    ///
    /// Both paths must be absolute; they are canonicalized first. The
    /// result starts with one `..` per segment of `start` outside the
    /// common ancestor, so `start.resolve(&result)` returns this path in
    /// canonical form.
    ///
    /// ```
    /// use xylem::Path;
    ///
    /// let a = Path::parse("/a/b/c").unwrap();
    /// let b = Path::parse("/a/x").unwrap();
    /// assert_eq!(a.relative_to(&b).unwrap().to_string(), "../b/c");
    /// ```
    pub fn relative_to(&self, start: &Path) -> Result<Self, PathError> {
        if !self.absolute {
            return Err(PathError::AbsoluteRequired {
                operation: "relative_to".to_owned(),
                path: self.to_string(),
            });
        }
        if !start.absolute {
            return Err(PathError::AbsoluteRequired {
                operation: "relative_to".to_owned(),
                path: start.to_string(),
            });
        }
        let target = self.normalize()?;
        let start = start.normalize()?;
        let common = common_prefix_len(&target.segments, &start.segments);
        let ups = start.segments.len() - common;
        let mut segments = Vec::with_capacity(ups + target.segments.len() - common);
        for _ in 0..ups {
            segments.push(Segment::parent_reference());
        }
        segments.extend(target.segments[common..].iter().cloned());
        Ok(Self::from_segments(segments, false))
    }

    /// Resolve a relative path against this absolute path.
    ///
    /// The receiver must be absolute and `relative` must be relative; the
    /// result is canonical. Fails with [`PathError::RootEscape`] when the
    /// relative path climbs above the root.
    pub fn resolve(&self, relative: &Path) -> Result<Self, PathError> {
        if !self.absolute {
            return Err(PathError::AbsoluteRequired {
                operation: "resolve".to_owned(),
                path: self.to_string(),
            });
        }
        if relative.absolute {
            return Err(PathError::RelativeRequired {
                operation: "resolve".to_owned(),
                path: relative.to_string(),
            });
        }
        let mut segments = self.segments.clone();
        segments.extend(relative.segments.iter().cloned());
        Self::from_segments(segments, true).normalize()
    }

    /// The deepest path at or above both this path and `other`.
    ///
    /// Both paths must be absolute; in the worst case the answer is the
    /// root.
    pub fn common_ancestor(&self, other: &Path) -> Result<Self, PathError> {
        if !self.absolute {
            return Err(PathError::AbsoluteRequired {
                operation: "common_ancestor".to_owned(),
                path: self.to_string(),
            });
        }
        if !other.absolute {
            return Err(PathError::AbsoluteRequired {
                operation: "common_ancestor".to_owned(),
                path: other.to_string(),
            });
        }
        let a = self.normalize()?;
        let b = other.normalize()?;
        let common = common_prefix_len(&a.segments, &b.segments);
        Ok(Self::from_segments(a.segments[..common].to_vec(), true))
    }

    /// The path formed by a window of this path's segments.
    ///
    /// A window starting at zero keeps this path's absoluteness; any other
    /// window is relative. An empty window yields `/` or `.` accordingly.
    ///
    /// ```
    /// use xylem::Path;
    ///
    /// let path = Path::parse("/a/b/c").unwrap();
    /// assert_eq!(path.subpath(..2).unwrap().to_string(), "/a/b");
    /// assert_eq!(path.subpath(1..).unwrap().to_string(), "b/c");
    /// ```
    pub fn subpath<R>(&self, range: R) -> Result<Self, PathError>
    where
        R: RangeBounds<usize>,
    {
        let length = self.segments.len();
        let start = match range.start_bound() {
            Bound::Unbounded => 0,
            Bound::Included(&n) => n,
            Bound::Excluded(&n) => n + 1,
        };
        let end = match range.end_bound() {
            Bound::Unbounded => length,
            Bound::Included(&n) => n + 1,
            Bound::Excluded(&n) => n,
        };
        if start > end || end > length {
            return Err(PathError::SubpathOutOfBounds { start, end, length });
        }
        Ok(Self::from_segments(
            self.segments[start..end].to_vec(),
            self.absolute && start == 0,
        ))
    }
}

fn common_prefix_len(a: &[Segment], b: &[Segment]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

fn is_normalized_form(segments: &[Segment], absolute: bool) -> bool {
    if !absolute && segments.len() == 1 && segments[0].is_self_reference() {
        return true;
    }
    let mut leading = true;
    for segment in segments {
        if segment.is_self_reference() {
            return false;
        }
        if segment.is_parent_reference() {
            if absolute || !leading {
                return false;
            }
        } else {
            leading = false;
        }
    }
    true
}

fn render(segments: &[Segment], absolute: bool) -> String {
    if segments.is_empty() {
        // Relative paths are never stored without segments; see
        // `from_segments`.
        return DELIMITER.to_string();
    }
    let mut out = String::new();
    if absolute {
        out.push(DELIMITER);
    }
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        let _ = write!(out, "{segment}");
    }
    out
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.absolute == other.absolute && self.segments == other.segments
    }
}

impl Eq for Path {}

impl Hash for Path {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.absolute.hash(state);
        self.segments.hash(state);
    }
}

impl Ord for Path {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.segments.iter().zip(&other.segments) {
            match a.cmp(b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        match self.segments.len().cmp(&other.segments.len()) {
            // A strict prefix sorts before its extensions; among equal
            // segment lists an absolute path sorts first.
            Ordering::Equal => other.absolute.cmp(&self.absolute),
            unequal => unequal,
        }
    }
}

impl PartialOrd for Path {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Path {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Path {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl Serialize for Path {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Path::parse(&text).map_err(serde::de::Error::custom)
    }
}
