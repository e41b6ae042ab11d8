/*!
# Match Engine

Matches input keys against left-hand-side path elements. A successful match
yields a [`MatchedElement`] holding the key and the text captured by each
wildcard gap; a key that does not fit yields `None`.

```
use shiftpath::path::{Matchable, PathElement, Role, WalkedPath};

let element = PathElement::parse("tuna-*-marlin-*", Role::Lhs).unwrap();
let walked = WalkedPath::new();

let matched = element.match_key("tuna-A-marlin-AAA", &walked).unwrap();
assert_eq!(Some("A"), matched.capture(1));
assert_eq!(Some("AAA"), matched.capture(2));

assert!(element.match_key("tuna-marlin", &walked).is_none());
```

## Wildcard gaps

Anchors are located from left to right, each at its leftmost occurrence that
leaves a non-empty gap before it. The final gap takes the rest of the key, so
for ambiguous keys the earlier gaps capture as little as possible:
`*-*` against `a-b-c` captures `a` and `b-c`. Every gap must capture at least
one character, except for the bare `*` pattern which matches any key.
*/
use log::debug;

use crate::path::{
    ArrayElement, CompositeElement, Evaluatable, PathElement, Reference,
    WalkedPath, WildcardPattern,
};

/// The outcome of a successful match: the raw key plus its captures.
///
/// Capture group `0` is the raw key itself; groups `1..` are the wildcard
/// captures in left-to-right order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchedElement {
    /// The matched input key
    raw_key: String,
    /// Captures of groups 1..N
    captures: Vec<String>,
}

impl MatchedElement {
    /// Creates a match result without wildcard captures.
    pub fn new<T: Into<String>>(raw_key: T) -> Self {
        Self { raw_key: raw_key.into(), captures: vec![] }
    }

    /// Creates a match result with wildcard captures for groups `1..`.
    pub fn with_captures<T, I, S>(raw_key: T, captures: I) -> Self
    where
        T: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            raw_key: raw_key.into(),
            captures: captures.into_iter().map(Into::into).collect(),
        }
    }

    /// The matched key.
    #[must_use]
    pub fn raw_key(&self) -> &str {
        &self.raw_key
    }

    /// Returns capture group `group`, where group `0` is the raw key.
    #[must_use]
    pub fn capture(&self, group: usize) -> Option<&str> {
        match group {
            0 => Some(&self.raw_key),
            n => self.captures.get(n - 1).map(String::as_str),
        }
    }

    /// Number of capture groups, including group `0`.
    #[must_use]
    pub fn capture_count(&self) -> usize {
        1 + self.captures.len()
    }
}

/// Path elements that can be matched against an input key.
pub trait Matchable {
    /// Attempts to match `key`, resolving any references against `walked`.
    ///
    /// At match time `walked` does not yet contain the level being matched,
    /// so a reference of depth `0` points at the parent level.
    ///
    /// Returns `None` if the key does not satisfy the element.
    fn match_key(
        &self,
        key: &str,
        walked: &WalkedPath<'_>,
    ) -> Option<MatchedElement>;
}

impl Matchable for PathElement {
    fn match_key(
        &self,
        key: &str,
        walked: &WalkedPath<'_>,
    ) -> Option<MatchedElement> {
        match self {
            Self::Literal(literal) => {
                (literal == key).then(|| MatchedElement::new(key))
            }
            Self::Wildcard(pattern) => pattern.match_key(key, walked),
            Self::Array(array) => array.match_key(key, walked),
            Self::Composite(composite) => composite.match_key(key, walked),
            Self::Alternation(alternatives) => alternatives
                .iter()
                .find_map(|alternative| alternative.match_key(key, walked)),
        }
    }
}

impl Matchable for WildcardPattern {
    fn match_key(
        &self,
        key: &str,
        _walked: &WalkedPath<'_>,
    ) -> Option<MatchedElement> {
        self.captures(key)
            .map(|captures| MatchedElement::with_captures(key, captures))
    }
}

impl WildcardPattern {
    /// Splits `key` into the text of each gap, or returns `None` if the key
    /// does not fit the anchors.
    fn captures<'k>(&self, key: &'k str) -> Option<Vec<&'k str>> {
        if self.is_any() {
            return Some(vec![key]);
        }

        let anchors = self.anchors();
        let (first, rest) = anchors.split_first()?;
        let (last, interior) = rest.split_last()?;

        let body = key.strip_prefix(first.as_str())?;
        let mut cursor = body.strip_suffix(last.as_str())?;

        let mut captures = Vec::with_capacity(self.gap_count());
        for anchor in interior {
            // Gaps are never empty, so the search starts after one character
            let skip = cursor.chars().next()?.len_utf8();
            let found = skip + cursor[skip..].find(anchor.as_str())?;
            captures.push(&cursor[..found]);
            cursor = &cursor[found + anchor.len()..];
        }

        if cursor.is_empty() {
            return None;
        }
        captures.push(cursor);

        Some(captures)
    }
}

impl Matchable for ArrayElement {
    fn match_key(
        &self,
        key: &str,
        walked: &WalkedPath<'_>,
    ) -> Option<MatchedElement> {
        match self {
            Self::Append => None,
            Self::Explicit(index) => {
                (index.to_string() == key).then(|| MatchedElement::new(key))
            }
            Self::Wildcard(pattern) => pattern.match_key(key, walked),
            Self::Reference(reference) => reference.match_key(key, walked),
        }
    }
}

impl Matchable for Reference {
    fn match_key(
        &self,
        key: &str,
        walked: &WalkedPath<'_>,
    ) -> Option<MatchedElement> {
        match self.resolve(walked) {
            Ok(resolved) => {
                (resolved == key).then(|| MatchedElement::new(key))
            }
            Err(err) => {
                debug!(
                    "reference {self} does not resolve while matching \
                     {key:?}: {err}"
                );
                None
            }
        }
    }
}

impl Matchable for CompositeElement {
    fn match_key(
        &self,
        key: &str,
        walked: &WalkedPath<'_>,
    ) -> Option<MatchedElement> {
        match self.evaluate(walked) {
            Ok(resolved) => {
                (resolved == key).then(|| MatchedElement::new(key))
            }
            Err(err) => {
                debug!(
                    "composite `{self}` does not resolve while matching \
                     {key:?}: {err}"
                );
                None
            }
        }
    }
}
