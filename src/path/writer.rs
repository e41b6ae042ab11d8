/*!
# Path Writer

A [`ParsedPath`] is the compiled form of a raw path string. On the output side
of a rule it is evaluated against the [`WalkedPath`] of the key that fired the
rule, producing the concrete segments to write the value to.

```
use shiftpath::path::{ParsedPath, PathElement, Role, WalkedPath};

let tuna = PathElement::parse("tuna-*-marlin-*", Role::Lhs).unwrap();
let rating = PathElement::parse("rating-*", Role::Lhs).unwrap();

let mut walked = WalkedPath::new();
let mut step = walked.enter(&tuna, "tuna-A-marlin-AAA").unwrap();
let step = step.enter(&rating, "rating-BBB").unwrap();

let output = ParsedPath::parse("&(1,2).&.value", Role::Rhs).unwrap();
let segments = output.evaluate(&step).unwrap();
assert_eq!(vec!["AAA", "rating-BBB", "value"], segments);
```

## Canonical form

[`ParsedPath`] renders its canonical form through [`Display`]: segments are
joined by `.`, array segments are wrapped in brackets and references are
always written in full. Parsing the canonical form again with the same role
gives back an equal path, so it is suitable for equality checks and caching.
*/
use log::debug;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Display},
    ops::Index,
};

use crate::path::{
    ArrayElement, CompositeElement, EvaluationError, PathElement,
    PathParseError, Role, Token, WalkedPath, parser::parse_path,
};

/// Path elements that resolve to a concrete string against a walked path.
pub trait Evaluatable {
    /// Resolves the element against `walked`.
    ///
    /// # Errors
    ///
    /// Returns an [`EvaluationError`] if a reference cannot be resolved or
    /// the element carries no concrete value.
    fn evaluate(
        &self,
        walked: &WalkedPath<'_>,
    ) -> Result<String, EvaluationError>;
}

/// One resolved segment of an output path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OutputSegment {
    /// Object key
    Key(String),
    /// Array index, as written or as resolved from a reference
    Index(String),
    /// Append to the end of an array
    Append,
}

impl Display for OutputSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) | Self::Index(key) => write!(f, "{key}"),
            Self::Append => write!(f, "[]"),
        }
    }
}

impl Evaluatable for CompositeElement {
    fn evaluate(
        &self,
        walked: &WalkedPath<'_>,
    ) -> Result<String, EvaluationError> {
        self.tokens().iter().try_fold(String::new(), |mut out, token| {
            match token {
                Token::Text(text) => out.push_str(text),
                Token::Reference(reference) => {
                    out.push_str(reference.resolve(walked)?);
                }
            }
            Ok(out)
        })
    }
}

impl ArrayElement {
    /// Resolves the bracket content into an index segment.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::NotEvaluable`] for wildcard brackets, or
    /// the error of an unresolvable reference.
    pub fn evaluate_segment(
        &self,
        walked: &WalkedPath<'_>,
    ) -> Result<OutputSegment, EvaluationError> {
        match self {
            Self::Append => Ok(OutputSegment::Append),
            Self::Explicit(index) => {
                Ok(OutputSegment::Index(index.to_string()))
            }
            Self::Reference(reference) => reference
                .resolve(walked)
                .map(|index| OutputSegment::Index(index.to_owned())),
            Self::Wildcard(_) => {
                Err(EvaluationError::NotEvaluable(self.to_string()))
            }
        }
    }
}

impl PathElement {
    /// Resolves this element into one output segment.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::NotEvaluable`] for wildcards and
    /// alternations, or the error of an unresolvable reference.
    pub fn evaluate_segment(
        &self,
        walked: &WalkedPath<'_>,
    ) -> Result<OutputSegment, EvaluationError> {
        match self {
            Self::Literal(key) => Ok(OutputSegment::Key(key.clone())),
            Self::Composite(composite) => {
                composite.evaluate(walked).map(OutputSegment::Key)
            }
            Self::Array(array) => array.evaluate_segment(walked),
            Self::Wildcard(_) | Self::Alternation(_) => {
                Err(EvaluationError::NotEvaluable(self.to_string()))
            }
        }
    }
}

impl Evaluatable for PathElement {
    fn evaluate(
        &self,
        walked: &WalkedPath<'_>,
    ) -> Result<String, EvaluationError> {
        self.evaluate_segment(walked).map(|segment| segment.to_string())
    }
}

/// A compiled path: the ordered elements of a raw path string together with
/// the side of the rule it was written for.
///
/// Once constructed, it can be used any number of times, from any number of
/// threads, as matching and evaluation never modify it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPath", into = "RawPath")]
pub struct ParsedPath {
    role: Role,
    elements: Vec<PathElement>,
}

impl ParsedPath {
    pub(crate) const fn new(role: Role, elements: Vec<PathElement>) -> Self {
        Self { role, elements }
    }

    /// Parses `raw` for the given side of a rule.
    ///
    /// # Errors
    ///
    /// Returns a [`PathParseError`] describing how the parsing failed.
    pub fn parse(raw: &str, role: Role) -> Result<Self, PathParseError> {
        parse_path(raw, role)
    }

    /// The side of the rule this path was parsed for.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// The elements, in path order.
    #[must_use]
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Consumes the path, returning its elements.
    #[must_use]
    pub fn into_elements(self) -> Vec<PathElement> {
        self.elements
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` for the empty path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the element at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PathElement> {
        self.elements.get(index)
    }

    /// Iterates over the elements in path order.
    pub fn iter(&self) -> std::slice::Iter<'_, PathElement> {
        self.elements.iter()
    }

    /// The canonical form, identical to the [`Display`] output.
    #[must_use]
    pub fn canonical_form(&self) -> String {
        self.to_string()
    }

    /// Resolves every element against `walked` into typed output segments.
    ///
    /// # Errors
    ///
    /// Returns the first [`EvaluationError`] encountered; `walked` is left
    /// untouched either way.
    pub fn evaluate_segments(
        &self,
        walked: &WalkedPath<'_>,
    ) -> Result<Vec<OutputSegment>, EvaluationError> {
        self.elements
            .iter()
            .map(|element| element.evaluate_segment(walked))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|err| {
                debug!("evaluating `{self}` failed: {err}");
            })
    }

    /// Resolves every element against `walked` into output path segments.
    ///
    /// Array segments are returned without their brackets; an append marker
    /// is returned as `[]`. Use [`ParsedPath::evaluate_segments`] to tell
    /// keys and indices apart.
    ///
    /// # Errors
    ///
    /// Returns the first [`EvaluationError`] encountered.
    pub fn evaluate(
        &self,
        walked: &WalkedPath<'_>,
    ) -> Result<Vec<String>, EvaluationError> {
        Ok(self
            .evaluate_segments(walked)?
            .iter()
            .map(ToString::to_string)
            .collect())
    }
}

impl Display for ParsedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{element}")?;
        }
        Ok(())
    }
}

impl Index<usize> for ParsedPath {
    type Output = PathElement;

    fn index(&self, index: usize) -> &Self::Output {
        &self.elements[index]
    }
}

impl<'p> IntoIterator for &'p ParsedPath {
    type Item = &'p PathElement;
    type IntoIter = std::slice::Iter<'p, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Serialized form of a [`ParsedPath`]: its role and canonical form.
#[derive(Serialize, Deserialize)]
struct RawPath {
    role: Role,
    path: String,
}

impl From<ParsedPath> for RawPath {
    fn from(parsed: ParsedPath) -> Self {
        Self { role: parsed.role, path: parsed.to_string() }
    }
}

impl TryFrom<RawPath> for ParsedPath {
    type Error = PathParseError;

    fn try_from(raw: RawPath) -> Result<Self, Self::Error> {
        parse_path(&raw.path, raw.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{Matchable, MatchedElement, Reference};

    fn rhs(raw: &str) -> ParsedPath {
        ParsedPath::parse(raw, Role::Rhs).unwrap()
    }

    fn matched(pattern: &str, key: &str) -> MatchedElement {
        PathElement::parse(pattern, Role::Lhs)
            .unwrap()
            .match_key(key, &WalkedPath::new())
            .unwrap()
    }

    /// Walked path after matching `tuna-*-marlin-*` and then `rating-*`.
    fn two_steps(tuna: &str, rating: &str) -> WalkedPath<'static> {
        let mut walked = WalkedPath::new();
        walked.push(None, matched("tuna-*-marlin-*", tuna));
        walked.push(None, matched("rating-*", rating));
        walked
    }

    #[test]
    fn cross_depth_references() {
        let walked = two_steps("tuna-A-marlin-AAA", "rating-BBB");
        let output = rhs("&(1,2).&.value");

        assert_eq!(Ok("AAA".to_string()), output[0].evaluate(&walked));
        assert_eq!(Ok("rating-BBB".to_string()), output[1].evaluate(&walked));
        assert_eq!(Ok("value".to_string()), output[2].evaluate(&walked));
        assert_eq!(
            vec!["AAA", "rating-BBB", "value"],
            output.evaluate(&walked).unwrap()
        );
    }

    #[test]
    fn array_index_evaluation() {
        let walked = two_steps("tuna-2-marlin-3", "rating-BBB");
        let output = rhs("tuna[&(1,1)].marlin[&(1,2)].&(0,1)");

        assert_eq!(5, output.len());
        assert_eq!(
            "tuna.[&(1,1)].marlin.[&(1,2)].&(0,1)",
            output.canonical_form()
        );
        assert_eq!(
            vec!["tuna", "2", "marlin", "3", "BBB"],
            output.evaluate(&walked).unwrap()
        );
        assert_eq!(
            vec![
                OutputSegment::Key("tuna".to_string()),
                OutputSegment::Index("2".to_string()),
                OutputSegment::Key("marlin".to_string()),
                OutputSegment::Index("3".to_string()),
                OutputSegment::Key("BBB".to_string()),
            ],
            output.evaluate_segments(&walked).unwrap()
        );
    }

    #[test]
    fn composite_concatenation() {
        let walked = two_steps("tuna-A-marlin-AAA", "rating-BBB");
        let output = rhs("photos-&(1,1)-&(0,1)_x");
        assert_eq!(vec!["photos-A-BBB_x"], output.evaluate(&walked).unwrap());
    }

    #[test]
    fn explicit_and_append_arrays() {
        let walked = WalkedPath::new();
        let output = rhs("list[2].other[]");
        assert_eq!(
            vec![
                OutputSegment::Key("list".to_string()),
                OutputSegment::Index("2".to_string()),
                OutputSegment::Key("other".to_string()),
                OutputSegment::Append,
            ],
            output.evaluate_segments(&walked).unwrap()
        );
        assert_eq!(
            vec!["list", "2", "other", "[]"],
            output.evaluate(&walked).unwrap()
        );
    }

    #[test]
    fn out_of_range() {
        let walked = two_steps("tuna-A-marlin-AAA", "rating-BBB");
        assert_eq!(
            Err(EvaluationError::OutOfRange { depth: 2, len: 2 }),
            rhs("a.&2").evaluate(&walked)
        );
    }

    #[test]
    fn missing_capture_group() {
        let walked = two_steps("tuna-A-marlin-AAA", "rating-BBB");
        assert_eq!(
            Err(EvaluationError::MissingCaptureGroup { group: 3, available: 3 }),
            rhs("&(1,3)").evaluate(&walked)
        );
    }

    #[test]
    fn not_evaluable() {
        let walked = two_steps("tuna-A-marlin-AAA", "rating-BBB");
        assert_eq!(
            Err(EvaluationError::NotEvaluable("rating-*".to_string())),
            rhs("a.rating-*").evaluate(&walked)
        );
        assert_eq!(
            Err(EvaluationError::NotEvaluable("[*]".to_string())),
            rhs("a[*]").evaluate(&walked)
        );
        let alternation = PathElement::parse("a|b", Role::Lhs).unwrap();
        assert_eq!(
            Err(EvaluationError::NotEvaluable("a|b".to_string())),
            alternation.evaluate(&walked)
        );
    }

    #[test]
    fn failed_evaluation_leaves_walked_path_untouched() {
        let walked = two_steps("tuna-A-marlin-AAA", "rating-BBB");
        let before = walked.clone();
        assert!(rhs("&(5,0)").evaluate(&walked).is_err());
        assert_eq!(before, walked);
    }

    #[test]
    fn evaluate_empty_path() {
        assert!(rhs("").evaluate(&WalkedPath::new()).unwrap().is_empty());
    }

    #[test]
    fn reference_evaluatable() {
        let walked = two_steps("tuna-A-marlin-AAA", "rating-BBB");
        assert_eq!(Ok("A".to_string()), Reference::new(1, 1).evaluate(&walked));
    }

    #[test]
    fn equal_paths_hash_alike() {
        use std::collections::HashSet;

        let paths: HashSet<ParsedPath> =
            ["a.&", "a.&0", "a.&(0,0)"].into_iter().map(rhs).collect();
        assert_eq!(1, paths.len());
    }

    #[test]
    fn iterate_elements() {
        let output = rhs("a.b[1]");
        let rendered: Vec<String> =
            output.iter().map(ToString::to_string).collect();
        assert_eq!(vec!["a", "b", "[1]"], rendered);
        assert_eq!(3, (&output).into_iter().count());
        assert!(output.get(3).is_none());
        assert_eq!(Role::Rhs, output.role());
    }
}
