/*!
# Reference Tokens

A reference token points back at a key matched earlier in the tree walk.
`&(1,2)` reads as "capture group 2 of the key matched one level above the
current one".

The shorthand forms are normalized when parsed:

```
use shiftpath::path::Reference;

let full: Reference = "&(0,0)".parse().unwrap();
assert_eq!(full, "&".parse::<Reference>().unwrap());
assert_eq!(full, "&0".parse::<Reference>().unwrap());

let parent: Reference = "&1".parse().unwrap();
assert_eq!("&(1,0)", parent.to_string());
```
*/
use std::{fmt::Display, str::FromStr};

use crate::path::{
    Evaluatable, EvaluationError, PathParseError, WalkedPath,
    parser::parse_reference,
};

/// A positional back-reference into the walked path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reference {
    /// How many steps back from the most recent walked step, `0` being the
    /// most recent one
    depth: usize,
    /// Capture group of the referenced match, `0` being the whole key
    group: usize,
}

impl Reference {
    /// Creates a reference to capture group `group` of the step `depth`
    /// levels up the walked path.
    #[must_use]
    pub const fn new(depth: usize, group: usize) -> Self {
        Self { depth, group }
    }

    /// The ancestor depth, counted back from the most recent walked step.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// The capture group index; `0` refers to the whole matched key.
    #[must_use]
    pub const fn group(&self) -> usize {
        self.group
    }

    /// Looks up the referenced capture in `walked`, borrowing it from the
    /// walked step that holds it.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::OutOfRange`] if the walked path is not deep
    /// enough, or [`EvaluationError::MissingCaptureGroup`] if the referenced
    /// match has fewer capture groups.
    pub fn resolve<'w>(
        &self,
        walked: &'w WalkedPath<'_>,
    ) -> Result<&'w str, EvaluationError> {
        let step = walked.resolve(self.depth)?;
        step.matched().capture(self.group).ok_or_else(|| {
            EvaluationError::MissingCaptureGroup {
                group: self.group,
                available: step.matched().capture_count(),
            }
        })
    }
}

impl Evaluatable for Reference {
    fn evaluate(
        &self,
        walked: &WalkedPath<'_>,
    ) -> Result<String, EvaluationError> {
        self.resolve(walked).map(str::to_owned)
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "&({},{})", self.depth, self.group)
    }
}

impl FromStr for Reference {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_reference(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::MatchedElement;

    #[test]
    fn shorthand_equivalence() {
        let expected = Reference::new(0, 0);
        for raw in ["&", "&0", "&(0,0)"] {
            let reference: Reference = raw.parse().unwrap();
            assert_eq!(expected, reference, "parsing {raw}");
            assert_eq!("&(0,0)", reference.to_string());
        }
    }

    #[test]
    fn multi_digit_depth() {
        let reference: Reference = "&12".parse().unwrap();
        assert_eq!(Reference::new(12, 0), reference);
    }

    #[test]
    fn full_form() {
        let reference: Reference = "&(3,14)".parse().unwrap();
        assert_eq!(3, reference.depth());
        assert_eq!(14, reference.group());
        assert_eq!("&(3,14)", reference.to_string());
    }

    #[test]
    fn malformed() {
        for raw in ["", "&(1)", "&(1,2", "&( 1,2)", "&a", "1", "&(1,2)x"] {
            let result = raw.parse::<Reference>();
            assert!(
                matches!(
                    result,
                    Err(PathParseError::Syntax(_)
                        | PathParseError::InvalidReference(_))
                ),
                "parsing {raw:?} gave {result:?}"
            );
        }
    }

    #[test]
    fn overflowing_numbers() {
        let result = "&(1,99999999999999999999999)".parse::<Reference>();
        assert!(matches!(result, Err(PathParseError::InvalidReference(_))));
    }

    #[test]
    fn resolve_against_walked_path() {
        let mut walked = WalkedPath::new();
        walked.push(
            None,
            MatchedElement::with_captures("tuna-A-marlin-AAA", ["A", "AAA"]),
        );
        walked.push(None, MatchedElement::with_captures("rating-BBB", ["BBB"]));

        assert_eq!(Ok("AAA"), Reference::new(1, 2).resolve(&walked));
        assert_eq!(Ok("rating-BBB"), Reference::new(0, 0).resolve(&walked));
        assert_eq!(
            Err(EvaluationError::OutOfRange { depth: 2, len: 2 }),
            Reference::new(2, 0).resolve(&walked)
        );
        assert_eq!(
            Err(EvaluationError::MissingCaptureGroup { group: 2, available: 2 }),
            Reference::new(0, 2).resolve(&walked)
        );
    }
}
