/*!
# Path Elements

Defines the parsed form of a single path segment. Each element renders its
canonical form through [`Display`], which re-parses to an equal element.

| Raw segment          | Element                                  |
|----------------------|------------------------------------------|
| `rating`             | [`PathElement::Literal`]                 |
| `tuna-*-marlin-*`    | [`PathElement::Wildcard`]                |
| `[3]`, `[*]`, `[&1]` | [`PathElement::Array`]                   |
| `photos-&1-bob`, `&` | [`PathElement::Composite`]               |
| `rating\|Rating`     | [`PathElement::Alternation`] (LHS only)  |
*/
use std::fmt::{self, Display, Write as _};

use crate::path::{
    PathParseError, Reference, Role,
    parser::parse_path,
};

/// A single segment of a parsed path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// Exact key, e.g. "rating"
    Literal(String),
    /// Star pattern with captured gaps, e.g. "rating-*"
    Wildcard(WildcardPattern),
    /// Bracketed array index, e.g. "\[&(1,2)\]"
    Array(ArrayElement),
    /// Literal fragments mixed with references, e.g. "photos-&1"
    Composite(CompositeElement),
    /// Alternatives tried in order on the left-hand side, e.g. "rating|Rating"
    Alternation(Vec<Self>),
}

impl PathElement {
    /// Parses a raw string that must describe exactly one path element, such
    /// as a single key of a left-hand-side spec.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftpath::path::{PathElement, Role};
    /// let element = PathElement::parse("tuna-*-marlin-*", Role::Lhs).unwrap();
    /// assert!(matches!(element, PathElement::Wildcard(ref w) if w.gap_count() == 2));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a [`PathParseError`] if `raw` is malformed or does not
    /// consist of exactly one element.
    pub fn parse(raw: &str, role: Role) -> Result<Self, PathParseError> {
        let mut elements = parse_path(raw, role)?.into_elements();
        match elements.len() {
            1 => elements.pop().ok_or(PathParseError::UnexpectedEndOfInput),
            0 => Err(PathParseError::UnexpectedEndOfInput),
            n => Err(PathParseError::Syntax(format!(
                "Expected a single path element in `{raw}`, found {n}"
            ))),
        }
    }

    /// Helper for ergonomic construction of literal elements
    pub fn literal<T: Into<String>>(key: T) -> Self {
        Self::Literal(key.into())
    }

    /// The number of capture groups a successful match of this element
    /// produces, including group 0.
    #[must_use]
    pub fn capture_count(&self) -> usize {
        match self {
            Self::Wildcard(pattern) => 1 + pattern.gap_count(),
            Self::Array(ArrayElement::Wildcard(pattern)) => {
                1 + pattern.gap_count()
            }
            Self::Alternation(alternatives) => alternatives
                .iter()
                .map(Self::capture_count)
                .min()
                .unwrap_or(1),
            _ => 1,
        }
    }
}

impl Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(key) => write_escaped(f, key),
            Self::Wildcard(pattern) => write!(f, "{pattern}"),
            Self::Array(array) => write!(f, "{array}"),
            Self::Composite(composite) => write!(f, "{composite}"),
            Self::Alternation(alternatives) => {
                for (i, alternative) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_char('|')?;
                    }
                    write!(f, "{alternative}")?;
                }
                Ok(())
            }
        }
    }
}

/// A star pattern: literal anchors with one captured gap between each pair
/// of neighbouring anchors.
///
/// `tuna-*-marlin-*` is stored as the anchors `"tuna-"`, `"-marlin-"`, `""`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WildcardPattern {
    /// Always holds at least two entries
    anchors: Vec<String>,
}

impl WildcardPattern {
    /// Creates a pattern from its anchors.
    ///
    /// # Panics
    ///
    /// Panics if fewer than two anchors are given, as a pattern needs at least
    /// one gap.
    #[must_use]
    pub fn new(anchors: Vec<String>) -> Self {
        assert!(anchors.len() >= 2, "a wildcard pattern needs a gap");
        Self { anchors }
    }

    /// The bare `*` pattern, matching any key.
    #[must_use]
    pub fn any() -> Self {
        Self { anchors: vec![String::new(), String::new()] }
    }

    /// The literal anchors, in order.
    #[must_use]
    pub fn anchors(&self) -> &[String] {
        &self.anchors
    }

    /// Number of wildcard gaps, i.e. number of capture groups besides group 0.
    #[must_use]
    pub fn gap_count(&self) -> usize {
        self.anchors.len() - 1
    }

    /// Returns `true` for the bare `*` pattern.
    #[must_use]
    pub fn is_any(&self) -> bool {
        self.gap_count() == 1 && self.anchors.iter().all(String::is_empty)
    }
}

impl Display for WildcardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, anchor) in self.anchors.iter().enumerate() {
            if i > 0 {
                f.write_char('*')?;
            }
            write_escaped(f, anchor)?;
        }
        Ok(())
    }
}

/// Content of a bracketed path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayElement {
    /// "\[\]": append to the output array; right-hand side only
    Append,
    /// "\[3\]"
    Explicit(usize),
    /// "\[*\]"
    Wildcard(WildcardPattern),
    /// "\[&(1,2)\]"
    Reference(Reference),
}

impl Display for ArrayElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Append => write!(f, "[]"),
            Self::Explicit(index) => write!(f, "[{index}]"),
            Self::Wildcard(pattern) => write!(f, "[{pattern}]"),
            Self::Reference(reference) => write!(f, "[{reference}]"),
        }
    }
}

/// One piece of a [`CompositeElement`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// Literal fragment, copied verbatim
    Text(String),
    /// Back-reference, resolved against the walked path
    Reference(Reference),
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write_escaped(f, text),
            Self::Reference(reference) => write!(f, "{reference}"),
        }
    }
}

/// An ordered mix of literal fragments and references that resolves to a
/// single key, e.g. `photos-&1-bob`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeElement {
    /// Never holds two neighbouring [`Token::Text`] entries
    tokens: Vec<Token>,
}

impl CompositeElement {
    /// Creates a composite from tokens, merging neighbouring text fragments
    /// and dropping empty ones so equal keys have equal token lists.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut merged: Vec<Token> = Vec::with_capacity(tokens.len());
        for token in tokens {
            if let Token::Text(text) = &token {
                if text.is_empty() {
                    continue;
                }
                if let Some(Token::Text(prev)) = merged.last_mut() {
                    prev.push_str(text);
                    continue;
                }
            }
            merged.push(token);
        }
        Self { tokens: merged }
    }

    /// The tokens, in concatenation order.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Iterates over the references of this composite.
    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.tokens.iter().filter_map(|token| match token {
            Token::Reference(reference) => Some(reference),
            Token::Text(_) => None,
        })
    }
}

impl Display for CompositeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tokens.iter().try_for_each(|token| write!(f, "{token}"))
    }
}

/// Returns `true` if `c` has a meaning of its own inside a raw path.
const fn is_reserved(c: char) -> bool {
    matches!(c, '.' | '[' | ']' | '&' | '*' | '|' | '\\')
}

/// Writes literal text, escaping reserved characters with a backslash. This
/// is the inverse of the `escaped` grammar rule.
fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    for c in text.chars() {
        if is_reserved(c) {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_display_escapes_reserved() {
        let element = PathElement::literal("a.b[0]*&|\\");
        assert_eq!(r"a\.b\[0\]\*\&\|\\", element.to_string());
    }

    #[test]
    fn wildcard_display() {
        let pattern = WildcardPattern::new(vec![
            "tuna-".to_string(),
            "-marlin-".to_string(),
            String::new(),
        ]);
        assert_eq!(2, pattern.gap_count());
        assert!(!pattern.is_any());
        assert_eq!("tuna-*-marlin-*", pattern.to_string());
        assert_eq!("*", WildcardPattern::any().to_string());
    }

    #[test]
    #[should_panic(expected = "a wildcard pattern needs a gap")]
    fn wildcard_without_gap() {
        let _ = WildcardPattern::new(vec!["tuna".to_string()]);
    }

    #[test]
    fn composite_merges_text() {
        let composite = CompositeElement::new(vec![
            Token::Text("tuna".to_string()),
            Token::Text("-".to_string()),
            Token::Reference(Reference::new(0, 1)),
            Token::Text(String::new()),
            Token::Text("-marlin".to_string()),
        ]);
        assert_eq!(
            &[
                Token::Text("tuna-".to_string()),
                Token::Reference(Reference::new(0, 1)),
                Token::Text("-marlin".to_string()),
            ],
            composite.tokens()
        );
        assert_eq!("tuna-&(0,1)-marlin", composite.to_string());
        assert_eq!(1, composite.references().count());
    }

    #[test]
    fn array_display() {
        assert_eq!("[]", ArrayElement::Append.to_string());
        assert_eq!("[7]", ArrayElement::Explicit(7).to_string());
        assert_eq!(
            "[*]",
            ArrayElement::Wildcard(WildcardPattern::any()).to_string()
        );
        assert_eq!(
            "[&(2,0)]",
            ArrayElement::Reference(Reference::new(2, 0)).to_string()
        );
    }

    #[test]
    fn alternation_display_and_captures() {
        let element = PathElement::Alternation(vec![
            PathElement::literal("rating"),
            PathElement::Wildcard(WildcardPattern::new(vec![
                "rating-".to_string(),
                String::new(),
            ])),
        ]);
        assert_eq!("rating|rating-*", element.to_string());
        assert_eq!(1, element.capture_count());
    }

    #[test]
    fn parse_single_element() {
        let element = PathElement::parse("rating-*", Role::Lhs).unwrap();
        assert_eq!(2, element.capture_count());

        assert!(matches!(
            PathElement::parse("a.b", Role::Lhs),
            Err(PathParseError::Syntax(_))
        ));
        assert!(matches!(
            PathElement::parse("", Role::Lhs),
            Err(PathParseError::UnexpectedEndOfInput)
        ));
    }
}
