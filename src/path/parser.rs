/*!
# Path Parser

Parser for converting raw path strings into [`ParsedPath`] objects.

## Examples

This module exposes the public API method [`parse_path`] that compiles a raw
path once, so the result can be reused for every key of a tree walk:

```rust
use shiftpath::path::{PathElement, Role, parser};
let parsed = parser::parse_path("tuna[&(1,1)].marlin", Role::Rhs)
    .expect("Invalid path string");
assert_eq!(3, parsed.len());
assert!(matches!(parsed[1], PathElement::Array(_)));
assert_eq!("tuna.[&(1,1)].marlin", parsed.to_string());
```

Which syntax a key segment uses is decided by its content: `*` makes a
wildcard, `&` makes a composite, `|` separates alternatives and anything else
is a literal. A backslash escapes the following character.

## Errors

If the input path string is invalid, [`parse_path`] returns a
[`PathParseError`] describing how the parsing failed:

```rust
use shiftpath::path::{Role, parser::{self, PathParseError}};

let result = parser::parse_path("tuna[&(1,1)", Role::Rhs);
assert!(matches!(result, Err(PathParseError::Syntax(_))));

let result = parser::parse_path("tuna-*-&1", Role::Lhs);
assert!(matches!(result, Err(PathParseError::MixedSyntax(_))));
```

## See Also

- [`PathElement`]: The enum representing one parsed segment.
- [`PathParseError`]: The error type for failed path parses.
*/

use log::trace;
use pest::{Parser, iterators::Pair};
use pest_derive::Parser;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

use crate::path::{
    ArrayElement, CompositeElement, ParsedPath, PathElement, Reference, Token,
    WildcardPattern,
};

/// Parser for turning raw path strings into [`ParsedPath`] objects.
#[derive(Parser)]
#[grammar = "path/grammar/path.pest"]
pub struct PathSpecParser;

/// Which side of a transform rule a path is written for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Matching side; allows alternation with `|`
    Lhs,
    /// Output side; allows the `[]` append marker
    Rhs,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lhs => write!(f, "left-hand side"),
            Self::Rhs => write!(f, "right-hand side"),
        }
    }
}

/// Represents errors that can occur while parsing a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// The input does not follow the path grammar, e.g. unbalanced brackets
    /// or an empty segment.
    Syntax(String),
    /// A reference token is malformed, e.g. its numbers overflow.
    InvalidReference(String),
    /// A segment mixes syntaxes that cannot be combined, e.g. `*` and `&`.
    MixedSyntax(String),
    /// An array segment holds something other than an index, a wildcard or
    /// a reference.
    InvalidIndex(String),
    /// The syntax is only meaningful on the other side of a rule.
    RoleMismatch(String),
    /// The input ended unexpectedly.
    UnexpectedEndOfInput,
}

impl Error for PathParseError {}

impl fmt::Display for PathParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(msg) => write!(f, "Invalid path syntax: {msg}"),
            Self::InvalidReference(reference) => {
                write!(f, "Invalid reference: {reference}")
            }
            Self::MixedSyntax(segment) => {
                write!(f, "Cannot mix `*` with `&` in segment: {segment}")
            }
            Self::InvalidIndex(index) => {
                write!(f, "Invalid array index: {index}")
            }
            Self::RoleMismatch(msg) => write!(f, "{msg}"),
            Self::UnexpectedEndOfInput => {
                write!(f, "Unexpected end of input")
            }
        }
    }
}

/// Parse an input path string into a [`ParsedPath`] for the given `role`.
///
/// # Errors
///
/// Returns a [`PathParseError`] describing how the parsing failed.
pub fn parse_path(
    input: &str,
    role: Role,
) -> Result<ParsedPath, PathParseError> {
    let mut pairs = PathSpecParser::parse(Rule::path, input)
        .map_err(|e| PathParseError::Syntax(e.to_string()))?;

    let path = pairs.next().ok_or(PathParseError::UnexpectedEndOfInput)?;

    let elements = path
        .into_inner()
        .filter(|pair| pair.as_rule() != Rule::EOI)
        .map(|pair| parse_element(pair, role))
        .collect::<Result<Vec<PathElement>, _>>()?;

    let parsed = ParsedPath::new(role, elements);
    trace!("parsed {role} path {input:?} as `{parsed}`");

    Ok(parsed)
}

/// Parse a standalone reference token such as `&`, `&2` or `&(2,1)`.
pub(crate) fn parse_reference(
    input: &str,
) -> Result<Reference, PathParseError> {
    let mut pairs = PathSpecParser::parse(Rule::single_reference, input)
        .map_err(|e| PathParseError::Syntax(e.to_string()))?;

    let reference = pairs
        .next()
        .and_then(|pair| pair.into_inner().next())
        .ok_or(PathParseError::UnexpectedEndOfInput)?;
    parse_reference_pair(reference)
}

/// Parse one segment of a path, either a key or an array.
fn parse_element(
    pair: Pair<'_, Rule>,
    role: Role,
) -> Result<PathElement, PathParseError> {
    match pair.as_rule() {
        Rule::key => parse_key(pair, role),
        Rule::array => parse_array(pair, role),
        rule => Err(PathParseError::Syntax(format!(
            "Expected key or array rule, got {rule:?}"
        ))),
    }
}

/// Parse a key rule, which is one or more `|` separated alternatives.
fn parse_key(
    pair: Pair<'_, Rule>,
    role: Role,
) -> Result<PathElement, PathParseError> {
    let raw = pair.as_str();
    let mut alternatives = pair
        .into_inner()
        .map(parse_alternative)
        .collect::<Result<Vec<PathElement>, _>>()?;

    match alternatives.len() {
        0 => Err(PathParseError::UnexpectedEndOfInput),
        1 => alternatives.pop().ok_or(PathParseError::UnexpectedEndOfInput),
        _ if role == Role::Rhs => Err(PathParseError::RoleMismatch(format!(
            "Alternation `{raw}` is only allowed on the {}; escape `|` to \
             use it literally",
            Role::Lhs
        ))),
        _ => Ok(PathElement::Alternation(alternatives)),
    }
}

/// Parse a single alternative into a literal, wildcard or composite element.
fn parse_alternative(
    pair: Pair<'_, Rule>,
) -> Result<PathElement, PathParseError> {
    if pair.as_rule() != Rule::alternative {
        return Err(PathParseError::Syntax(format!(
            "Expected alternative rule, got {:?}",
            pair.as_rule()
        )));
    }

    let raw = pair.as_str();
    // Text between stars, used if this turns out to be a wildcard
    let mut anchors = vec![String::new()];
    // Text and references, used if this turns out to be a composite
    let mut tokens: Vec<Token> = vec![];
    let mut has_reference = false;

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::text | Rule::escaped => {
                let text = unescape(part.as_str());
                if let Some(anchor) = anchors.last_mut() {
                    anchor.push_str(&text);
                }
                tokens.push(Token::Text(text));
            }
            Rule::star => anchors.push(String::new()),
            Rule::reference => {
                has_reference = true;
                tokens.push(Token::Reference(parse_reference_pair(part)?));
            }
            rule => {
                return Err(PathParseError::Syntax(format!(
                    "Unexpected part of key: {rule:?}"
                )));
            }
        }
    }

    match (anchors.len() > 1, has_reference) {
        (true, true) => Err(PathParseError::MixedSyntax(raw.to_string())),
        (true, false) => {
            Ok(PathElement::Wildcard(WildcardPattern::new(anchors)))
        }
        (false, true) => {
            Ok(PathElement::Composite(CompositeElement::new(tokens)))
        }
        (false, false) => Ok(PathElement::Literal(anchors.concat())),
    }
}

/// Parse an array rule into a [`PathElement::Array`].
fn parse_array(
    pair: Pair<'_, Rule>,
    role: Role,
) -> Result<PathElement, PathParseError> {
    let raw = pair.as_str();
    let array = match pair.into_inner().next() {
        None if role == Role::Lhs => {
            return Err(PathParseError::RoleMismatch(format!(
                "Append marker `{raw}` is only allowed on the {}",
                Role::Rhs
            )));
        }
        None => ArrayElement::Append,
        Some(inner) => match inner.as_rule() {
            Rule::reference => {
                ArrayElement::Reference(parse_reference_pair(inner)?)
            }
            Rule::index_pattern => parse_index_pattern(inner)?,
            rule => {
                return Err(PathParseError::Syntax(format!(
                    "Unexpected array content: {rule:?}"
                )));
            }
        },
    };

    Ok(PathElement::Array(array))
}

/// Parse the content of brackets that is not a reference: either an explicit
/// index or a wildcard pattern.
fn parse_index_pattern(
    pair: Pair<'_, Rule>,
) -> Result<ArrayElement, PathParseError> {
    let raw = pair.as_str();
    let mut anchors = vec![String::new()];

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::star => anchors.push(String::new()),
            _ => {
                if let Some(anchor) = anchors.last_mut() {
                    anchor.push_str(&unescape(part.as_str()));
                }
            }
        }
    }

    if anchors.len() > 1 {
        return Ok(ArrayElement::Wildcard(WildcardPattern::new(anchors)));
    }

    let index = anchors.concat();
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PathParseError::InvalidIndex(raw.to_string()));
    }
    index
        .parse::<usize>()
        .map(ArrayElement::Explicit)
        .map_err(|_| PathParseError::InvalidIndex(raw.to_string()))
}

/// Parse a reference rule into a canonical [`Reference`].
fn parse_reference_pair(
    pair: Pair<'_, Rule>,
) -> Result<Reference, PathParseError> {
    if pair.as_rule() != Rule::reference {
        return Err(PathParseError::Syntax(format!(
            "Expected reference rule, got {:?}",
            pair.as_rule()
        )));
    }

    let raw = pair.as_str();
    let Some(inner) = pair.into_inner().next() else {
        // Bare `&`
        return Ok(Reference::new(0, 0));
    };

    let mut numbers = inner.clone().into_inner().map(|number| {
        number
            .as_str()
            .parse::<usize>()
            .map_err(|_| PathParseError::InvalidReference(raw.to_string()))
    });

    match inner.as_rule() {
        Rule::reference_depth => {
            let depth = numbers
                .next()
                .ok_or(PathParseError::UnexpectedEndOfInput)??;
            Ok(Reference::new(depth, 0))
        }
        Rule::reference_pair => {
            let depth = numbers
                .next()
                .ok_or(PathParseError::UnexpectedEndOfInput)??;
            let group = numbers
                .next()
                .ok_or(PathParseError::UnexpectedEndOfInput)??;
            Ok(Reference::new(depth, group))
        }
        _ => Err(PathParseError::InvalidReference(raw.to_string())),
    }
}

/// Strip backslash escapes from a `text` or `escaped` match.
fn unescape(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                result.push(escaped);
            }
        } else {
            result.push(c);
        }
    }
    result
}
