/*!
# Walked Path

The stack of matches made from the root of a tree walk down to the current
key. References resolve against it by counting back from the most recent
step.

A walker pushes one step per level it descends into and must pop it again
before visiting the next sibling. [`WalkedPath::scope`] and
[`WalkedPath::enter`] return a [`StepGuard`] that does the pop when dropped,
so early returns cannot leave a stale step behind:

```
use shiftpath::path::{PathElement, Role, WalkedPath};

let element = PathElement::parse("rating-*", Role::Lhs).unwrap();
let mut walked = WalkedPath::new();

if let Some(step) = walked.enter(&element, "rating-BBB") {
    assert_eq!(1, step.len());
    assert_eq!(Some("BBB"), step.resolve(0).unwrap().matched().capture(1));
}
assert!(walked.is_empty());

// No match, nothing pushed
assert!(walked.enter(&element, "other").is_none());
assert!(walked.is_empty());
```
*/
use std::ops::{Deref, DerefMut};

use crate::path::{EvaluationError, Matchable, MatchedElement, PathElement};

/// One level of a tree walk: the spec element used at that level, if any,
/// and what it matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedStep<'a> {
    /// Spec element that produced the match
    element: Option<&'a PathElement>,
    /// Match result for the walked key
    matched: MatchedElement,
}

impl<'a> WalkedStep<'a> {
    /// The spec element that produced this step, if the walker recorded one.
    #[must_use]
    pub const fn element(&self) -> Option<&'a PathElement> {
        self.element
    }

    /// The match result of this step.
    #[must_use]
    pub const fn matched(&self) -> &MatchedElement {
        &self.matched
    }
}

/// Ancestor chain of a single tree walk, root first.
///
/// Borrows the spec elements it records, so a walked path never outlives the
/// parsed spec it was built from. It is owned by one walk and handed down by
/// mutable reference as the walk recurses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkedPath<'a> {
    steps: Vec<WalkedStep<'a>>,
}

impl<'a> WalkedPath<'a> {
    /// Creates an empty walked path.
    #[must_use]
    pub const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Number of steps on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if no step has been pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterates over the steps, root first.
    pub fn iter(&self) -> impl Iterator<Item = &WalkedStep<'a>> {
        self.steps.iter()
    }

    /// Appends a step for the level being descended into.
    pub fn push(
        &mut self,
        element: Option<&'a PathElement>,
        matched: MatchedElement,
    ) {
        self.steps.push(WalkedStep { element, matched });
    }

    /// Removes and returns the most recent step.
    pub fn pop(&mut self) -> Option<WalkedStep<'a>> {
        self.steps.pop()
    }

    /// Returns the step `depth` levels up from the most recent one, which is
    /// at depth `0`.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::OutOfRange`] if `depth` is not smaller than
    /// the length of the path.
    pub fn resolve(
        &self,
        depth: usize,
    ) -> Result<&WalkedStep<'a>, EvaluationError> {
        let len = self.steps.len();
        depth
            .checked_add(1)
            .and_then(|distance| len.checked_sub(distance))
            .and_then(|index| self.steps.get(index))
            .ok_or(EvaluationError::OutOfRange { depth, len })
    }

    /// Pushes a step and returns a guard that truncates the path back to its
    /// current length when dropped.
    pub fn scope<'w>(
        &'w mut self,
        element: Option<&'a PathElement>,
        matched: MatchedElement,
    ) -> StepGuard<'w, 'a> {
        let base = self.steps.len();
        self.push(element, matched);
        StepGuard { walked: self, base }
    }

    /// Matches `key` against `element` and, on success, pushes the result as
    /// a scoped step. Nothing is pushed when the key does not match.
    pub fn enter<'w>(
        &'w mut self,
        element: &'a PathElement,
        key: &str,
    ) -> Option<StepGuard<'w, 'a>> {
        let matched = element.match_key(key, self)?;
        Some(self.scope(Some(element), matched))
    }
}

/// Scoped step on a [`WalkedPath`]; dereferences to the path and restores its
/// previous length on drop.
#[derive(Debug)]
pub struct StepGuard<'w, 'a> {
    walked: &'w mut WalkedPath<'a>,
    /// Length of the path before the guarded push
    base: usize,
}

impl<'a> Deref for StepGuard<'_, 'a> {
    type Target = WalkedPath<'a>;

    fn deref(&self) -> &Self::Target {
        self.walked
    }
}

impl DerefMut for StepGuard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.walked
    }
}

impl Drop for StepGuard<'_, '_> {
    fn drop(&mut self) {
        self.walked.steps.truncate(self.base);
    }
}
