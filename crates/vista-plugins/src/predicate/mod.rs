//! Typed predicates refining data-source applicability.
//!
//! A [`Predicate`] pairs an attribute path with an expected value and a
//! [`PredicateKind`]. Kinds are a closed enum dispatched at evaluation time;
//! nothing is captured at parse time beyond the declared strings.
//!
//! Predicates attached to one data source are OR'd: see [`any_passes`].

use serde::Serialize;
use tracing::debug;

use crate::object::{Attr, DomainObject, TypeRegistry, value_text};

/// The test a predicate performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateKind {
    /// The attribute is an instance of a late-bound type.
    IsInstance,
    /// The attribute exposes the named data provider.
    HasDataprovider,
    /// The attribute has a member with the expected name.
    HasAttribute,
    /// The attribute's text differs from the expected value.
    NotEquals,
    /// The attribute's text equals the expected value.
    Equals,
}

impl PredicateKind {
    /// Parses a configured test type; anything unrecognised means equality.
    #[must_use]
    pub fn from_config(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("isinstance") => Self::IsInstance,
            Some("has_dataprovider") => Self::HasDataprovider,
            Some("has_attribute") => Self::HasAttribute,
            Some("not_eq") => Self::NotEquals,
            _ => Self::Equals,
        }
    }

    /// Returns the configuration spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IsInstance => "isinstance",
            Self::HasDataprovider => "has_dataprovider",
            Self::HasAttribute => "has_attribute",
            Self::NotEquals => "not_eq",
            Self::Equals => "eq",
        }
    }
}

/// How the expected value is interpreted before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedKind {
    /// Compared as text.
    #[default]
    String,
    /// Looked up in the [`TypeRegistry`] at evaluation time.
    Datatype,
}

impl ExpectedKind {
    /// Parses a configured result type; anything but `datatype` is text.
    #[must_use]
    pub fn from_config(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("datatype") => Self::Datatype,
            _ => Self::String,
        }
    }
}

/// Ordered list of member names walked from a candidate object.
///
/// An empty path addresses the candidate itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct AttributePath(Vec<String>);

impl AttributePath {
    /// Parses a dotted path such as `datatype.file_ext`.
    #[must_use]
    pub fn parse(dotted: &str) -> Self {
        Self(
            dotted
                .split('.')
                .map(str::trim)
                .filter(|segment| !segment.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` when the path addresses the candidate itself.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.0.is_empty()
    }

    fn walk<'a>(&self, candidate: &'a dyn DomainObject) -> Option<Target<'a>> {
        let mut segments = self.0.iter();
        let Some(first) = segments.next() else {
            return Some(Target::Root(candidate));
        };
        let mut current = candidate.field(first)?;
        for segment in segments {
            current = current.field(segment)?;
        }
        Some(Target::Attr(current))
    }
}

/// Whatever an attribute path landed on.
enum Target<'a> {
    Root(&'a dyn DomainObject),
    Attr(Attr),
}

impl Target<'_> {
    fn object(&self) -> Option<&dyn DomainObject> {
        match self {
            Target::Root(object) => Some(*object),
            Target::Attr(attr) => attr.as_object(),
        }
    }

    fn has_member(&self, name: &str) -> bool {
        match self {
            Target::Root(object) => object.has_field(name),
            Target::Attr(attr) => attr.field(name).is_some(),
        }
    }

    fn text(&self) -> String {
        match self {
            Target::Root(object) => object.text(),
            Target::Attr(Attr::Value(value)) => value_text(value),
            Target::Attr(attr) => attr.text(),
        }
    }
}

/// Result of evaluating one predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The predicate holds.
    Pass,
    /// The predicate does not hold.
    Fail,
    /// The predicate could not be evaluated; treated as not matching.
    Skipped,
}

/// One declarative test against a candidate object.
///
/// # Example
///
/// ```
/// use vista_plugins::{NoTypes, Record};
/// use vista_plugins::predicate::{AttributePath, ExpectedKind, Predicate, PredicateKind};
///
/// let hda = Record::new("hda").with_value("state", "ok");
/// let test = Predicate::new(
///     PredicateKind::Equals,
///     AttributePath::parse("state"),
///     "ok",
///     ExpectedKind::String,
/// );
/// assert!(test.evaluate(&hda, &NoTypes));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Predicate {
    kind: PredicateKind,
    path: AttributePath,
    expected: String,
    expected_kind: ExpectedKind,
}

impl Predicate {
    /// Creates a predicate.
    #[must_use]
    pub fn new(
        kind: PredicateKind,
        path: AttributePath,
        expected: impl Into<String>,
        expected_kind: ExpectedKind,
    ) -> Self {
        Self {
            kind,
            path,
            expected: expected.into(),
            expected_kind,
        }
    }

    /// Returns the test kind.
    #[must_use]
    pub const fn kind(&self) -> PredicateKind {
        self.kind
    }

    /// Returns the attribute path.
    #[must_use]
    pub const fn path(&self) -> &AttributePath {
        &self.path
    }

    /// Returns the raw expected value.
    #[must_use]
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Returns how the expected value is interpreted.
    #[must_use]
    pub const fn expected_kind(&self) -> ExpectedKind {
        self.expected_kind
    }

    /// Evaluates the predicate, reporting skips separately from failures.
    #[must_use]
    pub fn outcome(&self, candidate: &dyn DomainObject, types: &dyn TypeRegistry) -> Outcome {
        let Some(target) = self.path.walk(candidate) else {
            return Outcome::Fail;
        };
        let holds = match self.kind {
            PredicateKind::IsInstance => {
                let tag = match self.expected_kind {
                    ExpectedKind::Datatype => types.lookup(&self.expected),
                    ExpectedKind::String => None,
                };
                let Some(tag) = tag else {
                    debug!(
                        expected = %self.expected,
                        "skipping isinstance test: type lookup failed"
                    );
                    return Outcome::Skipped;
                };
                target
                    .object()
                    .is_some_and(|object| object.is_instance_of(&tag))
            }
            PredicateKind::HasDataprovider => target
                .object()
                .and_then(|object| object.has_dataprovider(&self.expected))
                .unwrap_or(false),
            PredicateKind::HasAttribute => target.has_member(&self.expected),
            PredicateKind::NotEquals => target.text() != self.expected,
            PredicateKind::Equals => target.text() == self.expected,
        };
        if holds { Outcome::Pass } else { Outcome::Fail }
    }

    /// Returns `true` only when the predicate passes.
    #[must_use]
    pub fn evaluate(&self, candidate: &dyn DomainObject, types: &dyn TypeRegistry) -> bool {
        self.outcome(candidate, types) == Outcome::Pass
    }
}

/// OR-combines predicates; the first passing test short-circuits.
///
/// An empty list is vacuously satisfied.
#[must_use]
pub fn any_passes(
    predicates: &[Predicate],
    candidate: &dyn DomainObject,
    types: &dyn TypeRegistry,
) -> bool {
    predicates.is_empty()
        || predicates
            .iter()
            .any(|predicate| predicate.evaluate(candidate, types))
}
