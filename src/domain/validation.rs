//! Error-accumulating validation results.
//!
//! `Validated` keeps every field violation when independent checks are
//! combined with [`Applicative::map2`] / [`Applicative::map3`], where
//! `Result` would stop at the first one.
//!
//! # Examples
//!
//! ```rust
//! use reward_tasks::domain::validation::Validated;
//! use lambars::typeclass::Applicative;
//!
//! let name: Validated<String> = Validated::invalid("name", "name cannot be empty");
//! let clicks: Validated<u32> = Validated::invalid("total_clicks", "total_clicks must be positive");
//!
//! let combined = name.map2(clicks, |name, clicks| (name, clicks));
//! assert_eq!(combined.errors().len(), 2);
//! ```

use std::fmt;

use lambars::typeclass::{Applicative, Functor, Semigroup, TypeConstructor};

use crate::domain::errors::DomainError;

/// One violated rule on one request field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Request field the rule applies to.
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

/// Every violation collected from a request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldViolations(Vec<FieldViolation>);

impl FieldViolations {
    /// A collection holding one violation.
    #[must_use]
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self(vec![FieldViolation {
            field,
            message: message.into(),
        }])
    }

    /// Number of violations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was violated.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the violations in check order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldViolation> {
        self.0.iter()
    }

    /// Names of the violated fields, in check order.
    #[must_use]
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|violation| violation.field).collect()
    }
}

impl Semigroup for FieldViolations {
    fn combine(mut self, mut other: Self) -> Self {
        self.0.append(&mut other.0);
        self
    }
}

impl fmt::Display for FieldViolations {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        formatter.write_str(&messages.join("; "))
    }
}

impl From<FieldViolations> for DomainError {
    fn from(violations: FieldViolations) -> Self {
        Self::Validation(violations.to_string())
    }
}

/// Either a checked value or the violations that prevented it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validated<A> {
    /// The check passed.
    Valid(A),
    /// One or more rules failed.
    Invalid(FieldViolations),
}

impl<A> Validated<A> {
    /// A passed check.
    #[must_use]
    pub const fn valid(value: A) -> Self {
        Self::Valid(value)
    }

    /// A failed check on `field`.
    #[must_use]
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid(FieldViolations::single(field, message))
    }

    /// Whether the check passed.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Collected violations; empty when valid.
    #[must_use]
    pub fn errors(&self) -> FieldViolations {
        match self {
            Self::Valid(_) => FieldViolations::default(),
            Self::Invalid(violations) => violations.clone(),
        }
    }

    /// Continues with a check that needs the validated value.
    ///
    /// Unlike `map2`, this stops at the first failure: the second check
    /// only makes sense once the first passed.
    #[must_use]
    pub fn and_then<B, F>(self, function: F) -> Validated<B>
    where
        F: FnOnce(A) -> Validated<B>,
    {
        match self {
            Self::Valid(value) => function(value),
            Self::Invalid(violations) => Validated::Invalid(violations),
        }
    }

    /// Converts into a `Result` carrying a `DomainError::Validation`.
    ///
    /// # Errors
    ///
    /// Returns every collected violation joined into one message.
    pub fn into_domain(self) -> Result<A, DomainError> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Invalid(violations) => Err(violations.into()),
        }
    }
}

impl<A> TypeConstructor for Validated<A> {
    type Inner = A;
    type WithType<B> = Validated<B>;
}

impl<A> Functor for Validated<A> {
    fn fmap<B, F>(self, function: F) -> Validated<B>
    where
        F: FnOnce(A) -> B + 'static,
        B: 'static,
    {
        match self {
            Self::Valid(value) => Validated::Valid(function(value)),
            Self::Invalid(violations) => Validated::Invalid(violations),
        }
    }

    fn fmap_ref<B, F>(&self, function: F) -> Validated<B>
    where
        F: FnOnce(&A) -> B + 'static,
        B: 'static,
    {
        match self {
            Self::Valid(value) => Validated::Valid(function(value)),
            Self::Invalid(violations) => Validated::Invalid(violations.clone()),
        }
    }
}

impl<A> Applicative for Validated<A> {
    fn pure<B>(value: B) -> Validated<B> {
        Validated::Valid(value)
    }

    fn map2<B, C, F>(self, other: Validated<B>, function: F) -> Validated<C>
    where
        F: FnOnce(A, B) -> C,
    {
        match (self, other) {
            (Self::Valid(first), Validated::Valid(second)) => {
                Validated::Valid(function(first, second))
            }
            (Self::Invalid(first), Validated::Invalid(second)) => {
                Validated::Invalid(first.combine(second))
            }
            (Self::Invalid(violations), Validated::Valid(_))
            | (Self::Valid(_), Validated::Invalid(violations)) => Validated::Invalid(violations),
        }
    }

    fn map3<B, C, D, F>(self, second: Validated<B>, third: Validated<C>, function: F) -> Validated<D>
    where
        F: FnOnce(A, B, C) -> D,
    {
        self.map2(second, |first, second| (first, second))
            .map2(third, |(first, second), third| function(first, second, third))
    }

    fn apply<B, Output>(self, other: Validated<B>) -> Validated<Output>
    where
        A: FnOnce(B) -> Output,
    {
        self.map2(other, |function, value| function(value))
    }
}
