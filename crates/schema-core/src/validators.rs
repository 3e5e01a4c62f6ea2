//! Declarative validators attached to schema types.
//!
//! Validators are facts the strategy layer reads: range and length bounds,
//! allowed or forbidden values, uniqueness keys, per-item checks, patterns and
//! arbitrary predicates. Every validator can also check a value directly via
//! [`Validator::validate`], which is the fallback used for rejection filtering.

use crate::values::{Context, Value};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Error returned when a value fails a validator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Value is outside the declared range
    #[error("Value {value} is out of range")]
    OutOfRange { value: String },

    /// Value length is outside the declared bounds
    #[error("Length {length} is not within the allowed bounds")]
    InvalidLength { length: usize },

    /// Value is not one of the allowed choices
    #[error("Value {value} is not one of the allowed choices")]
    NotAllowed { value: String },

    /// Value is one of the forbidden choices
    #[error("Value {value} is not allowed")]
    Forbidden { value: String },

    /// Sequence contains items with the same key
    #[error("Items are not unique")]
    Duplicate,

    /// String does not match the declared pattern
    #[error("Value does not match pattern {pattern}")]
    PatternMismatch { pattern: String },

    /// Predicate returned false
    #[error("Predicate rejected the value")]
    PredicateFailed,

    /// Value kind cannot be checked by this validator
    #[error("Cannot apply {validator} validator to a {found} value")]
    TypeMismatch {
        validator: ValidatorKind,
        found: &'static str,
    },

    /// Failure reported by a custom check
    #[error("{0}")]
    Custom(String),
}

/// Kind of a validator, used to decide which validators a conversion rule
/// handles structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidatorKind {
    Range,
    Length,
    AnyOf,
    NoneOf,
    Unique,
    Each,
    Regexp,
    Predicate,
    Custom,
}

impl fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Range => "range",
            Self::Length => "length",
            Self::AnyOf => "any_of",
            Self::NoneOf => "none_of",
            Self::Unique => "unique",
            Self::Each => "each",
            Self::Regexp => "regexp",
            Self::Predicate => "predicate",
            Self::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Boolean check over a value and the conversion context.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&Value, &Context) -> bool + Send + Sync>);

impl Predicate {
    pub fn new(f: impl Fn(&Value, &Context) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, value: &Value, context: &Context) -> bool {
        (self.0)(value, context)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// Key extractor for uniqueness checks.
#[derive(Clone)]
pub struct KeyFn(Arc<dyn Fn(&Value) -> Value + Send + Sync>);

impl KeyFn {
    pub fn new(f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn key(&self, value: &Value) -> Value {
        (self.0)(value)
    }
}

impl fmt::Debug for KeyFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyFn(..)")
    }
}

/// Named check that reports its own failures.
#[derive(Clone)]
pub struct Check {
    name: String,
    check: Arc<dyn Fn(&Value, &Context) -> Result<(), ValidationError> + Send + Sync>,
}

impl Check {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check").field("name", &self.name).finish()
    }
}

/// Declarative constraint attached to a schema type.
#[derive(Debug, Clone)]
pub enum Validator {
    /// Inclusive bounds on comparable values
    Range {
        min: Option<Value>,
        max: Option<Value>,
    },

    /// Bounds on the length of strings, sequences and mappings.
    /// `exact` acts as both lower and upper bound.
    Length {
        min: Option<usize>,
        max: Option<usize>,
        exact: Option<usize>,
    },

    /// Value must be one of the choices
    AnyOf(Vec<Value>),

    /// Value must not be one of the choices
    NoneOf(Vec<Value>),

    /// Sequence items must be unique, optionally by a derived key
    Unique(Option<KeyFn>),

    /// Every sequence item must pass all sub-validators
    Each(Vec<Validator>),

    /// String must match the pattern
    Regexp(Regex),

    /// Arbitrary boolean predicate
    Predicate(Predicate),

    /// Arbitrary check with its own error reporting
    Custom(Check),
}

impl Validator {
    /// Inclusive range with both bounds.
    pub fn range(min: impl Into<Value>, max: impl Into<Value>) -> Self {
        Self::Range {
            min: Some(min.into()),
            max: Some(max.into()),
        }
    }

    /// Inclusive lower bound.
    pub fn min(min: impl Into<Value>) -> Self {
        Self::Range {
            min: Some(min.into()),
            max: None,
        }
    }

    /// Inclusive upper bound.
    pub fn max(max: impl Into<Value>) -> Self {
        Self::Range {
            min: None,
            max: Some(max.into()),
        }
    }

    /// Length between `min` and `max`, inclusive.
    pub fn length(min: usize, max: usize) -> Self {
        Self::Length {
            min: Some(min),
            max: Some(max),
            exact: None,
        }
    }

    pub fn min_length(min: usize) -> Self {
        Self::Length {
            min: Some(min),
            max: None,
            exact: None,
        }
    }

    pub fn max_length(max: usize) -> Self {
        Self::Length {
            min: None,
            max: Some(max),
            exact: None,
        }
    }

    pub fn exact_length(exact: usize) -> Self {
        Self::Length {
            min: None,
            max: None,
            exact: Some(exact),
        }
    }

    pub fn any_of<I, V>(choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::AnyOf(choices.into_iter().map(Into::into).collect())
    }

    pub fn none_of<I, V>(choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::NoneOf(choices.into_iter().map(Into::into).collect())
    }

    /// Items must be pairwise distinct.
    pub fn unique() -> Self {
        Self::Unique(None)
    }

    /// Items must have pairwise distinct keys.
    pub fn unique_by(key: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Self::Unique(Some(KeyFn::new(key)))
    }

    pub fn each(validators: Vec<Validator>) -> Self {
        Self::Each(validators)
    }

    /// Pattern validator. Fails if the pattern does not compile.
    pub fn regexp(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::Regexp(Regex::new(pattern)?))
    }

    pub fn predicate(f: impl Fn(&Value, &Context) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Predicate::new(f))
    }

    pub fn custom(
        name: impl Into<String>,
        check: impl Fn(&Value, &Context) -> Result<(), ValidationError> + Send + Sync + 'static,
    ) -> Self {
        Self::Custom(Check {
            name: name.into(),
            check: Arc::new(check),
        })
    }

    pub fn kind(&self) -> ValidatorKind {
        match self {
            Self::Range { .. } => ValidatorKind::Range,
            Self::Length { .. } => ValidatorKind::Length,
            Self::AnyOf(_) => ValidatorKind::AnyOf,
            Self::NoneOf(_) => ValidatorKind::NoneOf,
            Self::Unique(_) => ValidatorKind::Unique,
            Self::Each(_) => ValidatorKind::Each,
            Self::Regexp(_) => ValidatorKind::Regexp,
            Self::Predicate(_) => ValidatorKind::Predicate,
            Self::Custom(_) => ValidatorKind::Custom,
        }
    }

    /// Check a value against this validator.
    pub fn validate(&self, value: &Value, context: &Context) -> Result<(), ValidationError> {
        match self {
            Self::Range { min, max } => {
                let below = min
                    .as_ref()
                    .map(|min| !matches!(value.compare(min), Some(Ordering::Greater | Ordering::Equal)));
                let above = max
                    .as_ref()
                    .map(|max| !matches!(value.compare(max), Some(Ordering::Less | Ordering::Equal)));
                if below == Some(true) || above == Some(true) {
                    return Err(ValidationError::OutOfRange {
                        value: format!("{value:?}"),
                    });
                }
                Ok(())
            }

            Self::Length { min, max, exact } => {
                let length = value.len().ok_or(ValidationError::TypeMismatch {
                    validator: ValidatorKind::Length,
                    found: value.kind_name(),
                })?;
                let too_short = exact.or(*min).is_some_and(|min| length < min);
                let too_long = exact.or(*max).is_some_and(|max| length > max);
                if too_short || too_long {
                    return Err(ValidationError::InvalidLength { length });
                }
                Ok(())
            }

            Self::AnyOf(choices) => {
                if choices.contains(value) {
                    Ok(())
                } else {
                    Err(ValidationError::NotAllowed {
                        value: format!("{value:?}"),
                    })
                }
            }

            Self::NoneOf(choices) => {
                if choices.contains(value) {
                    Err(ValidationError::Forbidden {
                        value: format!("{value:?}"),
                    })
                } else {
                    Ok(())
                }
            }

            Self::Unique(key) => {
                let items = value.as_items().ok_or(ValidationError::TypeMismatch {
                    validator: ValidatorKind::Unique,
                    found: value.kind_name(),
                })?;
                let mut seen: Vec<Value> = Vec::with_capacity(items.len());
                for item in items {
                    let item_key = key.as_ref().map_or_else(|| item.clone(), |k| k.key(item));
                    if seen.contains(&item_key) {
                        return Err(ValidationError::Duplicate);
                    }
                    seen.push(item_key);
                }
                Ok(())
            }

            Self::Each(validators) => {
                let items = value.as_items().ok_or(ValidationError::TypeMismatch {
                    validator: ValidatorKind::Each,
                    found: value.kind_name(),
                })?;
                for item in items {
                    for validator in validators {
                        validator.validate(item, context)?;
                    }
                }
                Ok(())
            }

            Self::Regexp(regex) => {
                let s = value.as_str().ok_or(ValidationError::TypeMismatch {
                    validator: ValidatorKind::Regexp,
                    found: value.kind_name(),
                })?;
                if regex.is_match(s) {
                    Ok(())
                } else {
                    Err(ValidationError::PatternMismatch {
                        pattern: regex.as_str().to_string(),
                    })
                }
            }

            Self::Predicate(predicate) => {
                if predicate.call(value, context) {
                    Ok(())
                } else {
                    Err(ValidationError::PredicateFailed)
                }
            }

            Self::Custom(check) => (check.check)(value, context),
        }
    }
}
