//! Constraint handling shared by the registry and the built-in rules.
//!
//! Combining overlapping validators follows one policy: the tightest lower
//! bound and the tightest upper bound win, and an `exact` length counts as
//! both. Validators without a structural translation are applied as
//! rejection filters by [`apply_validators`].

use crate::error::ConversionError;
use crate::ValueStrategy;
use proptest::prelude::*;
use schema_core::{Context, KeyFn, SchemaType, Validator, Value};
use std::cmp::Ordering;
use tracing::trace;

/// Wrap `strategy` in one rejection filter per validator.
///
/// Predicate validators filter on the predicate directly; every other kind
/// accepts a value when [`Validator::validate`] succeeds.
pub fn apply_validators<'a>(
    strategy: ValueStrategy,
    validators: impl IntoIterator<Item = &'a Validator>,
    context: &Context,
) -> ValueStrategy {
    let mut strategy = strategy;
    for validator in validators {
        trace!(validator = %validator.kind(), "applying validator as filter");
        let whence = format!("{} validator", validator.kind());
        let context = context.clone();
        strategy = match validator.clone() {
            Validator::Predicate(predicate) => strategy
                .prop_filter(whence, move |value| predicate.call(value, &context))
                .boxed(),
            other => strategy
                .prop_filter(whence, move |value| other.validate(value, &context).is_ok())
                .boxed(),
        };
    }
    strategy
}

/// Strategy that never produces a value.
pub fn nothing(whence: &'static str) -> ValueStrategy {
    Just(Value::Null).prop_filter(whence, |_| false).boxed()
}

/// Intersect the choices of every `AnyOf` validator.
///
/// Returns `None` when there is no membership validator. The order of the
/// first validator's choices is preserved and duplicates are dropped.
pub fn allowed_values(validators: &[Validator]) -> Option<Vec<Value>> {
    let mut choice_sets = validators.iter().filter_map(|validator| match validator {
        Validator::AnyOf(choices) => Some(choices),
        _ => None,
    });

    let first = choice_sets.next()?;
    let mut allowed: Vec<Value> = Vec::with_capacity(first.len());
    for choice in first {
        if !allowed.contains(choice) {
            allowed.push(choice.clone());
        }
    }
    for choices in choice_sets {
        allowed.retain(|value| choices.contains(value));
    }
    Some(allowed)
}

/// Effective length bounds of a sized type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LengthBounds {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl LengthBounds {
    /// Concrete inclusive size range. A missing maximum becomes
    /// `min + default_span`.
    pub fn resolve(&self, default_span: usize) -> (usize, usize) {
        let min = self.min.unwrap_or(0);
        let max = self.max.unwrap_or_else(|| min.saturating_add(default_span));
        (min, max)
    }
}

/// Combine every `Length` validator attached to `ty`.
pub fn length_bounds(ty: &SchemaType) -> Result<LengthBounds, ConversionError> {
    let mut bounds = LengthBounds::default();
    for validator in ty.validators() {
        if let Validator::Length { min, max, exact } = validator {
            if let Some(lower) = exact.or(*min) {
                bounds.min = Some(bounds.min.map_or(lower, |current| current.max(lower)));
            }
            if let Some(upper) = exact.or(*max) {
                bounds.max = Some(bounds.max.map_or(upper, |current| current.min(upper)));
            }
        }
    }

    if let (Some(min), Some(max)) = (bounds.min, bounds.max) {
        if min > max {
            return Err(ConversionError::invalid_settings(
                ty,
                "length",
                format!("min {min} > max {max}"),
            ));
        }
    }
    Ok(bounds)
}

/// Effective range bounds of a comparable type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeBounds {
    pub min: Option<Value>,
    pub max: Option<Value>,
}

/// Combine every `Range` validator attached to `ty`.
pub fn range_bounds(ty: &SchemaType) -> Result<RangeBounds, ConversionError> {
    let incomparable = |a: &Value, b: &Value| {
        ConversionError::invalid_settings(
            ty,
            "range",
            format!("cannot compare {} with {}", a.kind_name(), b.kind_name()),
        )
    };

    let mut bounds = RangeBounds::default();
    for validator in ty.validators() {
        if let Validator::Range { min, max } = validator {
            if let Some(lower) = min {
                bounds.min = Some(match bounds.min.take() {
                    None => lower.clone(),
                    Some(current) => match current.compare(lower) {
                        Some(Ordering::Less) => lower.clone(),
                        Some(_) => current,
                        None => return Err(incomparable(&current, lower)),
                    },
                });
            }
            if let Some(upper) = max {
                bounds.max = Some(match bounds.max.take() {
                    None => upper.clone(),
                    Some(current) => match current.compare(upper) {
                        Some(Ordering::Greater) => upper.clone(),
                        Some(_) => current,
                        None => return Err(incomparable(&current, upper)),
                    },
                });
            }
        }
    }

    if let (Some(min), Some(max)) = (&bounds.min, &bounds.max) {
        match min.compare(max) {
            Some(Ordering::Greater) => {
                return Err(ConversionError::invalid_settings(
                    ty,
                    "range",
                    format!("min {min:?} > max {max:?}"),
                ));
            }
            None => return Err(incomparable(min, max)),
            Some(_) => {}
        }
    }
    Ok(bounds)
}

/// Uniqueness requirement of a sequence type.
#[derive(Debug, Clone)]
pub enum Uniqueness {
    /// Items must be pairwise distinct
    Items,
    /// Item keys must be pairwise distinct
    Key(KeyFn),
}

impl Uniqueness {
    fn key(&self, item: &Value) -> Value {
        match self {
            Self::Items => item.clone(),
            Self::Key(key) => key.key(item),
        }
    }

    /// Keep the first item for every key.
    pub fn dedup(&self, items: Vec<Value>) -> Vec<Value> {
        let mut seen: Vec<Value> = Vec::with_capacity(items.len());
        items
            .into_iter()
            .filter(|item| {
                let key = self.key(item);
                if seen.contains(&key) {
                    false
                } else {
                    seen.push(key);
                    true
                }
            })
            .collect()
    }
}

/// Uniqueness requirements of every `Unique` validator, in declaration order.
pub fn uniqueness(ty: &SchemaType) -> Vec<Uniqueness> {
    ty.validators()
        .iter()
        .filter_map(|validator| match validator {
            Validator::Unique(key) => Some(key.clone().map_or(Uniqueness::Items, Uniqueness::Key)),
            _ => None,
        })
        .collect()
}

/// Sub-validators of every `Each` validator, in declaration order.
pub fn item_validators(ty: &SchemaType) -> impl Iterator<Item = &Validator> {
    ty.validators()
        .iter()
        .filter_map(|validator| match validator {
            Validator::Each(validators) => Some(validators.iter()),
            _ => None,
        })
        .flatten()
}
