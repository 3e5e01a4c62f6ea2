//! Numeric rules.

use crate::constraints::range_bounds;
use crate::error::ConversionError;
use crate::registry::Registry;
use crate::ValueStrategy;
use proptest::prelude::*;
use proptest::strategy::Union;
use schema_core::{Context, SchemaType, Value};

/// Widest span handed to a single float range. Wider ranges are split so
/// that the sampler never computes an infinite span.
const MAX_FLOAT_SPAN: f64 = f64::MAX / 4.0;

/// Random integers within the combined range bounds.
pub fn integer_strategy(
    _registry: &Registry,
    ty: &SchemaType,
    _context: &Context,
) -> Result<ValueStrategy, ConversionError> {
    let bounds = range_bounds(ty)?;
    let min = match &bounds.min {
        Some(bound) => integer_bound(ty, bound, f64::ceil)?,
        None => i64::MIN,
    };
    let max = match &bounds.max {
        Some(bound) => integer_bound(ty, bound, f64::floor)?,
        None => i64::MAX,
    };

    // Fractional bounds can still cross after rounding, e.g. 1.2..=1.8
    if min > max {
        return Err(ConversionError::invalid_settings(
            ty,
            "range",
            format!("no integer between {min} and {max}"),
        ));
    }
    Ok((min..=max).prop_map(Value::Int).boxed())
}

/// Random finite floats within the combined range bounds.
pub fn float_strategy(
    _registry: &Registry,
    ty: &SchemaType,
    _context: &Context,
) -> Result<ValueStrategy, ConversionError> {
    let bounds = range_bounds(ty)?;
    if bounds.min.is_none() && bounds.max.is_none() {
        use proptest::num::f64::{NEGATIVE, NORMAL, POSITIVE, SUBNORMAL, ZERO};
        return Ok((POSITIVE | NEGATIVE | NORMAL | SUBNORMAL | ZERO)
            .prop_map(Value::Float)
            .boxed());
    }

    let min = match &bounds.min {
        Some(bound) => float_bound(ty, bound)?,
        None => f64::MIN,
    };
    let max = match &bounds.max {
        Some(bound) => float_bound(ty, bound)?,
        None => f64::MAX,
    };
    Ok(float_range(min, max))
}

fn integer_bound(
    ty: &SchemaType,
    bound: &Value,
    round: fn(f64) -> f64,
) -> Result<i64, ConversionError> {
    match bound {
        Value::Int(i) => Ok(*i),
        // Saturating cast for bounds beyond the i64 range
        Value::Float(f) if !f.is_nan() => Ok(round(*f) as i64),
        other => Err(ConversionError::invalid_settings(
            ty,
            "range",
            format!("{} bound on an integer type", other.kind_name()),
        )),
    }
}

fn float_bound(ty: &SchemaType, bound: &Value) -> Result<f64, ConversionError> {
    match bound.as_f64() {
        Some(f) if f.is_finite() => Ok(f),
        _ => Err(ConversionError::invalid_settings(
            ty,
            "range",
            format!("{bound:?} bound on a float type"),
        )),
    }
}

fn float_range(min: f64, max: f64) -> ValueStrategy {
    if max - min <= MAX_FLOAT_SPAN {
        return (min..=max).prop_map(Value::Float).boxed();
    }
    let mid = min / 2.0 + max / 2.0;
    Union::new(vec![float_range(min, mid), float_range(mid, max)]).boxed()
}
