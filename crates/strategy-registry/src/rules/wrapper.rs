//! Rules for wrapper types that delegate to an inner type.

use crate::constraints::nothing;
use crate::error::ConversionError;
use crate::registry::Registry;
use crate::ValueStrategy;
use proptest::prelude::*;
use proptest::strategy::Union;
use schema_core::{Context, SchemaType, TypeKind, Value};

/// Null or an inner value. A non-null load default means absent input is
/// replaced on load, so null is never generated.
pub fn optional_strategy(
    registry: &Registry,
    ty: &SchemaType,
    context: &Context,
) -> Result<ValueStrategy, ConversionError> {
    let TypeKind::Optional {
        inner,
        load_default,
    } = ty.kind()
    else {
        return Err(ConversionError::unsupported(ty));
    };

    let inner = registry.convert(inner, context)?;
    match load_default {
        Some(default) if !default.is_null() => Ok(inner),
        _ => Ok(Union::new(vec![Just(Value::Null).boxed(), inner]).boxed()),
    }
}

/// Output-only fields never appear in generated input.
pub fn dump_only_strategy(
    _registry: &Registry,
    _ty: &SchemaType,
    _context: &Context,
) -> Result<ValueStrategy, ConversionError> {
    Ok(nothing("dump-only field"))
}

pub fn load_only_strategy(
    registry: &Registry,
    ty: &SchemaType,
    context: &Context,
) -> Result<ValueStrategy, ConversionError> {
    let TypeKind::LoadOnly { inner } = ty.kind() else {
        return Err(ConversionError::unsupported(ty));
    };
    registry.convert(inner, context)
}

/// Inner values passed through the post-load function.
pub fn transform_strategy(
    registry: &Registry,
    ty: &SchemaType,
    context: &Context,
) -> Result<ValueStrategy, ConversionError> {
    let TypeKind::Transform { inner, post_load } = ty.kind() else {
        return Err(ConversionError::unsupported(ty));
    };

    let post_load = post_load.clone();
    let context = context.clone();
    Ok(registry
        .convert(inner, &context)?
        .prop_map(move |value| post_load.apply(value, &context))
        .boxed())
}
