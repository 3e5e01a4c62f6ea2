//! Sequence and mapping rules.

use crate::constraints::{apply_validators, item_validators, length_bounds, uniqueness};
use crate::error::ConversionError;
use crate::registry::Registry;
use crate::rules::is_input_field;
use crate::ValueStrategy;
use proptest::prelude::*;
use schema_core::{Context, SchemaType, TypeKind, Value};

/// Sized, optionally unique list of converted items.
///
/// `Each` sub-validators are applied to the item strategy before the list
/// is composed.
pub fn list_strategy(
    registry: &Registry,
    ty: &SchemaType,
    context: &Context,
) -> Result<ValueStrategy, ConversionError> {
    let TypeKind::List { item } = ty.kind() else {
        return Err(ConversionError::unsupported(ty));
    };

    let (min, max) = length_bounds(ty)?.resolve(registry.settings().max_size);
    let item_strategy = apply_validators(
        registry.convert(item, context)?,
        item_validators(ty),
        context,
    );
    let items = proptest::collection::vec(item_strategy, min..=max);

    let unique = uniqueness(ty);
    if unique.is_empty() {
        return Ok(items.prop_map(Value::List).boxed());
    }
    // Dropping duplicates can leave fewer than `min` items
    Ok(items
        .prop_map(move |items| {
            Value::List(unique.iter().fold(items, |items, rule| rule.dedup(items)))
        })
        .prop_filter("too few unique items", move |list| {
            list.len().is_some_and(|len| len >= min)
        })
        .boxed())
}

/// Fixed-arity tuple of converted item types.
pub fn tuple_strategy(
    registry: &Registry,
    ty: &SchemaType,
    context: &Context,
) -> Result<ValueStrategy, ConversionError> {
    let TypeKind::Tuple { items } = ty.kind() else {
        return Err(ConversionError::unsupported(ty));
    };

    let strategies = items
        .iter()
        .map(|item| registry.convert(item, context))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(strategies.prop_map(Value::Tuple).boxed())
}

/// Mapping from generated keys to a default value type, or a mapping with
/// one generated entry per declared field.
pub fn dict_strategy(
    registry: &Registry,
    ty: &SchemaType,
    context: &Context,
) -> Result<ValueStrategy, ConversionError> {
    let TypeKind::Dict {
        key,
        fields,
        default,
    } = ty.kind()
    else {
        return Err(ConversionError::unsupported(ty));
    };

    if let Some(value_type) = default {
        let entry = (
            registry.convert(key, context)?,
            registry.convert(value_type, context)?,
        );
        return Ok(
            proptest::collection::vec(entry, 0..=registry.settings().max_size)
                .prop_map(|entries| Value::Map(unique_keys(entries)))
                .boxed(),
        );
    }

    let (names, strategies) = convert_fields(registry, fields, context)?;
    Ok(strategies
        .prop_map(move |values| {
            Value::Map(
                names
                    .iter()
                    .cloned()
                    .map(Value::String)
                    .zip(values)
                    .collect(),
            )
        })
        .boxed())
}

/// Convert every input field, keeping names and strategies aligned.
pub(crate) fn convert_fields(
    registry: &Registry,
    fields: &[(String, SchemaType)],
    context: &Context,
) -> Result<(Vec<String>, Vec<ValueStrategy>), ConversionError> {
    let mut names = Vec::with_capacity(fields.len());
    let mut strategies = Vec::with_capacity(fields.len());
    for (name, field_type) in fields.iter().filter(|(_, t)| is_input_field(t)) {
        strategies.push(registry.convert(field_type, context)?);
        names.push(name.clone());
    }
    Ok((names, strategies))
}

/// Keep the last value generated for each key.
fn unique_keys(entries: Vec<(Value, Value)>) -> Vec<(Value, Value)> {
    let mut unique: Vec<(Value, Value)> = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        match unique.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => unique.push((key, value)),
        }
    }
    unique
}
