//! Records, literals and unions.

use crate::error::ConversionError;
use crate::registry::Registry;
use crate::rules::collection::convert_fields;
use crate::ValueStrategy;
use proptest::prelude::*;
use proptest::strategy::Union;
use schema_core::{Context, SchemaType, TypeKind, Value};
use std::collections::BTreeMap;

/// Record of generated input fields, passed through the type's
/// constructor when it has one.
pub fn object_strategy(
    registry: &Registry,
    ty: &SchemaType,
    context: &Context,
) -> Result<ValueStrategy, ConversionError> {
    let TypeKind::Object {
        fields,
        constructor,
    } = ty.kind()
    else {
        return Err(ConversionError::unsupported(ty));
    };

    let (names, strategies) = convert_fields(registry, fields, context)?;
    let constructor = constructor.clone();
    Ok(strategies
        .prop_map(move |values| {
            let fields: BTreeMap<String, Value> = names.iter().cloned().zip(values).collect();
            match &constructor {
                Some(constructor) => constructor.build(fields),
                None => Value::Object(fields),
            }
        })
        .boxed())
}

pub fn constant_strategy(
    _registry: &Registry,
    ty: &SchemaType,
    _context: &Context,
) -> Result<ValueStrategy, ConversionError> {
    let TypeKind::Constant { value } = ty.kind() else {
        return Err(ConversionError::unsupported(ty));
    };
    Ok(Just(value.clone()).boxed())
}

/// Values drawn from any one of the alternatives.
pub fn one_of_strategy(
    registry: &Registry,
    ty: &SchemaType,
    context: &Context,
) -> Result<ValueStrategy, ConversionError> {
    let TypeKind::OneOf { alternatives } = ty.kind() else {
        return Err(ConversionError::unsupported(ty));
    };
    if alternatives.is_empty() {
        return Err(ConversionError::EmptyUnion {
            type_name: ty.to_string(),
        });
    }

    let strategies = alternatives
        .iter()
        .map(|alternative| registry.convert(alternative, context))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Union::new(strategies).boxed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::Sampler;
    use schema_core::Validator;

    fn sample_many(ty: &SchemaType, count: usize) -> Vec<Value> {
        let registry = Registry::with_defaults();
        let strategy = registry.strategy(ty).unwrap();
        let mut sampler = Sampler::new(42);
        (0..count)
            .map(|_| sampler.sample(&strategy).unwrap())
            .collect()
    }

    #[test]
    fn test_object() {
        let ty = SchemaType::object([
            ("name", SchemaType::text()),
            ("age", SchemaType::integer().validate(Validator::range(0, 120))),
        ]);
        for value in sample_many(&ty, 50) {
            let fields = value.as_object().expect("object value");
            assert_eq!(fields.len(), 2);
            assert!(matches!(fields.get("name"), Some(Value::String(_))));
            assert!((0..=120).contains(&fields["age"].as_i64().unwrap()));
        }
    }

    #[test]
    fn test_object_with_constructor() {
        let ty = SchemaType::object_with_constructor(
            [("x", SchemaType::integer()), ("y", SchemaType::integer())],
            |fields| {
                Value::Tuple(vec![
                    fields.get("x").cloned().unwrap_or(Value::Null),
                    fields.get("y").cloned().unwrap_or(Value::Null),
                ])
            },
        );
        for value in sample_many(&ty, 20) {
            let items = value.as_items().expect("tuple value");
            assert_eq!(items.len(), 2);
            assert!(items.iter().all(|item| matches!(item, Value::Int(_))));
        }
    }

    #[test]
    fn test_object_skips_dump_only_fields() {
        let ty = SchemaType::object([
            ("id", SchemaType::dump_only(SchemaType::integer())),
            ("password", SchemaType::load_only(SchemaType::text())),
        ]);
        for value in sample_many(&ty, 20) {
            assert!(value.get("id").is_none());
            assert!(value.get("password").is_some());
        }
    }

    #[test]
    fn test_nested_object() {
        let address = SchemaType::object([("city", SchemaType::text())]);
        let ty = SchemaType::object([("address", address)]);
        for value in sample_many(&ty, 20) {
            let address = value.get("address").expect("nested field");
            assert!(matches!(address.get("city"), Some(Value::String(_))));
        }
    }

    #[test]
    fn test_constant() {
        for value in sample_many(&SchemaType::constant(123), 20) {
            assert_eq!(value, Value::Int(123));
        }
    }

    #[test]
    fn test_one_of() {
        let ty = SchemaType::one_of(vec![
            SchemaType::text(),
            SchemaType::integer(),
            SchemaType::boolean(),
        ]);
        let values = sample_many(&ty, 200);

        assert!(values.iter().any(|v| matches!(v, Value::String(_))));
        assert!(values.iter().any(|v| matches!(v, Value::Int(_))));
        assert!(values.iter().any(|v| matches!(v, Value::Bool(_))));
    }

    #[test]
    fn test_one_of_without_alternatives() {
        let err = Registry::with_defaults()
            .strategy(&SchemaType::one_of(Vec::new()))
            .unwrap_err();
        assert!(matches!(err, ConversionError::EmptyUnion { .. }));
    }
}
