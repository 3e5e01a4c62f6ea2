//! Rules for untyped values, text and booleans.

use crate::constraints::{apply_validators, length_bounds};
use crate::error::ConversionError;
use crate::registry::Registry;
use crate::ValueStrategy;
use proptest::prelude::*;
use schema_core::{Context, SchemaType, Validator, ValidatorKind, Value};

/// Untyped values are generated as unconstrained text.
pub fn any_strategy(
    registry: &Registry,
    _ty: &SchemaType,
    _context: &Context,
) -> Result<ValueStrategy, ConversionError> {
    Ok(bounded_text(0, registry.settings().max_size))
}

/// Text from the first generatable pattern when possible, otherwise text
/// within the combined length bounds.
///
/// The rule enforces every `Length` and `Regexp` validator itself: the one
/// it generates from or translates structurally is consumed, the rest are
/// applied as filters.
pub fn text_strategy(
    registry: &Registry,
    ty: &SchemaType,
    context: &Context,
) -> Result<ValueStrategy, ConversionError> {
    let bounds = length_bounds(ty)?;
    let text_validators = ty
        .validators()
        .iter()
        .enumerate()
        .filter(|(_, v)| matches!(v.kind(), ValidatorKind::Length | ValidatorKind::Regexp));

    if let Some((used, strategy)) = pattern_strategy(ty) {
        let rest = text_validators
            .filter(|(index, _)| *index != used)
            .map(|(_, v)| v);
        return Ok(apply_validators(strategy, rest, context));
    }

    let (min, max) = bounds.resolve(registry.settings().max_size);
    let patterns = text_validators
        .map(|(_, v)| v)
        .filter(|v| v.kind() == ValidatorKind::Regexp);
    Ok(apply_validators(bounded_text(min, max), patterns, context))
}

pub fn boolean_strategy(
    _registry: &Registry,
    _ty: &SchemaType,
    _context: &Context,
) -> Result<ValueStrategy, ConversionError> {
    Ok(any::<bool>().prop_map(Value::Bool).boxed())
}

/// Text of `min..=max` characters.
pub(crate) fn bounded_text(min: usize, max: usize) -> ValueStrategy {
    proptest::collection::vec(any::<char>(), min..=max)
        .prop_map(|chars| Value::String(chars.into_iter().collect()))
        .boxed()
}

/// Strategy for the first pattern proptest can generate from, with the
/// index of its validator.
#[cfg(feature = "regex")]
fn pattern_strategy(ty: &SchemaType) -> Option<(usize, ValueStrategy)> {
    ty.validators()
        .iter()
        .enumerate()
        .find_map(|(index, validator)| match validator {
            Validator::Regexp(regex) => {
                match proptest::string::string_regex(generation_pattern(regex.as_str())) {
                    Ok(strategy) => Some((index, strategy.prop_map(Value::String).boxed())),
                    Err(err) => {
                        tracing::debug!(
                            pattern = regex.as_str(),
                            error = %err,
                            "pattern not supported for generation, filtering instead"
                        );
                        None
                    }
                }
            }
            _ => None,
        })
}

#[cfg(not(feature = "regex"))]
fn pattern_strategy(_ty: &SchemaType) -> Option<(usize, ValueStrategy)> {
    None
}

/// Generated strings always match in full, so anchors at the pattern ends
/// are redundant and are removed before generation.
#[cfg_attr(not(feature = "regex"), allow(dead_code))]
fn generation_pattern(pattern: &str) -> &str {
    let pattern = pattern.strip_prefix('^').unwrap_or(pattern);
    match pattern.strip_suffix('$') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::Sampler;

    fn sample_many(ty: &SchemaType, count: usize) -> Vec<Value> {
        let registry = Registry::with_defaults();
        let strategy = registry.strategy(ty).unwrap();
        let mut sampler = Sampler::new(42);
        (0..count)
            .map(|_| sampler.sample(&strategy).unwrap())
            .collect()
    }

    fn char_len(value: &Value) -> usize {
        value.as_str().expect("string value").chars().count()
    }

    #[test]
    fn test_string() {
        for value in sample_many(&SchemaType::text(), 100) {
            assert!(matches!(value, Value::String(_)));
        }
    }

    #[test]
    fn test_any_is_text() {
        for value in sample_many(&SchemaType::any(), 50) {
            assert!(matches!(value, Value::String(_)));
        }
    }

    #[test]
    fn test_string_exact_length_validator() {
        let ty = SchemaType::text().validate(Validator::exact_length(6));
        for value in sample_many(&ty, 100) {
            assert_eq!(char_len(&value), 6);
        }
    }

    #[test]
    fn test_string_min_length_validator() {
        let ty = SchemaType::text().validate(Validator::min_length(1));
        for value in sample_many(&ty, 100) {
            assert!(char_len(&value) >= 1);
        }
    }

    #[test]
    fn test_string_max_length_validator() {
        let ty = SchemaType::text().validate(Validator::max_length(10));
        for value in sample_many(&ty, 100) {
            assert!(char_len(&value) <= 10);
        }
    }

    #[test]
    fn test_string_min_and_max_length_validator() {
        let ty = SchemaType::text().validate(Validator::length(3, 10));
        for value in sample_many(&ty, 100) {
            assert!((3..=10).contains(&char_len(&value)));
        }
    }

    #[test]
    fn test_string_invalid_length_settings() {
        let ty = SchemaType::text()
            .with_validators([Validator::min_length(10), Validator::max_length(2)]);

        let err = Registry::with_defaults().strategy(&ty).unwrap_err();
        assert!(err.is_configuration());
    }

    #[cfg(feature = "regex")]
    fn accepted_by_all(ty: &SchemaType, value: &Value) -> bool {
        ty.validators()
            .iter()
            .all(|validator| validator.validate(value, &Context::new()).is_ok())
    }

    #[cfg(feature = "regex")]
    #[test]
    fn test_string_regex() {
        let pattern = r"^[a-z]{2,8}@(\w{2,}\.)+\w{2,}$";
        let ty = SchemaType::text().validate(Validator::regexp(pattern).unwrap());
        let regex = regex::Regex::new(pattern).unwrap();

        for value in sample_many(&ty, 50) {
            assert!(regex.is_match(value.as_str().unwrap()), "{value:?}");
        }
    }

    #[cfg(feature = "regex")]
    #[test]
    fn test_string_multiple_regex_validators() {
        let ty = SchemaType::text().with_validators([
            Validator::regexp("^[a-z]{3}$").unwrap(),
            Validator::regexp("^a").unwrap(),
        ]);

        for value in sample_many(&ty, 50) {
            assert!(accepted_by_all(&ty, &value), "{value:?}");
            assert!(value.as_str().unwrap().starts_with('a'));
        }
    }

    #[cfg(feature = "regex")]
    #[test]
    fn test_string_regex_with_length_validator() {
        let ty = SchemaType::text().with_validators([
            Validator::regexp("^[a-z]{1,6}$").unwrap(),
            Validator::max_length(3),
        ]);

        for value in sample_many(&ty, 50) {
            assert!(accepted_by_all(&ty, &value), "{value:?}");
        }
    }

    #[test]
    fn test_generation_pattern_strips_anchors() {
        assert_eq!(generation_pattern("^abc$"), "abc");
        assert_eq!(generation_pattern("abc"), "abc");
        assert_eq!(generation_pattern(r"^cost\$"), r"cost\$");
    }

    #[cfg(feature = "regex")]
    #[test]
    fn test_first_generatable_pattern_is_used() {
        let ty = SchemaType::text().with_validators([
            Validator::max_length(3),
            Validator::regexp("^[0-9]{2}$").unwrap(),
        ]);

        let (index, _) = pattern_strategy(&ty).expect("pattern strategy");
        assert_eq!(index, 1);
    }

    #[test]
    fn test_boolean() {
        let values = sample_many(&SchemaType::boolean(), 100);
        assert!(values.iter().all(|v| v.as_bool().is_some()));
        assert!(values.contains(&Value::Bool(true)));
        assert!(values.contains(&Value::Bool(false)));
    }
}
