//! Built-in conversion rules, one per schema category.
//!
//! Each rule translates its category's attributes and the validators it
//! understands into proptest combinators. Everything else is left to the
//! registry's generic validator filtering.

pub mod collection;
pub mod composite;
pub mod numeric;
pub mod scalar;
pub mod temporal;
pub mod wrapper;

use crate::error::ConversionError;
use crate::registry::{ConversionRule, Registry};
use crate::ValueStrategy;
use schema_core::{Category, Context, SchemaType, ValidatorKind};

type RuleFn = fn(&Registry, &SchemaType, &Context) -> Result<ValueStrategy, ConversionError>;
type HandledFn = fn(&SchemaType) -> &'static [ValidatorKind];

/// Rule backed by plain functions.
#[derive(Clone, Copy)]
pub(crate) struct BuiltinRule {
    convert: RuleFn,
    handled: HandledFn,
}

impl BuiltinRule {
    const fn new(convert: RuleFn) -> Self {
        Self {
            convert,
            handled: handles_nothing,
        }
    }

    const fn handling(mut self, handled: HandledFn) -> Self {
        self.handled = handled;
        self
    }
}

impl ConversionRule for BuiltinRule {
    fn convert(
        &self,
        registry: &Registry,
        ty: &SchemaType,
        context: &Context,
    ) -> Result<ValueStrategy, ConversionError> {
        (self.convert)(registry, ty, context)
    }

    fn handled_validators(&self, ty: &SchemaType) -> &'static [ValidatorKind] {
        (self.handled)(ty)
    }
}

fn handles_nothing(_: &SchemaType) -> &'static [ValidatorKind] {
    &[]
}

/// The text rule filters whatever it cannot translate itself.
fn handles_text(_: &SchemaType) -> &'static [ValidatorKind] {
    &[ValidatorKind::Length, ValidatorKind::Regexp]
}

fn handles_range(_: &SchemaType) -> &'static [ValidatorKind] {
    &[ValidatorKind::Range]
}

fn handles_sequence(_: &SchemaType) -> &'static [ValidatorKind] {
    &[ValidatorKind::Length, ValidatorKind::Unique, ValidatorKind::Each]
}

/// Register every built-in rule.
pub fn register_defaults(registry: &mut Registry) {
    let builtins = [
        (Category::Any, BuiltinRule::new(scalar::any_strategy)),
        (
            Category::Text,
            BuiltinRule::new(scalar::text_strategy).handling(handles_text),
        ),
        (
            Category::Integer,
            BuiltinRule::new(numeric::integer_strategy).handling(handles_range),
        ),
        (
            Category::Float,
            BuiltinRule::new(numeric::float_strategy).handling(handles_range),
        ),
        (Category::Boolean, BuiltinRule::new(scalar::boolean_strategy)),
        (Category::DateTime, BuiltinRule::new(temporal::datetime_strategy)),
        (Category::Date, BuiltinRule::new(temporal::date_strategy)),
        (Category::Time, BuiltinRule::new(temporal::time_strategy)),
        (
            Category::List,
            BuiltinRule::new(collection::list_strategy).handling(handles_sequence),
        ),
        (Category::Tuple, BuiltinRule::new(collection::tuple_strategy)),
        (Category::Dict, BuiltinRule::new(collection::dict_strategy)),
        (Category::Object, BuiltinRule::new(composite::object_strategy)),
        (Category::Constant, BuiltinRule::new(composite::constant_strategy)),
        (Category::OneOf, BuiltinRule::new(composite::one_of_strategy)),
        (Category::Optional, BuiltinRule::new(wrapper::optional_strategy)),
        (Category::DumpOnly, BuiltinRule::new(wrapper::dump_only_strategy)),
        (Category::LoadOnly, BuiltinRule::new(wrapper::load_only_strategy)),
        (Category::Transform, BuiltinRule::new(wrapper::transform_strategy)),
    ];

    for (category, rule) in builtins {
        registry.register_rule(category, rule);
    }
}

/// Check whether a field type is excluded from generated input.
pub(crate) fn is_input_field(field_type: &SchemaType) -> bool {
    !field_type.is_a(Category::DumpOnly)
}
