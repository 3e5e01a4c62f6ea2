//! Conversion registry mapping schema types to strategies.

use crate::constraints::{allowed_values, apply_validators};
use crate::error::ConversionError;
use crate::rules;
use crate::ValueStrategy;
use proptest::prelude::*;
use schema_core::{Category, Context, SchemaType, TypeId, ValidatorKind};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Default upper bound on the size of text, sequences and mappings that
/// declare no maximum length.
pub const DEFAULT_MAX_SIZE: usize = 32;

/// A function converting one schema type into a strategy.
///
/// Rules call back into the [`Registry`] to convert child types.
pub trait ConversionRule: Send + Sync {
    /// Build the strategy for `ty`.
    fn convert(
        &self,
        registry: &Registry,
        ty: &SchemaType,
        context: &Context,
    ) -> Result<ValueStrategy, ConversionError>;

    /// Validator kinds this rule enforces structurally for `ty`.
    ///
    /// The registry applies every other attached validator as a rejection
    /// filter on the rule's strategy.
    fn handled_validators(&self, _ty: &SchemaType) -> &'static [ValidatorKind] {
        &[]
    }
}

impl<F> ConversionRule for F
where
    F: Fn(&Registry, &SchemaType, &Context) -> Result<ValueStrategy, ConversionError>
        + Send
        + Sync,
{
    fn convert(
        &self,
        registry: &Registry,
        ty: &SchemaType,
        context: &Context,
    ) -> Result<ValueStrategy, ConversionError> {
        self(registry, ty, context)
    }
}

/// Which schema types a category rule applies to.
#[derive(Clone)]
pub enum Selector {
    /// Every type of the category, named or not
    Category(Category),
    /// Types carrying this type name
    Named(String),
    /// Types accepted by the predicate
    Matching(Arc<dyn Fn(&SchemaType) -> bool + Send + Sync>),
}

impl Selector {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn matching(f: impl Fn(&SchemaType) -> bool + Send + Sync + 'static) -> Self {
        Self::Matching(Arc::new(f))
    }

    pub fn matches(&self, ty: &SchemaType) -> bool {
        match self {
            Self::Category(category) => ty.is_a(*category),
            Self::Named(name) => ty.name() == Some(name.as_str()),
            Self::Matching(f) => f(ty),
        }
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(category) => write!(f, "Category({category})"),
            Self::Named(name) => write!(f, "Named({name})"),
            Self::Matching(_) => f.write_str("Matching(..)"),
        }
    }
}

impl From<Category> for Selector {
    fn from(category: Category) -> Self {
        Self::Category(category)
    }
}

/// Registration key: one schema node, or a selector over many.
#[derive(Debug, Clone)]
pub enum RuleKey {
    Instance(TypeId),
    Selector(Selector),
}

impl From<&SchemaType> for RuleKey {
    fn from(ty: &SchemaType) -> Self {
        Self::Instance(ty.id())
    }
}

impl From<TypeId> for RuleKey {
    fn from(id: TypeId) -> Self {
        Self::Instance(id)
    }
}

impl From<Selector> for RuleKey {
    fn from(selector: Selector) -> Self {
        Self::Selector(selector)
    }
}

impl From<Category> for RuleKey {
    fn from(category: Category) -> Self {
        Self::Selector(Selector::Category(category))
    }
}

/// Settings shared by the built-in rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSettings {
    /// Size span used when no maximum length is declared
    pub max_size: usize,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

/// Registry of conversion rules.
///
/// Holds per-instance overrides and selector rules. Selector rules are kept
/// newest-first, so a later registration shadows earlier ones for the types
/// it matches. Cloning yields an independent registry.
#[derive(Clone)]
pub struct Registry {
    overrides: HashMap<TypeId, Arc<dyn ConversionRule>>,
    rules: Vec<(Selector, Arc<dyn ConversionRule>)>,
    settings: ConversionSettings,
}

impl Registry {
    /// Create a registry without any rules.
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
            rules: Vec::new(),
            settings: ConversionSettings::default(),
        }
    }

    /// Create a registry with every built-in rule registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        rules::register_defaults(&mut registry);
        registry
    }

    /// Replace the conversion settings.
    pub fn with_settings(mut self, settings: ConversionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    /// Register a conversion function.
    ///
    /// An instance key replaces any previous override for that node; a
    /// selector key takes precedence over every earlier selector rule.
    pub fn register<F>(&mut self, key: impl Into<RuleKey>, rule: F)
    where
        F: Fn(&Registry, &SchemaType, &Context) -> Result<ValueStrategy, ConversionError>
            + Send
            + Sync
            + 'static,
    {
        self.register_rule(key, rule);
    }

    /// Register a [`ConversionRule`] implementation.
    pub fn register_rule(&mut self, key: impl Into<RuleKey>, rule: impl ConversionRule + 'static) {
        let rule: Arc<dyn ConversionRule> = Arc::new(rule);
        match key.into() {
            RuleKey::Instance(id) => {
                debug!(type_id = %id, "registering instance override");
                self.overrides.insert(id, rule);
            }
            RuleKey::Selector(selector) => {
                debug!(?selector, "registering rule");
                self.rules.insert(0, (selector, rule));
            }
        }
    }

    /// Convert a schema type into a strategy.
    pub fn convert(
        &self,
        ty: &SchemaType,
        context: &Context,
    ) -> Result<ValueStrategy, ConversionError> {
        if let Some(rule) = self.overrides.get(&ty.id()) {
            debug!(type_name = %ty, type_id = %ty.id(), "using instance override");
            return rule.convert(self, ty, context);
        }

        if let Some(mut allowed) = allowed_values(ty.validators()) {
            debug!(type_name = %ty, choices = allowed.len(), "using membership intersection");
            return match allowed.len() {
                0 => Err(ConversionError::NoMatchingValue {
                    type_name: ty.to_string(),
                }),
                1 => Ok(Just(allowed.remove(0)).boxed()),
                _ => Ok(proptest::sample::select(allowed).boxed()),
            };
        }

        let (selector, rule) = self
            .rules
            .iter()
            .find(|(selector, _)| selector.matches(ty))
            .ok_or_else(|| ConversionError::unsupported(ty))?;
        debug!(type_name = %ty, ?selector, "using rule");

        let strategy = rule.convert(self, ty, context)?;
        let handled = rule.handled_validators(ty);
        let remaining = ty
            .validators()
            .iter()
            .filter(|validator| !handled.contains(&validator.kind()));
        Ok(apply_validators(strategy, remaining, context))
    }

    /// Convert with an empty context.
    pub fn strategy(&self, ty: &SchemaType) -> Result<ValueStrategy, ConversionError> {
        self.convert(ty, &Context::default())
    }

    /// Number of registered selector rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Number of registered instance overrides.
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("overrides", &self.overrides.len())
            .field(
                "rules",
                &self.rules.iter().map(|(s, _)| s).collect::<Vec<_>>(),
            )
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::sampler::Sampler;
    use schema_core::{Validator, Value};

    fn integers(
        _: &Registry,
        _: &SchemaType,
        _: &Context,
    ) -> Result<ValueStrategy, ConversionError> {
        Ok(any::<i64>().prop_map(Value::Int).boxed())
    }

    fn booleans(
        _: &Registry,
        _: &SchemaType,
        _: &Context,
    ) -> Result<ValueStrategy, ConversionError> {
        Ok(any::<bool>().prop_map(Value::Bool).boxed())
    }

    #[test]
    fn test_empty_registry_is_unsupported() {
        let registry = Registry::new();

        let err = registry.strategy(&SchemaType::text()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    }

    #[test]
    fn test_later_rules_take_precedence() {
        let mut registry = Registry::with_defaults();
        registry.register(Category::Text, integers);

        let strategy = registry.strategy(&SchemaType::text()).unwrap();
        let mut sampler = Sampler::new(42);
        for _ in 0..100 {
            assert!(matches!(sampler.sample(&strategy).unwrap(), Value::Int(_)));
        }
    }

    #[test]
    fn test_instance_override_wins_over_rules() {
        let special = SchemaType::text();
        let plain = SchemaType::text();

        let mut registry = Registry::with_defaults();
        registry.register(&special, integers);

        let mut sampler = Sampler::new(7);
        let special_strategy = registry.strategy(&special).unwrap();
        let plain_strategy = registry.strategy(&plain).unwrap();
        for _ in 0..50 {
            assert!(matches!(sampler.sample(&special_strategy).unwrap(), Value::Int(_)));
            assert!(matches!(sampler.sample(&plain_strategy).unwrap(), Value::String(_)));
        }
    }

    #[test]
    fn test_replacing_instance_override() {
        let ty = SchemaType::text();

        let mut registry = Registry::with_defaults();
        registry.register(&ty, integers);
        registry.register(&ty, booleans);
        assert_eq!(registry.override_count(), 1);

        let strategy = registry.strategy(&ty).unwrap();
        let mut sampler = Sampler::new(3);
        for _ in 0..100 {
            assert!(matches!(sampler.sample(&strategy).unwrap(), Value::Bool(_)));
        }
    }

    #[test]
    fn test_override_does_not_apply_to_derived_node() {
        let base = SchemaType::integer();
        let derived = base.clone().validate(Validator::range(0, 5));

        let mut registry = Registry::with_defaults();
        registry.register(&base, |_: &Registry, _: &SchemaType, _: &Context| {
            Ok(Just(Value::Int(1000)).boxed())
        });

        let base_strategy = registry.strategy(&base).unwrap();
        assert_eq!(Sampler::new(1).sample(&base_strategy).unwrap(), Value::Int(1000));

        let strategy = registry.strategy(&derived).unwrap();
        let mut sampler = Sampler::new(1);
        for _ in 0..50 {
            let value = sampler.sample(&strategy).unwrap().as_i64().unwrap();
            assert!((0..=5).contains(&value));
        }
    }

    #[test]
    fn test_instance_override_skips_validators() {
        // Overrides are trusted to honor their own constraints
        let ty = SchemaType::integer().validate(Validator::any_of([1, 2]));

        let mut registry = Registry::with_defaults();
        registry.register(&ty, |_: &Registry, _: &SchemaType, _: &Context| {
            Ok(Just(Value::Int(99)).boxed())
        });

        let strategy = registry.strategy(&ty).unwrap();
        assert_eq!(Sampler::new(1).sample(&strategy).unwrap(), Value::Int(99));
    }

    #[test]
    fn test_named_selector() {
        let email = SchemaType::text().named("Email");

        let mut registry = Registry::with_defaults();
        registry.register(
            Selector::named("Email"),
            |_: &Registry, _: &SchemaType, _: &Context| {
                Ok(Just(Value::from("someone@example.com")).boxed())
            },
        );

        let strategy = registry.strategy(&email).unwrap();
        assert_eq!(
            Sampler::new(1).sample(&strategy).unwrap(),
            Value::from("someone@example.com")
        );

        // Unnamed text still uses the built-in rule
        let strategy = registry.strategy(&SchemaType::text()).unwrap();
        assert!(matches!(Sampler::new(1).sample(&strategy).unwrap(), Value::String(_)));
    }

    #[test]
    fn test_matching_selector() {
        let mut registry = Registry::with_defaults();
        registry.register(
            Selector::matching(|ty| ty.validators().is_empty() && ty.is_a(Category::Integer)),
            |_: &Registry, _: &SchemaType, _: &Context| Ok(Just(Value::Int(0)).boxed()),
        );

        let bare = registry.strategy(&SchemaType::integer()).unwrap();
        assert_eq!(Sampler::new(5).sample(&bare).unwrap(), Value::Int(0));

        let bounded = SchemaType::integer().validate(Validator::range(5, 10));
        let strategy = registry.strategy(&bounded).unwrap();
        let mut sampler = Sampler::new(5);
        for _ in 0..50 {
            let value = sampler.sample(&strategy).unwrap().as_i64().unwrap();
            assert!((5..=10).contains(&value));
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Registry::with_defaults();
        let mut copy = original.clone();
        copy.register(Category::Text, integers);

        let mut sampler = Sampler::new(11);
        let from_original = original.strategy(&SchemaType::text()).unwrap();
        let from_copy = copy.strategy(&SchemaType::text()).unwrap();
        for _ in 0..50 {
            assert!(matches!(sampler.sample(&from_original).unwrap(), Value::String(_)));
            assert!(matches!(sampler.sample(&from_copy).unwrap(), Value::Int(_)));
        }
        assert_eq!(copy.rule_count(), original.rule_count() + 1);
    }

    #[test]
    fn test_original_changes_do_not_leak_into_clone() {
        let mut original = Registry::with_defaults();
        let ty = SchemaType::boolean();
        let copy = original.clone();
        original.register(&ty, integers);

        let strategy = copy.strategy(&ty).unwrap();
        let mut sampler = Sampler::new(2);
        for _ in 0..50 {
            assert!(matches!(sampler.sample(&strategy).unwrap(), Value::Bool(_)));
        }
        assert_eq!(copy.override_count(), 0);
    }

    #[test]
    fn test_any_of_validator() {
        let registry = Registry::with_defaults();
        let ty = SchemaType::text().validate(Validator::any_of(["foo", "bar", "baz"]));

        let strategy = registry.strategy(&ty).unwrap();
        let mut sampler = Sampler::new(42);
        for _ in 0..100 {
            let value = sampler.sample(&strategy).unwrap();
            assert!(["foo", "bar", "baz"].contains(&value.as_str().unwrap()));
        }
    }

    #[test]
    fn test_multiple_any_of_validators() {
        let registry = Registry::with_defaults();
        let ty = SchemaType::text().with_validators([
            Validator::any_of(["foo", "bar", "baz"]),
            Validator::any_of(["bar", "baz", "bam"]),
        ]);

        let strategy = registry.strategy(&ty).unwrap();
        let mut sampler = Sampler::new(42);
        let mut seen = Vec::new();
        for _ in 0..100 {
            let value = sampler.sample(&strategy).unwrap();
            assert!(["bar", "baz"].contains(&value.as_str().unwrap()));
            if !seen.contains(&value) {
                seen.push(value);
            }
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_any_of_resulting_in_single_value() {
        let registry = Registry::with_defaults();
        let ty = SchemaType::text().with_validators([
            Validator::any_of(["foo", "bar"]),
            Validator::any_of(["bar", "baz"]),
        ]);

        let strategy = registry.strategy(&ty).unwrap();
        let mut sampler = Sampler::new(42);
        for _ in 0..100 {
            assert_eq!(sampler.sample(&strategy).unwrap(), Value::from("bar"));
        }
    }

    #[test]
    fn test_any_of_resulting_in_no_values() {
        let registry = Registry::with_defaults();
        let ty = SchemaType::text()
            .with_validators([Validator::any_of(["foo"]), Validator::any_of(["bar"])]);

        let err = registry.strategy(&ty).unwrap_err();
        assert!(matches!(err, ConversionError::NoMatchingValue { .. }));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_any_of_replaces_rule_lookup() {
        // No rule is registered, but the membership shortcut still applies
        let registry = Registry::new();
        let ty = SchemaType::object(Vec::<(String, SchemaType)>::new())
            .validate(Validator::any_of([1]));

        let strategy = registry.strategy(&ty).unwrap();
        assert_eq!(Sampler::new(0).sample(&strategy).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_unhandled_validators_are_filtered() {
        let registry = Registry::with_defaults();
        let ty = SchemaType::integer().with_validators([
            Validator::range(0, 20),
            Validator::predicate(|value, _| value.as_i64().is_some_and(|v| v % 2 == 0)),
            Validator::none_of([4]),
        ]);

        let strategy = registry.strategy(&ty).unwrap();
        let mut sampler = Sampler::new(9);
        for _ in 0..100 {
            let value = sampler.sample(&strategy).unwrap().as_i64().unwrap();
            assert!((0..=20).contains(&value));
            assert_eq!(value % 2, 0);
            assert_ne!(value, 4);
        }
    }

    #[test]
    fn test_predicate_receives_context() {
        let registry = Registry::with_defaults();
        let ty = SchemaType::integer()
            .with_validators([
                Validator::range(0, 100),
                Validator::predicate(|value, context| {
                    let limit = context.get("limit").and_then(Value::as_i64).unwrap_or(0);
                    value.as_i64().is_some_and(|v| v < limit)
                }),
            ]);
        let context = Context::new().with("limit", 50);

        let strategy = registry.convert(&ty, &context).unwrap();
        let mut sampler = Sampler::new(4);
        for _ in 0..100 {
            assert!(sampler.sample(&strategy).unwrap().as_i64().unwrap() < 50);
        }
    }
}
