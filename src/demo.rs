//! Demo `User` schema and its registry.
//!
//! The `Email` named type carries a custom check that arbitrary text almost
//! never passes, so the demo registry registers a dedicated rule for it.

use proptest::prelude::*;
use schema_core::{Context, SchemaType, ValidationError, Validator, Value};
use strategy_registry::{ConversionError, ConversionSettings, Registry, Selector, ValueStrategy};

pub const EMAIL_TYPE: &str = "Email";

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "mail.test"];

/// Text type accepting addresses of the form `local@domain.tld`.
pub fn email_type() -> SchemaType {
    SchemaType::text()
        .named(EMAIL_TYPE)
        .validate(Validator::custom("email", check_email))
}

/// `User` record: non-empty name, email and optional adult age.
pub fn user_schema() -> SchemaType {
    SchemaType::object([
        ("name", SchemaType::text().validate(Validator::min_length(1))),
        ("email", email_type()),
        (
            "age",
            SchemaType::optional(SchemaType::integer().validate(Validator::min(18))),
        ),
    ])
    .named("User")
}

/// Registry with the built-in rules plus the `Email` rule.
pub fn demo_registry(settings: ConversionSettings) -> Registry {
    let mut registry = Registry::with_defaults().with_settings(settings);
    registry.register(Selector::named(EMAIL_TYPE), email_strategy);
    registry
}

fn email_strategy(
    _registry: &Registry,
    _ty: &SchemaType,
    _context: &Context,
) -> Result<ValueStrategy, ConversionError> {
    Ok(("[a-z][a-z0-9._]{0,15}", proptest::sample::select(EMAIL_DOMAINS))
        .prop_map(|(local, domain)| Value::String(format!("{local}@{domain}")))
        .boxed())
}

fn check_email(value: &Value, _context: &Context) -> Result<(), ValidationError> {
    let address = value.as_str().ok_or(ValidationError::TypeMismatch {
        validator: schema_core::ValidatorKind::Custom,
        found: value.kind_name(),
    })?;
    let valid = match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ValidationError::Custom(format!("not an email address: {address}")))
    }
}
