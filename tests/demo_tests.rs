use schema_core::{Context, SchemaType, Value};
use schema_proptest::demo::{demo_registry, email_type, user_schema};
use strategy_registry::{ConversionSettings, Registry, SamplerConfig, Sampler};

fn sample_users(seed: u64, count: usize) -> Vec<Value> {
    let registry = demo_registry(ConversionSettings::default());
    let strategy = registry.strategy(&user_schema()).unwrap();
    Sampler::new(seed)
        .samples(&strategy, count)
        .collect::<Result<_, _>>()
        .unwrap()
}

/// Run every validator of `ty` against `value`.
fn accepts(ty: &SchemaType, value: &Value) -> bool {
    ty.validators()
        .iter()
        .all(|validator| validator.validate(value, &Context::new()).is_ok())
}

#[test]
fn test_users_are_valid() {
    let email = email_type();
    for user in sample_users(42, 100) {
        let name = user.get("name").and_then(Value::as_str).unwrap();
        assert!(!name.is_empty());

        assert!(accepts(&email, user.get("email").unwrap()), "{user:?}");

        match user.get("age") {
            Some(Value::Null) => {}
            Some(Value::Int(age)) => assert!(*age >= 18),
            other => panic!("Expected optional Int age, got {other:?}"),
        }
    }
}

#[test]
fn test_users_include_missing_and_present_ages() {
    let users = sample_users(42, 100);

    assert!(users.iter().any(|u| u.get("age") == Some(&Value::Null)));
    assert!(users.iter().any(|u| matches!(u.get("age"), Some(Value::Int(_)))));
}

#[test]
fn test_same_seed_same_users() {
    assert_eq!(sample_users(7, 10), sample_users(7, 10));
}

#[test]
fn test_users_serialize_to_json() {
    let user = sample_users(1, 1).remove(0);
    let json: serde_json::Value = serde_json::to_value(&user).unwrap();

    let object = json.as_object().unwrap();
    assert!(object["name"].is_string());
    assert!(object["email"].as_str().unwrap().contains('@'));
    assert!(object["age"].is_null() || object["age"].is_i64());
}

#[test]
fn test_email_without_custom_rule_exhausts_rejects() {
    let registry = Registry::with_defaults();
    let strategy = registry.strategy(&email_type()).unwrap();
    let config = SamplerConfig {
        max_local_rejects: 50,
        ..SamplerConfig::default()
    };

    // Arbitrary text rarely looks like an address, so filtering alone fails
    let result = Sampler::with_config(&config).sample(&strategy);
    assert!(result.is_err());
}

#[test]
fn test_max_size_bounds_names() {
    let registry = demo_registry(ConversionSettings { max_size: 4 });
    let strategy = registry.strategy(&user_schema()).unwrap();
    let mut sampler = Sampler::new(3);

    for _ in 0..50 {
        let user = sampler.sample(&strategy).unwrap();
        let name = user.get("name").and_then(Value::as_str).unwrap();
        assert!(name.chars().count() <= 5);
    }
}
