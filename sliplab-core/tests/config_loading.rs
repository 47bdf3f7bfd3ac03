//! Integration tests: config file on disk → registry → working models.

use std::io::Write;

use chrono::NaiveDate;
use sliplab_core::{
    load_config, FactoryError, SlippageConfig, SlippageFile, SlippageModel, SlippageRegistry,
    SlippageRequest,
};

const CONFIG: &str = r#"
[[models]]
model_type = "fixed_percent"
name = "ten_bps"
params = { p = 0.001 }

[[models]]
model_type = "fixed_value"
params = { value = 0.05 }

[[models]]
model_type = "half_spread"
name = "hs"
params = { spread = 0.04 }
"#;

fn registry() -> SlippageRegistry {
    let mut registry = SlippageRegistry::new();
    registry
        .register("half_spread", |ctx, req| {
            let spread = ctx.params.get::<f64>("spread").unwrap_or(0.0);
            req.price + req.side.adverse_sign() * spread / 2.0
        })
        .unwrap();
    registry
}

fn write_config(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn loads_and_builds_every_model() {
    let file = write_config(CONFIG);
    let config = load_config(file.path()).unwrap();
    let models = registry().build_all(&config.models).unwrap();

    let names: Vec<&str> = models.iter().map(|m| m.name()).collect();
    assert_eq!(names, vec!["ten_bps", "FixedValue", "hs"]);

    let dt = NaiveDate::from_ymd_opt(2024, 2, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    let req = SlippageRequest::buy(dt, 100.0);
    let prices: Vec<f64> = models.iter().map(|m| m.compute(&req)).collect();
    assert!((prices[0] - 100.1).abs() < 1e-10);
    assert!((prices[1] - 100.05).abs() < 1e-10);
    assert!((prices[2] - 100.02).abs() < 1e-10);
}

#[test]
fn unregistered_kind_in_file_fails() {
    let file = write_config(CONFIG);
    let config = load_config(file.path()).unwrap();
    let err = SlippageRegistry::new()
        .build_all(&config.models)
        .err()
        .unwrap();
    assert!(matches!(err, FactoryError::UnknownModel(k) if k == "half_spread"));
}

#[test]
fn fingerprints_are_stable_across_reloads() {
    let file = write_config(CONFIG);
    let first = load_config(file.path()).unwrap();
    let second = load_config(file.path()).unwrap();
    for (a, b) in first.models.iter().zip(&second.models) {
        assert_eq!(a.fingerprint(), b.fingerprint());
    }
    assert_ne!(first.models[0].fingerprint(), first.models[1].fingerprint());
}

#[test]
fn config_round_trips_through_toml() {
    let config = SlippageFile {
        models: vec![SlippageConfig::new("fixed_percent")
            .with_name("x")
            .with_param("p", 0.002)],
    };
    let text = toml::to_string(&config).unwrap();
    let back = SlippageFile::from_toml_str(&text).unwrap();
    assert_eq!(back, config);
}
