//! Integration tests for the fallback chain

use config_chain::sources::{EmbeddedResources, MemoryResources};
use config_chain::{configs, Config, ConfigBuilder, ConfigError, ConfigValue, Format};
use rust_embed::RustEmbed;
use similar_asserts::assert_eq;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(RustEmbed)]
#[folder = "tests/resources/"]
struct TestResources;

fn test_data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name)
}

fn toml(text: &str) -> Config {
    Config::parse_str(text, Format::Toml).expect("toml config")
}

fn resources_builder() -> ConfigBuilder {
    ConfigBuilder::new().with_resource_loader(EmbeddedResources::<TestResources>::new())
}

#[test]
fn test_empty_build() {
    let config = ConfigBuilder::new().build().unwrap();
    assert!(config.is_empty());
    assert!(config.entries().is_empty());
}

#[test]
fn test_first_registered_wins() {
    let config = ConfigBuilder::new()
        .with_config(toml("key = 1"))
        .with_config(toml("key = 2"))
        .build()
        .unwrap();
    assert_eq!(config.get_i64("key").unwrap(), 1);
}

#[test]
fn test_fallback_fills_in() {
    let config = ConfigBuilder::new()
        .with_config(toml("foo = 'x'"))
        .with_config(toml("bar = 'y'"))
        .build()
        .unwrap();
    assert_eq!(config.get_string("foo").unwrap(), "x");
    assert_eq!(config.get_string("bar").unwrap(), "y");
}

#[test]
fn test_nested_tables_merge_recursively() {
    let config = ConfigBuilder::new()
        .with_config(toml("[db]\nhost = 'primary'\n"))
        .with_config(toml("[db]\nhost = 'fallback'\nport = 5432\n[db.pool]\nsize = 4\n"))
        .build()
        .unwrap();
    assert_eq!(config.get_string("db.host").unwrap(), "primary");
    assert_eq!(config.get_i64("db.port").unwrap(), 5432);
    assert_eq!(config.get_i64("db.pool.size").unwrap(), 4);
}

#[test]
fn test_missing_file_is_noop() {
    let config = resources_builder()
        .with_optional_file(test_data("nonexistent.properties"))
        .unwrap()
        .with_resource("test.properties")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(config.get_string("location").unwrap(), "resources");
}

#[test]
fn test_file_beats_later_resource() {
    let config = resources_builder()
        .with_optional_file(test_data("file.properties"))
        .unwrap()
        .with_resource("test.properties")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(config.get_string("location").unwrap(), "file");
    assert_eq!(config.get_string("fallback").unwrap(), "test");
}

#[test]
fn test_resource_beats_later_file() {
    let config = resources_builder()
        .with_resource("test.properties")
        .unwrap()
        .with_optional_file(test_data("file.properties"))
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(config.get_string("location").unwrap(), "resources");
}

#[test]
fn test_embedded_resource_without_extension() {
    let config = resources_builder()
        .with_resource("server")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(config.get_string("server.host").unwrap(), "resource.example");
    assert_eq!(config.get_i64("server.port").unwrap(), 8443);
}

#[test]
fn test_substitution_sees_every_layer() {
    let resources = MemoryResources::new().with(
        "defaults.properties",
        "db.host=localhost\ndb.port=5432\ndb.url=postgres://${db.host}:${db.port}/${?db.name}\n",
    );
    let config = ConfigBuilder::new()
        .with_config(toml("[db]\nhost = 'db.internal'\n"))
        .with_resource_loader(resources)
        .with_resource("defaults.properties")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(config.get_string("db.url").unwrap(), "postgres://db.internal:5432/");
}

#[test]
fn test_unresolved_substitution_is_build_error() {
    let builder = ConfigBuilder::new().with_config(
        Config::from_object(
            [("greeting".to_string(), ConfigValue::from("hello"))]
                .into_iter()
                .collect(),
        )
        .unwrap(),
    );
    assert!(builder.build().is_ok());

    let resources = MemoryResources::new().with("app.toml", "url = 'http://${nowhere}'\n");
    let err = builder
        .with_resource_loader(resources)
        .with_resource("app.toml")
        .unwrap()
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::UnresolvedSubstitution { .. }));
    assert!(err.to_string().contains("nowhere"));
}

#[test]
fn test_pairwise_chain_equals_single_chain() {
    let a = toml("k = 'a'\n[n]\nx = 1\n");
    let b = toml("k = 'b'\nonly_b = true\n[n]\ny = 2\n");
    let c = toml("k = 'c'\nonly_c = 3\n[n]\nx = 9\nz = 3\n");

    let chained = ConfigBuilder::new()
        .with_config(a.clone())
        .with_config(b.clone())
        .with_config(c.clone())
        .build()
        .unwrap();
    let nested = ConfigBuilder::new()
        .with_config(a)
        .with_config(ConfigBuilder::new().with_config(b).with_config(c).build().unwrap())
        .build()
        .unwrap();
    assert_eq!(configs::as_map(&chained), configs::as_map(&nested));
}

#[test]
fn test_get_or_default_helpers() {
    let config = ConfigBuilder::new()
        .with_config(toml("[server]\nport = 9000\n"))
        .build()
        .unwrap();

    let calls = Cell::new(0);
    let port = configs::get_or_else(&config, "server.port", Config::get_i64, || {
        calls.set(calls.get() + 1);
        80
    })
    .unwrap();
    assert_eq!(port, 9000);
    assert_eq!(calls.get(), 0);

    let host = configs::get_or_default(&config, "server.host", Config::get_string, "0.0.0.0".into())
        .unwrap();
    assert_eq!(host, "0.0.0.0");
}

#[test]
fn test_as_map() {
    let config = ConfigBuilder::new()
        .with_config(toml("a = 1\n[b]\nc = 'x'\n"))
        .with_config(toml("[b]\nd = [1, 2]\n"))
        .build()
        .unwrap();
    let expected: BTreeMap<String, ConfigValue> = [
        ("a".to_string(), ConfigValue::Integer(1)),
        ("b.c".to_string(), ConfigValue::from("x")),
        (
            "b.d".to_string(),
            ConfigValue::List(vec![ConfigValue::Integer(1), ConfigValue::Integer(2)]),
        ),
    ]
    .into_iter()
    .collect();
    assert_eq!(configs::as_map(&config), expected);
}
