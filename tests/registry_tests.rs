//! The process-wide config slot is set once per process, so this binary holds
//! a single test that owns it.

use config_chain::{configs, Config, ConfigError, Format};

#[test]
fn test_properties_set_once() {
    assert!(configs::properties().is_none());

    let first = Config::parse_str("name = 'first'", Format::Toml).unwrap();
    let second = Config::parse_str("name = 'second'", Format::Toml).unwrap();

    let stored = configs::init_properties(first).unwrap();
    assert_eq!(stored.get_string("name").unwrap(), "first");

    let err = configs::init_properties(second).unwrap_err();
    assert!(matches!(err, ConfigError::AlreadyInitialized));

    let current = configs::properties().expect("initialized");
    assert_eq!(current.get_string("name").unwrap(), "first");
}
