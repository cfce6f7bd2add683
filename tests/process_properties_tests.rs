//! Process properties are global, so these tests live in their own binary
//! and run sequentially inside a single test.

use config_chain::sources::{
    process_property, reload_process_properties, remove_process_property, set_process_property,
};
use config_chain::{Config, ConfigBuilder, Format};

#[test]
fn test_process_properties_snapshot_and_reload() {
    let build = || ConfigBuilder::new().with_process_properties().build().unwrap();

    let before = build();
    assert!(!before.has_path("location"));
    assert!(before.has_path("os.name"));

    set_process_property("location", "properties");
    assert_eq!(process_property("location").as_deref(), Some("properties"));
    // Cached until an explicit reload
    assert!(!build().has_path("location"));

    reload_process_properties();
    let after = build();
    assert_eq!(after.get_string("location").unwrap(), "properties");
    // An already built config is not affected
    assert!(!before.has_path("location"));

    remove_process_property("location");
    reload_process_properties();
    assert!(!build().has_path("location"));

    // Dotted keys nest and take priority over later layers
    set_process_property("priority.check", "properties");
    reload_process_properties();
    let config = ConfigBuilder::new()
        .with_process_properties()
        .with_config(Config::parse_str("[priority]\ncheck = 'toml'\nextra = 1\n", Format::Toml).unwrap())
        .build()
        .unwrap();
    assert_eq!(config.get_string("priority.check").unwrap(), "properties");
    assert_eq!(config.get_i64("priority.extra").unwrap(), 1);
}
