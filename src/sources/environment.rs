//! Process environment as a flat layer

use crate::value::{ConfigObject, ConfigValue};

/// Every environment variable as a top-level string.
///
/// Keys are taken verbatim and never split on dots. Variables whose name or
/// value is not valid UTF-8 are skipped.
pub fn environment_layer() -> ConfigObject {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .map(|(key, value)| (key, ConfigValue::String(value)))
        .collect()
}
