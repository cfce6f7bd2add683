//! config-chain: layered configuration with fallback merging
//!
//! A [`ConfigBuilder`] collects configuration layers from the environment,
//! process properties, optional files, bundled resources and existing
//! [`Config`] values. The first layer registered wins on every conflict and
//! later layers only fill in what is missing. Nested tables merge key by key.
//! `${path}` substitutions are expanded once the chain is complete.
//!
//! ```
//! use config_chain::{Config, ConfigBuilder, Format};
//!
//! let overrides = Config::parse_str("port = 9000", Format::Toml).unwrap();
//! let defaults = Config::parse_str("host = 'localhost'\nport = 80", Format::Toml).unwrap();
//!
//! let config = ConfigBuilder::new()
//!     .with_config(overrides)
//!     .with_config(defaults)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.get_i64("port").unwrap(), 9000);
//! assert_eq!(config.get_string("host").unwrap(), "localhost");
//! ```

pub mod builder;
pub mod config;
pub mod configs;
pub mod error;
pub mod format;
pub mod resolve;
pub mod sources;
pub mod value;

pub use builder::ConfigBuilder;
pub use config::Config;
pub use configs::ConfigCell;
pub use error::{ConfigError, Result};
pub use format::Format;
pub use resolve::ResolveOptions;
pub use value::{ConfigObject, ConfigValue};
