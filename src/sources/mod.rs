//! Configuration sources
//!
//! Each source produces one raw [`ConfigObject`](crate::value::ConfigObject)
//! layer for the builder to merge.

pub mod environment;
pub mod file;
pub mod properties;
pub mod resources;

pub use environment::environment_layer;
pub use file::{home_dir_path, load_file, working_directory};
pub use properties::{
    process_property, reload_process_properties, remove_process_property, set_process_property,
    PropertyStore,
};
pub use resources::{DirResources, EmbeddedResources, MemoryResources, NoResources, ResourceLoader};
