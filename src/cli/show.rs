//! Build the configuration chain and print values

use anyhow::{Context, Result};
use clap::Args;
use config_chain::sources::{reload_process_properties, set_process_property, EmbeddedResources};
use config_chain::{Config, ConfigBuilder, ConfigValue};
use rust_embed::RustEmbed;
use std::path::PathBuf;

use super::utils::parse_define;

#[derive(RustEmbed)]
#[folder = "resources/"]
struct BundledResources;

#[derive(Args)]
pub struct ShowArgs {
    /// Set a process property, like a JVM -D flag (repeatable)
    #[arg(short = 'D', value_name = "KEY=VALUE", value_parser = parse_define)]
    pub define: Vec<(String, String)>,

    /// Optional config files, highest priority first (repeatable)
    #[arg(
        short = 'f',
        long = "file",
        value_name = "PATH",
        default_values = [
            "application.prod.properties",
            "application.uat.properties",
            "application.dev.properties",
            "application.properties",
        ]
    )]
    pub files: Vec<PathBuf>,

    /// Optional config files relative to the home directory (repeatable)
    #[arg(long = "home-file", value_name = "PATH")]
    pub home_files: Vec<PathBuf>,

    /// Bundled resources, merged after all files (repeatable)
    #[arg(
        short = 'r',
        long = "resource",
        value_name = "NAME",
        default_values = ["application.properties"]
    )]
    pub resources: Vec<String>,

    /// Do not read environment variables
    #[arg(long)]
    pub no_env: bool,

    /// Do not read process properties
    #[arg(long)]
    pub no_properties: bool,

    /// Paths to print (repeatable)
    #[arg(short = 'g', long = "get", value_name = "PATH", default_values = ["host", "port"])]
    pub get: Vec<String>,

    /// Print the whole resolved config as JSON instead
    #[arg(long)]
    pub render: bool,
}

pub fn run(args: ShowArgs) -> Result<()> {
    if !args.define.is_empty() {
        for (key, value) in &args.define {
            set_process_property(key.as_str(), value.as_str());
        }
        reload_process_properties();
    }

    let config = build(&args)?;

    if args.render {
        println!("{}", config.render());
        return Ok(());
    }

    for path in &args.get {
        let value = config
            .get_value(path)
            .with_context(|| format!("Failed to read '{path}'"))?;
        println!("{path} = {}", display_value(value));
    }
    Ok(())
}

fn build(args: &ShowArgs) -> Result<Config> {
    let mut builder =
        ConfigBuilder::new().with_resource_loader(EmbeddedResources::<BundledResources>::new());

    if !args.no_env {
        builder = builder.with_environment();
    }
    if !args.no_properties {
        builder = builder.with_process_properties();
    }
    for file in &args.files {
        builder = builder.with_optional_file(file)?;
    }
    for file in &args.home_files {
        builder = builder.with_optional_home_dir_file(file)?;
    }
    for name in &args.resources {
        builder = builder.with_resource(name)?;
    }

    builder.build().context("Failed to resolve configuration")
}

fn display_value(value: &ConfigValue) -> String {
    match value.render_scalar() {
        Some(text) => text,
        None => serde_json::to_string(value).unwrap_or_default(),
    }
}
