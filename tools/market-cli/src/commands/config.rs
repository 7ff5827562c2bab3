//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use market_cart::config::default_storage_key;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig, StorageBackend};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force, file } => init_config(force, &file, ctx),
        ConfigCommand::Path => show_paths(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");

    ctx.output.info("[cart]");
    ctx.output.kv("storage_key", &ctx.config.cart.storage_key);
    ctx.output.kv(
        "on_corrupt_snapshot",
        &ctx.config.cart.on_corrupt_snapshot.to_string(),
    );

    ctx.output.info("[storage]");
    let backend = match ctx.config.storage.backend {
        StorageBackend::File => "file",
        StorageBackend::Memory => "memory",
    };
    ctx.output.kv("backend", backend);
    if let Some(ref path) = ctx.config.storage.path {
        ctx.output.kv("path", path);
    }

    ctx.output.info("[logging]");
    ctx.output.kv("level", &ctx.config.logging.level.to_string());
    ctx.output.kv("format", &ctx.config.logging.format.to_string());

    Ok(())
}

fn init_config(force: bool, file: &str, ctx: &Context) -> Result<()> {
    let config_path = ctx.resolve_path(file);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    if config_path.extension().is_some_and(|e| e == "json") {
        CliConfig::default().save(&config_path)?;
    } else {
        fs::write(&config_path, generate_default_config())?;
    }
    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn show_paths(ctx: &Context) -> Result<()> {
    let config = ctx
        .config_path
        .as_ref()
        .map(|p| p.display().to_string());
    let data = match ctx.config.storage.backend {
        StorageBackend::File => Some(ctx.data_dir().display().to_string()),
        StorageBackend::Memory => None,
    };

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "config": config,
            "data": data,
            "key": ctx.config.cart.storage_key,
        }));
        return Ok(());
    }

    ctx.output
        .kv("config", config.as_deref().unwrap_or("(defaults, no file found)"));
    ctx.output.kv("data", data.as_deref().unwrap_or("(in memory)"));
    ctx.output.kv("key", &ctx.config.cart.storage_key);
    if ctx.config.cart.storage_key != default_storage_key() {
        ctx.output.debug("Using a non-default storage key");
    }

    Ok(())
}
