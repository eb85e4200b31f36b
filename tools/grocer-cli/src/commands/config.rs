//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, GrocerConfig, CONFIG_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let shown = masked(&ctx.config);

    if ctx.output.is_json() {
        ctx.output.json(&shown);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(none, using defaults)"),
    }
    ctx.output.kv("state", &ctx.state_path().display().to_string());

    ctx.output.info("");
    ctx.output.info("[backend]");
    ctx.output.kv("url", &shown.backend.url);
    ctx.output.kv("anon_key", &shown.backend.anon_key);
    ctx.output.kv(
        "request_timeout_secs",
        &shown.backend.request_timeout_secs.to_string(),
    );

    ctx.output.info("");
    ctx.output.info("[auth]");
    ctx.output.kv(
        "redirect_url",
        shown.auth.redirect_url.as_deref().unwrap_or("(backend default)"),
    );

    ctx.output.info("");
    ctx.output.info("[store]");
    ctx.output.kv("currency", shown.store.currency.code());
    ctx.output.kv("hostels", &shown.store.hostels.join(", "));
    ctx.output.kv("locations", &shown.store.locations.join(", "));

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output.success(&format!("Created: {}", config_path.display()));
    ctx.output
        .info("Set backend.url and backend.anon_key before signing in.");

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = ctx.config.check();

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Copy of `config` with the anon key shortened for display.
fn masked(config: &GrocerConfig) -> GrocerConfig {
    let mut shown = config.clone();
    shown.backend.anon_key = mask_secret(&config.backend.anon_key);
    shown
}

fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return "(not set)".to_string();
    }
    if secret.chars().count() <= 6 {
        return "****".to_string();
    }
    let visible: String = secret.chars().take(6).collect();
    format!("{visible}****")
}
