//! Grocer CLI - GroceryGo storefront from the terminal.
//!
//! Commands:
//! - `grocer login` - Sign in with an emailed link
//! - `grocer logout` - Sign out (the cart is kept)
//! - `grocer whoami` - Show the signed-in user
//! - `grocer products` - Browse the catalog
//! - `grocer cart` - View and edit the cart
//! - `grocer checkout` - Place a cash-on-delivery order
//! - `grocer config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;
mod state;

use anyhow::Result;
use std::ffi::OsString;
use std::path::Path;

use clap::{Parser, Subcommand};

use commands::{CartArgs, CheckoutArgs, ConfigArgs, LoginArgs, ProductsArgs};

/// Grocer CLI - Shop the GroceryGo storefront
#[derive(Parser)]
#[command(name = "grocer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true, env = "GROCER_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with a link sent to your email
    Login(LoginArgs),

    /// Sign out
    Logout,

    /// Show who is signed in
    Whoami,

    /// List products by category
    Products(ProductsArgs),

    /// View and edit your cart
    Cart(CartArgs),

    /// Place an order for the cart
    Checkout(CheckoutArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Load `.env` (the given file, or one found from the working directory),
/// then parse `args`. The file is read first so its `GROCER_CONFIG` reaches
/// clap's env fallback.
fn parse_cli<I, T>(env_file: Option<&Path>, args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match env_file {
        Some(path) => {
            dotenvy::from_path(path).ok();
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }
    Cli::try_parse_from(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = parse_cli(None, std::env::args_os()).unwrap_or_else(|e| e.exit());

    logging::init(cli.verbose, cli.json);

    let output = output::Output::new(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Login(args) => commands::auth::login(args, &ctx).await,
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::Whoami => commands::auth::whoami(&ctx).await,
        Commands::Products(args) => commands::products::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        if ctx.output.is_verbose() {
            ctx.output.error(&format!("{:#}", e));
        } else {
            ctx.output.error(&e.to_string());
        }
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_file_sets_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("from-env-file.toml");
        let env_file = dir.path().join(".env");
        std::fs::write(&env_file, format!("GROCER_CONFIG={}\n", config.display())).unwrap();
        std::env::remove_var("GROCER_CONFIG");

        let cli = parse_cli(Some(&env_file), ["grocer", "whoami"]).unwrap();
        std::env::remove_var("GROCER_CONFIG");

        assert_eq!(cli.config.as_deref(), Some(config.to_str().unwrap()));
        assert!(matches!(cli.command, Commands::Whoami));
    }

    #[test]
    fn test_config_flag_parses() {
        let cli = parse_cli(
            Some(Path::new("/nonexistent/.env")),
            ["grocer", "--json", "cart", "add", "p1", "-n", "3"],
        )
        .unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Cart(_)));
    }
}
