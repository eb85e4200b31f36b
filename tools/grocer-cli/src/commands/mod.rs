//! CLI command implementations.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod products;

use clap::{Args, Subcommand};

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Email address to sign in with.
    pub email: Option<String>,

    /// Token from the sign-in email. Completes a login started earlier.
    #[arg(long, value_name = "TOKEN")]
    pub verify: Option<String>,
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Only show this category.
    #[arg(short, long)]
    pub category: Option<String>,

    /// Only show products in stock.
    #[arg(long)]
    pub in_stock: bool,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart.
    Show,
    /// Add a product from the catalog.
    Add {
        /// Product ID.
        product: String,
        /// Units to add.
        #[arg(short = 'n', long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
    },
    /// Add one more unit of a product already in the cart.
    Inc {
        /// Product ID.
        product: String,
    },
    /// Remove one unit; the line goes away at zero.
    Dec {
        /// Product ID.
        product: String,
    },
    /// Set a line's quantity; zero removes it.
    Set {
        /// Product ID.
        product: String,
        /// New quantity.
        quantity: u32,
    },
    /// Remove a product from the cart.
    Remove {
        /// Product ID.
        product: String,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the checkout command.
#[derive(Args, Default)]
pub struct CheckoutArgs {
    /// Full name.
    #[arg(long)]
    pub name: Option<String>,

    /// Ten-digit phone number.
    #[arg(long)]
    pub phone: Option<String>,

    /// Hostel.
    #[arg(long)]
    pub hostel: Option<String>,

    /// Location.
    #[arg(long)]
    pub location: Option<String>,

    /// Room number.
    #[arg(long)]
    pub room: Option<String>,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
