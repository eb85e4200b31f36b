//! Cart commands.
//!
//! Everything except `add` works on the locally stored cart and needs no
//! network access. `add` looks the product up in the catalog first so the
//! cart holds the catalog's current name and price.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use grocer_commerce::cart::CartStore;
use grocer_commerce::catalog::{find_product, Product};
use grocer_commerce::{CommerceError, Currency, ProductId};
use grocer_storefront::CatalogProvider;
use serde_json::json;

use super::{CartArgs, CartCommand};
use crate::context::Context;

const WIDTHS: [usize; 3] = [24, 6, 10];

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => show(ctx),
        CartCommand::Add { product, quantity } => add(&ProductId::new(product), quantity, ctx).await,
        CartCommand::Inc { product } => edit(ctx, &product, |cart, id| cart.increment(id)),
        CartCommand::Dec { product } => edit(ctx, &product, |cart, id| cart.decrement(id)),
        CartCommand::Set { product, quantity } => {
            edit(ctx, &product, |cart, id| cart.update_quantity(id, quantity))
        }
        CartCommand::Remove { product } => edit(ctx, &product, |cart, id| cart.remove_item(id)),
        CartCommand::Clear { yes } => clear(yes, ctx),
    }
}

fn show(ctx: &Context) -> Result<()> {
    let state = ctx.load_state()?;
    ctx.require_signed_in(&state)?;
    print_cart(&state.cart, ctx);
    Ok(())
}

async fn add(id: &ProductId, quantity: u32, ctx: &Context) -> Result<()> {
    let backend = ctx.backend()?;
    let mut state = ctx.load_state()?;
    let session = ctx.session(&backend, &mut state).await?;

    let spinner = ctx.output.spinner("Looking up product...");
    let result = backend.catalog(Some(&session)).list_products().await;
    spinner.finish_and_clear();
    let products = result.context("Failed to load products")?;

    let product = find_product(&products, id)
        .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))?;
    let resulting = add_units(&mut state.cart, product, quantity)?;
    ctx.save_state(&state)?;

    tracing::info!(product = %id, quantity = resulting, "added to cart");
    if ctx.output.is_json() {
        print_cart(&state.cart, ctx);
    } else {
        ctx.output.success(&format!(
            "{} added to cart ({} in cart)",
            product.name, resulting
        ));
    }
    Ok(())
}

/// Add `quantity` units of `product`, returning the line's new quantity.
pub fn add_units(cart: &mut CartStore, product: &Product, quantity: u32) -> Result<u32> {
    let existing = cart.quantity_of(&product.id);
    let item = product.snapshot()?;
    let mut resulting = cart.add_item(item);
    if quantity > 1 {
        resulting = existing.saturating_add(quantity);
        cart.update_quantity(&product.id, resulting);
    }
    Ok(resulting)
}

fn edit<F>(ctx: &Context, product: &str, change: F) -> Result<()>
where
    F: FnOnce(&mut CartStore, &ProductId) -> bool,
{
    let mut state = ctx.load_state()?;
    ctx.require_signed_in(&state)?;

    let id = ProductId::new(product);
    if state.cart.line(&id).is_none() {
        bail!("{product} is not in your cart");
    }
    if change(&mut state.cart, &id) {
        ctx.save_state(&state)?;
    }

    if ctx.output.is_json() {
        print_cart(&state.cart, ctx);
        return Ok(());
    }
    match state.cart.line(&id) {
        Some(line) => ctx
            .output
            .success(&format!("{}: {} in cart", line.name, line.quantity())),
        None => ctx.output.success(&format!("Removed {product} from cart")),
    }
    Ok(())
}

fn clear(yes: bool, ctx: &Context) -> Result<()> {
    let mut state = ctx.load_state()?;
    ctx.require_signed_in(&state)?;

    if state.cart.is_empty() {
        ctx.output.info("Your cart is already empty.");
        return Ok(());
    }

    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove all {} items from your cart?",
                state.cart.item_count()
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            ctx.output.info("Cancelled");
            return Ok(());
        }
    }

    state.cart.clear_cart();
    ctx.save_state(&state)?;
    if ctx.output.is_json() {
        print_cart(&state.cart, ctx);
    } else {
        ctx.output.success("Cart cleared");
    }
    Ok(())
}

fn print_cart(cart: &CartStore, ctx: &Context) {
    let currency = ctx.config.store.currency;
    if ctx.output.is_json() {
        ctx.output.json(&cart_summary(cart, currency));
        return;
    }

    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return;
    }

    ctx.output.header("Your Cart");
    for row in cart_rows(cart, currency) {
        let cols: Vec<&str> = row.iter().map(String::as_str).collect();
        ctx.output.table_row(&cols, &WIDTHS);
    }
    ctx.output.info("");
    ctx.output.kv("items", &cart.item_count().to_string());
    ctx.output.kv("total", &currency.format(cart.total()));
}

/// Columns per line: name, quantity, unit price, line total.
fn cart_rows(cart: &CartStore, currency: Currency) -> Vec<Vec<String>> {
    cart.iter()
        .map(|line| {
            vec![
                line.name.clone(),
                format!("x{}", line.quantity()),
                currency.format(line.price),
                currency.format(line.line_total()),
            ]
        })
        .collect()
}

fn cart_summary(cart: &CartStore, currency: Currency) -> serde_json::Value {
    json!({
        "lines": cart.lines(),
        "item_count": cart.item_count(),
        "total": cart.total(),
        "total_display": currency.format(cart.total()),
        "currency": currency,
    })
}
