//! Product listing.

use anyhow::Result;
use grocer_commerce::cart::CartStore;
use grocer_commerce::catalog::{group_by_category, Product};
use grocer_commerce::Currency;
use grocer_storefront::CatalogProvider;
use serde_json::json;

use super::ProductsArgs;
use crate::context::Context;

const WIDTHS: [usize; 4] = [10, 24, 10, 10];

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let backend = ctx.backend()?;
    let mut state = ctx.load_state()?;
    let session = ctx.session(&backend, &mut state).await?;

    let spinner = ctx.output.spinner("Loading products...");
    let result = backend.catalog(Some(&session)).list_products().await;
    spinner.finish_and_clear();

    let products = match result {
        Ok(products) => products,
        Err(e) => {
            tracing::error!(error = %e, "product listing failed");
            let notice = e.notification();
            return Err(anyhow::Error::new(e).context(notice));
        }
    };
    let products = filter_products(products, &args);
    tracing::debug!(count = products.len(), "products loaded");

    if ctx.output.is_json() {
        let rows: Vec<_> = products
            .iter()
            .map(|p| {
                json!({
                    "product": p,
                    "in_cart": state.cart.quantity_of(&p.id),
                })
            })
            .collect();
        ctx.output.json(&rows);
        return Ok(());
    }

    if products.is_empty() {
        ctx.output.info("No products found.");
        return Ok(());
    }

    let currency = ctx.config.store.currency;
    for (category, members) in group_by_category(&products) {
        ctx.output
            .header(if category.is_empty() { "Other" } else { category });
        for product in members {
            let cols = product_row(product, currency, &state.cart);
            let cols: Vec<&str> = cols.iter().map(String::as_str).collect();
            ctx.output.table_row(&cols, &WIDTHS);
        }
    }
    Ok(())
}

/// Apply the category and stock filters, keeping catalog order.
pub fn filter_products(products: Vec<Product>, args: &ProductsArgs) -> Vec<Product> {
    products
        .into_iter()
        .filter(|p| match &args.category {
            Some(category) => p.category_name().eq_ignore_ascii_case(category.trim()),
            None => true,
        })
        .filter(|p| !args.in_stock || p.in_stock())
        .collect()
}

/// Columns: id, name, price, stock, and quantity already in the cart.
fn product_row(product: &Product, currency: Currency, cart: &CartStore) -> Vec<String> {
    let stock = if product.in_stock() {
        format!("{} left", product.stock)
    } else {
        "sold out".to_string()
    };
    let in_cart = match cart.quantity_of(&product.id) {
        0 => String::new(),
        n => format!("{n} in cart"),
    };
    vec![
        product.id.to_string(),
        product.name.clone(),
        currency.format(product.price),
        stock,
        in_cart,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use grocer_commerce::Money;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("p1", "Apples", Money::parse("2.50").unwrap())
                .with_category("Fruit")
                .with_stock(4),
            Product::new("p2", "Milk", Money::parse("1.20").unwrap())
                .with_category("Dairy")
                .with_stock(0),
            Product::new("p3", "Bananas", Money::parse("0.99").unwrap())
                .with_category("Fruit")
                .with_stock(12),
        ]
    }

    #[test]
    fn test_filter_by_category() {
        let args = ProductsArgs {
            category: Some("fruit".into()),
            in_stock: false,
        };
        let ids: Vec<_> = filter_products(catalog(), &args)
            .into_iter()
            .map(|p| p.id.to_string())
            .collect();
        assert_eq!(ids, vec!["p1", "p3"]);
    }

    #[test]
    fn test_filter_in_stock() {
        let args = ProductsArgs {
            category: None,
            in_stock: true,
        };
        assert_eq!(filter_products(catalog(), &args).len(), 2);
    }

    #[test]
    fn test_product_row() {
        let products = catalog();
        let mut cart = CartStore::new();
        cart.add_item(products[0].snapshot().unwrap());
        cart.add_item(products[0].snapshot().unwrap());

        let row = product_row(&products[0], Currency::USD, &cart);
        assert_eq!(row, vec!["p1", "Apples", "$2.50", "4 left", "2 in cart"]);

        let row = product_row(&products[1], Currency::USD, &cart);
        assert_eq!(row[3], "sold out");
        assert_eq!(row[4], "");
    }
}
