//! Checkout command.

use anyhow::{bail, Result};
use dialoguer::{Confirm, Input, Select};
use grocer_commerce::checkout::{DeliveryForm, DeliveryOptions, OrderReceipt, PaymentMethod};
use grocer_commerce::Currency;
use grocer_storefront::place_order;

use super::CheckoutArgs;
use crate::context::Context;
use crate::output::status_badge;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let backend = ctx.backend()?;
    let mut state = ctx.load_state()?;
    let session = ctx.session(&backend, &mut state).await?;

    if state.cart.is_empty() {
        bail!("Your cart is empty. Add products with `grocer cart add <product>`.");
    }

    let options = ctx.config.delivery_options();
    let mut form = form_from_args(&args);
    if !ctx.output.is_json() {
        prompt_missing(&mut form, &options)?;
    }
    let details = form.validate(&options)?;

    let currency = ctx.config.store.currency;
    if !args.yes && !ctx.output.is_json() {
        ctx.output.header("Order Summary");
        for line in state.cart.iter() {
            ctx.output.list_item(&format!(
                "{} x{}  {}",
                line.name,
                line.quantity(),
                currency.format(line.line_total())
            ));
        }
        ctx.output.kv("total", &currency.format(state.cart.total()));
        ctx.output.kv("deliver to", &details.delivery_address());
        ctx.output.kv("name", details.customer_name());
        ctx.output.kv("phone", details.phone_number());
        ctx.output
            .kv("payment", PaymentMethod::CashOnDelivery.display_name());

        let confirmed = Confirm::new()
            .with_prompt("Place this order?")
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.info("Order not placed. Your cart is unchanged.");
            return Ok(());
        }
    }

    let submitter = backend.orders(Some(&session));
    let spinner = ctx.output.spinner("Placing order...");
    let result = place_order(&submitter, session.user_id(), &details, &mut state.cart).await;
    spinner.finish_and_clear();

    let receipt = match result {
        Ok(receipt) => receipt,
        Err(e) => {
            tracing::error!(error = %e, "checkout failed");
            let notice = e.notification();
            return Err(anyhow::Error::new(e).context(notice));
        }
    };
    ctx.save_state(&state)?;

    if ctx.output.is_json() {
        ctx.output.json(&receipt);
    } else {
        print_receipt(&receipt, currency, ctx);
    }
    Ok(())
}

/// Start a form from whatever was given on the command line.
pub fn form_from_args(args: &CheckoutArgs) -> DeliveryForm {
    let field = |value: &Option<String>| value.as_deref().unwrap_or_default().trim().to_string();
    DeliveryForm {
        customer_name: field(&args.name),
        phone_number: field(&args.phone),
        hostel: field(&args.hostel),
        location: field(&args.location),
        room: field(&args.room),
    }
}

fn prompt_missing(form: &mut DeliveryForm, options: &DeliveryOptions) -> Result<()> {
    if form.customer_name.is_empty() {
        form.customer_name = Input::new().with_prompt("Full name").interact_text()?;
    }
    if form.phone_number.is_empty() {
        form.phone_number = Input::new().with_prompt("Phone number").interact_text()?;
    }
    if form.hostel.is_empty() {
        form.hostel = choose("Hostel", &options.hostels)?;
    }
    if form.location.is_empty() {
        form.location = choose("Location", &options.locations)?;
    }
    if form.room.is_empty() {
        form.room = Input::new().with_prompt("Room number").interact_text()?;
    }
    Ok(())
}

fn choose(prompt: &str, choices: &[String]) -> Result<String> {
    if choices.is_empty() {
        bail!("No {} options are configured", prompt.to_lowercase());
    }
    let index = Select::new()
        .with_prompt(prompt)
        .items(choices)
        .default(0)
        .interact()?;
    Ok(choices[index].clone())
}

fn print_receipt(receipt: &OrderReceipt, currency: Currency, ctx: &Context) {
    ctx.output.success("Order placed successfully!");
    ctx.output.kv("order", receipt.order_id.as_str());
    ctx.output.kv("status", &status_badge(receipt.status));
    ctx.output.kv("items", &receipt.item_count.to_string());
    ctx.output.kv("total", &currency.format(receipt.total));
    ctx.output.kv("deliver to", &receipt.delivery_address);
    ctx.output.kv("payment", receipt.payment_method.display_name());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_from_args() {
        let args = CheckoutArgs {
            name: Some("  Asha Rao ".into()),
            phone: Some("9876543210".into()),
            hostel: Some("2".into()),
            location: None,
            room: Some("114".into()),
            yes: true,
        };
        let form = form_from_args(&args);
        assert_eq!(form.customer_name, "Asha Rao");
        assert_eq!(form.location, "");

        let err = form.validate(&DeliveryOptions::default()).unwrap_err();
        assert!(err.to_string().contains("location"));
    }

    #[test]
    fn test_complete_args_validate() {
        let args = CheckoutArgs {
            name: Some("Asha Rao".into()),
            phone: Some("9876543210".into()),
            hostel: Some("2".into()),
            location: Some("Loc1".into()),
            room: Some("114".into()),
            ..Default::default()
        };
        let details = form_from_args(&args)
            .validate(&DeliveryOptions::default())
            .unwrap();
        assert_eq!(details.delivery_address(), "Hostel 2, Loc1, Room 114");
    }

    #[test]
    fn test_empty_args_give_blank_form() {
        assert_eq!(form_from_args(&CheckoutArgs::default()), DeliveryForm::default());
    }
}
