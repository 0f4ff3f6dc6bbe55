use anyhow::Result;
use bakery_core::{CartLine, Currency, Money, TaxBreakdown};
use dialoguer::Confirm;
use serde::Serialize;

use super::product;
use crate::format;
use crate::storage::Storage;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CartSummary<'a> {
    lines: &'a [CartLine],
    total_items: u64,
    total_price: Money,
    currency: Currency,
}

pub fn show(json: bool) -> Result<()> {
    let storage = Storage::open()?;
    let cart = storage.cart();
    let currency = storage.config.shop.currency;

    if json {
        let summary = CartSummary {
            lines: cart.lines(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
            currency,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if cart.is_empty() {
        println!("The cart is empty.");
        return Ok(());
    }

    for line in cart.lines() {
        println!("{}", format::cart_line(line, currency));
    }

    let total = cart.total_price();
    let tax = TaxBreakdown::for_amount(total, storage.config.payment.tax_rate_percent);
    println!();
    println!("Items:  {}", cart.total_items());
    println!("Total:  {}", currency.format(total));
    println!(
        "VAT {}% on top would be {} (total {}).",
        storage.config.payment.tax_rate_percent,
        currency.format(tax.tax),
        currency.format(tax.total)
    );

    Ok(())
}

pub fn add(product_id: i64) -> Result<()> {
    let storage = Storage::open()?;

    if !storage.availability().is_open() {
        anyhow::bail!(
            "{} is closed. Products can be added once the shop opens.",
            storage.config.shop.name
        );
    }

    let product = product::find(&storage, product_id)?;
    if !product.in_stock {
        anyhow::bail!("{} is sold out", product.name);
    }

    let mut cart = storage.cart();
    cart.add(&product);
    storage.save_cart(&cart)?;

    let quantity = cart.line(product_id).map(|line| line.quantity).unwrap_or(0);
    println!(
        "{} added to the cart ({} in cart, {} items total).",
        product.name,
        quantity,
        cart.total_items()
    );

    Ok(())
}

pub fn set(product_id: i64, quantity: i64) -> Result<()> {
    let storage = Storage::open()?;
    let mut cart = storage.cart();

    if cart.line(product_id).is_none() {
        println!("Product #{} is not in the cart.", product_id);
        return Ok(());
    }

    cart.set_quantity(product_id, quantity);
    storage.save_cart(&cart)?;

    match cart.line(product_id) {
        Some(line) => println!("{} quantity set to {}.", line.name, line.quantity),
        None => println!("Product #{} removed from the cart.", product_id),
    }

    Ok(())
}

pub fn remove(product_id: i64) -> Result<()> {
    let storage = Storage::open()?;
    let mut cart = storage.cart();

    if cart.line(product_id).is_none() {
        println!("Product #{} is not in the cart.", product_id);
        return Ok(());
    }

    cart.remove(product_id);
    storage.save_cart(&cart)?;
    println!("Product #{} removed from the cart.", product_id);

    Ok(())
}

pub fn clear(skip_confirmation: bool) -> Result<()> {
    let storage = Storage::open()?;
    let mut cart = storage.cart();

    if cart.is_empty() {
        println!("The cart is already empty.");
        return Ok(());
    }

    if !skip_confirmation {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} items from the cart?", cart.total_items()))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    cart.clear();
    storage.save_cart(&cart)?;
    println!("The cart is empty.");

    Ok(())
}
