use anyhow::{Context, Result};
use bakery_core::{Order, OrderRepository, OrderRepositoryError, OrderStatus};

use crate::format;
use crate::storage::Storage;

pub fn list(status: Option<OrderStatus>, customer: Option<String>) -> Result<()> {
    let storage = Storage::open()?;
    let repository = &storage.orders;

    let mut orders = match (&customer, status) {
        (Some(email), _) => repository.find_by_customer(email),
        (None, Some(status)) => repository.find_by_status(status),
        (None, None) => repository.find_all(),
    }
    .context("read error")?;

    if let (Some(_), Some(status)) = (&customer, status) {
        orders.retain(|order| order.status == status);
    }

    if orders.is_empty() {
        println!("No orders found.");
        return Ok(());
    }

    let currency = storage.config.shop.currency;
    for order in &orders {
        println!("{}", format::order_line(order, currency));
    }

    Ok(())
}

pub fn show(id: i64) -> Result<()> {
    let storage = Storage::open()?;
    let order = find(&storage, id)?;
    let currency = storage.config.shop.currency;

    println!("Order #{} - {}", id, order.status);
    println!("  Placed:    {}", format::timestamp(order.created_at));
    println!("  Customer:  {} <{}>", order.customer.name, order.customer.email);
    if let Some(phone) = &order.customer.phone {
        println!("  Phone:     {}", phone);
    }
    if let Some(address) = &order.delivery.address {
        println!("  Address:   {}", address);
    }
    if let Some(date) = &order.delivery.date {
        println!("  Delivery:  {}", date);
    }
    if let Some(notes) = &order.delivery.notes {
        println!("  Notes:     {}", notes);
    }
    if let Some(intent_id) = &order.payment_intent_id {
        println!("  Payment:   {}", intent_id);
    }

    println!();
    for item in &order.items {
        println!(
            "  {:<28} {:>3} x {:>12} = {:>14}",
            item.product_name,
            item.quantity,
            currency.format(item.unit_price),
            currency.format(item.subtotal())
        );
    }
    println!("  Total: {}", currency.format(order.total));

    Ok(())
}

pub fn status(id: i64, status: OrderStatus) -> Result<()> {
    let storage = Storage::open()?;
    let order = find(&storage, id)?;

    if order.status == status {
        println!("Order #{} is already {}.", id, status);
        return Ok(());
    }
    if order.status.is_terminal() {
        anyhow::bail!("order #{} is {} and can no longer change", id, order.status);
    }

    storage
        .orders
        .update_status(id, status)
        .map_err(|error| not_found_or(error, id))?;

    tracing::info!(order_id = id, from = %order.status, to = %status, "order status changed");
    println!("Order #{}: {} -> {}.", id, order.status, status);

    Ok(())
}

pub fn remove(id: i64) -> Result<()> {
    let storage = Storage::open()?;

    storage
        .orders
        .delete(id)
        .map_err(|error| not_found_or(error, id))?;

    println!("Order #{} removed.", id);

    Ok(())
}

fn find(storage: &Storage, id: i64) -> Result<Order> {
    storage
        .orders
        .find_by_id(id)
        .map_err(|error| not_found_or(error, id))
}

fn not_found_or(error: OrderRepositoryError, id: i64) -> anyhow::Error {
    match error {
        OrderRepositoryError::NotFound { .. } => anyhow::anyhow!("order #{} not found", id),
        other => anyhow::Error::new(other).context("database error"),
    }
}
