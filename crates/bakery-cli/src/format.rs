use chrono::{DateTime, Local, Utc};

use bakery_core::{CartLine, Currency, Order, Product, ShopSession};

pub fn timestamp(value: DateTime<Utc>) -> String {
    value.with_timezone(&Local).format("%d.%m.%Y %H:%M").to_string()
}

/// "45 min" under an hour, "2h 05m" above.
pub fn duration(minutes: i64) -> String {
    if minutes < 60 {
        return format!("{} min", minutes);
    }
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

pub fn session_line(session: &ShopSession) -> String {
    format!(
        "{} -> {}  ({})",
        timestamp(session.opened_at),
        timestamp(session.closed_at),
        duration(session.duration_minutes)
    )
}

pub fn product_line(product: &Product, currency: Currency) -> String {
    let id = product
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    let marker = if product.is_popular { " *" } else { "" };
    let availability = if product.in_stock {
        format!("{} in stock", product.stock)
    } else {
        "sold out".to_string()
    };

    format!(
        "{:>4}  {:<28} {:<12} {:>14}  {}{}",
        id,
        product.name,
        product.category,
        currency.format(product.price),
        availability,
        marker
    )
}

pub fn cart_line(line: &CartLine, currency: Currency) -> String {
    format!(
        "{:>4}  {:<28} {:>3} x {:>12} = {:>14}",
        line.product_id,
        line.name,
        line.quantity,
        currency.format(line.unit_price),
        currency.format(line.subtotal())
    )
}

pub fn order_line(order: &Order, currency: Currency) -> String {
    let id = order
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{:>4}  {}  {:<10} {:<28} {:>3} items  {:>14}",
        id,
        timestamp(order.created_at),
        order.status.as_str(),
        order.customer.email,
        order.item_count(),
        currency.format(order.total)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bakery_core::Money;

    #[test]
    fn short_durations_are_in_minutes() {
        assert_eq!(duration(0), "0 min");
        assert_eq!(duration(45), "45 min");
    }

    #[test]
    fn long_durations_show_hours() {
        assert_eq!(duration(60), "1h 00m");
        assert_eq!(duration(125), "2h 05m");
    }

    #[test]
    fn sold_out_products_are_labelled() {
        let mut product = Product::new("Savarină", "pastry", Money::from_major(14));
        product.id = Some(4);

        let line = product_line(&product, Currency::Ron);

        assert!(line.contains("sold out"));
        assert!(line.contains("14.00 RON"));
    }

    #[test]
    fn cart_line_shows_subtotal() {
        let line = CartLine {
            product_id: 2,
            unit_price: Money::from_major(45),
            quantity: 2,
            name: "Cozonac".to_string(),
            image: String::new(),
            description: String::new(),
        };

        assert!(cart_line(&line, Currency::Ron).contains("90.00 RON"));
    }
}
