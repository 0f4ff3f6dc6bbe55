use anyhow::{Context, Result};
use bakery_core::{Product, ProductRepository, ProductRepositoryError};

use crate::format;
use crate::storage::Storage;
use crate::NewProductArgs;

pub fn list(category: Option<String>, popular: bool, search: Option<String>) -> Result<()> {
    let storage = Storage::open()?;
    let repository = &storage.products;

    let mut products = match (&category, &search) {
        (Some(category), _) => repository.find_by_category(category),
        (None, Some(term)) => repository.search(term),
        (None, None) if popular => repository.find_popular(),
        (None, None) => repository.find_all(),
    }
    .context("read error")?;

    if let (Some(_), Some(term)) = (&category, &search) {
        products.retain(|product| product.matches(term));
    }
    if popular {
        products.retain(|product| product.is_popular);
    }

    if products.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    let currency = storage.config.shop.currency;
    for product in &products {
        println!("{}", format::product_line(product, currency));
    }

    Ok(())
}

pub fn show(id: i64) -> Result<()> {
    let storage = Storage::open()?;
    let product = find(&storage, id)?;
    let currency = storage.config.shop.currency;

    println!("#{} {}", id, product.name);
    println!("  Category:  {}", product.category);
    println!("  Price:     {}", currency.format(product.price));
    println!(
        "  Stock:     {}{}",
        product.stock,
        if product.in_stock { "" } else { " (sold out)" }
    );
    if product.is_popular {
        println!("  Popular");
    }
    if !product.description.is_empty() {
        println!("  {}", product.description);
    }
    if !product.image.is_empty() {
        println!("  Image:     {}", product.image);
    }
    println!("  Updated:   {}", format::timestamp(product.updated_at));

    Ok(())
}

pub fn add(args: NewProductArgs) -> Result<()> {
    if args.name.trim().is_empty() {
        anyhow::bail!("the product name cannot be empty");
    }
    if args.category.trim().is_empty() {
        anyhow::bail!("the product category cannot be empty");
    }

    let storage = Storage::open()?;

    let mut product = Product::new(args.name.trim(), args.category.trim(), args.price)
        .with_description(&args.description)
        .with_image(&args.image)
        .with_stock(args.stock);
    if args.popular {
        product = product.popular();
    }

    let id = storage
        .products
        .create(&mut product)
        .context("failed to save product")?;

    println!(
        "Added #{} {} ({}).",
        id,
        product.name,
        storage.config.shop.currency.format(product.price)
    );

    Ok(())
}

pub fn update_stock(id: i64, stock: u32) -> Result<()> {
    let storage = Storage::open()?;

    storage
        .products
        .update_stock(id, stock)
        .map_err(|error| not_found_or(error, id))?;

    if stock == 0 {
        println!("Product #{} is now sold out.", id);
    } else {
        println!("Product #{} now has {} in stock.", id, stock);
    }

    Ok(())
}

pub fn remove(id: i64) -> Result<()> {
    let storage = Storage::open()?;

    storage
        .products
        .delete(id)
        .map_err(|error| not_found_or(error, id))?;

    let mut cart = storage.cart();
    if cart.line(id).is_some() {
        cart.remove(id);
        storage.save_cart(&cart)?;
    }

    println!("Product #{} removed.", id);

    Ok(())
}

pub fn categories() -> Result<()> {
    let storage = Storage::open()?;

    let categories = storage
        .products
        .categories()
        .context("read error")?;

    if categories.is_empty() {
        println!("No categories yet.");
    }
    for category in categories {
        println!("{}", category);
    }

    Ok(())
}

pub(crate) fn find(storage: &Storage, id: i64) -> Result<Product> {
    storage
        .products
        .find_by_id(id)
        .map_err(|error| not_found_or(error, id))
}

fn not_found_or(error: ProductRepositoryError, id: i64) -> anyhow::Error {
    match error {
        ProductRepositoryError::NotFound { .. } => anyhow::anyhow!("product #{} not found", id),
        other => anyhow::Error::new(other).context("database error"),
    }
}
