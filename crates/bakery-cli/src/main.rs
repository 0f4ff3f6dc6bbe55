mod commands;
mod format;
mod storage;

use anyhow::Result;
use bakery_core::{Money, OrderStatus};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bakery")]
#[command(about = "Bakery storefront - shop availability, cart and orders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an initial configuration file
    Init {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },
    /// Open or close the shop and inspect its sessions
    Shop {
        #[command(subcommand)]
        command: ShopCommand,
    },
    /// Manage the product catalogue
    Product {
        #[command(subcommand)]
        command: ProductCommand,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        command: CartCommand,
    },
    /// Inspect and update orders
    Order {
        #[command(subcommand)]
        command: OrderCommand,
    },
    /// Pay for the cart and place an order
    Checkout(CheckoutArgs),
}

#[derive(Subcommand)]
enum ShopCommand {
    /// Open the shop and start a session
    Open,
    /// Close the shop and record the session
    Close,
    /// Show whether the shop is open
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Show the most recent sessions
    History {
        /// Number of sessions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand)]
enum ProductCommand {
    /// List products, newest first
    List {
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long)]
        popular: bool,
        /// Match against name and description
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one product
    Show { id: i64 },
    /// Add a product to the catalogue
    Add(NewProductArgs),
    /// Set the stock level of a product
    UpdateStock { id: i64, stock: u32 },
    /// Remove a product from the catalogue
    Remove { id: i64 },
    /// List known categories
    Categories,
}

#[derive(Args)]
pub struct NewProductArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub category: String,
    /// Price in major units, e.g. 45.50
    #[arg(long)]
    pub price: Money,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub image: String,
    #[arg(long, default_value_t = 0)]
    pub stock: u32,
    #[arg(long)]
    pub popular: bool,
}

#[derive(Subcommand)]
enum CartCommand {
    /// Show the cart and its totals
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Add one unit of a product
    Add { product_id: i64 },
    /// Set the quantity of a product; zero or less removes it
    Set {
        product_id: i64,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product from the cart
    Remove { product_id: i64 },
    /// Empty the cart
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum OrderCommand {
    /// List orders, newest first
    List {
        #[arg(short, long, value_parser = parse_order_status)]
        status: Option<OrderStatus>,
        /// Customer email
        #[arg(short, long)]
        customer: Option<String>,
    },
    /// Show one order
    Show { id: i64 },
    /// Change the status of an order
    Status {
        id: i64,
        #[arg(value_parser = parse_order_status)]
        status: OrderStatus,
    },
    /// Delete an order
    Remove { id: i64 },
}

#[derive(Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    /// Requested delivery date
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

fn parse_order_status(value: &str) -> Result<OrderStatus, String> {
    OrderStatus::from_stored(value).ok_or_else(|| {
        let known: Vec<&str> = OrderStatus::all().iter().map(|s| s.as_str()).collect();
        format!("unknown status '{}', expected one of: {}", value, known.join(", "))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => commands::init(force),
        Commands::Shop { command } => match command {
            ShopCommand::Open => commands::shop_open(),
            ShopCommand::Close => commands::shop_close(),
            ShopCommand::Status { json } => commands::shop_status(json),
            ShopCommand::History { limit } => commands::shop_history(limit),
        },
        Commands::Product { command } => match command {
            ProductCommand::List {
                category,
                popular,
                search,
            } => commands::product_list(category, popular, search),
            ProductCommand::Show { id } => commands::product_show(id),
            ProductCommand::Add(args) => commands::product_add(args),
            ProductCommand::UpdateStock { id, stock } => commands::product_update_stock(id, stock),
            ProductCommand::Remove { id } => commands::product_remove(id),
            ProductCommand::Categories => commands::product_categories(),
        },
        Commands::Cart { command } => match command {
            CartCommand::Show { json } => commands::cart_show(json),
            CartCommand::Add { product_id } => commands::cart_add(product_id),
            CartCommand::Set {
                product_id,
                quantity,
            } => commands::cart_set(product_id, quantity),
            CartCommand::Remove { product_id } => commands::cart_remove(product_id),
            CartCommand::Clear { yes } => commands::cart_clear(yes),
        },
        Commands::Order { command } => match command {
            OrderCommand::List { status, customer } => commands::order_list(status, customer),
            OrderCommand::Show { id } => commands::order_show(id),
            OrderCommand::Status { id, status } => commands::order_status(id, status),
            OrderCommand::Remove { id } => commands::order_remove(id),
        },
        Commands::Checkout(args) => commands::checkout(args).await,
    }
}
