//! Till point-of-sale CLI.
//!
//! Operates a store engine over a JSON file store: catalog maintenance,
//! one-shot sales, and the accounting summary. The gating the engine leaves
//! to its callers (customer completeness, stock advisories) lives here.

use std::{io, path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tabled::{Table, Tabled, settings::Style};
use till::{
    customers::Customer,
    persistence::JsonFileStore,
    products::{Product, ProductId},
    receipt, reports,
    store::StoreEngine,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "till", about = "Point-of-sale store engine CLI", long_about = None)]
struct Cli {
    /// Directory holding the persisted snapshots
    #[arg(long, default_value = "./data", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Catalog maintenance
    Products(ProductsCommand),

    /// Complete a sale in one shot
    Sell(SellArgs),

    /// Print the sales summary
    Report,
}

#[derive(Debug, Args)]
struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List the catalog
    List,

    /// Add a product to the catalog
    Add(AddProductArgs),

    /// Delete a product from the catalog
    Delete(DeleteProductArgs),
}

#[derive(Debug, Args)]
struct AddProductArgs {
    /// Product identifier; generated when omitted
    #[arg(long)]
    id: Option<String>,

    /// Display name
    #[arg(long)]
    name: String,

    /// Unit price, e.g. 15.50
    #[arg(long)]
    price: Decimal,

    /// Initial stock quantity
    #[arg(long)]
    stock: u32,

    /// Category label
    #[arg(long)]
    category: String,

    /// Image reference
    #[arg(long, default_value = "")]
    image: String,
}

#[derive(Debug, Args)]
struct DeleteProductArgs {
    /// Product identifier
    #[arg(long)]
    id: String,
}

#[derive(Debug, Args)]
struct SellArgs {
    /// Cart lines as ID=QTY pairs; repeat for multiple products
    #[arg(long = "item", value_name = "ID=QTY", required = true)]
    items: Vec<String>,

    /// Customer display name
    #[arg(long)]
    name: String,

    /// Customer email address
    #[arg(long)]
    email: String,

    /// Customer tax identifier
    #[arg(long)]
    nit: String,

    /// Print the rendered receipt after completing the sale
    #[arg(long)]
    receipt: bool,
}

#[derive(Debug, Tabled)]
struct ProductRow {
    #[tabled(rename = "Id")]
    id: String,

    #[tabled(rename = "Name")]
    name: String,

    #[tabled(rename = "Price")]
    price: String,

    #[tabled(rename = "Stock")]
    stock: u32,

    #[tabled(rename = "Category")]
    category: String,
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    if let Err(error) = run(cli) {
        eprintln!("{error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), String> {
    let store = JsonFileStore::new(cli.data_dir);
    let mut engine = StoreEngine::open(store)
        .map_err(|error| format!("failed to open store engine: {error}"))?;

    match cli.command {
        Commands::Products(ProductsCommand { command }) => match command {
            ProductsSubcommand::List => list_products(&engine),
            ProductsSubcommand::Add(args) => add_product(&mut engine, args),
            ProductsSubcommand::Delete(args) => delete_product(&mut engine, &args),
        },
        Commands::Sell(args) => sell(&mut engine, args),
        Commands::Report => report(&engine),
    }
}

fn list_products(engine: &StoreEngine<JsonFileStore>) -> Result<(), String> {
    let rows: Vec<ProductRow> = engine
        .catalog()
        .iter()
        .map(|product| ProductRow {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: format!("{:.2}", product.price),
            stock: product.stock,
            category: product.category.clone(),
        })
        .collect();

    if rows.is_empty() {
        println!("the catalog is empty");
        return Ok(());
    }

    let mut table = Table::new(rows);
    table.with(Style::psql());
    println!("{table}");

    Ok(())
}

fn add_product(
    engine: &mut StoreEngine<JsonFileStore>,
    args: AddProductArgs,
) -> Result<(), String> {
    let id = args.id.map_or_else(ProductId::generate, ProductId::from);

    let product = Product {
        id: id.clone(),
        name: args.name,
        price: args.price,
        stock: args.stock,
        category: args.category,
        image: args.image,
    };

    engine
        .add_product(product)
        .map_err(|error| format!("failed to add product: {error}"))?;

    println!("added product {id}");

    Ok(())
}

fn delete_product(
    engine: &mut StoreEngine<JsonFileStore>,
    args: &DeleteProductArgs,
) -> Result<(), String> {
    let id = ProductId::new(args.id.as_str());

    if engine.product(&id).is_none() {
        return Err(format!("no product with id {id}"));
    }

    engine
        .delete_product(&id)
        .map_err(|error| format!("failed to delete product: {error}"))?;

    println!("deleted product {id}");

    Ok(())
}

fn sell(engine: &mut StoreEngine<JsonFileStore>, args: SellArgs) -> Result<(), String> {
    let customer = customer_from_args(&args)?;

    for spec in &args.items {
        let (id, quantity) = parse_item(spec)?;

        let product = engine
            .product(&id)
            .cloned()
            .ok_or_else(|| format!("no product with id {id}"))?;

        if quantity > i64::from(product.stock) {
            eprintln!(
                "warning: requested {quantity} x {} but only {} in stock",
                product.name, product.stock
            );
        }

        engine.add_to_cart(&product);
        engine.update_cart_quantity(&id, quantity);
    }

    let sale = engine
        .complete_sale(customer)
        .map_err(|error| format!("failed to complete sale: {error}"))?;

    println!("sale {} completed, total {:.2}", sale.id(), sale.total());

    if args.receipt {
        println!();
        println!("{}", receipt::render(&sale));
    }

    Ok(())
}

fn customer_from_args(args: &SellArgs) -> Result<Customer, String> {
    // The engine takes any customer value; completeness gating is a caller
    // concern.
    if args.name.trim().is_empty() || args.email.trim().is_empty() || args.nit.trim().is_empty() {
        return Err("customer name, email and nit must all be provided".to_string());
    }

    Ok(Customer {
        name: args.name.clone(),
        email: args.email.clone(),
        nit: args.nit.clone(),
    })
}

fn parse_item(spec: &str) -> Result<(ProductId, i64), String> {
    let (id, quantity) = spec
        .split_once('=')
        .ok_or_else(|| format!("invalid item {spec:?}; expected ID=QTY"))?;

    let quantity: i64 = quantity
        .parse()
        .map_err(|_| format!("invalid quantity in {spec:?}"))?;

    if quantity <= 0 {
        return Err(format!("quantity must be positive in {spec:?}"));
    }

    Ok((ProductId::new(id), quantity))
}

fn report(engine: &StoreEngine<JsonFileStore>) -> Result<(), String> {
    let summary = reports::summarize(engine.sales());

    println!("total revenue: {:.2}", summary.total_revenue);
    println!("total sales:   {}", summary.total_sales);
    println!("top seller:    {}", summary.top_selling_product);

    if !summary.daily_sales.is_empty() {
        println!();
        println!("daily revenue (last {} active days):", summary.daily_sales.len());
        for day in &summary.daily_sales {
            println!("  {}  {:.2}", day.date, day.amount);
        }
    }

    Ok(())
}
