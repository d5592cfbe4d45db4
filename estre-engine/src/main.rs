//! `estre` - quote configurations and manage the persisted cart

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use estre_engine::cart::checkout;
use estre_engine::pricing::presets;
use estre_engine::utils::{format_inr, round_price, to_decimal};
use estre_engine::{
    CartStore, CategoryCatalog, Config, ConfigurationSession, FabricCatalog, setup_environment,
};
use serde::Serialize;
use shared::models::{CheckoutDetails, Configuration, PriceBreakdown};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "estre", version, about = "Luxury furniture configurator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Price a configuration file
    Quote(QuoteArgs),

    /// Inspect or change the persisted cart
    #[command(subcommand)]
    Cart(CartCommands),

    /// Turn the cart into an order draft and empty it
    Checkout(CheckoutArgs),
}

#[derive(clap::Args, Debug)]
struct QuoteArgs {
    /// Configuration JSON (attribute name -> value)
    configuration: PathBuf,

    /// Category export with models, attributes and options
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Use a built-in price list instead of catalog options
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Print the quote as JSON
    #[arg(long)]
    json: bool,

    /// Also add the quoted configuration to the cart
    #[arg(long)]
    add_to_cart: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Preset {
    /// Fixed sofa price list (seat tiers, width scaling, add-ons)
    Legacy,
}

#[derive(Subcommand, Debug)]
enum CartCommands {
    /// List cart items
    List,
    /// Print the cart total
    Total,
    /// Remove one item
    Remove { id: String },
    /// Empty the cart
    Clear,
}

#[derive(clap::Args, Debug)]
struct CheckoutArgs {
    #[arg(long)]
    notes: Option<String>,

    #[arg(long)]
    address: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteReport<'a> {
    state: estre_engine::SessionState,
    fabric_requirement: estre_engine::FabricRequirement,
    fabric_cost: estre_engine::FabricCost,
    breakdown: &'a PriceBreakdown,
    summary: Vec<estre_engine::configurator::SummaryLine>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 设置环境 (dotenv, 工作目录, 日志)
    let config = setup_environment()?;

    match cli.command {
        Commands::Quote(args) => run_quote(&config, args),
        Commands::Cart(cmd) => run_cart(&config, cmd),
        Commands::Checkout(args) => run_checkout(&config, args),
    }
}

fn load_fabrics(config: &Config) -> anyhow::Result<FabricCatalog> {
    match &config.fabric_catalog_path {
        Some(path) => Ok(FabricCatalog::load(path)?),
        None => Ok(FabricCatalog::builtin()),
    }
}

fn run_quote(config: &Config, args: QuoteArgs) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&args.configuration)
        .with_context(|| format!("reading {}", args.configuration.display()))?;
    let configuration = Configuration::from_json_str(&json)?;

    let catalog = match &args.catalog {
        Some(path) => CategoryCatalog::load(path)?,
        None => CategoryCatalog::new("", ""),
    };

    let mut session = ConfigurationSession::new(catalog, Arc::new(load_fabrics(config)?))
        .with_default_base_price(config.default_base_price)
        .with_configuration(configuration);
    if let Some(Preset::Legacy) = args.preset {
        session = session.with_rule_table(presets::legacy_sofa_table());
    }

    let breakdown = session.breakdown();
    let report = QuoteReport {
        state: session.state(),
        fabric_requirement: session.fabric_requirement(),
        fabric_cost: session.fabric_cost(),
        breakdown: &breakdown,
        summary: session.summary(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_quote(&report);
    }

    if args.add_to_cart {
        let mut cart = CartStore::open(config)?;
        let item = session.add_to_cart(&mut cart)?;
        println!("Added {} (₹{})", item.id, format_inr(item.price));
    }
    Ok(())
}

fn print_quote(report: &QuoteReport<'_>) {
    for line in &report.summary {
        println!("{:<24} {}", line.label, line.value);
    }
    println!();
    println!(
        "Fabric required          {:.1} m (×{})",
        report.fabric_requirement.total, report.fabric_requirement.multiplier
    );
    println!("Base price               ₹{}", format_amount(report.breakdown.base_price));
    for modifier in &report.breakdown.applied {
        println!("  {:<22} {:+}", modifier.name, modifier.delta);
    }
    println!("Fabric cost              ₹{}", format_amount(report.breakdown.fabric_cost));
    println!("Upgrade cost             ₹{}", format_amount(report.breakdown.upgrade_cost));
    println!("Total                    ₹{}", format_inr(report.breakdown.total));
    println!("State                    {:?}", report.state);
}

/// Whole-unit INR display, rounded like final prices
fn format_amount(amount: f64) -> String {
    format_inr(round_price(to_decimal(amount)))
}

fn run_cart(config: &Config, cmd: CartCommands) -> anyhow::Result<()> {
    let mut cart = CartStore::open(config)?;
    match cmd {
        CartCommands::List => {
            if cart.is_empty() {
                println!("Cart is empty");
            }
            for item in cart.items() {
                println!("{:<40} {:<20} ₹{}", item.id, item.model_name, format_inr(item.price));
            }
        }
        CartCommands::Total => {
            println!("{} item(s), ₹{}", cart.item_count(), format_inr(cart.total_price()));
        }
        CartCommands::Remove { id } => {
            let removed = cart.remove(&id)?;
            println!("Removed {}", removed.id);
        }
        CartCommands::Clear => {
            cart.clear()?;
            println!("Cart cleared");
        }
    }
    Ok(())
}

fn run_checkout(config: &Config, args: CheckoutArgs) -> anyhow::Result<()> {
    let mut cart = CartStore::open(config)?;
    let order = checkout::build_order(
        &cart,
        CheckoutDetails {
            customer_notes: args.notes,
            delivery_address: args.address,
        },
    )?;
    println!("{}", serde_json::to_string_pretty(&order)?);
    cart.clear()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_rounds_like_prices() {
        assert_eq!(format_amount(59499.5), "59,500");
        assert_eq!(format_amount(1080.0), "1,080");
        assert_eq!(format_amount(-250.0), "0");
    }
}
