use super::AppContext;
use crate::api::models::{Amount, Id};
use crate::catalog::{ProductDetails, filter_models};
use crate::cli::ui::with_spinner;
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;

#[derive(Args)]
pub struct CatalogCommands {
    #[command(subcommand)]
    pub command: CatalogSubcommands,
}

#[derive(Subcommand)]
pub enum CatalogSubcommands {
    /// List device categories
    Categories,
    /// List brands in a category
    Brands {
        /// Category id
        category: String,
    },
    /// List models of a brand
    Models {
        /// Brand id
        brand: String,
        /// Category id
        category: String,
        /// Only show models whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show a model with its variants
    Product {
        /// Model id
        model: String,
    },
}

pub async fn catalog_command(args: CatalogCommands, ctx: &AppContext) -> Result<()> {
    match args.command {
        CatalogSubcommands::Categories => list_categories(ctx).await,
        CatalogSubcommands::Brands { category } => list_brands(ctx, &Id::parse(&category)).await,
        CatalogSubcommands::Models { brand, category, search } => {
            list_models(ctx, &Id::parse(&brand), &Id::parse(&category), search.as_deref()).await
        }
        CatalogSubcommands::Product { model } => show_product(ctx, &Id::parse(&model)).await,
    }
}

async fn list_categories(ctx: &AppContext) -> Result<()> {
    let categories = with_spinner("Loading categories...", ctx.client.categories()).await?;
    if categories.is_empty() {
        println!("  {}", "No categories available".bright_yellow());
        return Ok(());
    }

    println!();
    println!("  {}", "Categories".bright_white().bold());
    for category in &categories {
        let status = if category.availability.is_available() {
            category.availability.label().bright_green()
        } else {
            category.availability.label().dimmed()
        };
        println!(
            "  {} {:<6} {} ({})",
            "•".bright_green(),
            category.id.to_string().bright_black(),
            category.name.bright_yellow().bold(),
            status
        );
    }
    println!();
    Ok(())
}

async fn list_brands(ctx: &AppContext, category: &Id) -> Result<()> {
    let brands = with_spinner("Loading brands...", ctx.client.brands(category)).await?;
    if brands.is_empty() {
        println!("  {}", format!("No brands in category {}", category).bright_yellow());
        return Ok(());
    }

    println!();
    println!("  {}", "Brands".bright_white().bold());
    for brand in &brands {
        println!(
            "  {} {:<6} {}",
            "•".bright_green(),
            brand.id.to_string().bright_black(),
            brand.name.bright_yellow()
        );
    }
    println!();
    Ok(())
}

async fn list_models(ctx: &AppContext, brand: &Id, category: &Id, search: Option<&str>) -> Result<()> {
    let models = with_spinner("Loading models...", ctx.client.models(brand, category)).await?;
    let shown = filter_models(&models, search.unwrap_or_default());

    if shown.is_empty() {
        match search {
            Some(query) => println!("  {}", format!("No models match '{}'", query).bright_yellow()),
            None => println!("  {}", "No models found".bright_yellow()),
        }
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        "Models".bright_white().bold(),
        format!("({} of {})", shown.len(), models.len()).dimmed()
    );
    for model in shown {
        println!(
            "  {} {:<6} {}",
            "•".bright_green(),
            model.id.to_string().bright_black(),
            model.name.bright_yellow()
        );
    }
    println!();
    println!("  {}", "Get a quote with: resale-cli sell <model id>".dimmed());
    Ok(())
}

async fn show_product(ctx: &AppContext, model: &Id) -> Result<()> {
    let product = with_spinner("Loading product...", ctx.client.product_details(model)).await?;
    print_product(&product);
    Ok(())
}

fn price_label(price: Option<Amount>) -> String {
    match price {
        Some(price) => format!("₹{}", price),
        None => "-".to_string(),
    }
}

pub(crate) fn print_product(product: &ProductDetails) {
    println!();
    println!(
        "  {} {}",
        product.product_name.bright_white().bold(),
        format!("{} · {}", product.brand_name, product.category_name).dimmed()
    );
    if let Some(lead) = product.lead_amount() {
        println!("  Get up to {}", format!("₹{}", lead).bright_green().bold());
    }

    if product.variants.is_empty() {
        println!("  {}", "No variants listed".bright_yellow());
    }
    for variant in &product.variants {
        let spec = match (variant.ram(), variant.storage()) {
            (Some(ram), Some(storage)) => format!("{} / {}", ram, storage),
            (Some(ram), None) => ram.to_string(),
            (None, Some(storage)) => storage.to_string(),
            (None, None) => String::new(),
        };
        println!(
            "  {} {:<28} {:<16} {}",
            "•".bright_green(),
            variant.variant_name.bright_yellow(),
            spec,
            price_label(variant.price()).bright_white()
        );
    }
    println!();
}
